use crate::foundation::core::Resolution;
use crate::foundation::error::{LayoutError, LayoutResult};
use crate::foundation::math::snap_unit;
use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
use crate::layout::view::{LayoutBase, LayoutView, NormalizedFaceInfo};
use crate::orientation::dynamic_position::DynamicPosition;

/// Number of faces of a cube map.
pub const CUBE_FACES: i32 = 6;
const GRID_COLUMNS: i32 = 3;

/// Cube face identifiers, in picture order (row-major over a 3x2 grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// Front (+X).
    Front = 0,
    /// Back (-X).
    Back = 1,
    /// Right (+Y).
    Right = 2,
    /// Left (-Y).
    Left = 3,
    /// Top (+Z).
    Top = 4,
    /// Bottom (-Z).
    Bottom = 5,
}

impl CubeFace {
    /// Face with the given id.
    pub fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            0 => Self::Front,
            1 => Self::Back,
            2 => Self::Right,
            3 => Self::Left,
            4 => Self::Top,
            5 => Self::Bottom,
            _ => return None,
        })
    }

    /// Face id.
    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Six square faces of `edge x edge` pixels arranged in a 3x2 grid:
/// front, back, right on the first row and left, top, bottom on the second.
///
/// On the lateral faces rows go down and columns go right as seen from the center of the
/// sphere. The top face has the front at its bottom edge, the bottom face has it at its top
/// edge.
#[derive(Clone, Debug)]
pub struct CubeMapLayout {
    base: LayoutBase,
    edge: u32,
}

impl CubeMapLayout {
    /// Build a cube map with `edge`-pixel faces (picture size `3*edge x 2*edge`).
    pub fn new(edge: u32, position: DynamicPosition) -> LayoutResult<Self> {
        let (Some(width), Some(height)) = (edge.checked_mul(3), edge.checked_mul(2)) else {
            return Err(LayoutError::validation(format!("cube map edge {edge} is too large")));
        };
        if edge == 0 {
            return Err(LayoutError::validation("cube map edge must be > 0"));
        }
        Ok(Self {
            base: LayoutBase::new(width, height).with_position(position),
            edge,
        })
    }

    /// Face edge in pixels.
    pub fn edge(&self) -> u32 {
        self.edge
    }

    fn face_origin(face: i32) -> (i32, i32) {
        (face % GRID_COLUMNS, face / GRID_COLUMNS)
    }
}

impl LayoutView for CubeMapLayout {
    fn kind(&self) -> &'static str {
        "cubeMap"
    }

    fn base(&self) -> &LayoutBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayoutBase {
        &mut self.base
    }

    fn reference_resolution(&self) -> Resolution {
        Resolution::new(4 * self.edge, 2 * self.edge)
    }

    fn from_2d_to_normalized_face_info(&self, pixel: CoordI) -> NormalizedFaceInfo {
        let e = self.edge as i32;
        let inside = pixel.x >= 0 && pixel.y >= 0 && pixel.x < GRID_COLUMNS * e && pixel.y < 2 * e;
        // Off-grid lattice points keep the coordinates of the nearest face, extended past its
        // edge, under face id -1.
        let col = pixel.x.div_euclid(e).clamp(0, GRID_COLUMNS - 1);
        let row = pixel.y.div_euclid(e).clamp(0, 1);
        let ef = f64::from(self.edge);
        NormalizedFaceInfo::new(
            CoordF::new(
                f64::from(pixel.x - col * e) / ef,
                f64::from(pixel.y - row * e) / ef,
            ),
            if inside { row * GRID_COLUMNS + col } else { -1 },
        )
    }

    fn from_normalized_info_to_2d(&self, info: NormalizedFaceInfo) -> CoordF {
        if !(0..CUBE_FACES).contains(&info.face_id) {
            return CoordF::new(f64::NAN, f64::NAN);
        }
        let ef = f64::from(self.edge);
        let (col, row) = Self::face_origin(info.face_id);
        // Stay inside the face so samples never come from a neighbor.
        let within = |t: f64| if t > ef - 1.0 && t <= ef { ef - 1.0 } else { t };
        CoordF::new(
            f64::from(col) * ef + within(info.coord.x * ef),
            f64::from(row) * ef + within(info.coord.y * ef),
        )
    }

    fn from_3d_to_normalized_face_info(&self, point: Coord3dSpherical) -> NormalizedFaceInfo {
        let p = self.base.orientation().inv().rotate(Coord3dCart::from(point));
        if p.is_degenerate() {
            return NormalizedFaceInfo::new(CoordF::new(f64::NAN, f64::NAN), -1);
        }
        let (ax, ay, az) = (p.x.abs(), p.y.abs(), p.z.abs());
        let (face, a, b) = if ax >= ay && ax >= az {
            if p.x >= 0.0 {
                (CubeFace::Front, p.y / ax, -p.z / ax)
            } else {
                (CubeFace::Back, -p.y / ax, -p.z / ax)
            }
        } else if ay >= az {
            if p.y >= 0.0 {
                (CubeFace::Right, -p.x / ay, -p.z / ay)
            } else {
                (CubeFace::Left, p.x / ay, -p.z / ay)
            }
        } else if p.z >= 0.0 {
            (CubeFace::Top, p.y / az, p.x / az)
        } else {
            (CubeFace::Bottom, p.y / az, -p.x / az)
        };
        NormalizedFaceInfo::new(
            CoordF::new(snap_unit((a + 1.0) / 2.0), snap_unit((b + 1.0) / 2.0)),
            face.id(),
        )
    }

    fn from_normalized_info_to_3d(&self, info: NormalizedFaceInfo) -> Coord3dCart {
        let a = 2.0 * info.coord.x - 1.0;
        let b = 2.0 * info.coord.y - 1.0;
        let local = match CubeFace::from_id(info.face_id) {
            Some(CubeFace::Front) => Coord3dCart::new(1.0, a, -b),
            Some(CubeFace::Back) => Coord3dCart::new(-1.0, -a, -b),
            Some(CubeFace::Right) => Coord3dCart::new(-a, 1.0, -b),
            Some(CubeFace::Left) => Coord3dCart::new(a, -1.0, -b),
            Some(CubeFace::Top) => Coord3dCart::new(b, a, 1.0),
            Some(CubeFace::Bottom) => Coord3dCart::new(-b, a, -1.0),
            None => return Coord3dCart::default(),
        };
        self.base.orientation().rotate(local.normalized())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cubemap.rs"]
mod tests;
