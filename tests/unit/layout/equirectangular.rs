use super::*;
use crate::layout::view::LayoutViewExt;

fn near(a: Coord3dCart, b: Coord3dCart) -> bool {
    (a - b).norm() < 1e-9
}

#[test]
fn center_and_borders_point_front_and_back() {
    let layout = EquirectangularLayout::new(16, 8, DynamicPosition::default()).unwrap();
    assert!(near(
        layout.from_2d_to_3d(CoordI::new(8, 4)),
        Coord3dCart::new(1.0, 0.0, 0.0)
    ));
    assert!(near(
        layout.from_2d_to_3d(CoordI::new(0, 4)),
        Coord3dCart::new(-1.0, 0.0, 0.0)
    ));
    assert!(near(
        layout.from_2d_to_3d(CoordI::new(12, 4)),
        Coord3dCart::new(0.0, 1.0, 0.0)
    ));
    assert!(near(
        layout.from_2d_to_3d(CoordI::new(5, 0)),
        Coord3dCart::new(0.0, 0.0, 1.0)
    ));
}

#[test]
fn back_meridian_wraps_to_the_left_border() {
    let layout = EquirectangularLayout::new(16, 8, DynamicPosition::default()).unwrap();
    let info = layout
        .from_3d_to_normalized_face_info(Coord3dSpherical::from(Coord3dCart::new(-1.0, 0.0, 0.0)));
    assert!(info.coord.x < 1e-9, "{info:?}");
    assert!((0.0..1.0).contains(&info.coord.x));
}

#[test]
fn south_pole_samples_the_last_row() {
    let layout = EquirectangularLayout::new(16, 8, DynamicPosition::default()).unwrap();
    let c = layout.from_sphere_to_2d(Coord3dSpherical::from(Coord3dCart::new(0.0, 0.0, -1.0)));
    assert_eq!(c.y, 7.0);
}

#[test]
fn sphere_round_trip_off_the_poles() {
    let layout = EquirectangularLayout::new(24, 12, DynamicPosition::default()).unwrap();
    for x in 0..24 {
        for y in 1..12 {
            let s = Coord3dSpherical::from(layout.from_2d_to_3d(CoordI::new(x, y)));
            let c = layout.from_sphere_to_2d(s);
            assert!((c.x - f64::from(x)).abs() < 1e-6, "({x},{y}) -> {c:?}");
            assert!((c.y - f64::from(y)).abs() < 1e-6, "({x},{y}) -> {c:?}");
        }
    }
}

#[test]
fn reference_resolution_is_the_picture_size() {
    let layout = EquirectangularLayout::new(40, 20, DynamicPosition::default()).unwrap();
    assert_eq!(layout.reference_resolution(), Resolution::new(40, 20));
    assert!(EquirectangularLayout::new(0, 20, DynamicPosition::default()).is_err());
}
