use std::f64::consts::FRAC_PI_2;

use super::*;
use crate::layout::equirectangular::EquirectangularLayout;
use crate::layout::view::LayoutViewExt;
use crate::orientation::dynamic_position::DynamicPosition;

fn near(a: Coord3dCart, b: Coord3dCart) -> bool {
    (a - b).norm() < 1e-9
}

fn equi() -> Box<dyn LayoutView> {
    Box::new(EquirectangularLayout::new(32, 16, DynamicPosition::default()).unwrap())
}

fn yaw90() -> Quaternion {
    Quaternion::from_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0)
}

fn roll90() -> Quaternion {
    Quaternion::from_axis_angle(Coord3dCart::new(1.0, 0.0, 0.0), FRAC_PI_2)
}

#[test]
fn decorator_forwards_the_base_contract() {
    let mut deco = RotationDecorator::new(equi(), RotationTransform::new(yaw90()));
    assert_eq!((deco.width(), deco.height()), (32, 16));
    assert_eq!(deco.reference_resolution(), Resolution::new(32, 16));
    assert_eq!(deco.kind(), "rotation");
    assert!(!deco.is_initialized());
    deco.init().unwrap();
    assert!(deco.is_initialized() && deco.inner().is_initialized());
}

#[test]
fn rotation_decorator_turns_the_view() {
    let deco = RotationDecorator::new(equi(), RotationTransform::new(yaw90()));
    assert!(near(
        deco.from_2d_to_3d(CoordI::new(16, 8)),
        Coord3dCart::new(0.0, 1.0, 0.0)
    ));
}

#[test]
fn chains_apply_the_outermost_transform_last_toward_the_sphere() {
    let inner = RotationDecorator::new(equi(), RotationTransform::new(yaw90()));
    let outer = RotationDecorator::new(Box::new(inner), RotationTransform::new(roll90()));
    assert!(near(
        outer.from_2d_to_3d(CoordI::new(16, 8)),
        Coord3dCart::new(0.0, 0.0, 1.0)
    ));
}

#[test]
fn decorated_sphere_round_trip_is_the_identity() {
    let inner = OffsetDecorator::new(
        equi(),
        OffsetTransform::new(Coord3dCart::new(0.3, -0.2, 0.1)).unwrap(),
    );
    let deco = RotationDecorator::new(Box::new(inner), RotationTransform::new(roll90()));
    for x in 1..32 {
        for y in 1..16 {
            let s = Coord3dSpherical::from(deco.from_2d_to_3d(CoordI::new(x, y)));
            let c = deco.from_sphere_to_2d(s);
            assert!((c.x - f64::from(x)).abs() < 1e-6, "({x},{y}) -> {c:?}");
            assert!((c.y - f64::from(y)).abs() < 1e-6, "({x},{y}) -> {c:?}");
        }
    }
}

#[test]
fn offset_leans_directions_toward_the_offset() {
    let t = OffsetTransform::new(Coord3dCart::new(0.5, 0.0, 0.0)).unwrap();
    assert!(near(
        t.after_to_3d(Coord3dCart::new(1.0, 0.0, 0.0)),
        Coord3dCart::new(1.0, 0.0, 0.0)
    ));
    let side = t.after_to_3d(Coord3dCart::new(0.0, 1.0, 0.0));
    assert!(side.x > 0.4 && (side.norm() - 1.0).abs() < 1e-12);

    let back = Coord3dCart::from(t.before_from_3d(Coord3dSpherical::from(side)));
    assert!(near(back, Coord3dCart::new(0.0, 1.0, 0.0)));
}

#[test]
fn offset_requires_an_inner_viewpoint() {
    assert!(OffsetTransform::new(Coord3dCart::new(1.0, 0.0, 0.0)).is_err());
    assert!(OffsetTransform::new(Coord3dCart::new(f64::NAN, 0.0, 0.0)).is_err());
    let t = OffsetTransform::new(Coord3dCart::default()).unwrap();
    assert!(t.after_to_3d(Coord3dCart::default()).is_degenerate());
}
