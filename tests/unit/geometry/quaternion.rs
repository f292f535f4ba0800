use super::*;
use std::f64::consts::{FRAC_PI_2, PI};

fn assert_close(a: Coord3dCart, b: Coord3dCart) {
    assert!((a - b).norm() < 1e-12, "{a:?} != {b:?}");
}

#[test]
fn identity_leaves_points_unchanged() {
    let p = Coord3dCart::new(0.3, -0.4, 0.5);
    assert_eq!(Quaternion::identity().rotate(p), p);
}

#[test]
fn yaw_turns_front_toward_right() {
    let q = Quaternion::from_yaw_pitch_roll(FRAC_PI_2, 0.0, 0.0);
    assert_close(
        q.rotate(Coord3dCart::new(1.0, 0.0, 0.0)),
        Coord3dCart::new(0.0, 1.0, 0.0),
    );
}

#[test]
fn pitch_raises_front_toward_up() {
    let q = Quaternion::from_yaw_pitch_roll(0.0, FRAC_PI_2, 0.0);
    assert_close(
        q.rotate(Coord3dCart::new(1.0, 0.0, 0.0)),
        Coord3dCart::new(0.0, 0.0, 1.0),
    );
}

#[test]
fn inverse_undoes_rotation() {
    let q = Quaternion::from_yaw_pitch_roll(0.7, -0.3, 1.9);
    let p = Coord3dCart::new(0.2, 0.9, -0.1);
    assert_close(q.inv().rotate(q.rotate(p)), p);
}

#[test]
fn product_composes_rotations() {
    let a = Quaternion::from_axis_angle(Coord3dCart::new(0.0, 0.0, 1.0), 0.4);
    let b = Quaternion::from_axis_angle(Coord3dCart::new(1.0, 1.0, 0.0), 1.2);
    let p = Coord3dCart::new(0.5, -0.5, 0.7);
    assert_close((a * b).rotate(p), a.rotate(b.rotate(p)));
}

#[test]
fn slerp_hits_endpoints_and_midpoint() {
    let a = Quaternion::identity();
    let b = Quaternion::from_axis_angle(Coord3dCart::new(0.0, 0.0, 1.0), PI / 2.0);
    let front = Coord3dCart::new(1.0, 0.0, 0.0);
    assert_close(a.slerp(b, 0.0).rotate(front), front);
    assert_close(a.slerp(b, 1.0).rotate(front), b.rotate(front));
    let half = Quaternion::from_axis_angle(Coord3dCart::new(0.0, 0.0, 1.0), PI / 4.0);
    assert_close(a.slerp(b, 0.5).rotate(front), half.rotate(front));
}

#[test]
fn rotation_of_spherical_point_keeps_radius() {
    let q = Quaternion::from_yaw_pitch_roll(0.1, 0.2, 0.3);
    let s = rotation(Coord3dSpherical::on_unit_sphere(1.0, 1.0), q);
    assert!((s.radius - 1.0).abs() < 1e-12);
}
