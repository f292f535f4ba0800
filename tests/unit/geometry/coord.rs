use super::*;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn cross_product_follows_right_hand_rule() {
    let x = Coord3dCart::new(1.0, 0.0, 0.0);
    let y = Coord3dCart::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Coord3dCart::new(0.0, 0.0, 1.0));
    assert_eq!(y.cross(x), Coord3dCart::new(0.0, 0.0, -1.0));
}

#[test]
fn spherical_conventions_match_axes() {
    let front = Coord3dSpherical::from(Coord3dCart::new(1.0, 0.0, 0.0));
    assert!(close(front.theta, 0.0));
    assert!(close(front.phi, FRAC_PI_2));

    let up = Coord3dSpherical::from(Coord3dCart::new(0.0, 0.0, 2.0));
    assert!(close(up.radius, 2.0));
    assert!(close(up.phi, 0.0));

    let right = Coord3dSpherical::from(Coord3dCart::new(0.0, 1.0, 0.0));
    assert!(close(right.theta, FRAC_PI_2));
}

#[test]
fn spherical_and_cartesian_roundtrip() {
    for &(theta, phi) in &[(0.3, 1.1), (-2.5, 0.2), (PI - 0.01, 2.9), (-FRAC_PI_4, FRAC_PI_4)] {
        let s = Coord3dSpherical::on_unit_sphere(theta, phi);
        let back = Coord3dSpherical::from(Coord3dCart::from(s));
        assert!(close(back.radius, 1.0));
        assert!(close(back.theta, theta));
        assert!(close(back.phi, phi));
    }
}

#[test]
fn degenerate_points_are_detected() {
    assert!(Coord3dCart::default().is_degenerate());
    assert!(Coord3dCart::new(f64::NAN, 0.0, 1.0).is_degenerate());
    assert!(!Coord3dCart::new(0.0, 0.0, 1e-9).is_degenerate());
    assert!(Coord3dSpherical::from(Coord3dCart::default()).is_degenerate());
}
