use super::*;
use crate::geometry::coord::CoordI;

fn ramp() -> Picture {
    let mut pic = Picture::new(4, 2);
    for x in 0..4 {
        for y in 0..2 {
            let v = (x * 60 + y * 10) as u8;
            pic.set_value(CoordI::new(x, y), [v, v, 255 - v]);
        }
    }
    pic
}

#[test]
fn names_parse_case_insensitively() {
    assert_eq!(
        Interpolation::from_name("NEAREST_NEIGHTBOOR"),
        Some(Interpolation::NearestNeighbor)
    );
    assert_eq!(
        Interpolation::from_name("bicubic"),
        Some(Interpolation::Bicubic)
    );
    assert_eq!(Interpolation::from_name("lanczos"), None);
    assert_eq!(Interpolation::default(), Interpolation::Bilinear);
}

#[test]
fn every_mode_is_exact_on_lattice_points() {
    let pic = ramp();
    for interp in [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
    ] {
        for x in 0..4 {
            for y in 0..2 {
                let got = pic.get_inter_pixel(CoordF::new(f64::from(x), f64::from(y)), interp);
                assert_eq!(got, pic.get(CoordI::new(x, y)), "{interp:?} at ({x},{y})");
            }
        }
    }
}

#[test]
fn nearest_rounds_to_closest_point() {
    let pic = ramp();
    assert_eq!(
        pic.get_inter_pixel(CoordF::new(1.6, 0.2), Interpolation::NearestNeighbor),
        pic.get(CoordI::new(2, 0))
    );
    // Rounds past the last column: replicated border.
    assert_eq!(
        pic.get_inter_pixel(CoordF::new(3.7, 1.9), Interpolation::NearestNeighbor),
        pic.get(CoordI::new(3, 1))
    );
}

#[test]
fn bilinear_blends_linearly() {
    let pic = ramp();
    let got = pic.get_inter_pixel(CoordF::new(0.5, 0.0), Interpolation::Bilinear);
    assert_eq!(got, [30, 30, 225]);
    let got = pic.get_inter_pixel(CoordF::new(1.0, 0.5), Interpolation::Bilinear);
    assert_eq!(got, [65, 65, 190]);
}

#[test]
fn cubic_kernel_weights_sum_to_one() {
    for f in [0.0, 0.1, 0.5, 0.77, 0.999] {
        let s: f64 = cubic_weights(f).iter().sum();
        assert!((s - 1.0).abs() < 1e-12);
    }
}

#[test]
fn uniform_picture_stays_uniform_for_every_mode() {
    let pic = Picture::filled(5, 5, [128, 128, 128]);
    for interp in [
        Interpolation::NearestNeighbor,
        Interpolation::Bilinear,
        Interpolation::Bicubic,
    ] {
        for &(x, y) in &[(0.3, 0.9), (2.5, 2.5), (4.9, 0.0), (3.21, 4.77)] {
            assert_eq!(
                pic.get_inter_pixel(CoordF::new(x, y), interp),
                [128, 128, 128]
            );
        }
    }
}
