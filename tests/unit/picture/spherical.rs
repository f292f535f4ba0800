use std::f64::consts::FRAC_PI_2;

use super::*;
use crate::geometry::coord::Coord3dCart;
use crate::geometry::quaternion::Quaternion;
use crate::layout::cubemap::CubeMapLayout;
use crate::layout::equirectangular::EquirectangularLayout;
use crate::layout::flat_fixed::FlatFixedLayout;
use crate::orientation::dynamic_position::DynamicPosition;
use crate::picture::quality::PSNR_IDENTICAL_DB;

fn unit_error_psnr() -> f64 {
    10.0 * (255.0f64 * 255.0).log10()
}

fn gradient(w: u32, h: u32) -> Picture {
    let mut pic = Picture::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = ((x * 7 + y * 3) % 256) as u8;
            pic.set_value(CoordI::new(x as i32, y as i32), [v, 255 - v, v / 3]);
        }
    }
    pic
}

#[test]
fn fibonacci_points_cover_the_sphere_evenly() {
    let pts = fibonacci_sphere(10_000);
    assert_eq!(pts.len(), 10_000);
    let mut centroid = Coord3dCart::default();
    for p in &pts {
        let c = Coord3dCart::from(*p);
        assert!((c.norm() - 1.0).abs() < 1e-12);
        centroid = centroid + c;
    }
    assert!((centroid * (1.0 / 10_000.0)).norm() < 1e-3);
    let north = pts.iter().filter(|p| p.phi < FRAC_PI_2).count();
    assert_eq!(north, 5_000);
}

#[test]
fn s_psnr_of_identical_pictures_is_capped() {
    let layout = EquirectangularLayout::new(64, 32, DynamicPosition::default()).unwrap();
    let pic = gradient(64, 32);
    let got = pic
        .s_psnr(&pic, &layout, &layout, Interpolation::NearestNeighbor)
        .unwrap();
    assert_eq!(got, PSNR_IDENTICAL_DB);
}

#[test]
fn s_psnr_of_a_uniform_offset_matches_plain_psnr() {
    let samples = fibonacci_sphere(20_000);
    let equi = EquirectangularLayout::new(32, 16, DynamicPosition::default()).unwrap();
    let cube = CubeMapLayout::new(8, DynamicPosition::default()).unwrap();
    let a = Picture::filled(32, 16, [100, 100, 100]);
    let b = Picture::filled(24, 16, [101, 101, 101]);
    for interp in [Interpolation::NearestNeighbor, Interpolation::Bicubic] {
        let got = a.s_psnr_over(&samples, &b, &equi, &cube, interp).unwrap();
        assert!((got - unit_error_psnr()).abs() < 1e-9, "{interp:?}: {got}");
    }
}

#[test]
fn s_psnr_without_common_coverage_is_an_error() {
    let front =
        FlatFixedLayout::new(8, 8, FRAC_PI_2, FRAC_PI_2, DynamicPosition::default()).unwrap();
    let back = FlatFixedLayout::new(
        8,
        8,
        FRAC_PI_2,
        FRAC_PI_2,
        DynamicPosition::fixed(Quaternion::from_yaw_pitch_roll(std::f64::consts::PI, 0.0, 0.0)),
    )
    .unwrap();
    let pic = gradient(8, 8);
    let samples = fibonacci_sphere(5_000);
    let err = pic
        .s_psnr_over(&samples, &pic, &front, &back, Interpolation::Bilinear)
        .unwrap_err();
    assert!(matches!(err, LayoutError::Metric(_)));
}

#[test]
fn ws_psnr_of_a_uniform_offset_matches_plain_psnr() {
    let layout = EquirectangularLayout::new(32, 16, DynamicPosition::default()).unwrap();
    let a = Picture::filled(32, 16, [10, 10, 10]);
    let b = Picture::filled(32, 16, [11, 11, 11]);
    let got = a.ws_psnr(&b, &layout, &layout).unwrap();
    assert!((got - unit_error_psnr()).abs() < 1e-9);
    assert_eq!(a.ws_psnr(&a, &layout, &layout).unwrap(), PSNR_IDENTICAL_DB);
}

#[test]
fn ws_psnr_discounts_polar_rows() {
    let layout = EquirectangularLayout::new(32, 16, DynamicPosition::default()).unwrap();
    let reference = Picture::filled(32, 16, [128, 128, 128]);
    let mut polar = reference.clone();
    let mut equatorial = reference.clone();
    for x in 0..32 {
        polar.set_value(CoordI::new(x, 0), [0, 0, 0]);
        equatorial.set_value(CoordI::new(x, 8), [0, 0, 0]);
    }
    let p = reference.ws_psnr(&polar, &layout, &layout).unwrap();
    let e = reference.ws_psnr(&equatorial, &layout, &layout).unwrap();
    assert!(p > e, "polar {p} vs equatorial {e}");
    assert!(reference.psnr(&polar).unwrap() == reference.psnr(&equatorial).unwrap());
}

#[test]
fn ws_psnr_needs_equal_sizes() {
    let layout = EquirectangularLayout::new(8, 4, DynamicPosition::default()).unwrap();
    let err = Picture::new(8, 4)
        .ws_psnr(&Picture::new(4, 4), &layout, &layout)
        .unwrap_err();
    assert!(matches!(err, LayoutError::Metric(_)));
}
