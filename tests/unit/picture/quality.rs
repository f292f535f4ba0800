use super::*;
use crate::geometry::coord::CoordI;
use crate::foundation::error::LayoutError;

fn checker(w: u32, h: u32, seed: u32) -> Picture {
    let mut pic = Picture::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = ((x * 37 + y * 91 + seed * 13) % 251) as u8;
            pic.set_value(CoordI::new(x as i32, y as i32), [v, v / 2, 255 - v]);
        }
    }
    pic
}

#[test]
fn psnr_of_identical_pictures_is_capped() {
    let a = checker(16, 9, 1);
    assert_eq!(a.psnr(&a).unwrap(), PSNR_IDENTICAL_DB);
}

#[test]
fn psnr_of_unit_error_matches_closed_form() {
    let a = Picture::filled(8, 8, [10, 20, 30]);
    let b = Picture::filled(8, 8, [11, 21, 31]);
    let expected = 10.0 * (255.0f64 * 255.0).log10();
    assert!((a.psnr(&b).unwrap() - expected).abs() < 1e-9);
}

#[test]
fn psnr_averages_channels() {
    // Only the first channel differs; the other two report the cap.
    let a = Picture::filled(4, 4, [0, 0, 0]);
    let b = Picture::filled(4, 4, [255, 0, 0]);
    let got = a.psnr(&b).unwrap();
    assert!((got - 2.0 * PSNR_IDENTICAL_DB / 3.0).abs() < 1e-9);
}

#[test]
fn metrics_are_symmetric() {
    let a = checker(24, 20, 1);
    let b = checker(24, 20, 7);
    assert_eq!(a.psnr(&b).unwrap(), b.psnr(&a).unwrap());
    assert!((a.ssim(&b).unwrap() - b.ssim(&a).unwrap()).abs() < 1e-12);
    assert!((a.ms_ssim(&b).unwrap() - b.ms_ssim(&a).unwrap()).abs() < 1e-12);
}

#[test]
fn ssim_and_ms_ssim_are_one_for_identical_pictures() {
    for (w, h) in [(32, 32), (40, 17), (3, 3), (1, 1)] {
        let a = checker(w, h, 3);
        assert!((a.ssim(&a).unwrap() - 1.0).abs() < 1e-12, "{w}x{h}");
        assert!((a.ms_ssim(&a).unwrap() - 1.0).abs() < 1e-12, "{w}x{h}");
    }
}

#[test]
fn ssim_drops_for_different_structure() {
    let a = checker(32, 32, 1);
    let b = checker(32, 32, 9);
    let s = a.ssim(&b).unwrap();
    assert!(s < 0.99, "ssim {s}");
    let ms = a.ms_ssim(&b).unwrap();
    assert!((0.0..1.0).contains(&ms), "ms-ssim {ms}");
}

#[test]
fn size_mismatch_is_a_metric_error() {
    let a = Picture::new(4, 4);
    let b = Picture::new(4, 5);
    assert!(matches!(a.psnr(&b), Err(LayoutError::Metric(_))));
    assert!(matches!(a.ssim(&b), Err(LayoutError::Metric(_))));
    assert!(matches!(
        Picture::new(0, 0).ms_ssim(&Picture::new(0, 0)),
        Err(LayoutError::Metric(_))
    ));
}

#[test]
fn downsample_averages_blocks() {
    let plane = Plane {
        width: 4,
        height: 2,
        data: vec![0.0, 2.0, 4.0, 8.0, 2.0, 4.0, 8.0, 12.0],
    };
    let half = plane.downsample();
    assert_eq!((half.width, half.height), (2, 1));
    assert_eq!(half.data, vec![2.0, 8.0]);
}
