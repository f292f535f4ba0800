use super::*;

#[test]
fn fps_is_reduced_and_validated() {
    let fps = Fps::new(60, 2).unwrap();
    assert_eq!(fps, Fps { num: 30, den: 1 });
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fractional_fps_roundtrips_through_f64() {
    let fps = Fps::from_f64(29.97).unwrap();
    assert_eq!(fps, Fps { num: 2997, den: 100 });
    assert!((fps.as_f64() - 29.97).abs() < 1e-9);
    assert!(Fps::from_f64(0.0).is_err());
    assert!(Fps::from_f64(f64::NAN).is_err());
}

#[test]
fn divided_fps_matches_processing_step() {
    let fps = Fps::new(30, 1).unwrap().divided_by(3).unwrap();
    assert_eq!(fps, Fps { num: 10, den: 1 });
    assert!((fps.frames_to_secs(5) - 0.5).abs() < 1e-12);
}

#[test]
fn resolution_scales_with_rounding() {
    let r = Resolution::new(1000, 500);
    assert_eq!(r.scaled(0.5).unwrap(), Resolution::new(500, 250));
    assert_eq!(Resolution::new(3, 3).scaled(0.5).unwrap(), Resolution::new(2, 2));
    assert!(r.scaled(0.0).is_err());
    assert!(r.scaled(0.0001).is_err());
    assert_eq!(r.area(), 500_000);
}
