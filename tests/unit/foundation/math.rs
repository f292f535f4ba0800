use super::*;

#[test]
fn snap_unit_only_absorbs_noise() {
    assert_eq!(snap_unit(-1e-16), 0.0);
    assert_eq!(snap_unit(1.0 + 1e-12), 1.0);
    assert_eq!(snap_unit(0.25), 0.25);
    assert_eq!(snap_unit(-0.1), -0.1);
    assert_eq!(snap_unit(1.5), 1.5);
}

#[test]
fn saturate_u8_rounds_and_clamps() {
    assert_eq!(saturate_u8(254.6), 255);
    assert_eq!(saturate_u8(300.0), 255);
    assert_eq!(saturate_u8(-4.0), 0);
    assert_eq!(saturate_u8(f64::NAN), 0);
}

#[test]
fn interval_is_inclusive_exclusive() {
    assert!(in_interval(0.0, 0.0, 4.0));
    assert!(in_interval(3.999, 0.0, 4.0));
    assert!(!in_interval(4.0, 0.0, 4.0));
    assert!(!in_interval(-1e-12, 0.0, 4.0));
}
