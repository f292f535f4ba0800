use super::*;
use crate::layout::equirectangular::EquirectangularLayout;
use crate::orientation::dynamic_position::DynamicPosition;

#[test]
fn names_round_trip_through_from_str() {
    for m in QualityMetric::ALL {
        assert_eq!(m.name().parse::<QualityMetric>().unwrap(), m);
        assert_eq!(m.to_string(), m.name());
    }
    assert!(matches!(
        "VMAF".parse::<QualityMetric>(),
        Err(LayoutError::Config(_))
    ));
}

#[test]
fn only_sphere_metrics_need_layouts() {
    let spherical: Vec<_> = QualityMetric::ALL
        .into_iter()
        .filter(|m| m.is_spherical())
        .collect();
    assert_eq!(
        spherical,
        vec![
            QualityMetric::SPsnrNn,
            QualityMetric::SPsnrI,
            QualityMetric::WsPsnr
        ]
    );
}

#[test]
fn evaluate_dispatches_to_the_matching_metric() {
    let layout = EquirectangularLayout::new(16, 8, DynamicPosition::default()).unwrap();
    let a = Picture::filled(16, 8, [40, 50, 60]);
    let b = Picture::filled(16, 8, [41, 51, 61]);
    let psnr = QualityMetric::Psnr.evaluate(&a, &layout, &b, &layout).unwrap();
    assert_eq!(psnr, a.psnr(&b).unwrap());
    let ssim = QualityMetric::Ssim.evaluate(&a, &layout, &a, &layout).unwrap();
    assert!((ssim - 1.0).abs() < 1e-12);
    let ws = QualityMetric::WsPsnr.evaluate(&a, &layout, &b, &layout).unwrap();
    assert!((ws - psnr).abs() < 1e-9);
}
