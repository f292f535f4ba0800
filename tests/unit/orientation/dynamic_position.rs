use super::*;
use crate::geometry::coord::Coord3dCart;

fn yaw(deg: f64) -> Quaternion {
    Quaternion::from_axis_angle(Coord3dCart::new(0.0, 0.0, 1.0), deg.to_radians())
}

fn close(a: Quaternion, b: Quaternion) -> bool {
    a.dot(b).abs() > 1.0 - 1e-9
}

#[test]
fn fixed_position_ignores_time() {
    let mut pos = DynamicPosition::fixed(yaw(30.0));
    pos.set_next_position(12.5);
    assert!(close(pos.get_next_position(), yaw(30.0)));
    assert!(!pos.is_dynamic());
    assert_eq!(DynamicPosition::default().get_next_position(), Quaternion::identity());
}

#[test]
fn parse_skips_comments_and_accepts_commas() {
    let text = "# t w x y z\n0 1 0 0 0\n\n1.0, 0.7071067811865476, 0, 0, 0.7071067811865476 # yaw 90\n";
    let trace = PositionTrace::parse(text).unwrap();
    assert_eq!(trace.samples().len(), 2);
    assert!(close(trace.samples()[1].orientation, yaw(90.0)));
}

#[test]
fn parse_reports_line_numbers() {
    let err = PositionTrace::parse("0 1 0 0 0\n1 1 0 0\n").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
    assert!(PositionTrace::parse("0 1 0 0 0\n0 1 0 0 0\n").is_err());
    assert!(PositionTrace::parse("# nothing\n").is_err());
    assert!(PositionTrace::parse("0 one 0 0 0\n").is_err());
}

#[test]
fn trace_interpolates_and_holds_ends() {
    let trace = PositionTrace::new(vec![
        PositionSample {
            timestamp: 1.0,
            orientation: yaw(0.0),
        },
        PositionSample {
            timestamp: 3.0,
            orientation: yaw(90.0),
        },
    ])
    .unwrap();
    let mut pos = DynamicPosition::from_trace(trace);
    assert!(pos.is_dynamic());
    assert!(close(pos.get_next_position(), yaw(0.0)));

    pos.set_next_position(2.0);
    assert!(close(pos.get_next_position(), yaw(45.0)));

    pos.set_next_position(10.0);
    assert!(close(pos.get_next_position(), yaw(90.0)));

    pos.set_next_position(-1.0);
    assert!(close(pos.get_next_position(), yaw(0.0)));
}

#[test]
fn load_reads_files_and_maps_parse_errors_to_config() {
    let dir = std::env::temp_dir().join(format!("layout360-trace-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.txt");
    std::fs::write(&good, "0 1 0 0 0\n").unwrap();
    assert_eq!(PositionTrace::load(&good).unwrap().samples().len(), 1);

    let bad = dir.join("bad.txt");
    std::fs::write(&bad, "0 1 0\n").unwrap();
    assert!(matches!(
        PositionTrace::load(&bad),
        Err(LayoutError::Config(_))
    ));
    assert!(matches!(
        PositionTrace::load(&dir.join("missing.txt")),
        Err(LayoutError::Other(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
