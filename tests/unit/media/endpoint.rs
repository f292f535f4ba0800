use super::*;
use crate::foundation::core::Fps;
use crate::media::sink::InMemorySink;
use crate::media::source::InMemorySource;

fn cfg() -> SinkConfig {
    SinkConfig::new(2, 2, Fps::new(30, 1).unwrap())
}

#[test]
fn unattached_endpoint_reads_nothing_and_drops_writes() {
    let mut ep = LayoutEndpoint::new();
    assert!(ep.read_next_picture_from_video().unwrap().is_none());
    ep.write_picture_to_video(&Picture::new(2, 2)).unwrap();
    assert!(!ep.has_input() && !ep.has_output());
    ep.finish().unwrap();
}

#[test]
fn first_attached_input_wins() {
    let mut ep = LayoutEndpoint::new();
    ep.init_input_source(Box::new(
        InMemorySource::new(vec![Picture::filled(2, 2, [7, 7, 7])]).unwrap(),
    ));
    ep.init_input_source(Box::new(
        InMemorySource::new(vec![Picture::filled(4, 4, [1, 1, 1])]).unwrap(),
    ));
    ep.init_input_video(Path::new("does-not-exist.mp4"), None)
        .unwrap();
    assert_eq!(ep.input_resolution(), Some(Resolution::new(2, 2)));
    assert_eq!(
        ep.read_next_picture_from_video().unwrap().unwrap().as_raw()[0],
        7
    );
    assert!(ep.read_next_picture_from_video().unwrap().is_none());
}

#[test]
fn output_numbers_frames_and_closes_once() {
    let mut ep = LayoutEndpoint::new();
    let first = InMemorySink::new();
    let captured = first.captured();
    ep.init_output_sink(Box::new(first), cfg()).unwrap();

    let second = InMemorySink::new();
    let ignored = second.captured();
    ep.init_output_sink(Box::new(second), cfg()).unwrap();
    assert!(ignored.config().is_none());

    ep.write_picture_to_video(&Picture::new(2, 2)).unwrap();
    ep.write_picture_to_video(&Picture::new(2, 2)).unwrap();
    ep.finish().unwrap();
    let idx: Vec<u64> = captured.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
    assert!(captured.ended());
    assert!(!ep.has_output());
}
