use super::*;
use crate::foundation::core::Fps;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("layout360-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn recognizes_image_extensions() {
    assert!(is_image_file(Path::new("a/b.PNG")));
    assert!(is_image_file(Path::new("x.jpeg")));
    assert!(!is_image_file(Path::new("x.mp4")));
    assert!(!is_image_file(Path::new("frames")));
}

#[test]
fn file_target_names_frames_after_its_stem() {
    let sink = ImageSequenceSink::new(Path::new("out/view.png"));
    assert_eq!(sink.frame_path(3), PathBuf::from("out/view_000003.png"));
    let sink = ImageSequenceSink::new(Path::new("out/frames"));
    assert_eq!(sink.frame_path(0), PathBuf::from("out/frames/frame_000000.png"));
}

#[test]
fn written_frames_read_back_in_order() {
    let dir = temp_dir("imgseq");
    let mut sink = ImageSequenceSink::new(&dir);
    sink.begin(SinkConfig::new(3, 2, Fps::new(10, 1).unwrap()))
        .unwrap();
    for v in [10u8, 20, 30] {
        sink.push_frame(FrameIndex(u64::from(v)), &Picture::filled(3, 2, [v, v, v]))
            .unwrap();
    }
    assert!(
        sink.push_frame(FrameIndex(99), &Picture::new(2, 2))
            .is_err()
    );
    sink.end().unwrap();
    assert_eq!(sink.written(), 3);

    let mut src = ImageSequenceSource::open(&dir, None).unwrap();
    assert_eq!(src.resolution(), Resolution::new(3, 2));
    let mut seen = Vec::new();
    while let Some(p) = src.next_picture().unwrap() {
        seen.push(p.as_raw()[0]);
    }
    assert_eq!(seen, vec![10, 20, 30]);

    let mut limited = ImageSequenceSource::open(&dir, Some(2)).unwrap();
    assert!(limited.next_picture().unwrap().is_some());
    assert!(limited.next_picture().unwrap().is_some());
    assert!(limited.next_picture().unwrap().is_none());

    let single = ImageSequenceSource::open(&sink.frame_path(1), None).unwrap();
    assert_eq!(single.files.len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_directory_is_a_media_error() {
    let dir = temp_dir("imgseq-empty");
    std::fs::create_dir_all(&dir).unwrap();
    assert!(matches!(
        ImageSequenceSource::open(&dir, None),
        Err(LayoutError::Media(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
