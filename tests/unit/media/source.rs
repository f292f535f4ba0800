use super::*;

#[test]
fn yields_frames_in_order_then_ends() {
    let mut src = InMemorySource::new(vec![
        Picture::filled(2, 2, [1, 1, 1]),
        Picture::filled(2, 2, [2, 2, 2]),
    ])
    .unwrap();
    assert_eq!(src.resolution(), Resolution::new(2, 2));
    assert_eq!(src.next_picture().unwrap().unwrap().as_raw()[0], 1);
    assert_eq!(src.remaining(), 1);
    assert_eq!(src.next_picture().unwrap().unwrap().as_raw()[0], 2);
    assert!(src.next_picture().unwrap().is_none());
    assert!(src.next_picture().unwrap().is_none());
}

#[test]
fn rejects_mixed_sizes() {
    let err = InMemorySource::new(vec![Picture::new(2, 2), Picture::new(3, 2)]).unwrap_err();
    assert!(matches!(err, LayoutError::Media(_)));
    assert_eq!(InMemorySource::new(Vec::new()).unwrap().resolution(), Resolution::default());
}
