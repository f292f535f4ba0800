use super::*;

#[test]
fn each_kind_names_itself() {
    let cases = [
        (LayoutError::validation("edge 0"), "validation error: edge 0"),
        (LayoutError::config("no flow"), "configuration error: no flow"),
        (LayoutError::media("eof"), "media error: eof"),
        (LayoutError::metric("sizes"), "metric error: sizes"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn io_failures_keep_their_context() {
    use anyhow::Context as _;

    let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
    let err: LayoutError = res.context("write report").unwrap_err().into();
    assert!(matches!(err, LayoutError::Other(_)));
    assert_eq!(err.to_string(), "write report");
    assert!(format!("{err:?}").contains("disk full"));
}
