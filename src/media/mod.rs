pub(crate) mod endpoint;
pub(crate) mod ffmpeg;
pub(crate) mod image_seq;
pub(crate) mod sink;
pub(crate) mod source;
