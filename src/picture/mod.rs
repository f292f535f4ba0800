pub(crate) mod buffer;
pub(crate) mod interpolate;
pub(crate) mod metric;
pub(crate) mod quality;
pub(crate) mod spherical;
