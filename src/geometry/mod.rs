pub(crate) mod coord;
pub(crate) mod quaternion;
