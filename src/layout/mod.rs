pub(crate) mod cubemap;
pub(crate) mod decorator;
pub(crate) mod equirectangular;
pub(crate) mod flat_fixed;
pub(crate) mod remap;
pub(crate) mod surface;
pub(crate) mod view;
