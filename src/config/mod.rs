pub(crate) mod factory;
pub(crate) mod model;
