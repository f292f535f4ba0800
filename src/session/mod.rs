pub(crate) mod flow;
pub(crate) mod quality_log;
