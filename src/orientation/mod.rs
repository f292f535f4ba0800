pub(crate) mod dynamic_position;
