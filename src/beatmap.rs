pub(crate) mod combo;
pub(crate) mod model;
pub(crate) mod prepared;
