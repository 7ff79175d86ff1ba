pub(crate) mod directive;
pub(crate) mod pipeline;
pub(crate) mod surface;
