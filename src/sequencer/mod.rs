pub(crate) mod schedule;
#[allow(clippy::module_inception)]
pub(crate) mod sequencer;
pub(crate) mod state;
