pub(crate) mod feather;
