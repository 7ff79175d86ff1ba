pub(crate) mod dispersal;
pub(crate) mod glyph;
pub(crate) mod reveal;
