//! Kits: declared fields over a stored source, with lazy or eager derivative generation.

pub(crate) mod bound;
pub(crate) mod field;
pub(crate) mod gate;
pub(crate) mod instance;
pub(crate) mod spec;
