//! Processors: stream-to-stream transformations applied to source files.

pub(crate) mod convert;
pub(crate) mod encode;
pub(crate) mod processor;
pub(crate) mod resize;
pub(crate) mod spec;
