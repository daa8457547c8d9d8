//! Storage backends and the uploads configuration that builds them.

pub(crate) mod backend;
pub(crate) mod config;
pub(crate) mod local;
