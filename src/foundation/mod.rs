//! Error type and storage-name helpers shared by every module.

pub(crate) mod error;
pub(crate) mod names;
