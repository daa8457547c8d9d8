//! Kit registry, JSON manifests and the transport-free upload/info handlers built on them.

pub(crate) mod handlers;
pub(crate) mod kits;
pub(crate) mod manifest;
