//! filekit manages uploaded source files and the processed variants derived from them.
//!
//! A [`KitSpec`] declares, for one kind of upload, a set of labelled [`Field`]s. Each field is an
//! ordered chain of [`Processor`]s plus an output extension. Derivatives are stored next to the
//! source at `<collection>/<label>/<derived filename>` and are generated either at upload time
//! (`pre_cache`) or on first access to their URL, then never regenerated unless forced.
//!
//! - Build kits with [`KitSpec::builder`] or from a JSON [`KitManifest`]
//! - Register them in a [`KitRegistry`]
//! - Store uploads with [`KitSpec::save`] (or [`upload`]) and read them back with [`KitSpec::open`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod kit;
mod processing;
mod registry;
mod storage;

pub use crate::foundation::error::{FilekitError, FilekitResult};
pub use crate::foundation::names::secure_filename;

pub use crate::kit::bound::BoundField;
pub use crate::kit::field::Field;
pub use crate::kit::instance::KitInstance;
pub use crate::kit::spec::{KitSpec, KitSpecBuilder};

pub use crate::processing::convert::Convert;
pub use crate::processing::encode::OutputFormat;
pub use crate::processing::processor::{ByteStream, Processor, Stream, run_chain, stream_from_bytes};
pub use crate::processing::resize::{DEFAULT_QUALITY, Resize, ResizePlan};
pub use crate::processing::spec::ProcessorSpec;

pub use crate::registry::handlers::{UploadResponse, UploadedFile, file_info, upload};
pub use crate::registry::kits::{KitRegistry, KitRegistryBuilder};
pub use crate::registry::manifest::{FieldDecl, KitDecl, KitManifest};

pub use crate::storage::backend::{Conflict, StorageBackend};
pub use crate::storage::config::{CollectionConfig, UploadsConfig, default_extensions};
pub use crate::storage::local::LocalStorage;
