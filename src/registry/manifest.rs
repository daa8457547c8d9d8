use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::error::{FilekitError, FilekitResult},
    kit::{field::Field, spec::KitSpec},
    processing::spec::ProcessorSpec,
    storage::config::UploadsConfig,
};

/// JSON description of a set of kits and where their files live.
///
/// ```json
/// {
///   "uploads": { "default_dest": "/srv/uploads" },
///   "kits": [
///     { "name": "advert", "fields": [
///       { "label": "thumbnail", "pre_cache": true,
///         "processors": [{ "kind": "resize", "width": 100, "height": 75, "crop": true }] }
///     ] }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitManifest {
    /// Storage layout shared by every kit.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Declared kits; names must be unique.
    #[serde(default)]
    pub kits: Vec<KitDecl>,
}

/// One kit in a [`KitManifest`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitDecl {
    /// Kit name, also its collection name.
    pub name: String,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// One field in a [`KitDecl`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Field label, also its storage folder.
    pub label: String,
    /// Processor chain in execution order.
    pub processors: Vec<ProcessorSpec>,
    /// Explicit output extension.
    #[serde(default)]
    pub ext: Option<String>,
    /// Generate at upload time.
    #[serde(default)]
    pub pre_cache: bool,
}

impl KitManifest {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FilekitResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FilekitError::config(format!("parse kit manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json_str(json: &str) -> FilekitResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FilekitError::config(format!("parse kit manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FilekitResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FilekitError::config(format!("open kit manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

impl FieldDecl {
    /// Build the declared field, validating each processor.
    pub fn build(&self) -> FilekitResult<Field> {
        let processors = self
            .processors
            .iter()
            .map(|p| {
                p.build()
                    .map_err(|e| FilekitError::config(format!("field '{}': {e}", self.label)))
            })
            .collect::<FilekitResult<Vec<_>>>()?;

        let mut field = Field::new(processors).pre_cache(self.pre_cache);
        if let Some(ext) = &self.ext {
            field = field.ext(ext.as_str());
        }
        Ok(field)
    }
}

impl KitDecl {
    /// Build the declared kit on the local collection `uploads` assigns to it.
    pub fn build(&self, uploads: &UploadsConfig) -> FilekitResult<KitSpec> {
        let mut builder = KitSpec::builder(self.name.as_str());
        for decl in &self.fields {
            builder = builder.field(decl.label.as_str(), decl.build()?)?;
        }
        builder.uploads(uploads)?.build()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/manifest.rs"]
mod tests;
