use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    foundation::error::{FilekitError, FilekitResult},
    storage::local::LocalStorage,
};

/// Plain text.
pub const TEXT: &[&str] = &["txt"];
/// Office and rich-text documents.
pub const DOCUMENTS: &[&str] = &[
    "rtf", "odf", "ods", "gnumeric", "abw", "doc", "docx", "xls", "xlsx",
];
/// Raster and vector images.
pub const IMAGES: &[&str] = &["jpg", "jpe", "jpeg", "png", "gif", "svg", "bmp", "webp"];
/// Structured data files.
pub const DATA: &[&str] = &["csv", "ini", "json", "plist", "xml", "yaml", "yml"];

/// Default allow-list: [`TEXT`], [`DOCUMENTS`], [`IMAGES`] and [`DATA`].
pub fn default_extensions() -> Vec<String> {
    [TEXT, DOCUMENTS, IMAGES, DATA]
        .concat()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_url() -> String {
    "/_uploads".to_string()
}

/// Where collections are stored and how they are addressed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadsConfig {
    /// Parent directory for collections without an explicit `dest`.
    #[serde(default)]
    pub default_dest: Option<PathBuf>,
    /// URL prefix; a collection is served at `<default_url>/<collection>/`.
    #[serde(default = "default_url")]
    pub default_url: String,
    /// Extension allow-list for collections without their own. Empty allows everything.
    #[serde(default = "default_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Per-collection overrides keyed by collection (kit) name.
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
}

/// Overrides for a single collection.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Directory holding this collection's files.
    #[serde(default)]
    pub dest: Option<PathBuf>,
    /// Base URL of this collection's files, used verbatim.
    #[serde(default)]
    pub url: Option<String>,
    /// Extension allow-list for this collection.
    #[serde(default)]
    pub allowed_extensions: Option<Vec<String>>,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            default_dest: None,
            default_url: default_url(),
            allowed_extensions: default_extensions(),
            collections: BTreeMap::new(),
        }
    }
}

impl UploadsConfig {
    /// Store every collection below `default_dest`.
    pub fn new(default_dest: impl Into<PathBuf>) -> Self {
        Self {
            default_dest: Some(default_dest.into()),
            ..Self::default()
        }
    }

    /// Build the backend for `collection`.
    ///
    /// Fails if neither a collection `dest` nor a `default_dest` is configured.
    pub fn storage_for(&self, collection: &str) -> FilekitResult<LocalStorage> {
        let overrides = self.collections.get(collection);

        let dest = match overrides.and_then(|c| c.dest.clone()) {
            Some(dest) => dest,
            None => self
                .default_dest
                .as_ref()
                .map(|root| root.join(collection))
                .ok_or_else(|| {
                    FilekitError::config(format!("no destination for collection '{collection}'"))
                })?,
        };
        let url = overrides.and_then(|c| c.url.clone()).unwrap_or_else(|| {
            format!("{}/{collection}/", self.default_url.trim_end_matches('/'))
        });
        let allowed = overrides
            .and_then(|c| c.allowed_extensions.as_ref())
            .unwrap_or(&self.allowed_extensions);

        Ok(LocalStorage::new(collection, dest, url).with_allowed_extensions(allowed))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/config.rs"]
mod tests;
