use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use crate::{
    foundation::error::{FilekitError, FilekitResult},
    kit::spec::KitSpec,
    registry::manifest::KitManifest,
};

/// Kits keyed by name.
///
/// Populated once through [`KitRegistryBuilder`] and read-only afterwards; hosts keep one and pass
/// it by reference to whatever serves uploads.
#[derive(Debug, Default)]
pub struct KitRegistry {
    kits: BTreeMap<String, KitSpec>,
}

impl KitRegistry {
    /// Start an empty registry.
    pub fn builder() -> KitRegistryBuilder {
        KitRegistryBuilder::default()
    }

    /// Build every kit a manifest declares.
    #[tracing::instrument(skip(manifest), fields(kits = manifest.kits.len()))]
    pub fn from_manifest(manifest: &KitManifest) -> FilekitResult<Self> {
        let mut builder = Self::builder();
        for decl in &manifest.kits {
            builder = builder.register(decl.build(&manifest.uploads)?)?;
        }
        Ok(builder.build())
    }

    /// Kit named `name`, if registered.
    pub fn get(&self, name: &str) -> Option<&KitSpec> {
        self.kits.get(name)
    }

    /// Kit named `name`; [`FilekitError::NotFound`] otherwise.
    pub fn kit(&self, name: &str) -> FilekitResult<&KitSpec> {
        self.get(name)
            .ok_or_else(|| FilekitError::not_found(format!("kit '{name}'")))
    }

    /// Registered kit names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kits.keys().map(String::as_str)
    }

    /// Number of registered kits.
    pub fn len(&self) -> usize {
        self.kits.len()
    }

    /// `true` if no kit is registered.
    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }
}

/// Builder for [`KitRegistry`].
#[derive(Debug, Default)]
pub struct KitRegistryBuilder {
    kits: BTreeMap<String, KitSpec>,
    initialized: BTreeSet<(String, PathBuf)>,
}

impl KitRegistryBuilder {
    /// Register `kit` under its name and initialize its collection unless a previously registered
    /// kit already did. Collections are identified by name and root location.
    pub fn register(mut self, kit: KitSpec) -> FilekitResult<Self> {
        let name = kit.name().to_string();
        if self.kits.contains_key(&name) {
            return Err(FilekitError::config(format!("duplicate kit name '{name}'")));
        }

        // Same name at another location is a different collection.
        let storage = kit.storage();
        let key = (storage.collection().to_string(), storage.path(""));
        if !self.initialized.contains(&key) {
            storage.init()?;
            self.initialized.insert(key);
        }

        tracing::debug!(kit = %name, fields = kit.fields().count(), "kit registered");
        self.kits.insert(name, kit);
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> KitRegistry {
        KitRegistry { kits: self.kits }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/kits.rs"]
mod tests;
