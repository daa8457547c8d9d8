use std::{collections::BTreeMap, io::Read, sync::Arc};

use crate::{
    foundation::{
        error::{FilekitError, FilekitResult},
        names::validate_segment,
    },
    kit::{field::Field, gate::GenerationGate, instance::KitInstance},
    storage::{
        backend::{Conflict, StorageBackend},
        config::UploadsConfig,
    },
};

/// Declarative schema for one kind of uploaded file: a name, the storage collection it lives in,
/// and the derived fields generated from each source file.
///
/// A `KitSpec` is immutable once built. Instances ([`KitInstance`]) borrow it.
#[derive(Debug)]
pub struct KitSpec {
    name: String,
    fields: BTreeMap<String, Field>,
    storage: Arc<dyn StorageBackend>,
    gate: GenerationGate,
}

impl KitSpec {
    /// Start a kit named `name`.
    pub fn builder(name: impl Into<String>) -> KitSpecBuilder {
        KitSpecBuilder {
            name: name.into(),
            fields: BTreeMap::new(),
            storage: None,
        }
    }

    /// Start a kit named after `T`: the last path segment of its type name, lowercased.
    pub fn builder_for<T: ?Sized>() -> KitSpecBuilder {
        Self::builder(type_label::<T>())
    }

    /// Unique kit name; also the storage collection name by default.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields keyed by label.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field declared under `label`.
    pub fn field(&self, label: &str) -> Option<&Field> {
        self.fields.get(label)
    }

    /// Backend holding sources and derivatives of this kit.
    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub(crate) fn gate(&self) -> &GenerationGate {
        &self.gate
    }

    /// Store an uploaded source, then generate every `pre_cache` field.
    ///
    /// The backend may rename the file; use [`KitInstance::filename`] of the result to refer to
    /// it later.
    #[tracing::instrument(skip(self, data), fields(kit = %self.name))]
    pub fn save(&self, data: &mut dyn Read, suggested_name: &str) -> FilekitResult<KitInstance<'_>> {
        let stored = self
            .storage
            .save(data, None, suggested_name, Conflict::Rename)?;
        tracing::debug!(stored = %stored, "source stored");
        let instance = self.open(&stored)?;
        instance.process(false)?;
        Ok(instance)
    }

    /// Reconstruct the instance for a previously stored source.
    ///
    /// Fails with [`FilekitError::NotFound`] if no such source exists.
    pub fn open(&self, filename: &str) -> FilekitResult<KitInstance<'_>> {
        KitInstance::new(self, filename)
    }
}

/// Builder for [`KitSpec`]; all validation happens here.
#[derive(Debug)]
pub struct KitSpecBuilder {
    name: String,
    fields: BTreeMap<String, Field>,
    storage: Option<Arc<dyn StorageBackend>>,
}

impl KitSpecBuilder {
    /// Declare a field. Labels double as storage folders and must be unique.
    pub fn field(mut self, label: impl Into<String>, field: Field) -> FilekitResult<Self> {
        let label = label.into();
        validate_segment("field label", &label)?;
        if self.fields.contains_key(&label) {
            return Err(FilekitError::config(format!(
                "duplicate field label '{label}' in kit '{}'",
                self.name
            )));
        }
        field.validate(&label)?;
        self.fields.insert(label, field);
        Ok(self)
    }

    /// Use `storage` for sources and derivatives.
    pub fn storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Use the local collection `uploads` configures for this kit's name.
    pub fn uploads(self, uploads: &UploadsConfig) -> FilekitResult<Self> {
        let storage = uploads.storage_for(&self.name)?;
        Ok(self.storage(Arc::new(storage)))
    }

    /// Finish the kit.
    pub fn build(self) -> FilekitResult<KitSpec> {
        validate_segment("kit name", &self.name)?;
        let storage = self.storage.ok_or_else(|| {
            FilekitError::config(format!("kit '{}' has no storage backend", self.name))
        })?;
        Ok(KitSpec {
            name: self.name,
            fields: self.fields,
            storage,
            gate: GenerationGate::default(),
        })
    }
}

fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/kit/spec.rs"]
mod tests;
