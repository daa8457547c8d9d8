use std::path::PathBuf;

use crate::{
    foundation::{
        error::{FilekitError, FilekitResult},
        names::{join_rel, secure_filename},
    },
    kit::{field::Field, spec::KitSpec},
    processing::processor::run_chain,
    storage::backend::Conflict,
};

/// One field of one source file.
///
/// The derivative lives at `<label>/<derived filename>` in the kit's collection; nothing else goes
/// into its location.
#[derive(Debug)]
pub struct BoundField<'k> {
    spec: &'k KitSpec,
    label: &'k str,
    field: &'k Field,
    source: String,
}

impl<'k> BoundField<'k> {
    pub(crate) fn new(spec: &'k KitSpec, label: &'k str, field: &'k Field, source: &str) -> Self {
        Self {
            spec,
            label,
            field,
            source: source.to_string(),
        }
    }

    /// Field label, also the storage folder of its derivatives.
    pub fn label(&self) -> &'k str {
        self.label
    }

    /// Field declaration.
    pub fn field(&self) -> &'k Field {
        self.field
    }

    /// Source stem plus the field's effective extension.
    pub fn derived_filename(&self) -> String {
        self.field.derived_filename(&self.source)
    }

    /// Collection-relative path of the derivative.
    pub fn rel_path(&self) -> String {
        join_rel(Some(self.label), &self.derived_filename())
    }

    /// Absolute location of the derivative. Does not check existence.
    pub fn path(&self) -> PathBuf {
        self.spec.storage().path(&self.rel_path())
    }

    /// Whether the derivative has been generated.
    pub fn exists(&self) -> bool {
        self.spec.storage().exists(&self.path())
    }

    /// Run the source through the processor chain and store the result, replacing any previous
    /// derivative. Always regenerates; see [`BoundField::url`] for the cached path.
    #[tracing::instrument(
        skip(self),
        fields(kit = %self.spec.name(), field = %self.label, source = %self.source)
    )]
    pub fn generate(&self) -> FilekitResult<()> {
        let name = self.derived_filename();
        if secure_filename(&name).as_deref() != Some(name.as_str()) {
            return Err(FilekitError::storage_write(format!(
                "derived name '{name}' is not a safe file name"
            )));
        }

        let storage = self.spec.storage();
        let input = storage.open(&self.source)?;
        let mut output = run_chain(self.field.processors(), input)?;

        let stored = storage.save(&mut output, Some(self.label), &name, Conflict::Replace)?;
        if stored != name {
            return Err(FilekitError::storage_write(format!(
                "backend stored '{stored}' instead of '{name}'"
            )));
        }
        tracing::info!(path = %self.rel_path(), "derivative written");
        Ok(())
    }

    /// URL of the derivative, generating it first if it does not exist.
    ///
    /// Concurrent first accesses to the same derivative generate it once; the others wait and
    /// reuse the result.
    pub fn url(&self) -> FilekitResult<String> {
        let storage = self.spec.storage();
        let path = self.path();
        if storage.exists(&path) {
            tracing::debug!(path = %path.display(), "derivative cached");
        } else {
            self.spec
                .gate()
                .run_once(&path, || storage.exists(&path), || self.generate())?;
        }
        Ok(storage.url(&self.rel_path()))
    }
}
