use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    foundation::{
        error::{FilekitError, FilekitResult},
        names::{normalize_rel_path, validate_segment},
    },
    kit::{bound::BoundField, spec::KitSpec},
};

/// A stored source file viewed through its kit.
///
/// Not persisted itself: it is rebuilt from the source's file name whenever needed.
#[derive(Debug)]
pub struct KitInstance<'k> {
    spec: &'k KitSpec,
    filename: String,
    fields: BTreeMap<&'k str, BoundField<'k>>,
}

impl<'k> KitInstance<'k> {
    /// Bind `spec` to the stored source `filename`, failing if it does not exist.
    pub fn new(spec: &'k KitSpec, filename: &str) -> FilekitResult<Self> {
        // Sources are stored flat; anything with a folder is a derivative or unknown.
        let filename = normalize_rel_path(filename)?;
        if validate_segment("source name", &filename).is_err() {
            return Err(FilekitError::not_found(format!(
                "'{filename}' in kit '{}'",
                spec.name()
            )));
        }
        let storage = spec.storage();
        if !storage.exists(&storage.path(&filename)) {
            return Err(FilekitError::not_found(format!(
                "'{filename}' in kit '{}'",
                spec.name()
            )));
        }

        let fields = spec
            .fields()
            .map(|(label, field)| (label, BoundField::new(spec, label, field, &filename)))
            .collect();

        Ok(Self {
            spec,
            filename,
            fields,
        })
    }

    /// Kit this file belongs to.
    pub fn spec(&self) -> &'k KitSpec {
        self.spec
    }

    /// Canonical stored name of the source; enough to rebuild this instance.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Bound field for `label`.
    pub fn field(&self, label: &str) -> Option<&BoundField<'k>> {
        self.fields.get(label)
    }

    /// All bound fields, ordered by label.
    pub fn fields(&self) -> impl Iterator<Item = &BoundField<'k>> {
        self.fields.values()
    }

    /// Absolute location of the source. Does not check existence.
    pub fn path(&self) -> PathBuf {
        self.spec.storage().path(&self.filename)
    }

    /// Public URL of the source. Does not check existence.
    pub fn url(&self) -> String {
        self.spec.storage().url(&self.filename)
    }

    /// Generate derivatives: every field if `force`, otherwise only `pre_cache` fields.
    #[tracing::instrument(skip(self), fields(kit = %self.spec.name(), source = %self.filename))]
    pub fn process(&self, force: bool) -> FilekitResult<()> {
        for bound in self.fields.values() {
            if force || bound.field().is_pre_cache() {
                bound.generate()?;
            }
        }
        Ok(())
    }

    /// Field label to derivative URL, generating any derivative that does not exist yet.
    pub fn to_summary(&self) -> FilekitResult<BTreeMap<String, String>> {
        self.fields
            .iter()
            .map(|(label, bound)| bound.url().map(|url| (label.to_string(), url)))
            .collect()
    }
}
