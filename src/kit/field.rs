use std::sync::Arc;

use crate::{
    foundation::{
        error::{FilekitError, FilekitResult},
        names::split_ext,
    },
    processing::processor::Processor,
};

/// Labels that collide with keys of the upload envelope.
pub(crate) const RESERVED_LABELS: &[&str] = &["name", "original"];

/// Declaration of one derived variant: a processor chain, an optional output extension and
/// whether the variant is generated at upload time (`pre_cache`) or on first URL access.
#[derive(Clone, Debug)]
pub struct Field {
    processors: Vec<Arc<dyn Processor>>,
    ext: Option<String>,
    pre_cache: bool,
}

impl Field {
    /// Field running `processors` in order.
    pub fn new<I>(processors: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Processor>>,
    {
        Self {
            processors: processors.into_iter().collect(),
            ext: None,
            pre_cache: false,
        }
    }

    /// Field with a single processor.
    pub fn with(processor: impl Processor + 'static) -> Self {
        Self::new([Arc::new(processor) as Arc<dyn Processor>])
    }

    /// Append a processor to the chain.
    pub fn then(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Force the output extension regardless of the chain.
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into().trim_start_matches('.').to_string());
        self
    }

    /// Generate at upload time instead of on first access.
    pub fn pre_cache(mut self, pre_cache: bool) -> Self {
        self.pre_cache = pre_cache;
        self
    }

    /// Processor chain in execution order.
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    /// Whether this field is generated eagerly.
    pub fn is_pre_cache(&self) -> bool {
        self.pre_cache
    }

    /// Extension set with [`Field::ext`], if any.
    pub fn explicit_extension(&self) -> Option<&str> {
        self.ext.as_deref()
    }

    /// Extension of the derived file: the explicit one, else the last processor's, else `None`
    /// (keep the source's extension).
    pub fn effective_extension(&self) -> Option<&str> {
        self.ext
            .as_deref()
            .or_else(|| self.processors.last().and_then(|p| p.extension()))
    }

    /// Name of the derivative of `source`: source stem plus the effective extension.
    pub fn derived_filename(&self, source: &str) -> String {
        let (stem, source_ext) = split_ext(source);
        match self.effective_extension().or(source_ext) {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        }
    }

    pub(crate) fn validate(&self, label: &str) -> FilekitResult<()> {
        if RESERVED_LABELS.contains(&label) {
            return Err(FilekitError::config(format!(
                "field label '{label}' is reserved"
            )));
        }
        if self.processors.is_empty() {
            return Err(FilekitError::config(format!(
                "field '{label}' has an empty processor chain"
            )));
        }
        if let Some(ext) = &self.ext {
            if ext.is_empty() || ext.contains(['/', '\\']) {
                return Err(FilekitError::config(format!(
                    "field '{label}' has invalid extension '{ext}'"
                )));
            }
        }
        for p in &self.processors {
            p.validate()
                .map_err(|e| FilekitError::config(format!("field '{label}': {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kit/field.rs"]
mod tests;
