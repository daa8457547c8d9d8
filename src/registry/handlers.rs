use std::{collections::BTreeMap, io::Read};

use crate::{foundation::error::FilekitResult, registry::kits::KitRegistry};

/// One stored upload as reported back to the uploader.
///
/// Serializes flat: `{"name": ..., "original": ..., "<label>": "<url>", ...}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadedFile {
    /// Canonical stored name; pass it to [`file_info`] later.
    pub name: String,
    /// URL of the stored source.
    pub original: String,
    /// Field label to derivative URL.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Response envelope of [`upload`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    /// Stored files in upload order.
    pub files: Vec<UploadedFile>,
}

/// Store each `(suggested name, contents)` pair in the kit `kit_name` and describe the results.
///
/// Eager fields are generated while saving; lazy ones when their URL is first produced, which is
/// here. Stops at the first failing file; files stored before it stay stored.
#[tracing::instrument(skip(registry, files))]
pub fn upload<I, N, R>(
    registry: &KitRegistry,
    kit_name: &str,
    files: I,
) -> FilekitResult<UploadResponse>
where
    I: IntoIterator<Item = (N, R)>,
    N: AsRef<str>,
    R: Read,
{
    let kit = registry.kit(kit_name)?;
    let mut response = UploadResponse::default();
    for (name, mut data) in files {
        let instance = kit.save(&mut data, name.as_ref())?;
        response.files.push(UploadedFile {
            name: instance.filename().to_string(),
            original: instance.url(),
            fields: instance.to_summary()?,
        });
    }
    Ok(response)
}

/// Field label to derivative URL for the stored source `filename` of kit `kit_name`.
///
/// Unknown kits and files are [`crate::FilekitError::NotFound`].
#[tracing::instrument(skip(registry))]
pub fn file_info(
    registry: &KitRegistry,
    kit_name: &str,
    filename: &str,
) -> FilekitResult<BTreeMap<String, String>> {
    registry.kit(kit_name)?.open(filename)?.to_summary()
}

#[cfg(test)]
#[path = "../../tests/unit/registry/handlers.rs"]
mod tests;
