use crate::foundation::error::{FilekitError, FilekitResult};

/// Normalize and validate collection-relative storage paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> FilekitResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FilekitError::not_found("storage paths must be relative"));
    }
    if s.is_empty() {
        return Err(FilekitError::not_found("storage path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FilekitError::not_found(
                "storage paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FilekitError::not_found(
            "storage path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Validate a name used as a single storage path segment (kit names, field labels).
pub fn validate_segment(what: &str, name: &str) -> FilekitResult<()> {
    if name.is_empty() {
        return Err(FilekitError::config(format!("{what} must be non-empty")));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(FilekitError::config(format!(
            "{what} '{name}' must be a single path segment"
        )));
    }
    Ok(())
}

/// Reduce an arbitrary client-supplied name to a safe flat file name.
///
/// Accented Latin-1 letters are folded to their ASCII base (`café` becomes `cafe`); any other
/// non-ASCII character is dropped. Keeps ASCII alphanumerics, `_`, `-` and `.`; runs of whitespace
/// and path separators become a single `_`; leading and trailing `.`/`_` are stripped. Returns
/// `None` if nothing survives.
pub fn secure_filename(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            pending_sep = true;
            continue;
        }
        let c = fold_latin1(c);
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// ASCII base letter of an accented Latin-1 letter; other characters pass through.
fn fold_latin1(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}

/// Split `name` into `(stem, extension)` at the last `.`.
///
/// Names without a dot (or with a leading dot only) have no extension.
pub fn split_ext(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Join a folder and a file name into a collection-relative path.
pub fn join_rel(folder: Option<&str>, name: &str) -> String {
    match folder {
        Some(f) if !f.is_empty() => format!("{}/{name}", f.trim_end_matches('/')),
        _ => name.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/names.rs"]
mod tests;
