//! Filename sanitizing for the flat upload directory.
//!
//! Every name that reaches the filesystem, whether from an upload form or a
//! request path, is reduced to its final path component first. Nothing else
//! about the name changes: whitespace and any character that is not a path
//! separator on this platform are kept as sent.

use std::path::MAIN_SEPARATOR;

use crate::error::{Error, Result};

fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}

/// Reduce `raw` to its base name.
///
/// `/` and the platform separator count as directory separators and trailing
/// separators are ignored, so `../../etc/passwd` becomes `passwd` and `a/b/`
/// becomes `b`. Names that reduce to nothing usable (empty, `.`, `..`) or
/// contain a NUL byte are rejected.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches(is_separator);
    let base = trimmed.rsplit(is_separator).next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." {
        return Err(Error::validation(format!("invalid file name: {raw:?}")));
    }
    if base.contains('\0') {
        return Err(Error::validation("file name contains a NUL byte"));
    }

    Ok(base.to_string())
}
