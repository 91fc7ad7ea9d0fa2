//! Filename sanitization, extension resolution, and unique-path handling.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Placeholder extension when neither the API nor the URL provides one.
pub(crate) const GENERIC_EXTENSION: &str = "file";

/// Resolves a file extension with the documented precedence:
/// explicit server-provided value, then the extension sniffed from the URL
/// path, then [`GENERIC_EXTENSION`].
///
/// The returned extension never carries a leading dot and is never empty.
#[must_use]
pub(crate) fn resolve_extension(explicit: Option<&str>, url: &str) -> String {
    if let Some(ext) = explicit {
        let trimmed = ext.trim().trim_start_matches('.');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    extension_from_url(url).unwrap_or_else(|| GENERIC_EXTENSION.to_string())
}

/// Extracts a lowercase extension from the last path segment of a URL.
///
/// Rejects segments where the dot is the first or last character, and
/// implausibly long "extensions" (over 10 chars).
pub(crate) fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?;
    let decoded = urlencoding::decode(last_segment).unwrap_or_else(|_| last_segment.into());
    let dot_index = decoded.rfind('.')?;
    if dot_index == 0 {
        return None;
    }
    let ext = &decoded[dot_index + 1..];
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            // Also handle null and control characters
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

/// Resolves a unique file path, adding a numeric suffix if the file exists.
pub(crate) fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let filename = {
        let sanitized = sanitize_filename(filename);
        // Ensure no path separators remain (defense in depth against path traversal)
        if sanitized.contains('/')
            || sanitized.contains('\\')
            || sanitized.trim_matches('_').is_empty()
        {
            format!("download.{GENERIC_EXTENSION}")
        } else {
            sanitized
        }
    };
    let base_path = dir.join(&filename);

    if !base_path.exists() {
        return base_path;
    }

    // Split filename into stem and extension
    let (stem, ext) = match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos..]),
        None => (filename.as_str(), ""),
    };

    // Try with numeric suffixes
    for i in 1..1000 {
        let new_name = format!("{stem}_{i}{ext}");
        let new_path = dir.join(new_name);
        if !new_path.exists() {
            return new_path;
        }
    }

    // Fallback (extremely unlikely)
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("{stem}_{timestamp}{ext}"))
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
