//! Path helpers for configured paths that may use either `/` or `\` as separator.

use crate::expand::{Platform, expand};
use std::path::{MAIN_SEPARATOR_STR, PathBuf};

/// The last path segment, after the final `/` or `\`.
pub fn file_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// The file extension without its dot, or `""` when the file name has none.
///
/// A leading dot (`.bashrc`) does not start an extension.
pub fn extension(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx + 1..],
        _ => "",
    }
}

/// The file name with its extension removed.
pub fn base_name(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// `path` expressed relative to `base`, joined with the native separator.
///
/// Both arguments are split on `/` and `\`; empty and `.` segments are ignored.
/// Each `base` segment past the common prefix becomes a `..`. Equal paths give `"."`.
pub fn relative_path(path: &str, base: &str) -> String {
    fn segments(s: &str) -> Vec<&str> {
        s.split(['/', '\\'])
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .collect()
    }

    let path = segments(path);
    let base = segments(base);
    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();

    let relative: Vec<&str> = std::iter::repeat_n("..", base.len() - common)
        .chain(path[common..].iter().copied())
        .collect();
    if relative.is_empty() {
        ".".to_string()
    } else {
        relative.join(MAIN_SEPARATOR_STR)
    }
}

/// Expands `raw` and returns it only if it names an existing directory.
pub fn resolve_dir<F>(raw: &str, lookup: F, platform: Platform) -> Option<PathBuf>
where
    F: FnMut(&str) -> Option<String>,
{
    let path = PathBuf::from(expand(raw, lookup, platform));
    if path.is_dir() {
        Some(path)
    } else {
        tracing::trace!(raw, resolved = %path.display(), "not a directory");
        None
    }
}
