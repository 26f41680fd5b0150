//! Filesystem and path utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
}

/// Render a path with Windows separators, whatever the host.
///
/// Generated scripts are always run by `cmd`, so `/` never appears in them.
pub fn windows_display(path: &Path) -> String {
    path.to_string_lossy().replace('/', "\\")
}

/// File name without directory or extension, splitting on both `\` and `/`.
pub fn file_stem(path: &Path) -> String {
    let name = path.to_string_lossy();
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Expand source patterns relative to `base`.
///
/// Entries without glob metacharacters are kept verbatim, whether or not they
/// exist; the compiler reports missing files. Patterns expand to the matching
/// files, sorted, relative to `base` when they were given relatively.
pub fn expand_sources(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            results.push(PathBuf::from(pattern));
            continue;
        }

        let relative = Path::new(pattern).is_relative();
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let mut matched = Vec::new();
        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) if path.is_file() => {
                    let path = if relative {
                        path.strip_prefix(base).map(Path::to_path_buf).unwrap_or(path)
                    } else {
                        path
                    };
                    matched.push(path);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("glob error: {}", e),
            }
        }

        if matched.is_empty() {
            tracing::warn!("pattern `{}` matched no files", pattern);
        }
        matched.sort();
        results.extend(matched);
    }

    results.dedup();
    Ok(results)
}
