use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

/// Walk a directory tree and collect attack-chain detail documents.
///
/// - Respects .gitignore automatically (via the `ignore` crate)
/// - Only considers `.json` files
/// - Skips files larger than max_file_size
/// - Applies include/exclude glob filters against root-relative paths
pub fn find_documents(
    root: &Path,
    include: &[String],
    exclude: &[String],
    max_file_size: u64,
) -> Result<Vec<PathBuf>> {
    let include_set = build_globset(include)?;
    let exclude_set = build_globset(exclude)?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .max_filesize(Some(max_file_size));

    let mut files = Vec::new();

    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                    continue;
                }
                let path = entry.path();

                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
                if !is_json {
                    continue;
                }

                let rel = path.strip_prefix(root).unwrap_or(path);
                if let Some(set) = &exclude_set {
                    if set.is_match(rel) {
                        debug!("Excluded: {}", path.display());
                        continue;
                    }
                }
                if let Some(set) = &include_set {
                    if !set.is_match(rel) {
                        continue;
                    }
                }

                files.push(path.to_path_buf());
            }
            Err(e) => {
                debug!("Walk error: {}", e);
            }
        }
    }

    // Walk order depends on the filesystem; sort for stable summaries.
    files.sort();
    Ok(files)
}

/// Compile glob patterns; invalid patterns are warned about and skipped.
/// Returns `None` when no patterns are given so callers can tell
/// "no filter" from "matches nothing".
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Invalid glob pattern '{}': {}", pattern, e),
        }
    }
    Ok(Some(builder.build()?))
}
