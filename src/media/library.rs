use std::collections::BTreeMap;
use std::path::PathBuf;

/// One selectable unit of the library: an album directory or a top-level
/// audiobook entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Display name (album name, or the entry name for audiobooks).
    pub name: String,
    /// Path relative to its source root, `/`-separated. This is the identity
    /// used for selection membership.
    pub relative_path: String,
    /// Recursive size of every regular file under the entry.
    pub size_bytes: u64,
}

/// Albums grouped by artist. Keys and album lists are both in traversal order
/// of a sorted walk, so two scans of an unchanged tree compare equal.
pub type ArtistCatalog = BTreeMap<String, Vec<MediaItem>>;

/// Top-level audiobook entries, files and directories alike.
pub type AudiobookCatalog = Vec<MediaItem>;

/// An entry a scan could not read. The scan carries on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a scan plus whatever it had to skip along the way.
#[derive(Debug, Clone, Default)]
pub struct Scan<T> {
    pub catalog: T,
    pub skipped: Vec<SkippedEntry>,
}

impl<T: Default> Scan<T> {
    pub fn empty() -> Self {
        Self {
            catalog: T::default(),
            skipped: Vec::new(),
        }
    }
}

/// Every album path in catalog order.
pub fn album_paths(catalog: &ArtistCatalog) -> Vec<String> {
    catalog
        .values()
        .flatten()
        .map(|album| album.relative_path.clone())
        .collect()
}

/// Sum of `size_bytes` over a set of items.
pub fn total_size<'a>(items: impl IntoIterator<Item = &'a MediaItem>) -> u64 {
    items.into_iter().map(|item| item.size_bytes).sum()
}
