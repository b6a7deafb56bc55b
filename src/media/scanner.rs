use std::path::Path;
use std::time::Instant;

use walkdir::{DirEntry, WalkDir};

use crate::media::library::{ArtistCatalog, AudiobookCatalog, MediaItem, Scan, SkippedEntry};

/// Artist assigned to flat album directories whose name carries no `" - "`.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Build the artist → albums catalog for `music_root`.
///
/// A top-level directory holding at least one subdirectory is an artist and
/// each subdirectory is an album (`artist/album`). Any other top-level
/// directory is a flat album keyed by its own name, with the artist taken
/// from an `"Artist - Album"` name when present.
///
/// A missing root yields an empty catalog. Unreadable entries are reported in
/// [`Scan::skipped`] and otherwise ignored.
pub fn scan_albums(music_root: &Path) -> Scan<ArtistCatalog> {
    if !music_root.exists() {
        tracing::debug!("Music root does not exist: {}", music_root.display());
        return Scan::empty();
    }

    let start = Instant::now();
    let mut scan = Scan::<ArtistCatalog>::empty();

    for entry in list_dir(music_root, &mut scan.skipped) {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(item_name) = entry_name(&entry, &mut scan.skipped) else {
            continue;
        };

        let children = list_dir(entry.path(), &mut scan.skipped);
        let subdirs: Vec<&DirEntry> = children.iter().filter(|c| c.file_type().is_dir()).collect();

        if subdirs.is_empty() {
            let (artist, album) = split_flat_album(&item_name);
            let size_bytes = directory_size(entry.path(), &mut scan.skipped);
            scan.catalog.entry(artist).or_default().push(MediaItem {
                name: album,
                relative_path: item_name,
                size_bytes,
            });
            continue;
        }

        let albums = scan.catalog.entry(item_name.clone()).or_default();
        for album in subdirs {
            let Some(album_name) = entry_name(album, &mut scan.skipped) else {
                continue;
            };
            let size_bytes = directory_size(album.path(), &mut scan.skipped);
            albums.push(MediaItem {
                relative_path: format!("{item_name}/{album_name}"),
                name: album_name,
                size_bytes,
            });
        }
    }

    tracing::info!(
        "Scanned {} albums by {} artists in {:.2}s ({} skipped)",
        scan.catalog.values().map(Vec::len).sum::<usize>(),
        scan.catalog.len(),
        start.elapsed().as_secs_f64(),
        scan.skipped.len()
    );
    scan
}

/// List top-level audiobook entries under `audiobooks_root`. Directories are
/// sized recursively, plain files by their own length.
pub fn scan_audiobooks(audiobooks_root: &Path) -> Scan<AudiobookCatalog> {
    if !audiobooks_root.exists() {
        tracing::debug!(
            "Audiobooks root does not exist: {}",
            audiobooks_root.display()
        );
        return Scan::empty();
    }

    let start = Instant::now();
    let mut scan = Scan::<AudiobookCatalog>::empty();

    for entry in list_dir(audiobooks_root, &mut scan.skipped) {
        let Some(name) = entry_name(&entry, &mut scan.skipped) else {
            continue;
        };
        let file_type = entry.file_type();
        let size_bytes = if file_type.is_dir() {
            directory_size(entry.path(), &mut scan.skipped)
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    skip(&mut scan.skipped, entry.path(), e.to_string());
                    0
                }
            }
        } else {
            continue;
        };

        scan.catalog.push(MediaItem {
            relative_path: name.clone(),
            name,
            size_bytes,
        });
    }

    tracing::info!(
        "Scanned {} audiobooks in {:.2}s ({} skipped)",
        scan.catalog.len(),
        start.elapsed().as_secs_f64(),
        scan.skipped.len()
    );
    scan
}

/// Recursive sum of regular-file sizes under `path`. Files that cannot be
/// stat'ed contribute 0 and are recorded in `skipped`.
pub fn directory_size(path: &Path, skipped: &mut Vec<SkippedEntry>) -> u64 {
    let mut total = 0u64;
    for entry in WalkDir::new(path).follow_links(true) {
        match entry {
            Err(e) => {
                let at = e.path().unwrap_or(path).to_path_buf();
                skip(skipped, &at, e.to_string());
            }
            Ok(entry) if entry.file_type().is_file() => match entry.metadata() {
                Ok(meta) => total += meta.len(),
                Err(e) => skip(skipped, entry.path(), e.to_string()),
            },
            Ok(_) => {}
        }
    }
    total
}

/// Split a flat album directory name on the first `" - "` into
/// `(artist, album)`, both trimmed. Names without the separator belong to
/// [`UNKNOWN_ARTIST`].
pub fn split_flat_album(name: &str) -> (String, String) {
    match name.split_once(" - ") {
        Some((artist, album)) => (artist.trim().to_string(), album.trim().to_string()),
        None => (UNKNOWN_ARTIST.to_string(), name.to_string()),
    }
}

/// Immediate children of `dir`, sorted by file name.
fn list_dir(dir: &Path, skipped: &mut Vec<SkippedEntry>) -> Vec<DirEntry> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                let at = e.path().unwrap_or(dir).to_path_buf();
                skip(skipped, &at, e.to_string());
            }
        }
    }
    entries
}

fn entry_name(entry: &DirEntry, skipped: &mut Vec<SkippedEntry>) -> Option<String> {
    match entry.file_name().to_str() {
        Some(name) => Some(name.to_string()),
        None => {
            skip(skipped, entry.path(), "file name is not valid UTF-8".to_string());
            None
        }
    }
}

fn skip(skipped: &mut Vec<SkippedEntry>, path: &Path, reason: String) {
    tracing::warn!("Skipping {}: {}", path.display(), reason);
    skipped.push(SkippedEntry {
        path: path.to_path_buf(),
        reason,
    });
}
