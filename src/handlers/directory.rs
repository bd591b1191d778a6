use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::Viewer;
use crate::artifact::{Artifact, ListingEntry, ListingSurface};
use crate::geometry::NaturalSize;

const LISTING_SIZE: NaturalSize = NaturalSize::new(720.0, 480.0);

#[derive(Debug, Default)]
pub struct DirectoryRenderer;

impl DirectoryRenderer {
    pub fn new() -> Self {
        Self
    }

    // Never fails. Entries that cannot be read are skipped.
    pub fn get_viewer(&self, path: &Path) -> Viewer {
        let mut entries: Vec<ListingEntry> = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("skipping listing entry: {err}");
                    None
                }
            })
            .map(|entry| {
                let is_dir = entry.file_type().is_dir();
                let len = if is_dir {
                    0
                } else {
                    entry.metadata().map(|m| m.len()).unwrap_or(0)
                };
                ListingEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir,
                    len,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        Viewer::new(Artifact::Listing(ListingSurface { entries }), LISTING_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(viewer: &Viewer) -> Vec<String> {
        match &viewer.artifact {
            Artifact::Listing(listing) => listing.entries.iter().map(|e| e.name.clone()).collect(),
            other => panic!("unexpected artifact {other:?}"),
        }
    }

    #[test]
    fn folders_first_then_names_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"12345").unwrap();
        std::fs::write(dir.path().join("A.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        std::fs::create_dir(dir.path().join("Alpha")).unwrap();
        std::fs::write(dir.path().join("zeta").join("nested.txt"), b"").unwrap();

        let viewer = DirectoryRenderer::new().get_viewer(dir.path());
        assert_eq!(names(&viewer), vec!["Alpha", "zeta", "A.txt", "b.txt"]);
        assert!(viewer.metadata.is_none());
        assert_eq!(viewer.size, LISTING_SIZE);

        if let Artifact::Listing(listing) = &viewer.artifact {
            let b = listing.entries.iter().find(|e| e.name == "b.txt").unwrap();
            assert_eq!(b.len, 5);
        }
    }

    #[test]
    fn empty_directory_has_no_entries_and_no_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let viewer = DirectoryRenderer::new().get_viewer(dir.path());
        assert!(names(&viewer).is_empty());
        assert!(viewer.metadata.is_none());
    }

    #[test]
    fn unreadable_directory_yields_an_empty_listing() {
        let viewer = DirectoryRenderer::new().get_viewer(Path::new("/definitely/not/here"));
        assert!(names(&viewer).is_empty());
    }
}
