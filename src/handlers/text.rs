use super::{read_prefix, read_text, FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, TextKind, TextSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;

pub(super) const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "text", "log", "md", "markdown", "csv", "tsv", "ini", "cfg", "conf", "inf", "nfo",
    "gitignore", "gitattributes", "editorconfig", "env", "properties", "rst", "diff", "patch",
];

const TEXT_SIZE: NaturalSize = NaturalSize::new(800.0, 600.0);

const SNIFF_LEN: u64 = 4096;

pub struct TextHandler {
    limit: u64,
}

impl TextHandler {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Handler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        if file.has_extension(TEXT_EXTENSIONS) {
            return true;
        }
        file.extension.is_empty() && looks_like_text(file)
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let (content, truncated) = read_text(&file.path, self.limit)?;
        Ok(Viewer::new(
            Artifact::Text(TextSurface::from_content(TextKind::Plain, &content, truncated)),
            TEXT_SIZE,
        ))
    }
}

// Extensionless files (README, LICENSE, Makefile) count as text when their
// first block is valid UTF-8 without NUL bytes.
fn looks_like_text(file: &FileInfo) -> bool {
    match read_prefix(&file.path, SNIFF_LEN) {
        Ok((bytes, _)) => !bytes.contains(&0) && utf8_prefix_is_valid(&bytes),
        Err(_) => false,
    }
}

fn utf8_prefix_is_valid(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(_) => true,
        // A multi-byte sequence cut off by the sniff window is fine.
        Err(err) => err.error_len().is_none() && bytes.len() - err.valid_up_to() < 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn info(path: &Path) -> FileInfo {
        FileInfo::from_path(path).unwrap()
    }

    #[test]
    fn renders_lines_and_truncates_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let viewer = TextHandler::new(8).get_viewer(&info(&path)).unwrap();
        match viewer.artifact {
            Artifact::Text(surface) => {
                assert_eq!(surface.kind, TextKind::Plain);
                assert_eq!(surface.lines, vec!["one", "two"]);
                assert!(surface.truncated);
            }
            other => panic!("unexpected artifact {other:?}"),
        }
        assert_eq!(viewer.size, TEXT_SIZE);
        assert!(viewer.metadata.is_none());
    }

    #[test]
    fn sniffs_extensionless_files() {
        let dir = tempfile::tempdir().unwrap();
        let readme = dir.path().join("README");
        std::fs::write(&readme, "hello world").unwrap();
        let blob = dir.path().join("blob");
        std::fs::write(&blob, [0u8, 159, 146, 150]).unwrap();

        let handler = TextHandler::new(1024);
        assert!(handler.can_open(&info(&readme)));
        assert!(!handler.can_open(&info(&blob)));
    }

    #[test]
    fn missing_file_is_not_claimed_without_extension() {
        let handler = TextHandler::new(1024);
        let file = FileInfo::with_len(Path::new("/definitely/not/here"), 0);
        assert!(!handler.can_open(&file));
    }

    #[test]
    fn cut_multibyte_sequence_is_still_text() {
        let bytes = "héllo".as_bytes();
        assert!(utf8_prefix_is_valid(&bytes[..2]));
        assert!(!utf8_prefix_is_valid(&[0xff, 0xfe, b'a']));
    }
}
