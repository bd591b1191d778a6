mod animated;
mod directory;
mod html;
mod media;
mod pdf_document;
mod raster;
mod registry;
mod shell;
mod shortcut;
mod source;
mod svg;
mod text;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::artifact::Artifact;
use crate::error::{PreviewError, Result};
use crate::geometry::NaturalSize;

pub use animated::AnimatedImageHandler;
pub use directory::DirectoryRenderer;
pub use html::HtmlHandler;
pub use media::{AudioHandler, VideoHandler};
pub use pdf_document::PdfHandler;
pub use raster::ImageHandler;
pub use registry::HandlerRegistry;
pub use shell::ShellPreviewHandler;
pub use shortcut::InternetShortcutHandler;
pub use source::SourceCodeHandler;
pub use svg::SvgHandler;
pub use text::TextHandler;

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    // Lowercase, without the dot. Empty when the file has none.
    pub extension: String,
    pub len: u64,
}

impl FileInfo {
    #[cfg(test)]
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| PreviewError::io(path, e))?;
        Ok(Self::with_len(path, metadata.len()))
    }

    pub fn with_len(path: &Path, len: u64) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            extension,
            len,
        }
    }

    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        !self.extension.is_empty() && extensions.contains(&self.extension.as_str())
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

#[derive(Debug)]
pub struct Viewer {
    pub artifact: Artifact,
    pub size: NaturalSize,
    pub metadata: Option<String>,
}

impl Viewer {
    pub fn new(artifact: Artifact, size: NaturalSize) -> Self {
        Self {
            artifact,
            size,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }
}

// A content renderer. `can_open` must be cheap and must not fail; errors
// belong in `get_viewer`.
pub trait Handler {
    fn name(&self) -> &'static str;
    fn can_open(&self, file: &FileInfo) -> bool;
    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer>;
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

pub(crate) fn read_prefix(path: &Path, limit: u64) -> Result<(Vec<u8>, bool)> {
    let file = File::open(path).map_err(|e| PreviewError::io(path, e))?;
    let mut buffer = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| PreviewError::io(path, e))?;
    let truncated = buffer.len() as u64 > limit;
    buffer.truncate(limit as usize);
    Ok((buffer, truncated))
}

pub(crate) fn read_text(path: &Path, limit: u64) -> Result<(String, bool)> {
    let (bytes, truncated) = read_prefix(path, limit)?;
    Ok((String::from_utf8_lossy(&bytes).into_owned(), truncated))
}

pub fn human_size(len: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if len < 1024 {
        return format!("{len} bytes");
    }
    let mut value = len as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
