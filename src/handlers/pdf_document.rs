use pdf::file::FileOptions;

use super::{FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, HostedKind, HostedSurface};
use crate::error::{PreviewError, Result};
use crate::geometry::NaturalSize;

const LETTER_SIZE: NaturalSize = NaturalSize::new(816.0, 1056.0);

pub struct PdfHandler;

// PDF user space is 72 points per inch.
fn points_to_dip(points: f32) -> f64 {
    f64::from(points) * 96.0 / 72.0
}

impl Handler for PdfHandler {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(&["pdf"])
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let document = FileOptions::cached()
            .open(&file.path)
            .map_err(|e| PreviewError::decode("pdf", e))?;

        let pages = document.num_pages();
        let size = match document.get_page(0) {
            Ok(page) => match page.media_box() {
                Ok(media) => NaturalSize::new(
                    points_to_dip((media.right - media.left).abs()),
                    points_to_dip((media.top - media.bottom).abs()),
                ),
                Err(_) => LETTER_SIZE,
            },
            Err(e) => return Err(PreviewError::decode("pdf", e)),
        };

        let surface = HostedSurface::new(HostedKind::Pdf, &file.path, file.file_name());
        let label = if pages == 1 { "1 page".to_string() } else { format!("{pages} pages") };
        Ok(Viewer::new(Artifact::Hosted(surface), size).with_metadata(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_points_to_dip() {
        assert_eq!(points_to_dip(612.0), 816.0);
        assert_eq!(points_to_dip(792.0), 1056.0);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = PdfHandler
            .get_viewer(&FileInfo::from_path(&path).unwrap())
            .unwrap_err();
        assert!(matches!(err, PreviewError::Decode { format: "pdf", .. }));
    }
}
