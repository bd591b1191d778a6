use super::{human_size, FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, HostedKind, HostedSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;

const SHELL_SIZE: NaturalSize = NaturalSize::new(640.0, 400.0);

pub struct ShellPreviewHandler;

impl Handler for ShellPreviewHandler {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn can_open(&self, _file: &FileInfo) -> bool {
        true
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let surface = HostedSurface::new(HostedKind::Shell, &file.path, file.file_name());
        Ok(Viewer::new(Artifact::Hosted(surface), SHELL_SIZE).with_metadata(human_size(file.len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn claims_anything_and_reports_size() {
        let file = FileInfo::with_len(Path::new("setup.msi"), 3 * 1024 * 1024);
        assert!(ShellPreviewHandler.can_open(&file));

        let viewer = ShellPreviewHandler.get_viewer(&file).unwrap();
        assert_eq!(viewer.metadata.as_deref(), Some("3.0 MB"));
        assert_eq!(viewer.size, SHELL_SIZE);
    }
}
