use configparser::ini::Ini;

use super::{FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, TextKind, TextSurface};
use crate::error::{PreviewError, Result};
use crate::geometry::NaturalSize;

const SHORTCUT_SIZE: NaturalSize = NaturalSize::new(640.0, 160.0);

pub struct InternetShortcutHandler;

impl Handler for InternetShortcutHandler {
    fn name(&self) -> &'static str {
        "internet-shortcut"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(&["url"])
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let path = file.path.to_string_lossy().into_owned();
        let mut ini = Ini::new();
        ini.load(&path)
            .map_err(|e| PreviewError::decode("internet shortcut", e))?;

        let url = ini
            .get("InternetShortcut", "URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PreviewError::decode("internet shortcut", "no URL entry"))?;

        let surface = TextSurface::from_content(TextKind::Link, url.trim(), false);
        Ok(Viewer::new(Artifact::Text(surface), SHORTCUT_SIZE))
    }
}
