use once_cell::sync::Lazy;
use regex::Regex;

use super::{read_text, FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, HostedKind, HostedSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;

const DEFAULT_SIZE: NaturalSize = NaturalSize::new(512.0, 512.0);

const HEADER_LIMIT: u64 = 64 * 1024;

static SVG_TAG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?is)<svg\b[^>]*>").ok());
static WIDTH: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"(?i)\swidth\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(px)?\s*["']"#).ok());
static HEIGHT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"(?i)\sheight\s*=\s*["']\s*([0-9]*\.?[0-9]+)\s*(px)?\s*["']"#).ok());
static VIEW_BOX: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"(?i)\sviewBox\s*=\s*["']\s*[-0-9.]+[\s,]+[-0-9.]+[\s,]+([0-9]*\.?[0-9]+)[\s,]+([0-9]*\.?[0-9]+)\s*["']"#)
        .ok()
});

pub struct SvgHandler;

impl Handler for SvgHandler {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(&["svg", "svgz"])
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        // svgz is gzip; its size stays unknown.
        let size = if file.extension == "svg" {
            let (content, _) = read_text(&file.path, HEADER_LIMIT)?;
            declared_size(&content)
        } else {
            None
        };

        let surface = HostedSurface::new(HostedKind::Vector, &file.path, file.file_name());
        let viewer = Viewer::new(Artifact::Hosted(surface), size.unwrap_or(DEFAULT_SIZE));
        Ok(match size {
            Some(size) => viewer.with_metadata(format!("{} x {}", size.width.round(), size.height.round())),
            None => viewer,
        })
    }
}

// Width and height of the root element. Percentages and physical units are
// ignored in favour of the viewBox.
fn declared_size(content: &str) -> Option<NaturalSize> {
    let tag = SVG_TAG.as_ref()?.find(content)?.as_str();

    let attribute = |pattern: &Lazy<Option<Regex>>| -> Option<f64> {
        let value = pattern.as_ref()?.captures(tag)?.get(1)?.as_str().parse::<f64>().ok()?;
        (value > 0.0).then_some(value)
    };

    if let (Some(width), Some(height)) = (attribute(&WIDTH), attribute(&HEIGHT)) {
        return Some(NaturalSize::new(width, height));
    }

    let captures = VIEW_BOX.as_ref()?.captures(tag)?;
    let width = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let height = captures.get(2)?.as_str().parse::<f64>().ok()?;
    (width > 0.0 && height > 0.0).then(|| NaturalSize::new(width, height))
}
