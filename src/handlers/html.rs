use once_cell::sync::Lazy;
use regex::Regex;

use super::{read_text, FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, TextKind, TextSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;

const HTML_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "shtml"];
const HTML_SIZE: NaturalSize = NaturalSize::new(1000.0, 700.0);

static TITLE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok());

pub struct HtmlHandler {
    limit: u64,
}

impl HtmlHandler {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Handler for HtmlHandler {
    fn name(&self) -> &'static str {
        "html"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        file.has_extension(HTML_EXTENSIONS)
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let (content, truncated) = read_text(&file.path, self.limit)?;
        let title = page_title(&content);
        let viewer = Viewer::new(
            Artifact::Text(TextSurface::from_content(TextKind::Markup, &content, truncated)),
            HTML_SIZE,
        );
        Ok(match title {
            Some(title) => viewer.with_metadata(title),
            None => viewer,
        })
    }
}

fn page_title(content: &str) -> Option<String> {
    let captures = TITLE.as_ref()?.captures(content)?;
    let title = captures.get(1)?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_normalizes_title() {
        let html = "<html><HEAD><Title>\n  Quarterly\n  Report </Title></HEAD></html>";
        assert_eq!(page_title(html).as_deref(), Some("Quarterly Report"));
        assert_eq!(page_title("<title>   </title>"), None);
        assert_eq!(page_title("<p>no title</p>"), None);
    }

    #[test]
    fn page_without_title_has_no_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.htm");
        std::fs::write(&path, "<p>hi</p>").unwrap();

        let viewer = HtmlHandler::new(1024)
            .get_viewer(&FileInfo::from_path(&path).unwrap())
            .unwrap();
        assert!(viewer.metadata.is_none());
        assert!(matches!(viewer.artifact, Artifact::Text(ref s) if s.kind == TextKind::Markup));
    }
}
