use tracing::{debug, warn};

use super::{
    AnimatedImageHandler, AudioHandler, FileInfo, Handler, HtmlHandler, ImageHandler,
    InternetShortcutHandler, PdfHandler, ShellPreviewHandler, SourceCodeHandler, SvgHandler,
    TextHandler, VideoHandler, Viewer,
};
use crate::artifact::Artifact;
use crate::geometry::NaturalSize;

const NOTICE_SIZE: NaturalSize = NaturalSize::new(480.0, 200.0);

// Handlers in priority order. The first one whose `can_open` accepts a file
// renders it; the list never changes after construction.
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { handlers }
    }

    pub fn standard(text_limit: u64) -> Self {
        Self::new(vec![
            Box::new(HtmlHandler::new(text_limit)),
            Box::new(SourceCodeHandler::new(text_limit)),
            Box::new(InternetShortcutHandler),
            Box::new(TextHandler::new(text_limit)),
            Box::new(PdfHandler),
            Box::new(VideoHandler),
            Box::new(AudioHandler),
            Box::new(AnimatedImageHandler),
            Box::new(SvgHandler),
            Box::new(ImageHandler),
            Box::new(ShellPreviewHandler),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn select(&self, file: &FileInfo) -> Option<&dyn Handler> {
        self.handlers
            .iter()
            .find(|handler| handler.can_open(file))
            .map(|handler| handler.as_ref())
    }

    pub fn dispatch(&self, file: &FileInfo) -> Viewer {
        let Some(handler) = self.select(file) else {
            debug!(path = %file.path.display(), "no handler claimed file");
            return Viewer::new(
                Artifact::Empty(format!("No preview available for {}", file.file_name())),
                NOTICE_SIZE,
            );
        };

        debug!(handler = handler.name(), path = %file.path.display(), "dispatching");
        match handler.get_viewer(file) {
            Ok(viewer) => viewer,
            Err(err) => {
                warn!(handler = handler.name(), path = %file.path.display(), "preview failed: {err}");
                Viewer::new(Artifact::Error(err.to_string()), NOTICE_SIZE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::testing::{Recorder, ReleaseLog};
    use crate::artifact::{HostedKind, HostedSurface};
    use crate::error::{PreviewError, Result};
    use std::path::Path;

    struct Claims {
        name: &'static str,
        extension: &'static str,
    }

    impl Handler for Claims {
        fn name(&self) -> &'static str {
            self.name
        }

        fn can_open(&self, file: &FileInfo) -> bool {
            file.extension == self.extension
        }

        fn get_viewer(&self, _file: &FileInfo) -> Result<Viewer> {
            Ok(Viewer::new(Artifact::Empty(self.name.to_string()), NaturalSize::new(1.0, 1.0)))
        }
    }

    struct FailsMidway {
        log: ReleaseLog,
    }

    impl Handler for FailsMidway {
        fn name(&self) -> &'static str {
            "fails-midway"
        }

        fn can_open(&self, _file: &FileInfo) -> bool {
            true
        }

        fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
            let mut surface = HostedSurface::new(HostedKind::Video, &file.path, "partial");
            surface.attach(
                Recorder::boxed("container", &self.log),
                Some(Recorder::boxed("child", &self.log)),
            );
            Err(PreviewError::decode("video", "codec unavailable"))
        }
    }

    fn file(name: &str) -> FileInfo {
        FileInfo::with_len(Path::new(name), 10)
    }

    fn winner(registry: &HandlerRegistry, name: &str) -> Option<&'static str> {
        registry.select(&file(name)).map(|h| h.name())
    }

    #[test]
    fn first_matching_handler_wins() {
        let registry = HandlerRegistry::new(vec![
            Box::new(Claims { name: "a", extension: "txt" }),
            Box::new(Claims { name: "b", extension: "txt" }),
        ]);
        assert_eq!(winner(&registry, "x.txt"), Some("a"));

        let reversed = HandlerRegistry::new(vec![
            Box::new(Claims { name: "b", extension: "txt" }),
            Box::new(Claims { name: "a", extension: "txt" }),
        ]);
        assert_eq!(winner(&reversed, "x.txt"), Some("b"));
    }

    #[test]
    fn unclaimed_file_yields_placeholder() {
        let registry = HandlerRegistry::new(vec![Box::new(Claims { name: "a", extension: "txt" })]);
        assert!(registry.select(&file("x.bin")).is_none());

        let viewer = registry.dispatch(&file("x.bin"));
        assert!(matches!(viewer.artifact, Artifact::Empty(ref msg) if msg.contains("x.bin")));
        assert!(viewer.metadata.is_none());
    }

    #[test]
    fn handler_failure_becomes_error_artifact_after_release() {
        let log = ReleaseLog::default();
        let registry = HandlerRegistry::new(vec![Box::new(FailsMidway { log: log.clone() })]);

        let viewer = registry.dispatch(&file("clip.mp4"));

        assert!(matches!(viewer.artifact, Artifact::Error(ref msg) if msg.contains("codec unavailable")));
        assert_eq!(*log.borrow(), vec!["child", "container"]);
    }

    #[test]
    fn standard_order_puts_specific_text_handlers_first() {
        let registry = HandlerRegistry::standard(1024);
        let names = registry.names();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();

        assert!(position("html") < position("text"));
        assert!(position("source") < position("text"));
        assert!(position("internet-shortcut") < position("text"));
        assert_eq!(names.last(), Some(&"shell"));

        assert_eq!(winner(&registry, "index.html"), Some("html"));
        assert_eq!(winner(&registry, "main.rs"), Some("source"));
        assert_eq!(winner(&registry, "app.ts"), Some("source"));
        assert_eq!(winner(&registry, "stream.m2ts"), Some("video"));
        assert_eq!(winner(&registry, "site.url"), Some("internet-shortcut"));
        assert_eq!(winner(&registry, "notes.txt"), Some("text"));
        assert_eq!(winner(&registry, "paper.pdf"), Some("pdf"));
        assert_eq!(winner(&registry, "movie.mkv"), Some("video"));
        assert_eq!(winner(&registry, "song.mp3"), Some("audio"));
        assert_eq!(winner(&registry, "logo.svg"), Some("svg"));
        assert_eq!(winner(&registry, "photo.jpg"), Some("image"));
        assert_eq!(winner(&registry, "still.gif"), Some("animated-image"));
        assert_eq!(winner(&registry, "setup.msi"), Some("shell"));
    }
}
