use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

pub trait NativeResource {
    fn label(&self) -> &str;
    fn release(&mut self);
}

// Decoded raster in top-down BGRA, ready for `StretchDIBits`.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    pub pixels: Rc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextKind {
    Plain,
    Markup,
    Source { language: &'static str },
    Link,
}

// A run of text sharing one foreground color (0xRRGGBB)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub color: u32,
}

#[derive(Debug, Clone)]
pub struct TextSurface {
    pub kind: TextKind,
    pub lines: Vec<String>,
    pub truncated: bool,
    // Colored spans per line, from the top. Lines past the end are unstyled.
    pub highlights: Vec<Vec<StyledSpan>>,
}

impl TextSurface {
    pub fn from_content(kind: TextKind, content: &str, truncated: bool) -> Self {
        Self {
            kind,
            lines: content.lines().map(expand_tabs).collect(),
            truncated,
            highlights: Vec::new(),
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<Vec<StyledSpan>>) -> Self {
        self.highlights = highlights;
        self
    }
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', "    ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub len: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ListingSurface {
    pub entries: Vec<ListingEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostedKind {
    Pdf,
    Video,
    Audio,
    Vector,
    Shell,
}

impl HostedKind {
    pub fn describe(self) -> &'static str {
        match self {
            HostedKind::Pdf => "PDF document",
            HostedKind::Video => "Video",
            HostedKind::Audio => "Audio",
            HostedKind::Vector => "Vector image",
            HostedKind::Shell => "File",
        }
    }
}

pub struct HostedSurface {
    pub kind: HostedKind,
    pub path: PathBuf,
    pub caption: String,
    container: Option<Box<dyn NativeResource>>,
    child: Option<Box<dyn NativeResource>>,
}

impl HostedSurface {
    pub fn new(kind: HostedKind, path: impl Into<PathBuf>, caption: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            caption: caption.into(),
            container: None,
            child: None,
        }
    }

    pub fn attach(&mut self, container: Box<dyn NativeResource>, child: Option<Box<dyn NativeResource>>) {
        self.teardown();
        self.container = Some(container);
        self.child = child;
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    // Child first, then the container. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(mut child) = self.child.take() {
            child.release();
        }
        if let Some(mut container) = self.container.take() {
            container.release();
        }
    }
}

impl Drop for HostedSurface {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for HostedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedSurface")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("container", &self.container.as_ref().map(|c| c.label().to_string()))
            .field("child", &self.child.as_ref().map(|c| c.label().to_string()))
            .finish()
    }
}

#[derive(Debug)]
pub enum Artifact {
    Image(ImageSurface),
    Text(TextSurface),
    Listing(ListingSurface),
    Hosted(HostedSurface),
    Error(String),
    Empty(String),
}

impl Artifact {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Artifact::Image(_) => "image",
            Artifact::Text(_) => "text",
            Artifact::Listing(_) => "listing",
            Artifact::Hosted(_) => "hosted",
            Artifact::Error(_) => "error",
            Artifact::Empty(_) => "empty",
        }
    }

    pub fn teardown(&mut self) {
        if let Artifact::Hosted(surface) = self {
            surface.teardown();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::NativeResource;
    use std::cell::RefCell;
    use std::rc::Rc;

    pub type ReleaseLog = Rc<RefCell<Vec<String>>>;

    pub struct Recorder {
        pub label: String,
        pub log: ReleaseLog,
    }

    impl Recorder {
        pub fn boxed(label: &str, log: &ReleaseLog) -> Box<dyn NativeResource> {
            Box::new(Self {
                label: label.to_string(),
                log: Rc::clone(log),
            })
        }
    }

    impl NativeResource for Recorder {
        fn label(&self) -> &str {
            &self.label
        }

        fn release(&mut self) {
            self.log.borrow_mut().push(self.label.clone());
        }
    }
}
