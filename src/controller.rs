use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::artifact::Artifact;
use crate::error::Result;
use crate::geometry::{compute_bounds, Layout, MonitorInfo, WindowBounds};
use crate::handlers::{display_name, DirectoryRenderer, FileInfo, HandlerRegistry};
use crate::host::ArtifactHost;

pub const APP_TITLE: &str = "Rust Quick Look";

pub trait PreviewWindow {
    fn is_visible(&self) -> bool;
    fn foreground_monitor(&self) -> MonitorInfo;
    fn present(&mut self, artifact: Option<&mut Artifact>);
    fn set_title(&mut self, title: &str);
    fn set_open_with(&mut self, open_with: &OpenWith);
    // Moves and resizes without activating or changing z-order.
    fn place(&mut self, bounds: &WindowBounds, monitor: &MonitorInfo);
    // Topmost on, show, topmost off.
    fn show_topmost_pulse(&mut self);
    fn hide(&mut self);
    fn show_message(&mut self, title: &str, message: &str);
}

pub trait Associations {
    fn app_name(&self, path: &Path) -> Option<String>;
    fn app_list(&self, path: &Path) -> Vec<AppDescriptor>;
    fn launch_default(&self, path: &Path) -> Result<()>;
    fn invoke(&self, app_id: &str, path: &Path) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    // Opaque to the controller; handed back to `Associations::invoke`.
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenWith {
    pub default_app: Option<String>,
    pub apps: Vec<AppDescriptor>,
}

impl OpenWith {
    pub fn label(&self) -> String {
        match &self.default_app {
            Some(app) => format!("Open with {app}"),
            None => "Open".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    CloseRequested,
    OpenDefault,
    OpenWith(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewRequest {
    Open(PathBuf),
    Toggle(PathBuf),
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    File,
    Directory,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Hidden,
    Resolving,
    Displayed,
}

// `"<name>"`, or `"<name> (<metadata>)"` when there is metadata.
pub fn title_for(name: &str, metadata: Option<&str>) -> String {
    match metadata {
        Some(metadata) if !metadata.is_empty() => format!("{name} ({metadata})"),
        _ => name.to_string(),
    }
}

pub struct PreviewController<W: PreviewWindow, A: Associations> {
    window: W,
    associations: A,
    registry: HandlerRegistry,
    directories: DirectoryRenderer,
    host: ArtifactHost,
    layout: Layout,
    state: State,
    target: Option<PathBuf>,
}

impl<W: PreviewWindow, A: Associations> PreviewController<W, A> {
    pub fn new(window: W, associations: A, registry: HandlerRegistry) -> Self {
        Self {
            window,
            associations,
            registry,
            directories: DirectoryRenderer::new(),
            host: ArtifactHost::new(),
            layout: Layout::default(),
            state: State::Hidden,
            target: None,
        }
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    #[cfg(test)]
    pub fn host(&self) -> &ArtifactHost {
        &self.host
    }

    pub fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    pub fn open(&mut self, path: &Path) -> OpenOutcome {
        let previous = self.state;
        self.state = State::Resolving;
        if self.host.clear() {
            self.window.present(None);
        }

        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() || metadata.is_dir() => metadata,
            _ => {
                debug!(path = %path.display(), "nothing to preview");
                // The blanked window no longer shows the old target
                self.target = None;
                self.state = if self.window.is_visible() { previous } else { State::Hidden };
                return OpenOutcome::Skipped;
            }
        };

        let (viewer, outcome) = if metadata.is_dir() {
            (self.directories.get_viewer(path), OpenOutcome::Directory)
        } else {
            let file = FileInfo::with_len(path, metadata.len());
            (self.registry.dispatch(&file), OpenOutcome::File)
        };

        let artifact = self.host.replace(viewer.artifact);
        self.window.present(Some(artifact));

        let title = title_for(&display_name(path), viewer.metadata.as_deref());
        self.window.set_title(&title);

        let open_with = OpenWith {
            default_app: self.associations.app_name(path),
            apps: self.associations.app_list(path),
        };
        self.window.set_open_with(&open_with);

        let monitor = self.window.foreground_monitor();
        let bounds = compute_bounds(viewer.size, &monitor, &self.layout);
        debug!(?bounds, ?monitor, natural = ?viewer.size, "placing preview");
        self.window.place(&bounds, &monitor);
        self.window.show_topmost_pulse();

        info!(path = %path.display(), %title, "preview shown");
        self.state = State::Displayed;
        self.target = Some(path.to_path_buf());
        outcome
    }

    // Returns `false` when the window was already hidden.
    pub fn hide(&mut self) -> bool {
        if !self.window.is_visible() {
            return false;
        }
        self.window.hide();
        self.host.clear();
        self.window.present(None);
        self.state = State::Hidden;
        if let Some(target) = self.target.take() {
            info!(path = %target.display(), "preview hidden");
        }
        true
    }

    pub fn toggle(&mut self, path: &Path) -> Option<OpenOutcome> {
        if self.hide() {
            None
        } else {
            Some(self.open(path))
        }
    }

    pub fn request(&mut self, request: PreviewRequest) {
        match request {
            PreviewRequest::Open(path) => {
                self.open(&path);
            }
            PreviewRequest::Toggle(path) => {
                self.toggle(&path);
            }
            PreviewRequest::Hide => {
                self.hide();
            }
        }
    }

    pub fn handle(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.hide();
            }
            WindowEvent::OpenDefault => self.launch(None),
            WindowEvent::OpenWith(app_id) => self.launch(Some(&app_id)),
        }
    }

    fn launch(&mut self, app_id: Option<&str>) {
        let Some(target) = self.target.clone() else {
            debug!("launch requested with nothing displayed");
            return;
        };

        let result = match app_id {
            Some(app_id) => self.associations.invoke(app_id, &target),
            None => self.associations.launch_default(&target),
        };

        match result {
            Ok(()) => {
                self.hide();
            }
            Err(err) => {
                warn!(path = %target.display(), "launch failed: {err}");
                self.window.show_message(APP_TITLE, &err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::testing::{Recorder, ReleaseLog};
    use crate::error::PreviewError;
    use crate::geometry::{Rect, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeWindow {
        visible: bool,
        title: String,
        open_with: OpenWith,
        placed: Option<WindowBounds>,
        presented: Vec<&'static str>,
        messages: Vec<String>,
        natives: ReleaseLog,
    }

    impl PreviewWindow for FakeWindow {
        fn is_visible(&self) -> bool {
            self.visible
        }

        fn foreground_monitor(&self) -> MonitorInfo {
            MonitorInfo::with_scale(Rect::new(0, 0, 1920, 1080), 1.0)
        }

        fn present(&mut self, artifact: Option<&mut Artifact>) {
            match artifact {
                Some(Artifact::Hosted(surface)) => {
                    let name = surface.caption.clone();
                    surface.attach(
                        Recorder::boxed(&format!("{name}:container"), &self.natives),
                        Some(Recorder::boxed(&format!("{name}:child"), &self.natives)),
                    );
                    self.presented.push("hosted");
                }
                Some(other) => self.presented.push(other.kind_name()),
                None => self.presented.push("blank"),
            }
        }

        fn set_title(&mut self, title: &str) {
            self.title = title.to_string();
        }

        fn set_open_with(&mut self, open_with: &OpenWith) {
            self.open_with = open_with.clone();
        }

        fn place(&mut self, bounds: &WindowBounds, _monitor: &MonitorInfo) {
            self.placed = Some(*bounds);
        }

        fn show_topmost_pulse(&mut self) {
            self.visible = true;
        }

        fn hide(&mut self) {
            self.visible = false;
        }

        fn show_message(&mut self, _title: &str, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct FakeAssociations {
        fail: bool,
        launched: RefCell<Vec<String>>,
    }

    impl Associations for FakeAssociations {
        fn app_name(&self, _path: &Path) -> Option<String> {
            Some("Viewer".to_string())
        }

        fn app_list(&self, _path: &Path) -> Vec<AppDescriptor> {
            vec![AppDescriptor {
                id: "viewer.exe".to_string(),
                name: "Viewer".to_string(),
            }]
        }

        fn launch_default(&self, path: &Path) -> Result<()> {
            self.invoke("default", path)
        }

        fn invoke(&self, app_id: &str, _path: &Path) -> Result<()> {
            if self.fail {
                return Err(PreviewError::launch(app_id, "access denied"));
            }
            self.launched.borrow_mut().push(app_id.to_string());
            Ok(())
        }
    }

    type Controller = PreviewController<FakeWindow, FakeAssociations>;

    fn controller() -> Controller {
        PreviewController::new(FakeWindow::default(), FakeAssociations::default(), HandlerRegistry::standard(1024))
    }

    #[test]
    fn nonexistent_path_is_skipped_without_showing() {
        let mut controller = controller();
        let outcome = controller.open(Path::new("/no/such/file.txt"));

        assert_eq!(outcome, OpenOutcome::Skipped);
        assert!(!controller.is_visible());
        assert_eq!(controller.state(), State::Hidden);
        assert!(controller.window().placed.is_none());
    }

    #[test]
    fn nonexistent_path_keeps_an_open_window_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        controller.open(&path);
        assert_eq!(controller.open(&dir.path().join("gone.txt")), OpenOutcome::Skipped);
        assert!(controller.is_visible());
        assert!(controller.host().is_vacant());
    }

    #[test]
    fn skipped_open_forgets_the_previous_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        controller.open(&path);
        controller.open(&dir.path().join("gone.txt"));

        controller.handle(WindowEvent::OpenDefault);
        assert!(controller.associations.launched.borrow().is_empty());
        assert!(controller.is_visible());
    }

    #[test]
    fn corrupt_file_still_opens_with_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();

        let mut controller = controller();
        assert_eq!(controller.open(&path), OpenOutcome::File);

        assert!(controller.is_visible());
        assert_eq!(controller.state(), State::Displayed);
        let window = controller.window();
        assert_eq!(window.presented, vec!["error"]);
        assert_eq!(window.title, "broken.png");
        let bounds = window.placed.unwrap();
        assert!(bounds.width >= MIN_WINDOW_WIDTH);
        assert!(bounds.height >= MIN_WINDOW_HEIGHT);
    }

    #[test]
    fn text_file_is_shown_with_title_and_open_with() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        assert_eq!(controller.open(&path), OpenOutcome::File);

        let window = controller.window();
        assert!(window.visible);
        assert_eq!(window.title, "notes.txt");
        assert_eq!(window.open_with.label(), "Open with Viewer");
        assert_eq!(window.presented, vec!["text"]);
        let bounds = window.placed.unwrap();
        assert_eq!((bounds.width, bounds.height), (810.0, 645.0));
        assert_eq!(controller.state(), State::Displayed);
    }

    #[test]
    fn empty_directory_has_no_title_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Empty Folder");
        fs::create_dir(&folder).unwrap();

        let mut controller = controller();
        assert_eq!(controller.open(&folder), OpenOutcome::Directory);
        assert_eq!(controller.window().title, "Empty Folder");
        assert!(matches!(controller.host().current(), Some(Artifact::Listing(_))));
    }

    #[test]
    fn metadata_is_appended_to_the_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.msi");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let mut controller = controller();
        controller.open(&path);
        assert_eq!(controller.window().title, "setup.msi (2.0 KB)");
    }

    #[test]
    fn hide_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        assert!(!controller.hide());

        controller.open(&path);
        assert!(controller.hide());
        assert!(!controller.hide());
        assert!(controller.host().is_vacant());
        assert_eq!(controller.state(), State::Hidden);
    }

    #[test]
    fn opening_again_releases_previous_native_controls() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.mp4");
        let second = dir.path().join("second.mp4");
        fs::write(&first, b"").unwrap();
        fs::write(&second, b"").unwrap();

        let mut controller = controller();
        controller.open(&first);
        assert!(controller.window().natives.borrow().is_empty());

        controller.open(&second);
        assert_eq!(
            *controller.window().natives.borrow(),
            vec!["first.mp4:child", "first.mp4:container"]
        );

        controller.hide();
        assert_eq!(controller.window().natives.borrow().len(), 4);
    }

    #[test]
    fn toggle_opens_then_hides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        assert_eq!(controller.toggle(&path), Some(OpenOutcome::File));
        assert!(controller.is_visible());
        assert_eq!(controller.toggle(&path), None);
        assert!(!controller.is_visible());
    }

    #[test]
    fn successful_launch_hides_the_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        controller.open(&path);
        controller.handle(WindowEvent::OpenWith("viewer.exe".to_string()));

        assert!(!controller.is_visible());
        assert_eq!(*controller.associations.launched.borrow(), vec!["viewer.exe"]);
    }

    #[test]
    fn failed_launch_shows_message_and_stays_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let associations = FakeAssociations {
            fail: true,
            ..FakeAssociations::default()
        };
        let mut controller =
            PreviewController::new(FakeWindow::default(), associations, HandlerRegistry::standard(1024));
        controller.open(&path);
        controller.handle(WindowEvent::OpenDefault);

        assert!(controller.is_visible());
        assert_eq!(controller.window().messages.len(), 1);
        assert!(controller.window().messages[0].contains("access denied"));
    }

    #[test]
    fn close_request_hides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let mut controller = controller();
        controller.request(PreviewRequest::Open(path));
        controller.handle(WindowEvent::CloseRequested);
        assert!(!controller.is_visible());
    }

    #[test]
    fn titles() {
        assert_eq!(title_for("a.pdf", Some("3 pages")), "a.pdf (3 pages)");
        assert_eq!(title_for("a.pdf", None), "a.pdf");
        assert_eq!(title_for("a.pdf", Some("")), "a.pdf");
    }
}
