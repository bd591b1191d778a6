use std::path::Path;

use tracing::info;

use super::spawn_app;
use crate::artifact::Artifact;
use crate::controller::{AppDescriptor, Associations, OpenWith, PreviewWindow};
use crate::error::Result;
use crate::geometry::{MonitorInfo, WindowBounds};

#[derive(Debug)]
pub struct HeadlessWindow {
    monitor: MonitorInfo,
    visible: bool,
    pub title: String,
    pub open_with: String,
    pub content: Option<&'static str>,
    pub bounds: Option<WindowBounds>,
    pub physical_size: Option<(i32, i32)>,
}

impl HeadlessWindow {
    pub fn new(monitor: MonitorInfo) -> Self {
        Self {
            monitor,
            visible: false,
            title: String::new(),
            open_with: String::new(),
            content: None,
            bounds: None,
            physical_size: None,
        }
    }

    pub fn summary(&self) -> String {
        match (self.bounds, self.physical_size) {
            (Some(bounds), Some((width, height))) => format!(
                "{} [{}] {}x{} DIP at ({}, {}), {}x{} px; {}",
                self.title,
                self.content.unwrap_or("none"),
                bounds.width,
                bounds.height,
                bounds.x,
                bounds.y,
                width,
                height,
                self.open_with,
            ),
            _ => "nothing shown".to_string(),
        }
    }
}

impl PreviewWindow for HeadlessWindow {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn foreground_monitor(&self) -> MonitorInfo {
        self.monitor
    }

    fn present(&mut self, artifact: Option<&mut Artifact>) {
        self.content = artifact.map(|artifact| artifact.kind_name());
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_open_with(&mut self, open_with: &OpenWith) {
        self.open_with = open_with.label();
    }

    fn place(&mut self, bounds: &WindowBounds, monitor: &MonitorInfo) {
        self.bounds = Some(*bounds);
        self.physical_size = Some(bounds.physical_size(monitor));
    }

    fn show_topmost_pulse(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn show_message(&mut self, title: &str, message: &str) {
        info!(%title, "{message}");
    }
}

#[derive(Debug, Default)]
pub struct HeadlessAssociations;

impl HeadlessAssociations {
    fn opener() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(windows) {
            "explorer"
        } else {
            "xdg-open"
        }
    }
}

impl Associations for HeadlessAssociations {
    fn app_name(&self, _path: &Path) -> Option<String> {
        None
    }

    fn app_list(&self, _path: &Path) -> Vec<AppDescriptor> {
        Vec::new()
    }

    fn launch_default(&self, path: &Path) -> Result<()> {
        spawn_app(Self::opener(), path)
    }

    fn invoke(&self, app_id: &str, path: &Path) -> Result<()> {
        spawn_app(app_id, path)
    }
}
