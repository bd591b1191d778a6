pub mod headless;
#[cfg(any(windows, test))]
pub mod strip;
#[cfg(windows)]
pub mod win32;

use std::path::Path;
use std::process::Command;

use crate::error::{PreviewError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    // Foreground and background as 0xRRGGBB.
    pub fn colors(self) -> (u32, u32) {
        match self {
            Theme::Light => (0x000000, 0xF3F3F3),
            Theme::Dark => (0xD3D3D3, 0x202020),
        }
    }
}

pub fn system_theme() -> Theme {
    #[cfg(windows)]
    {
        win32::theme::system_theme()
    }
    #[cfg(not(windows))]
    {
        Theme::Light
    }
}

pub fn spawn_app(program: &str, path: &Path) -> Result<()> {
    Command::new(program)
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| PreviewError::launch(program, e))
}
