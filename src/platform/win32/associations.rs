use std::path::Path;

use tracing::debug;
use windows::core::{HSTRING, PCWSTR, PWSTR};
use windows::Win32::System::Com::CoTaskMemFree;
use windows::Win32::UI::Shell::{
    AssocQueryStringW, IAssocHandler, SHAssocEnumHandlers, ShellExecuteW, ASSOCF_NONE,
    ASSOCSTR_FRIENDLYAPPNAME, ASSOC_FILTER_RECOMMENDED,
};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use crate::controller::{AppDescriptor, Associations};
use crate::error::{PreviewError, Result};
use crate::platform::spawn_app;

#[derive(Debug, Default)]
pub struct ShellAssociations;

// Folders have no extension; Explorer owns them.
fn assoc_key(path: &Path) -> Option<String> {
    if path.is_dir() {
        return Some("Folder".to_string());
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

unsafe fn take_co_string(value: PWSTR) -> Option<String> {
    if value.is_null() {
        return None;
    }
    let text = value.to_string().ok();
    CoTaskMemFree(Some(value.0 as *const _));
    text
}

impl Associations for ShellAssociations {
    fn app_name(&self, path: &Path) -> Option<String> {
        let key = HSTRING::from(assoc_key(path)?);
        let mut buffer = [0u16; 260];
        let mut len = buffer.len() as u32;
        unsafe {
            AssocQueryStringW(
                ASSOCF_NONE,
                ASSOCSTR_FRIENDLYAPPNAME,
                &key,
                PCWSTR::null(),
                PWSTR(buffer.as_mut_ptr()),
                &mut len,
            )
            .ok()
            .ok()?;
        }
        let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        let name = String::from_utf16_lossy(&buffer[..end]);
        (!name.is_empty()).then_some(name)
    }

    fn app_list(&self, path: &Path) -> Vec<AppDescriptor> {
        let Some(key) = assoc_key(path) else {
            return Vec::new();
        };
        let mut apps = Vec::new();

        unsafe {
            let handlers = match SHAssocEnumHandlers(&HSTRING::from(key), ASSOC_FILTER_RECOMMENDED) {
                Ok(handlers) => handlers,
                Err(err) => {
                    debug!("no association handlers: {err}");
                    return apps;
                }
            };

            loop {
                let mut slot: [Option<IAssocHandler>; 1] = [None];
                let mut fetched = 0u32;
                if handlers.Next(&mut slot, Some(&mut fetched as *mut u32)).is_err() || fetched == 0 {
                    break;
                }
                let Some(handler) = slot[0].take() else {
                    break;
                };

                let id = handler.GetName().ok().and_then(|name| take_co_string(name));
                let name = handler.GetUIName().ok().and_then(|name| take_co_string(name));
                if let (Some(id), Some(name)) = (id, name) {
                    if !apps.iter().any(|app: &AppDescriptor| app.id == id) {
                        apps.push(AppDescriptor { id, name });
                    }
                }
            }
        }

        apps
    }

    fn launch_default(&self, path: &Path) -> Result<()> {
        let file = HSTRING::from(path.as_os_str());
        let result = unsafe { ShellExecuteW(None, PCWSTR::null(), &file, None, None, SW_SHOWNORMAL) };
        // ShellExecute reports success with a value above 32.
        if result.0 as isize > 32 {
            Ok(())
        } else {
            Err(PreviewError::launch(
                self.app_name(path).unwrap_or_else(|| "default application".to_string()),
                format!("ShellExecute returned {}", result.0 as isize),
            ))
        }
    }

    fn invoke(&self, app_id: &str, path: &Path) -> Result<()> {
        spawn_app(app_id, path)
    }
}
