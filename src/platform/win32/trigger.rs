use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::{debug, info};
use windows::core::{Interface, VARIANT};
use windows::Win32::Foundation::{CloseHandle, HWND, SHANDLE_PTR};
use windows::Win32::System::Com::{CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED};
use windows::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_SPACE};
use windows::Win32::UI::Shell::{IShellFolderViewDual, IShellWindows, IWebBrowserApp, ShellWindows};
use windows::Win32::UI::WindowsAndMessaging::{GetClassNameW, GetForegroundWindow, GetWindowThreadProcessId};

use crate::controller::PreviewRequest;
use crate::RUNNING;

// Toggled from the tray menu.
pub static TRIGGER_ENABLED: AtomicBool = AtomicBool::new(true);

// Polling intervals
const ACTIVE_POLL_MS: u64 = 30; // Explorer in focus
const IDLE_POLL_MS: u64 = 250; // anything else

fn is_explorer_window(hwnd: HWND) -> bool {
    unsafe {
        let mut class_name = [0u16; 256];
        let len = GetClassNameW(hwnd, &mut class_name);
        let class_str = if len > 0 {
            OsString::from_wide(&class_name[..len as usize])
                .to_string_lossy()
                .to_lowercase()
        } else {
            String::new()
        };

        if class_str.contains("cabinetwclass") || class_str.contains("explorerwclass") {
            return true;
        }

        // Fallback: check process name
        let mut process_id: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));

        if let Ok(handle) = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id) {
            let mut buffer = [0u16; 260];
            let mut size = buffer.len() as u32;
            let is_explorer = QueryFullProcessImageNameW(
                handle,
                PROCESS_NAME_WIN32,
                windows::core::PWSTR(buffer.as_mut_ptr()),
                &mut size,
            )
            .is_ok()
                && OsString::from_wide(&buffer[..size as usize])
                    .to_string_lossy()
                    .to_lowercase()
                    .ends_with("explorer.exe");
            let _ = CloseHandle(handle);
            return is_explorer;
        }
    }
    false
}

fn selected_item(hwnd: HWND) -> Option<PathBuf> {
    unsafe {
        let shell_windows: IShellWindows = CoCreateInstance(&ShellWindows, None, CLSCTX_ALL).ok()?;
        let count = shell_windows.Count().ok()?;

        for i in 0..count {
            let Ok(disp) = shell_windows.Item(&VARIANT::from(i)) else {
                continue;
            };
            let Ok(browser) = disp.cast::<IWebBrowserApp>() else {
                continue;
            };
            match browser.HWND() {
                Ok(browser_hwnd) if browser_hwnd == SHANDLE_PTR(hwnd.0 as isize) => {}
                _ => continue,
            }

            let view: IShellFolderViewDual = browser.Document().ok()?.cast().ok()?;
            let items = view.SelectedItems().ok()?;
            if items.Count().ok()? < 1 {
                return None;
            }
            let item = items.Item(&VARIANT::from(0i32)).ok()?;
            let path = item.Path().ok()?.to_string();
            return (!path.is_empty()).then(|| PathBuf::from(path));
        }
    }
    None
}

pub fn run(requests: Sender<PreviewRequest>) {
    unsafe {
        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
    }
    info!("explorer trigger started");

    let mut space_was_down = false;
    while RUNNING.load(Ordering::SeqCst) {
        if !TRIGGER_ENABLED.load(Ordering::SeqCst) {
            space_was_down = false;
            std::thread::sleep(Duration::from_millis(IDLE_POLL_MS));
            continue;
        }

        let foreground = unsafe { GetForegroundWindow() };
        if foreground.is_invalid() || !is_explorer_window(foreground) {
            space_was_down = false;
            std::thread::sleep(Duration::from_millis(IDLE_POLL_MS));
            continue;
        }

        let space_down = unsafe { GetAsyncKeyState(i32::from(VK_SPACE.0)) as u16 & 0x8000 != 0 };
        if space_down && !space_was_down {
            if let Some(path) = selected_item(foreground) {
                debug!(path = %path.display(), "space pressed in explorer");
                if requests.send(PreviewRequest::Toggle(path)).is_err() {
                    break;
                }
            }
        }
        space_was_down = space_down;

        std::thread::sleep(Duration::from_millis(ACTIVE_POLL_MS));
    }

    unsafe {
        CoUninitialize();
    }
    info!("explorer trigger stopped");
}
