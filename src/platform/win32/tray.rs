use std::sync::atomic::Ordering;

use tracing::{info, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Shell::{
    Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DestroyWindow,
    GetCursorPos, LoadImageW, PostQuitMessage, RegisterClassExW, RegisterWindowMessageW,
    SetForegroundWindow, TrackPopupMenu, HICON, IMAGE_ICON, LR_DEFAULTSIZE, LR_SHARED, MF_CHECKED,
    MF_STRING, MF_UNCHECKED, TPM_BOTTOMALIGN, TPM_LEFTALIGN, WM_COMMAND, WM_DESTROY, WM_LBUTTONUP,
    WM_RBUTTONUP, WM_USER, WNDCLASSEXW, WS_EX_TOOLWINDOW, WS_POPUP,
};

use super::trigger::TRIGGER_ENABLED;
use crate::controller::APP_TITLE;
use crate::RUNNING;

const WM_TRAYICON: u32 = WM_USER + 1;
const ID_TRAY_EXIT: u16 = 1001;
const ID_TRAY_TRIGGER: u16 = 1002;

const TRAY_CLASS: PCWSTR = w!("RustQuickLookTrayClass");

static mut TASKBAR_CREATED: u32 = 0;

unsafe extern "system" fn tray_window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        _ if TASKBAR_CREATED != 0 && msg == TASKBAR_CREATED => {
            // Explorer (taskbar) restarted; re-add tray icon
            remove_tray_icon(hwnd);
            let _ = add_tray_icon(hwnd);
            LRESULT(0)
        }
        WM_TRAYICON => {
            let event = lparam.0 as u32;
            if event == WM_RBUTTONUP || event == WM_LBUTTONUP {
                show_context_menu(hwnd);
            }
            LRESULT(0)
        }
        WM_COMMAND => {
            match (wparam.0 & 0xFFFF) as u16 {
                ID_TRAY_EXIT => {
                    info!("exit requested from tray");
                    RUNNING.store(false, Ordering::SeqCst);
                    PostQuitMessage(0);
                }
                ID_TRAY_TRIGGER => {
                    let enabled = !TRIGGER_ENABLED.load(Ordering::SeqCst);
                    TRIGGER_ENABLED.store(enabled, Ordering::SeqCst);
                    info!(enabled, "space trigger toggled");
                }
                _ => {}
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            remove_tray_icon(hwnd);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe fn show_context_menu(hwnd: HWND) {
    let Ok(menu) = CreatePopupMenu() else {
        return;
    };

    let trigger_flags = MF_STRING
        | if TRIGGER_ENABLED.load(Ordering::SeqCst) {
            MF_CHECKED
        } else {
            MF_UNCHECKED
        };
    let _ = AppendMenuW(menu, trigger_flags, ID_TRAY_TRIGGER as usize, w!("Space Trigger"));
    let _ = AppendMenuW(menu, MF_STRING, ID_TRAY_EXIT as usize, w!("Exit"));

    let mut pt = POINT::default();
    let _ = GetCursorPos(&mut pt);

    let _ = SetForegroundWindow(hwnd).ok();
    let _ = TrackPopupMenu(menu, TPM_LEFTALIGN | TPM_BOTTOMALIGN, pt.x, pt.y, 0, hwnd, None).ok();
    let _ = DestroyMenu(menu);
}

unsafe fn add_tray_icon(hwnd: HWND) -> bool {
    // Embedded icon first, then the stock application icon.
    let embedded = GetModuleHandleW(None).ok().and_then(|hmodule| {
        LoadImageW(
            HINSTANCE(hmodule.0),
            PCWSTR(1 as *const u16),
            IMAGE_ICON,
            0,
            0,
            LR_DEFAULTSIZE | LR_SHARED,
        )
        .ok()
    });
    let hicon = match embedded {
        Some(h) => HICON(h.0),
        None => LoadImageW(
            None,
            PCWSTR(32512 as *const u16), // IDI_APPLICATION
            IMAGE_ICON,
            0,
            0,
            LR_DEFAULTSIZE | LR_SHARED,
        )
        .map(|h| HICON(h.0))
        .unwrap_or_default(),
    };

    let mut nid = NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: 1,
        uFlags: NIF_ICON | NIF_MESSAGE | NIF_TIP,
        uCallbackMessage: WM_TRAYICON,
        hIcon: hicon,
        ..Default::default()
    };

    let tip: Vec<u16> = APP_TITLE.encode_utf16().chain(std::iter::once(0)).collect();
    let len = tip.len().min(nid.szTip.len());
    nid.szTip[..len].copy_from_slice(&tip[..len]);

    Shell_NotifyIconW(NIM_ADD, &nid).as_bool()
}

unsafe fn remove_tray_icon(hwnd: HWND) {
    let nid = NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: 1,
        ..Default::default()
    };
    let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
}

// Hidden window owning the notification icon. Its messages are pumped by
// the UI loop along with the preview window's.
pub struct TrayIcon {
    hwnd: HWND,
}

impl TrayIcon {
    pub fn create() -> Option<Self> {
        unsafe {
            let hinstance = GetModuleHandleW(None).ok()?;

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                lpfnWndProc: Some(tray_window_proc),
                hInstance: hinstance.into(),
                lpszClassName: TRAY_CLASS,
                ..Default::default()
            };
            RegisterClassExW(&wc);

            // Register TaskbarCreated message to detect Explorer restarts
            TASKBAR_CREATED = RegisterWindowMessageW(w!("TaskbarCreated"));

            let hwnd = match CreateWindowExW(
                WS_EX_TOOLWINDOW,
                TRAY_CLASS,
                w!("Rust Quick Look Tray"),
                WS_POPUP,
                0,
                0,
                0,
                0,
                None,
                None,
                hinstance,
                None,
            ) {
                Ok(hwnd) => hwnd,
                Err(err) => {
                    warn!("failed to create tray window: {err}");
                    return None;
                }
            };

            if !add_tray_icon(hwnd) {
                // Explorer may not be up yet; TaskbarCreated re-adds it later.
                warn!("tray icon not added yet");
            }
            Some(Self { hwnd })
        }
    }
}

impl Drop for TrayIcon {
    fn drop(&mut self) {
        unsafe {
            remove_tray_icon(self.hwnd);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
