use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::{debug, warn};
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, RECT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateFontW, CreateRectRgn, CreateSolidBrush, DeleteObject, EndPaint, FillRect,
    GetStockObject, GetTextExtentPoint32W, InvalidateRect, ScreenToClient, SelectClipRgn,
    SelectObject, SetBkColor, SetBkMode, SetDCBrushColor, SetStretchBltMode, SetTextColor,
    StretchDIBits, TextOutW, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CLEARTYPE_QUALITY,
    DC_BRUSH, DEFAULT_CHARSET, DIB_RGB_COLORS, FW_NORMAL, FW_SEMIBOLD, HALFTONE, HDC, HFONT,
    PAINTSTRUCT, SRCCOPY, TRANSPARENT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::{VK_ESCAPE, VK_F4, VK_RETURN, VK_SPACE};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu, DestroyWindow,
    GetClientRect, GetCursorPos, IsWindowVisible, LoadCursorW, MessageBoxW, MoveWindow,
    RegisterClassExW, SetLayeredWindowAttributes, SetWindowPos, SetWindowTextW, ShowWindow,
    TrackPopupMenu, CS_HREDRAW, CS_VREDRAW, HTCAPTION, HTCLIENT, HWND_NOTOPMOST, HWND_TOPMOST,
    IDC_ARROW, LWA_ALPHA, MB_ICONWARNING, MB_OK, MF_SEPARATOR, MF_STRING, SWP_NOACTIVATE,
    SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SW_HIDE, SW_SHOWNOACTIVATE,
    TPM_RETURNCMD, TPM_RIGHTBUTTON, WINDOW_EX_STYLE, WM_CLOSE, WM_CTLCOLORSTATIC, WM_DESTROY,
    WM_KEYDOWN, WM_LBUTTONUP, WM_NCHITTEST, WM_NCRBUTTONUP, WM_PAINT, WM_RBUTTONUP, WM_SIZE, WM_SYSKEYDOWN,
    WNDCLASSEXW, WS_CHILD, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_POPUP, WS_VISIBLE,
};

use super::{colorref, monitor, to_wide};
use crate::artifact::{Artifact, HostedSurface, ImageSurface, NativeResource, StyledSpan, TextKind};
use crate::controller::{AppDescriptor, OpenWith, PreviewWindow, WindowEvent};
use crate::error::{PreviewError, Result};
use crate::geometry::{MonitorInfo, WindowBounds, BASE_DPI};
use crate::handlers::human_size;
use crate::platform::strip::{StripButton, StripLayout, STRIP_HEIGHT};
use crate::platform::{system_theme, Theme};

const PREVIEW_CLASS: PCWSTR = w!("RustQuickLookWindow");

// Content border, in DIP
const BORDER: i32 = 5;

const MENU_OPEN_DEFAULT: usize = 1;
const MENU_FIRST_APP: usize = 100;

#[derive(Clone, Default)]
enum Content {
    #[default]
    Blank,
    Image(ImageSurface),
    Lines {
        lines: Vec<String>,
        highlights: Vec<Vec<StyledSpan>>,
        monospace: bool,
    },
    Notice(String),
}

#[derive(Clone)]
struct View {
    title: String,
    open_with: OpenWith,
    content: Content,
    theme: Theme,
}

impl Default for View {
    fn default() -> Self {
        Self {
            title: String::new(),
            open_with: OpenWith::default(),
            content: Content::Blank,
            theme: Theme::Light,
        }
    }
}

thread_local! {
    static EVENTS: RefCell<VecDeque<WindowEvent>> = RefCell::new(VecDeque::new());
    static VIEW: RefCell<Rc<View>> = RefCell::new(Rc::new(View::default()));
    // Measured while painting; hit-testing needs it without a DC
    static LABEL_WIDTH: Cell<i32> = const { Cell::new(0) };
}

fn push_event(event: WindowEvent) {
    EVENTS.with(|events| events.borrow_mut().push_back(event));
}

pub fn drain_events() -> Vec<WindowEvent> {
    EVENTS.with(|events| events.borrow_mut().drain(..).collect())
}

fn snapshot() -> Rc<View> {
    VIEW.with(|view| Rc::clone(&view.borrow()))
}

fn update_view(change: impl FnOnce(&mut View)) {
    VIEW.with(|view| {
        let mut current = view.borrow_mut();
        let mut next = View::clone(&current);
        change(&mut next);
        *current = Rc::new(next);
    });
}

fn dpi_scale(hwnd: HWND) -> f64 {
    let dpi = unsafe { GetDpiForWindow(hwnd) };
    if dpi == 0 {
        1.0
    } else {
        f64::from(dpi) / BASE_DPI
    }
}

fn scaled(value: i32, scale: f64) -> i32 {
    (f64::from(value) * scale).round() as i32
}

fn content_rect(hwnd: HWND) -> RECT {
    let scale = dpi_scale(hwnd);
    let mut rect = RECT::default();
    unsafe {
        let _ = GetClientRect(hwnd, &mut rect);
    }
    RECT {
        left: rect.left + scaled(BORDER, scale),
        top: rect.top + scaled(STRIP_HEIGHT, scale),
        right: (rect.right - scaled(BORDER, scale)).max(rect.left),
        bottom: (rect.bottom - scaled(BORDER, scale)).max(rect.top),
    }
}

fn strip_layout(hwnd: HWND) -> StripLayout {
    let mut rect = RECT::default();
    unsafe {
        let _ = GetClientRect(hwnd, &mut rect);
    }
    StripLayout::new(rect.right - rect.left, LABEL_WIDTH.with(Cell::get), dpi_scale(hwnd))
}

fn client_point(lparam: LPARAM) -> (i32, i32) {
    ((lparam.0 & 0xFFFF) as i16 as i32, ((lparam.0 >> 16) & 0xFFFF) as i16 as i32)
}

struct ChildWindow {
    hwnd: HWND,
    label: String,
}

impl NativeResource for ChildWindow {
    fn label(&self) -> &str {
        &self.label
    }

    fn release(&mut self) {
        if !self.hwnd.is_invalid() {
            debug!(label = %self.label, "destroying child window");
            unsafe {
                let _ = DestroyWindow(self.hwnd);
            }
            self.hwnd = HWND::default();
        }
    }
}

unsafe fn create_static(parent: HWND, text: &str, rect: &RECT) -> Option<HWND> {
    let hinstance = GetModuleHandleW(None).ok()?;
    let text = to_wide(text);
    CreateWindowExW(
        WINDOW_EX_STYLE(0),
        w!("STATIC"),
        PCWSTR(text.as_ptr()),
        WS_CHILD | WS_VISIBLE,
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
        parent,
        None,
        hinstance,
        None,
    )
    .ok()
}

unsafe fn create_font(height: i32, weight: i32, face: PCWSTR) -> HFONT {
    CreateFontW(
        height,
        0,
        0,
        0,
        weight,
        0,
        0,
        0,
        DEFAULT_CHARSET.0 as u32,
        0,
        0,
        CLEARTYPE_QUALITY.0 as u32,
        0,
        face,
    )
}

unsafe fn text_out(hdc: HDC, x: i32, y: i32, text: &str) {
    let wide: Vec<u16> = text.encode_utf16().collect();
    let _ = TextOutW(hdc, x, y, &wide);
}

unsafe fn text_width(hdc: HDC, text: &str) -> i32 {
    let wide: Vec<u16> = text.encode_utf16().collect();
    let mut size = SIZE::default();
    let _ = GetTextExtentPoint32W(hdc, &wide, &mut size);
    size.cx
}

unsafe fn paint(hwnd: HWND, hdc: HDC) {
    let view = snapshot();
    let scale = dpi_scale(hwnd);
    let (fg, bg) = view.theme.colors();
    let strip_bg = match view.theme {
        Theme::Light => 0xE6E6E6,
        Theme::Dark => 0x2B2B2B,
    };

    let mut client = RECT::default();
    let _ = GetClientRect(hwnd, &mut client);

    let bg_brush = CreateSolidBrush(colorref(bg));
    FillRect(hdc, &client, bg_brush);
    let _ = DeleteObject(bg_brush);

    let strip = RECT {
        bottom: client.top + scaled(STRIP_HEIGHT, scale),
        ..client
    };
    let strip_brush = CreateSolidBrush(colorref(strip_bg));
    FillRect(hdc, &strip, strip_brush);
    let _ = DeleteObject(strip_brush);

    SetBkMode(hdc, TRANSPARENT);
    SetTextColor(hdc, colorref(fg));

    let title_font = create_font(scaled(18, scale), FW_SEMIBOLD.0 as i32, w!("Segoe UI"));
    let old_font = SelectObject(hdc, title_font);
    text_out(hdc, scaled(12, scale), scaled(10, scale), &view.title);

    let label_font = create_font(scaled(14, scale), FW_NORMAL.0 as i32, w!("Segoe UI"));
    let _ = SelectObject(hdc, label_font);
    let label = view.open_with.label();
    let label_width = text_width(hdc, &label);
    LABEL_WIDTH.with(|width| width.set(label_width));

    let layout = StripLayout::new(client.right - client.left, label_width, scale);
    text_out(hdc, layout.open.x + layout.label_padding, scaled(13, scale), &label);

    // ChevronDown and ChromeClose
    let glyph_font = create_font(scaled(10, scale), FW_NORMAL.0 as i32, w!("Segoe MDL2 Assets"));
    let _ = SelectObject(hdc, glyph_font);
    for (rect, glyph) in [(layout.menu, "\u{E70D}"), (layout.close, "\u{E8BB}")] {
        let x = rect.x + (rect.width - text_width(hdc, glyph)) / 2;
        text_out(hdc, x, (rect.height - scaled(10, scale)) / 2, glyph);
    }
    let _ = SelectObject(hdc, label_font);
    let _ = DeleteObject(glyph_font);

    let area = content_rect(hwnd);
    match &view.content {
        Content::Blank => {}
        Content::Image(surface) => paint_image(hdc, &area, surface),
        Content::Lines {
            lines,
            highlights,
            monospace,
        } => {
            let face = if *monospace { w!("Consolas") } else { w!("Segoe UI") };
            let font = create_font(scaled(15, scale), FW_NORMAL.0 as i32, face);
            let _ = SelectObject(hdc, font);
            paint_lines(hdc, &area, lines, highlights, scaled(18, scale));
            SetTextColor(hdc, colorref(fg));
            let _ = SelectObject(hdc, label_font);
            let _ = DeleteObject(font);
        }
        Content::Notice(message) => {
            let width = text_width(hdc, message);
            let x = area.left + ((area.right - area.left) - width).max(0) / 2;
            let y = area.top + (area.bottom - area.top) / 2 - scaled(8, scale);
            text_out(hdc, x, y, message);
        }
    }

    let _ = SelectObject(hdc, old_font);
    let _ = DeleteObject(title_font);
    let _ = DeleteObject(label_font);
}

unsafe fn paint_image(hdc: HDC, area: &RECT, img: &ImageSurface) {
    let (area_w, area_h) = (area.right - area.left, area.bottom - area.top);
    if img.width == 0 || img.height == 0 || area_w <= 0 || area_h <= 0 {
        return;
    }

    // Fit inside the content area, keeping the aspect ratio
    let scale = (f64::from(area_w) / f64::from(img.width)).min(f64::from(area_h) / f64::from(img.height));
    let draw_w = (f64::from(img.width) * scale).round() as i32;
    let draw_h = (f64::from(img.height) * scale).round() as i32;
    let x = area.left + (area_w - draw_w) / 2;
    let y = area.top + (area_h - draw_h) / 2;

    let bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: img.width as i32,
            biHeight: -(img.height as i32), // Negative for top-down
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            biSizeImage: 0,
            biXPelsPerMeter: 0,
            biYPelsPerMeter: 0,
            biClrUsed: 0,
            biClrImportant: 0,
        },
        bmiColors: [Default::default()],
    };

    SetStretchBltMode(hdc, HALFTONE);
    StretchDIBits(
        hdc,
        x,
        y,
        draw_w,
        draw_h,
        0,
        0,
        img.width as i32,
        img.height as i32,
        Some(img.pixels.as_ptr() as *const _),
        &bmi,
        DIB_RGB_COLORS,
        SRCCOPY,
    );
}

unsafe fn paint_lines(hdc: HDC, area: &RECT, lines: &[String], highlights: &[Vec<StyledSpan>], line_height: i32) {
    let clip = CreateRectRgn(area.left, area.top, area.right, area.bottom);
    SelectClipRgn(hdc, clip);

    let mut y = area.top;
    for (index, line) in lines.iter().enumerate() {
        if y >= area.bottom {
            break;
        }
        match highlights.get(index) {
            Some(spans) => {
                let mut x = area.left + 4;
                for span in spans {
                    SetTextColor(hdc, colorref(span.color));
                    text_out(hdc, x, y, &span.text);
                    x += text_width(hdc, &span.text);
                }
            }
            None => text_out(hdc, area.left + 4, y, line),
        }
        y += line_height;
    }

    SelectClipRgn(hdc, None);
    let _ = DeleteObject(clip);
}

unsafe fn show_open_with_menu(hwnd: HWND) {
    let view = snapshot();
    let Ok(menu) = CreatePopupMenu() else {
        return;
    };

    let default_label = to_wide(&view.open_with.label());
    let _ = AppendMenuW(menu, MF_STRING, MENU_OPEN_DEFAULT, PCWSTR(default_label.as_ptr()));
    if !view.open_with.apps.is_empty() {
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
    }
    for (index, app) in view.open_with.apps.iter().enumerate() {
        let name = to_wide(&app.name);
        let _ = AppendMenuW(menu, MF_STRING, MENU_FIRST_APP + index, PCWSTR(name.as_ptr()));
    }

    let mut pt = POINT::default();
    let _ = GetCursorPos(&mut pt);
    let chosen = TrackPopupMenu(menu, TPM_RETURNCMD | TPM_RIGHTBUTTON, pt.x, pt.y, 0, hwnd, None).0 as usize;
    let _ = DestroyMenu(menu);

    match chosen {
        0 => {}
        MENU_OPEN_DEFAULT => push_event(WindowEvent::OpenDefault),
        id => {
            let app = id.checked_sub(MENU_FIRST_APP).and_then(|index| view.open_with.apps.get(index));
            if let Some(AppDescriptor { id: app_id, .. }) = app {
                push_event(WindowEvent::OpenWith(app_id.clone()));
            }
        }
    }
}

unsafe extern "system" fn window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            paint(hwnd, hdc);
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        WM_NCHITTEST => {
            let hit = DefWindowProcW(hwnd, msg, wparam, lparam);
            if hit.0 != HTCLIENT as isize {
                return hit;
            }
            let (x, y) = client_point(lparam);
            let mut pt = POINT { x, y };
            let _ = ScreenToClient(hwnd, &mut pt);
            let layout = strip_layout(hwnd);
            if layout.in_strip(pt.y) && layout.hit(pt.x, pt.y).is_none() {
                LRESULT(HTCAPTION as isize)
            } else {
                hit
            }
        }
        // No system menu on the drawn caption
        WM_NCRBUTTONUP if wparam.0 == HTCAPTION as usize => LRESULT(0),
        // Alt+F4 would destroy the window; it is only ever hidden
        WM_SYSKEYDOWN if wparam.0 == usize::from(VK_F4.0) => LRESULT(0),
        WM_CLOSE => {
            push_event(WindowEvent::CloseRequested);
            LRESULT(0)
        }
        WM_KEYDOWN => {
            let key = wparam.0 as u16;
            if key == VK_ESCAPE.0 || key == VK_SPACE.0 {
                push_event(WindowEvent::CloseRequested);
            } else if key == VK_RETURN.0 {
                push_event(WindowEvent::OpenDefault);
            }
            LRESULT(0)
        }
        WM_LBUTTONUP => {
            let (x, y) = client_point(lparam);
            match strip_layout(hwnd).hit(x, y) {
                Some(StripButton::OpenDefault) => push_event(WindowEvent::OpenDefault),
                Some(StripButton::OpenWithMenu) => show_open_with_menu(hwnd),
                Some(StripButton::Close) => push_event(WindowEvent::CloseRequested),
                None => {}
            }
            LRESULT(0)
        }
        WM_RBUTTONUP => {
            show_open_with_menu(hwnd);
            LRESULT(0)
        }
        WM_SIZE => {
            let _ = InvalidateRect(hwnd, None, true);
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        WM_CTLCOLORSTATIC => {
            let (fg, bg) = snapshot().theme.colors();
            let hdc = HDC(wparam.0 as *mut _);
            SetTextColor(hdc, colorref(fg));
            SetBkColor(hdc, colorref(bg));
            SetDCBrushColor(hdc, colorref(bg));
            LRESULT(GetStockObject(DC_BRUSH).0 as isize)
        }
        WM_DESTROY => LRESULT(0),
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

pub struct Win32Window {
    hwnd: HWND,
    // Hosted container and its caption, kept for relayout. Owned by the
    // artifact, which destroys them.
    hosted: Option<(HWND, Option<HWND>)>,
}

impl Win32Window {
    pub fn create() -> Result<Self> {
        unsafe {
            let hinstance = GetModuleHandleW(None).map_err(|e| PreviewError::Platform(e.to_string()))?;

            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(window_proc),
                hInstance: hinstance.into(),
                hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                lpszClassName: PREVIEW_CLASS,
                ..Default::default()
            };
            RegisterClassExW(&wc);

            let hwnd = CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOOLWINDOW,
                PREVIEW_CLASS,
                w!("Rust Quick Look"),
                WS_POPUP,
                0,
                0,
                1,
                1,
                None,
                None,
                hinstance,
                None,
            )
            .map_err(|e| PreviewError::Platform(e.to_string()))?;

            // Set window transparency
            SetLayeredWindowAttributes(hwnd, COLORREF(0), 245, LWA_ALPHA).ok();

            Ok(Self { hwnd, hosted: None })
        }
    }

    fn attach_hosted(&mut self, surface: &mut HostedSurface) {
        let area = content_rect(self.hwnd);
        let caption = format!(
            "{}\n\n{}\n{}",
            surface.kind.describe(),
            surface.caption,
            surface.path.display()
        );

        unsafe {
            let Some(container) = create_static(self.hwnd, "", &area) else {
                warn!("failed to create hosted container");
                return;
            };
            let caption_hwnd = create_static(container, &caption, &self.caption_rect(&area));
            let child = caption_hwnd.map(|hwnd| {
                Box::new(ChildWindow {
                    hwnd,
                    label: format!("{} caption", surface.kind.describe()),
                }) as Box<dyn NativeResource>
            });

            surface.attach(
                Box::new(ChildWindow {
                    hwnd: container,
                    label: format!("{} container", surface.kind.describe()),
                }),
                child,
            );
            self.hosted = Some((container, caption_hwnd));
        }
    }

    fn caption_rect(&self, area: &RECT) -> RECT {
        let inset = scaled(16, dpi_scale(self.hwnd));
        RECT {
            left: inset,
            top: inset,
            right: ((area.right - area.left) - inset).max(inset),
            bottom: ((area.bottom - area.top) - inset).max(inset),
        }
    }

    fn layout_children(&self) {
        let Some((container, caption)) = self.hosted else {
            return;
        };
        let area = content_rect(self.hwnd);
        unsafe {
            let _ = MoveWindow(container, area.left, area.top, area.right - area.left, area.bottom - area.top, true);
            if let Some(caption) = caption {
                let inner = self.caption_rect(&area);
                let _ = MoveWindow(caption, inner.left, inner.top, inner.right - inner.left, inner.bottom - inner.top, true);
            }
        }
    }

    fn invalidate(&self) {
        unsafe {
            let _ = InvalidateRect(self.hwnd, None, true);
        }
    }
}

fn content_for(artifact: &Artifact) -> Content {
    match artifact {
        Artifact::Image(surface) => Content::Image(surface.clone()),
        Artifact::Text(text) => {
            let mut lines = text.lines.clone();
            if text.truncated {
                lines.push(String::new());
                lines.push("(preview truncated)".to_string());
            }
            Content::Lines {
                monospace: !matches!(text.kind, TextKind::Link),
                highlights: text.highlights.clone(),
                lines,
            }
        }
        Artifact::Listing(listing) if listing.entries.is_empty() => Content::Notice("This folder is empty".to_string()),
        Artifact::Listing(listing) => Content::Lines {
            lines: listing
                .entries
                .iter()
                .map(|entry| {
                    if entry.is_dir {
                        format!("[{}]", entry.name)
                    } else {
                        format!("{}    {}", entry.name, human_size(entry.len))
                    }
                })
                .collect(),
            highlights: Vec::new(),
            monospace: false,
        },
        Artifact::Hosted(_) => Content::Blank,
        Artifact::Error(message) | Artifact::Empty(message) => Content::Notice(message.clone()),
    }
}

impl PreviewWindow for Win32Window {
    fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    fn foreground_monitor(&self) -> MonitorInfo {
        monitor::foreground_monitor()
    }

    fn present(&mut self, artifact: Option<&mut Artifact>) {
        self.hosted = None;
        let content = match artifact {
            Some(Artifact::Hosted(surface)) => {
                self.attach_hosted(surface);
                Content::Blank
            }
            Some(other) => content_for(other),
            None => Content::Blank,
        };
        let theme = system_theme();
        update_view(|view| {
            view.content = content;
            view.theme = theme;
        });
        self.invalidate();
    }

    fn set_title(&mut self, title: &str) {
        let wide = to_wide(title);
        unsafe {
            let _ = SetWindowTextW(self.hwnd, PCWSTR(wide.as_ptr()));
        }
        let title = title.to_string();
        update_view(|view| view.title = title);
        self.invalidate();
    }

    fn set_open_with(&mut self, open_with: &OpenWith) {
        let open_with = open_with.clone();
        update_view(|view| view.open_with = open_with);
        self.invalidate();
    }

    fn place(&mut self, bounds: &WindowBounds, monitor: &MonitorInfo) {
        let (width, height) = bounds.physical_size(monitor);
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                None,
                bounds.x,
                bounds.y,
                width,
                height,
                SWP_NOACTIVATE | SWP_NOZORDER,
            );
        }
        self.layout_children();
    }

    fn show_topmost_pulse(&mut self) {
        unsafe {
            let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE;
            let _ = SetWindowPos(self.hwnd, HWND_TOPMOST, 0, 0, 0, 0, flags | SWP_SHOWWINDOW);
            let _ = ShowWindow(self.hwnd, SW_SHOWNOACTIVATE);
            let _ = SetWindowPos(self.hwnd, HWND_NOTOPMOST, 0, 0, 0, 0, flags);
        }
        self.invalidate();
    }

    fn hide(&mut self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    fn show_message(&mut self, title: &str, message: &str) {
        let title = to_wide(title);
        let message = to_wide(message);
        unsafe {
            MessageBoxW(
                self.hwnd,
                PCWSTR(message.as_ptr()),
                PCWSTR(title.as_ptr()),
                MB_OK | MB_ICONWARNING,
            );
        }
    }
}

impl Drop for Win32Window {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
