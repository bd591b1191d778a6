use crate::geometry::Rect;

// Sizes in DIP
pub const STRIP_HEIGHT: i32 = 40;
const CLOSE_WIDTH: i32 = 40;
const MENU_WIDTH: i32 = 24;
const LABEL_PADDING: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripButton {
    OpenDefault,
    OpenWithMenu,
    Close,
}

// Clickable parts of the title strip, in client pixels. From the right:
// close glyph, open-with chevron, open-with label. The rest of the strip
// drags the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub height: i32,
    pub open: Rect,
    pub menu: Rect,
    pub close: Rect,
    pub label_padding: i32,
}

fn scaled(value: i32, scale: f64) -> i32 {
    (f64::from(value) * scale).round() as i32
}

impl StripLayout {
    pub fn new(client_width: i32, label_width: i32, scale: f64) -> Self {
        let height = scaled(STRIP_HEIGHT, scale);
        let padding = scaled(LABEL_PADDING, scale);

        let close_width = scaled(CLOSE_WIDTH, scale);
        let close_x = (client_width - close_width).max(0);
        let menu_width = scaled(MENU_WIDTH, scale);
        let menu_x = (close_x - menu_width).max(0);
        let open_width = label_width.max(0) + 2 * padding;
        let open_x = (menu_x - open_width).max(0);

        Self {
            height,
            open: Rect::new(open_x, 0, menu_x - open_x, height),
            menu: Rect::new(menu_x, 0, close_x - menu_x, height),
            close: Rect::new(close_x, 0, client_width.max(close_x) - close_x, height),
            label_padding: padding,
        }
    }

    pub fn in_strip(&self, y: i32) -> bool {
        (0..self.height).contains(&y)
    }

    pub fn hit(&self, x: i32, y: i32) -> Option<StripButton> {
        if self.close.contains(x, y) {
            Some(StripButton::Close)
        } else if self.menu.contains(x, y) {
            Some(StripButton::OpenWithMenu)
        } else if self.open.contains(x, y) {
            Some(StripButton::OpenDefault)
        } else {
            None
        }
    }
}
