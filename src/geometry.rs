pub const CHROME_WIDTH: f64 = 10.0;
// Extra height reserved for the title strip (40) and bottom border (5).
pub const CHROME_HEIGHT: f64 = 45.0;
pub const MIN_WINDOW_WIDTH: f64 = 400.0;
pub const MIN_WINDOW_HEIGHT: f64 = 300.0;
pub const FIT_RATIO: f64 = 0.8;
pub const BASE_DPI: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalSize {
    pub width: f64,
    pub height: f64,
}

impl NaturalSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    // Zero, negative and non-finite sides collapse to zero.
    pub fn sanitized(self) -> Self {
        let clamp = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: clamp(self.width),
            height: clamp(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorInfo {
    pub bounds: Rect,
    pub dpi_scale_x: f64,
    pub dpi_scale_y: f64,
}

impl MonitorInfo {
    pub fn new(bounds: Rect, dpi_x: u32, dpi_y: u32) -> Self {
        Self {
            bounds,
            dpi_scale_x: scale_from_dpi(dpi_x),
            dpi_scale_y: scale_from_dpi(dpi_y),
        }
    }

    pub fn with_scale(bounds: Rect, scale: f64) -> Self {
        Self {
            bounds,
            dpi_scale_x: scale,
            dpi_scale_y: scale,
        }
    }
}

fn scale_from_dpi(dpi: u32) -> f64 {
    if dpi == 0 {
        1.0
    } else {
        f64::from(dpi) / BASE_DPI
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub chrome_width: f64,
    pub chrome_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub fit_ratio: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            chrome_width: CHROME_WIDTH,
            chrome_height: CHROME_HEIGHT,
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
            fit_ratio: FIT_RATIO,
        }
    }
}

// Final placement. `width`/`height` are in the window's DIP space, `x`/`y`
// in physical monitor pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    pub fn physical_size(&self, monitor: &MonitorInfo) -> (i32, i32) {
        (
            (self.width * monitor.dpi_scale_x).round() as i32,
            (self.height * monitor.dpi_scale_y).round() as i32,
        )
    }
}

pub fn fit_scale(natural: NaturalSize, monitor: &MonitorInfo, layout: &Layout) -> f64 {
    let natural = natural.sanitized();
    let shorter_side = f64::from(monitor.bounds.width.min(monitor.bounds.height).max(0));
    let min_dimension = shorter_side * layout.fit_ratio;
    let longest = natural.width.max(natural.height);

    if longest <= 0.0 {
        return 1.0;
    }

    (min_dimension / longest).min(1.0)
}

pub fn compute_bounds(natural: NaturalSize, monitor: &MonitorInfo, layout: &Layout) -> WindowBounds {
    let scale = fit_scale(natural, monitor, layout);
    let natural = natural.sanitized();

    let width = ((natural.width * scale).round() + layout.chrome_width).max(layout.min_width);
    let height = ((natural.height * scale).round() + layout.chrome_height).max(layout.min_height);

    let area = monitor.bounds;
    let x = f64::from(area.x) + (f64::from(area.width) - width * monitor.dpi_scale_x) / 2.0;
    let y = f64::from(area.y) + (f64::from(area.height) - height * monitor.dpi_scale_y) / 2.0;

    WindowBounds {
        x: x.round() as i32,
        y: y.round() as i32,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hd(scale: f64) -> MonitorInfo {
        MonitorInfo::with_scale(Rect::new(0, 0, 1920, 1080), scale)
    }

    fn assert_centered(bounds: &WindowBounds, monitor: &MonitorInfo) {
        let (w, h) = (
            bounds.width * monitor.dpi_scale_x,
            bounds.height * monitor.dpi_scale_y,
        );
        let window_cx = f64::from(bounds.x) + w / 2.0;
        let window_cy = f64::from(bounds.y) + h / 2.0;
        let monitor_cx = f64::from(monitor.bounds.x) + f64::from(monitor.bounds.width) / 2.0;
        let monitor_cy = f64::from(monitor.bounds.y) + f64::from(monitor.bounds.height) / 2.0;
        assert!((window_cx - monitor_cx).abs() <= 1.0, "x off center: {bounds:?}");
        assert!((window_cy - monitor_cy).abs() <= 1.0, "y off center: {bounds:?}");
    }

    #[test]
    fn downscales_4k_content_onto_full_hd() {
        let monitor = full_hd(1.0);
        let layout = Layout::default();
        let natural = NaturalSize::new(3840.0, 2160.0);

        let scale = fit_scale(natural, &monitor, &layout);
        assert!((scale - 0.225).abs() < 1e-9);

        let bounds = compute_bounds(natural, &monitor, &layout);
        assert_eq!(bounds.width, 864.0 + CHROME_WIDTH);
        assert_eq!(bounds.height, 486.0 + CHROME_HEIGHT);
        assert_centered(&bounds, &monitor);
    }

    #[test]
    fn content_that_fits_keeps_its_size() {
        let monitor = full_hd(1.0);
        let bounds = compute_bounds(NaturalSize::new(800.0, 600.0), &monitor, &Layout::default());
        assert_eq!(bounds.width, 800.0 + CHROME_WIDTH);
        assert_eq!(bounds.height, 600.0 + CHROME_HEIGHT);
    }

    #[test]
    fn boundary_size_is_not_scaled() {
        let monitor = full_hd(1.0);
        let bounds = compute_bounds(NaturalSize::new(864.0, 500.0), &monitor, &Layout::default());
        assert_eq!(bounds.width, 864.0 + CHROME_WIDTH);
        assert_eq!(bounds.height, 500.0 + CHROME_HEIGHT);
    }

    #[test]
    fn downscale_preserves_aspect_ratio() {
        let monitor = MonitorInfo::with_scale(Rect::new(0, 0, 2560, 1440), 1.0);
        let layout = Layout::default();
        for (w, h) in [(5000.0, 1000.0), (1200.0, 4000.0), (3000.0, 2999.0)] {
            let bounds = compute_bounds(NaturalSize::new(w, h), &monitor, &layout);
            let content_w = bounds.width - layout.chrome_width;
            let content_h = bounds.height - layout.chrome_height;
            if content_w > layout.min_width - layout.chrome_width
                && content_h > layout.min_height - layout.chrome_height
            {
                let expected = w / h;
                let actual = content_w / content_h;
                assert!((expected - actual).abs() / expected < 0.01, "{w}x{h} -> {bounds:?}");
            }
            assert!(content_w.max(content_h) <= 1440.0 * FIT_RATIO + 0.5);
        }
    }

    #[test]
    fn degenerate_sizes_fall_back_to_the_floor() {
        let monitor = full_hd(1.0);
        let layout = Layout::default();
        for natural in [
            NaturalSize::new(0.0, 0.0),
            NaturalSize::new(-50.0, -10.0),
            NaturalSize::new(f64::NAN, 300.0),
            NaturalSize::new(f64::INFINITY, 10.0),
        ] {
            let bounds = compute_bounds(natural, &monitor, &layout);
            assert!(bounds.width >= MIN_WINDOW_WIDTH, "{natural:?}");
            assert!(bounds.height >= MIN_WINDOW_HEIGHT, "{natural:?}");
            assert!(bounds.width.is_finite() && bounds.height.is_finite());
        }
        let bounds = compute_bounds(NaturalSize::new(0.0, 0.0), &monitor, &layout);
        assert_eq!((bounds.width, bounds.height), (MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));
    }

    #[test]
    fn small_content_is_floored() {
        let bounds = compute_bounds(NaturalSize::new(32.0, 32.0), &full_hd(1.0), &Layout::default());
        assert_eq!(bounds.width, MIN_WINDOW_WIDTH);
        assert_eq!(bounds.height, MIN_WINDOW_HEIGHT);
    }

    #[test]
    fn centers_with_dpi_scaling_on_offset_monitor() {
        let monitor = MonitorInfo::new(Rect::from_edges(1920, -200, 4480, 1240), 144, 144);
        assert_eq!(monitor.dpi_scale_x, 1.5);

        let bounds = compute_bounds(NaturalSize::new(1000.0, 700.0), &monitor, &Layout::default());
        assert_centered(&bounds, &monitor);

        let (pw, ph) = bounds.physical_size(&monitor);
        assert_eq!(pw, ((1000.0 + CHROME_WIDTH) * 1.5_f64).round() as i32);
        assert_eq!(ph, ((700.0 + CHROME_HEIGHT) * 1.5_f64).round() as i32);
    }

    #[test]
    fn zero_dpi_reads_as_unscaled() {
        let monitor = MonitorInfo::new(Rect::new(0, 0, 1280, 1024), 0, 0);
        assert_eq!(monitor.dpi_scale_x, 1.0);
        assert_eq!(monitor.dpi_scale_y, 1.0);
    }
}
