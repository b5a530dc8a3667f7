use std::time::{Duration, Instant};

use crate::config::{LayoutConfig, TimingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    start_x: u16,
    start_width: u16,
}

/// Sidebar width and compact mode.
///
/// Width changes follow the pointer while dragging and stay within
/// `[min, max]`. Compact mode only flips once resize events have been quiet
/// for the debounce period.
#[derive(Debug, Clone)]
pub struct Layout {
    sidebar_width: u16,
    min: u16,
    max: u16,
    compact_below: u16,
    compact: bool,
    drag: Option<Drag>,
    pending_resize: Option<(Instant, u16)>,
    debounce: Duration,
}

impl Layout {
    pub fn new(config: &LayoutConfig, timing: &TimingConfig, terminal_width: u16) -> Self {
        let min = config.sidebar_min.min(config.sidebar_max);
        let max = config.sidebar_max.max(min);
        Self {
            sidebar_width: config.sidebar_width.clamp(min, max),
            min,
            max,
            compact_below: config.compact_below,
            compact: terminal_width < config.compact_below,
            drag: None,
            pending_resize: None,
            debounce: timing.resize_debounce(),
        }
    }

    pub fn sidebar_width(&self) -> u16 {
        self.sidebar_width
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether column `x` is the sidebar's right edge
    pub fn on_sidebar_edge(&self, x: u16) -> bool {
        !self.compact && x + 1 >= self.sidebar_width && x <= self.sidebar_width
    }

    pub fn begin_drag(&mut self, x: u16) {
        self.drag = Some(Drag {
            start_x: x,
            start_width: self.sidebar_width,
        });
    }

    pub fn drag_to(&mut self, x: u16) {
        let Some(drag) = self.drag else {
            return;
        };
        let delta = i32::from(x) - i32::from(drag.start_x);
        let width = (i32::from(drag.start_width) + delta)
            .clamp(i32::from(self.min), i32::from(self.max));
        self.sidebar_width = width as u16;
    }

    /// Finish dragging. Returns the final width if a drag was in progress.
    pub fn end_drag(&mut self) -> Option<u16> {
        self.drag.take().map(|_| self.sidebar_width)
    }

    /// Record a terminal resize; compact mode is recomputed by [`Layout::settle`]
    pub fn on_resize(&mut self, terminal_width: u16, now: Instant) {
        self.pending_resize = Some((now + self.debounce, terminal_width));
    }

    /// Apply the last resize once the debounce deadline has passed.
    /// Returns true if compact mode changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.pending_resize {
            Some((deadline, width)) if now >= deadline => {
                self.pending_resize = None;
                let compact = width < self.compact_below;
                let changed = compact != self.compact;
                self.compact = compact;
                if compact {
                    self.drag = None;
                }
                changed
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(terminal_width: u16) -> Layout {
        Layout::new(&LayoutConfig::default(), &TimingConfig::default(), terminal_width)
    }

    #[test]
    fn test_drag_clamped_to_bounds() {
        let mut layout = layout(160);
        assert_eq!(layout.sidebar_width(), 32);

        layout.begin_drag(32);
        layout.drag_to(36);
        assert_eq!(layout.sidebar_width(), 36);
        layout.drag_to(80);
        assert_eq!(layout.sidebar_width(), 40);
        layout.drag_to(0);
        assert_eq!(layout.sidebar_width(), 22);
        assert_eq!(layout.end_drag(), Some(22));
        assert!(!layout.is_dragging());
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut layout = layout(160);
        layout.drag_to(10);
        assert_eq!(layout.sidebar_width(), 32);
        assert_eq!(layout.end_drag(), None);
    }

    #[test]
    fn test_compact_waits_for_resize_to_settle() {
        let start = Instant::now();
        let mut layout = layout(160);
        assert!(!layout.is_compact());

        layout.on_resize(90, start);
        assert!(!layout.settle(start + Duration::from_millis(100)));
        assert!(!layout.is_compact());

        // a later event pushes the deadline out
        layout.on_resize(95, start + Duration::from_millis(100));
        assert!(!layout.settle(start + Duration::from_millis(200)));
        assert!(layout.settle(start + Duration::from_millis(250)));
        assert!(layout.is_compact());

        layout.on_resize(120, start + Duration::from_millis(300));
        assert!(layout.settle(start + Duration::from_secs(1)));
        assert!(!layout.is_compact());
    }

    #[test]
    fn test_starts_compact_on_narrow_terminal() {
        let layout = layout(80);
        assert!(layout.is_compact());
        assert!(!layout.on_sidebar_edge(31));
    }

    #[test]
    fn test_sidebar_edge_hit() {
        let layout = layout(160);
        assert!(layout.on_sidebar_edge(31));
        assert!(layout.on_sidebar_edge(32));
        assert!(!layout.on_sidebar_edge(20));
    }
}
