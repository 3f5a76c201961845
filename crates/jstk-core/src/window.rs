//! Windowed list controller.
//!
//! The table renders a fixed-size slice of the filtered records. Scrolling
//! close to either edge of the scroll container slides the slice by a fixed
//! step. `start` is kept inside `[0, max(0, len - size)]`.

use std::ops::Range;

use crate::config::PanelConfig;

/// Geometry of the scroll container at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self { scroll_top, scroll_height, client_height }
    }

    /// Distance between the viewport's bottom edge and the content bottom.
    #[inline]
    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    pub size: usize,
    pub step: usize,
    pub bottom_threshold: f64,
    pub top_threshold: f64,
}

impl From<&PanelConfig> for WindowConfig {
    fn from(config: &PanelConfig) -> Self {
        Self {
            size: config.window_size,
            step: config.scroll_step,
            bottom_threshold: config.bottom_threshold,
            top_threshold: config.top_threshold,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::from(&PanelConfig::default())
    }
}

impl WindowConfig {
    /// Largest valid start index for a list of `len` rows.
    #[inline]
    pub fn max_start(&self, len: usize) -> usize {
        len.saturating_sub(self.size)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    pub start: usize,
}

impl WindowState {
    pub fn clamped(self, len: usize, config: &WindowConfig) -> Self {
        Self { start: self.start.min(config.max_start(len)) }
    }

    /// Half-open index range into the filtered sequence.
    pub fn range(&self, len: usize, config: &WindowConfig) -> Range<usize> {
        let start = self.start.min(config.max_start(len));
        let end = start.saturating_add(config.size).min(len);
        start..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Scrolled(ScrollMetrics),
    /// The filtered set changed composition
    Reset,
    /// The filtered set changed length without a filter change
    Clamp,
}

/// Apply one event against a filtered list of `len` rows.
pub fn reduce(state: WindowState, event: WindowEvent, len: usize, config: &WindowConfig) -> WindowState {
    match event {
        WindowEvent::Reset => WindowState::default(),
        WindowEvent::Clamp => state.clamped(len, config),
        WindowEvent::Scrolled(metrics) => {
            if metrics.distance_to_bottom() < config.bottom_threshold {
                WindowState {
                    start: state.start.saturating_add(config.step).min(config.max_start(len)),
                }
            } else if metrics.scroll_top < config.top_threshold && state.start > 0 {
                WindowState {
                    start: state.start.saturating_sub(config.step),
                }
                .clamped(len, config)
            } else {
                state
            }
        }
    }
}
