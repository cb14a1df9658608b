/// Anything with a width that can be set as a percentage.
pub trait ProgressBar {
    fn set_percent(&mut self, percent: f64);
}

/// A snapshot of how far down the page the reader is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Height of the whole document.
    pub scroll_height: f64,
    /// Height of the visible part of it.
    pub client_height: f64,
    /// How far the top of the viewport is from the top of the document.
    pub offset: f64,
}

/// How much of the page has been scrolled through, from 0 to 100.
///
/// A page too short to scroll reads as 0%, and overscroll is clamped.
pub fn scroll_percentage(metrics: &ScrollMetrics) -> f64 {
    let total = metrics.scroll_height - metrics.client_height;
    if !(total > 0.0) || !metrics.offset.is_finite() {
        return 0.0;
    }

    (metrics.offset / total * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Default)]
pub struct ScrollIndicator {
    percent: f64,
}

impl ScrollIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<B: ProgressBar>(&mut self, metrics: &ScrollMetrics, bar: &mut B) -> f64 {
        self.percent = scroll_percentage(metrics);
        bar.set_percent(self.percent);
        self.percent
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }
}
