use crate::domain::chart::TimeRange;
use crate::domain::market_data::Timestamp;

/// Control interface of one panel's rendering surface.
///
/// The synchronization controller is the only caller. Everything else a
/// surface does (series, drawing tools, scales) stays internal to it.
pub trait ChartSurface {
    /// Moves the crosshair to `time`, or hides it with `None`
    fn sync_crosshair(&self, time: Option<Timestamp>);

    /// Shows exactly `range` on the time axis
    fn sync_visible_range(&self, range: TimeRange);
}
