//! Panel layout rules.
//!
//! Every function here is pure: it takes the current panel list and returns
//! the next one. After any mutating call the heights of the visible panels
//! add up to 100 and hidden panels carry 0. Requests that would break a bound
//! (hiding the price panel, an out-of-range resize, removing an unknown id)
//! return the input unchanged instead of failing.

use super::entities::{Panel, PanelPixelHeight, indicator_panel_id};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{IndicatorKind, ProcessedChartData, ProcessedIndicator};
use crate::log_debug;

/// Initial share of the price panel
pub const MAIN_PANEL_HEIGHT_PERCENT: f64 = 70.0;
/// Smallest share a resize may leave on either panel
pub const MIN_PANEL_PERCENT: f64 = 10.0;
/// Largest share a resize may give to either panel
pub const MAX_PANEL_PERCENT: f64 = 80.0;
/// Share given to a panel that is added or shown again
pub const NEW_PANEL_HEIGHT_PERCENT: f64 = 20.0;

const NORMALIZE_EPSILON: f64 = 1e-9;
const BOUND_TOLERANCE: f64 = 1e-9;

fn component() -> LogComponent {
    LogComponent::Domain("Layout")
}

/// Main panel first with every overlay attached, then one panel per subplot
/// indicator sharing what the main panel leaves.
pub fn create_initial_panels(data: &ProcessedChartData) -> Vec<Panel> {
    let mut main = Panel::main(MAIN_PANEL_HEIGHT_PERCENT);
    for overlay in data.overlays() {
        main.attach_indicator(&overlay.id);
    }

    let mut panels = vec![main];
    let subplots: Vec<&ProcessedIndicator> = data.subplots().collect();
    if !subplots.is_empty() {
        let share = (100.0 - MAIN_PANEL_HEIGHT_PERCENT) / subplots.len() as f64;
        for indicator in subplots {
            let id = indicator_panel_id(&indicator.id);
            if panels.iter().any(|p| p.id == id) {
                continue;
            }
            let order = panels.len() as u32;
            panels.push(Panel::indicator(&indicator.id, &indicator.name, share, order));
        }
    }

    normalize_in_place(&mut panels);
    log_debug!(component(), "Created {} panels", panels.len());
    panels
}

/// Rescales visible heights to a total of 100 and zeroes hidden ones.
pub fn normalize_panel_heights(panels: &[Panel]) -> Vec<Panel> {
    let mut next = panels.to_vec();
    normalize_in_place(&mut next);
    next
}

fn normalize_in_place(panels: &mut [Panel]) {
    let mut visible_count = 0usize;
    let mut sum = 0.0;
    for panel in panels.iter_mut() {
        if panel.is_main() {
            panel.visible = true;
        }
        if panel.visible {
            // NaN and negative shares count as empty.
            panel.height_percent = panel.height_percent.max(0.0);
            sum += panel.height_percent;
            visible_count += 1;
        } else {
            panel.height_percent = 0.0;
        }
    }

    if visible_count == 0 {
        return;
    }

    if sum <= 0.0 || !sum.is_finite() {
        let share = 100.0 / visible_count as f64;
        for panel in panels.iter_mut().filter(|p| p.visible) {
            panel.height_percent = share;
        }
    } else if (sum - 100.0).abs() > NORMALIZE_EPSILON {
        let factor = 100.0 / sum;
        for panel in panels.iter_mut().filter(|p| p.visible) {
            panel.height_percent *= factor;
        }
    }
}

/// Moves `panel_id` to `new_height_percent`, taking the difference from the
/// adjacent panel (explicit, or the next visible one below).
pub fn resize_panel(
    panels: &[Panel],
    panel_id: &str,
    new_height_percent: f64,
    adjacent_panel_id: Option<&str>,
) -> Vec<Panel> {
    let unchanged = || panels.to_vec();

    if !new_height_percent.is_finite()
        || new_height_percent < MIN_PANEL_PERCENT - BOUND_TOLERANCE
        || new_height_percent > MAX_PANEL_PERCENT + BOUND_TOLERANCE
    {
        log_debug!(component(), "Resize of {} to {:.2}% rejected: out of bounds", panel_id, new_height_percent);
        return unchanged();
    }
    let new_height_percent = new_height_percent.clamp(MIN_PANEL_PERCENT, MAX_PANEL_PERCENT);

    let Some(target) = find_panel(panels, panel_id).filter(|p| p.visible) else {
        return unchanged();
    };
    let adjacent = match adjacent_panel_id {
        Some(id) => find_panel(panels, id).filter(|p| p.visible),
        None => next_visible_after(panels, panel_id),
    };
    let Some(adjacent) = adjacent else {
        log_debug!(component(), "Resize of {} rejected: no adjacent panel", panel_id);
        return unchanged();
    };
    if adjacent.id == target.id {
        return unchanged();
    }

    let delta = new_height_percent - target.height_percent;
    let adjacent_height = adjacent.height_percent - delta;
    if adjacent_height < MIN_PANEL_PERCENT - BOUND_TOLERANCE
        || adjacent_height > MAX_PANEL_PERCENT + BOUND_TOLERANCE
    {
        log_debug!(
            component(),
            "Resize of {} rejected: {} would become {:.2}%",
            panel_id,
            adjacent.id,
            adjacent_height
        );
        return unchanged();
    }

    let adjacent_id = adjacent.id.clone();
    let mut next = unchanged();
    for panel in next.iter_mut() {
        if panel.id == panel_id {
            panel.height_percent = new_height_percent;
        } else if panel.id == adjacent_id {
            panel.height_percent = adjacent_height;
        }
    }
    normalize_in_place(&mut next);
    next
}

/// Range of heights `panel_id` can take when trading with `adjacent_panel_id`,
/// so that both stay inside the resize bounds.
pub fn resizable_range(panels: &[Panel], panel_id: &str, adjacent_panel_id: &str) -> Option<(f64, f64)> {
    let target = find_panel(panels, panel_id).filter(|p| p.visible)?;
    let adjacent = find_panel(panels, adjacent_panel_id).filter(|p| p.visible)?;
    let pair_total = target.height_percent + adjacent.height_percent;
    let low = MIN_PANEL_PERCENT.max(pair_total - MAX_PANEL_PERCENT);
    let high = MAX_PANEL_PERCENT.min(pair_total - MIN_PANEL_PERCENT);
    (low <= high).then_some((low, high))
}

/// Hides or shows an indicator panel. The price panel is always shown.
pub fn toggle_panel_visibility(panels: &[Panel], panel_id: &str) -> Vec<Panel> {
    let mut next = panels.to_vec();
    let Some(panel) = next.iter_mut().find(|p| p.id == panel_id) else {
        return next;
    };
    if panel.is_main() {
        log_debug!(component(), "Ignoring request to hide the main panel");
        return next;
    }

    panel.visible = !panel.visible;
    if panel.visible {
        panel.height_percent = NEW_PANEL_HEIGHT_PERCENT;
    }
    normalize_in_place(&mut next);
    next
}

/// Overlays attach to the price panel; subplots get their own panel, or have
/// their existing one shown again.
pub fn add_indicator_panel(panels: &[Panel], indicator: &ProcessedIndicator) -> Vec<Panel> {
    let mut next = panels.to_vec();

    if indicator.kind == IndicatorKind::Overlay {
        if let Some(main) = next.iter_mut().find(|p| p.is_main()) {
            main.attach_indicator(&indicator.id);
        }
        return next;
    }

    let id = indicator_panel_id(&indicator.id);
    match next.iter_mut().find(|p| p.id == id) {
        Some(existing) if existing.visible => return next,
        Some(existing) => {
            existing.visible = true;
            existing.height_percent = NEW_PANEL_HEIGHT_PERCENT;
        }
        None => {
            let order = next.iter().map(|p| p.order).max().map_or(0, |o| o + 1);
            next.push(Panel::indicator(&indicator.id, &indicator.name, NEW_PANEL_HEIGHT_PERCENT, order));
        }
    }

    normalize_in_place(&mut next);
    next
}

/// Drops an indicator panel. The price panel cannot be removed.
pub fn remove_indicator_panel(panels: &[Panel], panel_id: &str) -> Vec<Panel> {
    match find_panel(panels, panel_id) {
        Some(panel) if !panel.is_main() => {
            let mut next: Vec<Panel> = panels.iter().filter(|p| p.id != panel_id).cloned().collect();
            normalize_in_place(&mut next);
            next
        }
        _ => panels.to_vec(),
    }
}

/// Removes an overlay indicator id from the price panel
pub fn detach_overlay_indicator(panels: &[Panel], indicator_id: &str) -> Vec<Panel> {
    let mut next = panels.to_vec();
    if let Some(main) = next.iter_mut().find(|p| p.is_main()) {
        main.indicator_ids.retain(|id| id != indicator_id);
    }
    next
}

/// Two-pass pixel allocation.
///
/// Pass 1 pins every visible panel whose ideal height falls below its minimum.
/// Pass 2 splits the remaining pixels between the other panels in proportion
/// to their shares, still flooring each at its own minimum. The result may
/// exceed `total_pixel_height` when the minimums do not fit.
pub fn calculate_panel_pixel_heights(panels: &[Panel], total_pixel_height: f64) -> Vec<PanelPixelHeight> {
    let visible = visible_panels(panels);
    let total = total_pixel_height.max(0.0);

    let mut pinned: Vec<Option<f64>> = Vec::with_capacity(visible.len());
    let mut pinned_sum = 0.0;
    for panel in &visible {
        let ideal = panel.height_percent / 100.0 * total;
        if ideal < panel.min_height {
            pinned.push(Some(panel.min_height));
            pinned_sum += panel.min_height;
        } else {
            pinned.push(None);
        }
    }

    let remaining = (total - pinned_sum).max(0.0);
    let flexible_count = pinned.iter().filter(|h| h.is_none()).count();
    let flexible_percent: f64 = visible
        .iter()
        .zip(&pinned)
        .filter(|(_, h)| h.is_none())
        .map(|(p, _)| p.height_percent)
        .sum();

    visible
        .iter()
        .zip(pinned)
        .map(|(panel, pinned)| {
            let height_px = pinned.unwrap_or_else(|| {
                let share = if flexible_percent > 0.0 {
                    panel.height_percent / flexible_percent
                } else {
                    1.0 / flexible_count as f64
                };
                (remaining * share).max(panel.min_height)
            });
            PanelPixelHeight { panel_id: panel.id.clone(), height_px }
        })
        .collect()
}

/// Visible panels, top to bottom
pub fn visible_panels(panels: &[Panel]) -> Vec<&Panel> {
    let mut visible: Vec<&Panel> = panels.iter().filter(|p| p.visible).collect();
    visible.sort_by_key(|p| p.order);
    visible
}

pub fn find_panel<'a>(panels: &'a [Panel], panel_id: &str) -> Option<&'a Panel> {
    panels.iter().find(|p| p.id == panel_id)
}

pub fn total_visible_percent(panels: &[Panel]) -> f64 {
    panels.iter().filter(|p| p.visible).map(|p| p.height_percent).sum()
}

/// Visible panel directly below `panel_id`
pub fn next_visible_after<'a>(panels: &'a [Panel], panel_id: &str) -> Option<&'a Panel> {
    let visible = visible_panels(panels);
    let idx = visible.iter().position(|p| p.id == panel_id)?;
    visible.get(idx + 1).copied()
}
