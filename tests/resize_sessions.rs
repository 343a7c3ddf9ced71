use multi_panel_chart::application::interaction::{ChartResizeSession, PanelResizeSession};
use multi_panel_chart::domain::chart::Panel;
use multi_panel_chart::domain::chart::layout::{find_panel, toggle_panel_visibility};

fn panels() -> Vec<Panel> {
    vec![
        Panel::main(70.0),
        Panel::indicator("rsi", "RSI", 15.0, 1),
        Panel::indicator("macd", "MACD", 15.0, 2),
    ]
}

fn height(panels: &[Panel], id: &str) -> f64 {
    find_panel(panels, id).unwrap().height_percent
}

#[test]
fn session_needs_two_visible_panels() {
    let panels = panels();
    assert!(PanelResizeSession::begin(&panels, "main", "indicator-rsi", 0.0, 600.0).is_some());
    assert!(PanelResizeSession::begin(&panels, "main", "main", 0.0, 600.0).is_none());
    assert!(PanelResizeSession::begin(&panels, "main", "indicator-atr", 0.0, 600.0).is_none());
    assert!(PanelResizeSession::begin(&panels, "main", "indicator-rsi", 0.0, 0.0).is_none());

    let hidden = toggle_panel_visibility(&panels, "indicator-rsi");
    assert!(PanelResizeSession::begin(&hidden, "main", "indicator-rsi", 0.0, 600.0).is_none());
}

#[test]
fn pointer_travel_is_a_share_of_the_container() {
    let session = PanelResizeSession::begin(&panels(), "main", "indicator-rsi", 100.0, 400.0).unwrap();
    assert!((session.percent_delta(140.0) - 10.0).abs() < 1e-9);
    assert_eq!(session.upper_panel_id(), "main");
    assert_eq!(session.lower_panel_id(), "indicator-rsi");
}

#[test]
fn moves_are_measured_from_the_press() {
    let start = panels();
    let session = PanelResizeSession::begin(&start, "indicator-rsi", "indicator-macd", 500.0, 500.0).unwrap();

    let step1 = session.apply(&start, 510.0);
    let step2 = session.apply(&step1, 520.0);

    // 20 px of 500 is 4%, from the 15% at press time
    assert!((height(&step2, "indicator-rsi") - 19.0).abs() < 1e-6);
    assert!((height(&step2, "indicator-macd") - 11.0).abs() < 1e-6);
    assert!((height(&step2, "main") - 70.0).abs() < 1e-6);
}

#[test]
fn fast_drags_stop_at_the_bound() {
    let start = panels();
    let session = PanelResizeSession::begin(&start, "indicator-rsi", "indicator-macd", 0.0, 600.0).unwrap();

    let down = session.apply(&start, 10_000.0);
    assert!((height(&down, "indicator-rsi") - 20.0).abs() < 1e-6);
    assert!((height(&down, "indicator-macd") - 10.0).abs() < 1e-6);

    let up = session.apply(&start, -10_000.0);
    assert!((height(&up, "indicator-rsi") - 10.0).abs() < 1e-6);
    assert!((height(&up, "indicator-macd") - 20.0).abs() < 1e-6);
}

#[test]
fn non_finite_pointer_is_ignored() {
    let start = panels();
    let session = PanelResizeSession::begin(&start, "main", "indicator-rsi", 0.0, 600.0).unwrap();
    assert_eq!(session.apply(&start, f64::NAN), start);
}

#[test]
fn chart_height_never_drops_below_the_minimum() {
    let session = ChartResizeSession::begin(600.0, 800.0);
    assert_eq!(session.height_at(900.0), 700.0);
    assert_eq!(session.height_at(500.0), 320.0);
    assert_eq!(session.height_at(f64::INFINITY), 600.0);
}
