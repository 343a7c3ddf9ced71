use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::MouseEvent;

use crate::application::sync_controller::{ChartStatus, SyncController};
use crate::domain::chart::layout::{next_visible_after, visible_panels};
use crate::domain::chart::{Panel, PanelPixelHeight, ThemePalette};
use crate::domain::events::ChartEvent;
use crate::domain::logging::LogComponent;
use crate::event_utils::DragListeners;
use crate::log_debug;

type SharedController = Rc<RefCell<SyncController>>;

/// Everything the panel stack needs for one render
#[derive(Clone, PartialEq)]
struct LayoutSnapshot {
    panels: Vec<Panel>,
    heights: Vec<PanelPixelHeight>,
    chart_height: f64,
    palette: ThemePalette,
    status: ChartStatus,
}

impl LayoutSnapshot {
    fn height_of(&self, panel_id: &str) -> f64 {
        self.heights
            .iter()
            .find(|h| h.panel_id == panel_id)
            .map_or(0.0, |h| h.height_px)
    }
}

fn snapshot(controller: &SharedController) -> Option<LayoutSnapshot> {
    let controller = controller.try_borrow().ok()?;
    Some(LayoutSnapshot {
        panels: controller.panels().to_vec(),
        heights: controller.panel_pixel_heights(),
        chart_height: controller.chart_height(),
        palette: controller.config().theme.palette(),
        status: controller.status().clone(),
    })
}

fn with_controller_mut(controller: StoredValue<SharedController>, f: impl FnOnce(&mut SyncController)) {
    controller.with_value(|shared| match shared.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => {
            log_debug!(LogComponent::Presentation("MultiPanelChart"), "Controller busy, input dropped");
        }
    });
}

/// Routes window moves to the controller until the button is released
fn start_drag(controller: StoredValue<SharedController>, drag: StoredValue<Option<DragListeners>>) {
    let listeners = DragListeners::attach(
        move |event: MouseEvent| {
            with_controller_mut(controller, |c| {
                c.pointer_move(f64::from(event.client_y()));
            });
        },
        move |_event: MouseEvent| {
            with_controller_mut(controller, SyncController::pointer_up);
            // Detach outside the listener that is currently running.
            spawn_local(async move {
                drag.update_value(|listeners| {
                    if let Some(listeners) = listeners.take() {
                        listeners.detach();
                    }
                });
            });
        },
    );
    drag.update_value(|current| {
        if let Some(previous) = current.replace(listeners) {
            previous.detach();
        }
    });
}

/// Stacked panel containers with resizers between them and a drag handle at
/// the bottom. Each container (`#chart-panel-<id>`) is where the dashboard
/// mounts that panel's rendering surface.
#[component]
pub fn MultiPanelChart(controller: SharedController) -> impl IntoView {
    let revision = create_rw_signal(0u64);
    if let Ok(mut c) = controller.try_borrow_mut() {
        c.subscribe(move |event| {
            if matches!(event, ChartEvent::CrosshairMoved { .. } | ChartEvent::VisibleRangeChanged { .. }) {
                return;
            }
            // Events fire while the controller is borrowed; re-render after it is released.
            spawn_local(async move {
                revision.update(|r| *r += 1);
            });
        });
    }

    let controller = store_value(controller);
    let drag = store_value::<Option<DragListeners>>(None);
    on_cleanup(move || {
        drag.update_value(|listeners| {
            if let Some(listeners) = listeners.take() {
                listeners.detach();
            }
        });
    });

    let layout = create_memo(move |_| {
        revision.get();
        controller.with_value(snapshot)
    });

    let visible = create_memo(move |_| {
        layout
            .get()
            .map(|l| visible_panels(&l.panels).into_iter().cloned().collect::<Vec<Panel>>())
            .unwrap_or_default()
    });
    let palette = create_memo(move |_| layout.get().map(|l| l.palette));

    // Keyed by panel id so a container keeps its DOM node (and the surface
    // mounted in it) across toggles and resize drags.
    let panel_row = move |panel: Panel| {
        let id = panel.id.clone();
        let height_px = create_memo({
            let id = id.clone();
            move |_| layout.get().map_or(0.0, |l| l.height_of(&id))
        });
        let lower = create_memo({
            let id = id.clone();
            move |_| layout.get().and_then(|l| next_visible_after(&l.panels, &id).map(|p| p.id.clone()))
        });
        let resizer = move || {
            let lower = lower.get()?;
            let upper = id.clone();
            let color = palette.get().map_or(String::new(), |p| p.resizer.to_css());
            Some(view! {
                <PanelResizer
                    color=color
                    on_press=move |y| {
                        let mut started = false;
                        with_controller_mut(controller, |c| {
                            started = c.begin_panel_resize(&upper, &lower, y);
                        });
                        if started {
                            start_drag(controller, drag);
                        }
                    }
                />
            })
        };
        view! {
            <PanelContainer panel=panel height_px=height_px palette=palette controller=controller />
            {resizer}
        }
    };

    let hidden_panels = move || {
        let Some(layout) = layout.get() else {
            return ().into_view();
        };
        layout
            .panels
            .iter()
            .filter(|p| !p.visible)
            .map(|panel| {
                let panel_id = panel.id.clone();
                view! {
                    <button
                        class="chart-panel-restore"
                        on:click=move |_| with_controller_mut(controller, |c| {
                            c.toggle_panel(&panel_id);
                        })
                    >
                        {format!("Show {}", panel.title)}
                    </button>
                }
            })
            .collect_view()
    };

    let status_line = move || {
        let text = match layout.get().map(|l| l.status) {
            Some(ChartStatus::Loading) => "Loading…".to_string(),
            Some(ChartStatus::Empty) => "No data for the selected range".to_string(),
            Some(ChartStatus::Error(message)) => message,
            _ => return None,
        };
        Some(view! { <div class="chart-status">{text}</div> })
    };

    let container_style = move || {
        layout.get().map_or(String::new(), |l| {
            format!(
                "height: {}px; background: {}; color: {};",
                l.chart_height,
                l.palette.background.to_css(),
                l.palette.text.to_css()
            )
        })
    };

    let handle_style = move || {
        let color = layout.get().map_or(String::new(), |l| l.palette.resizer_active.with_alpha(0.6).to_css());
        format!("height: 6px; cursor: ns-resize; background: {color};")
    };

    let on_handle_press = move |event: MouseEvent| {
        event.prevent_default();
        with_controller_mut(controller, |c| c.begin_chart_resize(f64::from(event.client_y())));
        start_drag(controller, drag);
    };

    view! {
        <div class="multi-panel-chart">
            {status_line}
            <div class="chart-panels" style=container_style>
                <For each=move || visible.get() key=|panel: &Panel| panel.id.clone() children=panel_row />
            </div>
            <div class="chart-hidden-panels">{hidden_panels}</div>
            <div class="chart-resize-handle" style=handle_style on:mousedown=on_handle_press />
        </div>
    }
}

#[component]
fn PanelContainer(
    panel: Panel,
    #[prop(into)] height_px: Signal<f64>,
    #[prop(into)] palette: Signal<Option<ThemePalette>>,
    controller: StoredValue<SharedController>,
) -> impl IntoView {
    let min_height = panel.min_height;
    let style = move || {
        let height = height_px.get();
        let border = palette.get().map_or(String::new(), |p| p.panel_border.to_css());
        format!(
            "height: {}px; min-height: {}px; border-bottom: 1px solid {};",
            height,
            min_height.min(height),
            border
        )
    };
    let controls = (!panel.is_main()).then(|| {
        let hide_id = panel.id.clone();
        let remove_id = panel.id.clone();
        view! {
            <button class="chart-panel-hide" on:click=move |_| with_controller_mut(controller, |c| {
                c.toggle_panel(&hide_id);
            })>
                "Hide"
            </button>
            <button class="chart-panel-remove" on:click=move |_| with_controller_mut(controller, |c| {
                c.remove_indicator(&remove_id);
            })>
                "×"
            </button>
        }
    });

    view! {
        <div class="chart-panel" id=format!("chart-panel-{}", panel.id) style=style>
            <div class="chart-panel-header">
                <span class="chart-panel-title">{panel.title.clone()}</span>
                {controls}
            </div>
        </div>
    }
}

#[component]
fn PanelResizer<F>(color: String, on_press: F) -> impl IntoView
where
    F: Fn(f64) + 'static,
{
    view! {
        <div
            class="chart-panel-resizer"
            style=format!("height: 4px; cursor: row-resize; background: {color};")
            on:mousedown=move |event: MouseEvent| {
                event.prevent_default();
                on_press(f64::from(event.client_y()));
            }
        />
    }
}
