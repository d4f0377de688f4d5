use std::cell::RefCell;

use console_error_panic_hook::set_once;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::geo::GeoPoint;
use foundation::viewport::Viewport;
use overlay::picking::{PickOptions, pick_screen};
use overlay::selection::SingleSelection;
use overlay::store::MarkerStore;
use pages::endpoints::ApiBase;
use pages::records::{PageId, PageRecord};
use runtime::EventBus;
use search::{FetchCommand, FetchFailed, FetchResult, SearchSession, Step};

mod config;
mod dom;
mod fetch;
mod render;

use config::ViewerConfig;
use fetch::FetchError;

#[derive(Debug)]
pub struct ViewerState {
    config: ViewerConfig,
    api: ApiBase,
    viewport: Viewport,
    store: MarkerStore,
    selection: SingleSelection,
    session: SearchSession,
    hovered: Option<PageId>,
    bus: EventBus,
}

impl ViewerState {
    fn new(config: ViewerConfig) -> Self {
        let center = GeoPoint::new(config.start_center[0], config.start_center[1]);
        let viewport = Viewport::new(center, config.start_zoom, 1280.0, 720.0);
        let session = SearchSession::new(config.zoom_begin, config.thumb_width);
        let api = ApiBase::new(config.api_url.clone());
        Self {
            config,
            api,
            viewport,
            store: MarkerStore::new(),
            selection: SingleSelection::new(),
            session,
            hovered: None,
            bus: EventBus::new(),
        }
    }
}

thread_local! {
    static STATE: RefCell<Option<ViewerState>> = RefCell::new(None);
}

fn with_state<R>(f: impl FnOnce(&mut ViewerState) -> R) -> Option<R> {
    STATE.with(|state| state.borrow_mut().as_mut().map(f))
}

fn redraw() -> Result<(), JsValue> {
    with_state(|s| render::draw_markers(&s.viewport, &s.store, &s.selection, s.hovered))
        .unwrap_or(Ok(()))
}

fn refresh_search_button() {
    if let Some(gate) = with_state(|s| s.session.gate_state(s.viewport.zoom)) {
        let _ = dom::sync_search_button(gate);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Sets up the viewer from the host page's JSON config.
///
/// Fails when `api_url` is missing or empty.
#[wasm_bindgen]
pub fn init_viewer(config_json: &str) -> Result<(), JsValue> {
    let config =
        ViewerConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let state = ViewerState::new(config);
    let gate = state.session.gate_state(state.viewport.zoom);
    STATE.with(|slot| *slot.borrow_mut() = Some(state));
    dom::sync_search_button(gate)
}

/// Geolocation callback from the host page; recenters the start view.
#[wasm_bindgen]
pub fn set_user_location(lat_deg: f64, lon_deg: f64) -> Result<(), JsValue> {
    with_state(|s| s.viewport.set_center(GeoPoint::new(lat_deg, lon_deg)));
    redraw()
}

/// Viewport report from the host map glue (move/zoom/resize).
#[wasm_bindgen]
pub fn viewport_changed(
    lat_deg: f64,
    lon_deg: f64,
    zoom: f64,
    width_px: f64,
    height_px: f64,
) -> Result<(), JsValue> {
    let gate = with_state(|s| {
        s.viewport.set_center(GeoPoint::new(lat_deg, lon_deg));
        s.viewport.set_zoom(zoom);
        s.viewport.set_size(width_px, height_px);
        s.session.gate_state(s.viewport.zoom)
    });
    let Some(gate) = gate else {
        return Ok(());
    };
    dom::sync_search_button(gate)?;
    redraw()
}

/// Searches the visible area; wired to the search button.
#[wasm_bindgen]
pub fn search_this_area() -> Result<(), JsValue> {
    let begun = with_state(|s| {
        let bounds = s.viewport.bounds();
        match s.session.begin(bounds, s.viewport.zoom) {
            Ok(command) => {
                s.bus.emit("search", format!("begin bbox={}", bounds.bbox_param()));
                Some((command, s.session.gate_state(s.viewport.zoom)))
            }
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "search not started: {err}"
                )));
                None
            }
        }
    })
    .flatten();

    let Some((command, gate)) = begun else {
        return Ok(());
    };
    dom::sync_search_button(gate)?;
    spawn_local(run_search(command));
    Ok(())
}

async fn run_search(mut command: FetchCommand) {
    loop {
        let step = match command {
            FetchCommand::Pages { generation, bounds } => {
                let Some(api) = with_state(|s| s.api.clone()) else {
                    return;
                };
                let outcome = logged("pages", fetch::fetch_pages(&api, &bounds).await);
                with_state(|s| s.session.on_pages(generation, outcome))
            }
            FetchCommand::Views {
                generation,
                ref ids,
            } => {
                let Some(api) = with_state(|s| s.api.clone()) else {
                    return;
                };
                let outcome = logged("views", fetch::fetch_views(&api, ids).await);
                with_state(|s| s.session.on_views(generation, outcome))
            }
            FetchCommand::Thumbnails {
                generation,
                ref ids,
                width,
            } => {
                let Some(api) = with_state(|s| s.api.clone()) else {
                    return;
                };
                let outcome =
                    logged("thumbnails", fetch::fetch_thumbnails(&api, ids, width).await);
                with_state(|s| s.session.on_thumbnails(generation, outcome))
            }
        };

        match step {
            Some(Step::Continue(next)) => command = next,
            Some(Step::Commit(records)) => {
                commit(records);
                return;
            }
            Some(Step::Failed) | Some(Step::Stale) => {
                refresh_search_button();
                return;
            }
            None => return,
        }
    }
}

fn logged<T>(what: &str, outcome: Result<T, FetchError>) -> FetchResult<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(err) => {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "Failed to fetch {what}: {err}"
            )));
            Err(FetchFailed)
        }
    }
}

fn commit(records: Vec<PageRecord>) {
    let outcome = with_state(|s| {
        s.store.replace(records);
        let cleared = s.selection.revalidate(&s.store);
        if s.hovered.is_some_and(|id| !s.store.contains(id)) {
            s.hovered = None;
        }
        s.bus.emit("search", format!("commit markers={}", s.store.len()));
        (s.session.gate_state(s.viewport.zoom), cleared)
    });
    let Some((gate, cleared)) = outcome else {
        return;
    };
    let _ = dom::sync_search_button(gate);
    if cleared {
        let _ = dom::hide_panel();
    }
    let _ = redraw();
}

/// Map click from the host glue, in canvas pixels.
///
/// Returns a fly-to target (`{pageid, lat, lon}` JSON) when a marker was
/// selected, or `null` for a miss.
#[wasm_bindgen]
pub fn on_map_click(x_px: f64, y_px: f64) -> Result<JsValue, JsValue> {
    let selected = with_state(|s| {
        let hit = pick_screen(&s.store, &s.viewport, x_px, y_px, PickOptions::default())?;
        s.selection.select(&s.store, hit.id);
        let position = s.store.get(hit.id)?.position;
        s.bus.emit("select", format!("pageid={}", hit.id));
        Some((hit.id, position, s.config.article_url.clone()))
    })
    .flatten();

    let Some((id, position, article_url)) = selected else {
        return Ok(JsValue::NULL);
    };

    dom::show_panel(&article_url, id)?;
    redraw()?;

    let target = serde_json::json!({
        "pageid": id.0,
        "lat": position.lat_deg,
        "lon": position.lon_deg,
    });
    Ok(JsValue::from_str(&target.to_string()))
}

/// Pointer move over the map; drives the marker tooltip.
#[wasm_bindgen]
pub fn on_map_hover(x_px: f64, y_px: f64) -> Result<(), JsValue> {
    let changed = with_state(|s| {
        let hovered =
            pick_screen(&s.store, &s.viewport, x_px, y_px, PickOptions::default()).map(|h| h.id);
        if s.hovered == hovered {
            false
        } else {
            s.hovered = hovered;
            true
        }
    });
    if changed == Some(true) { redraw() } else { Ok(()) }
}

/// Document-level mousedown from the host page.
///
/// Clears the selection when the press lands outside the panel and does
/// not hit a marker.
#[wasm_bindgen]
pub fn on_document_mousedown(
    x_px: f64,
    y_px: f64,
    inside_panel: bool,
) -> Result<(), JsValue> {
    if inside_panel {
        return Ok(());
    }
    let dismissed = with_state(|s| {
        if s.selection.selected().is_none() {
            return false;
        }
        if pick_screen(&s.store, &s.viewport, x_px, y_px, PickOptions::default()).is_some() {
            return false;
        }
        let cleared = s.selection.clear();
        if cleared {
            s.bus.emit("panel", "dismissed by outside click");
        }
        cleared
    });
    if dismissed == Some(true) {
        dom::hide_panel()?;
        redraw()?;
    }
    Ok(())
}

/// Close button on the article panel.
#[wasm_bindgen]
pub fn close_panel() -> Result<(), JsValue> {
    with_state(|s| {
        if s.selection.clear() {
            s.bus.emit("panel", "closed");
        }
    });
    dom::hide_panel()?;
    redraw()
}

/// Number of markers currently on the map.
#[wasm_bindgen]
pub fn marker_count() -> u32 {
    with_state(|s| s.store.len() as u32).unwrap_or(0)
}

/// Drains the UI trace; handy in the browser console.
#[wasm_bindgen]
pub fn drain_trace() -> String {
    with_state(|s| {
        s.bus
            .drain()
            .into_iter()
            .map(|e| format!("{} {} {}", e.seq, e.kind, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    })
    .unwrap_or_default()
}

/// Search workflow counters as a JSON object.
#[wasm_bindgen]
pub fn search_counters() -> String {
    with_state(|s| {
        let mut map = serde_json::Map::new();
        for (name, value) in s.session.counters().snapshot() {
            map.insert(name.to_string(), serde_json::Value::from(value));
        }
        serde_json::Value::Object(map).to_string()
    })
    .unwrap_or_else(|| "{}".to_string())
}
