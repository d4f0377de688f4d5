//! Canvas rendering of markers, clusters, and the hover tooltip.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use foundation::viewport::Viewport;
use overlay::cluster::{Cluster, DEFAULT_CELL_PX, cluster_markers};
use overlay::selection::SingleSelection;
use overlay::store::MarkerStore;
use pages::records::{PageId, PageRecord};

use crate::dom;

const MARKER_RADIUS_PX: f64 = 5.0;
const CLUSTER_RADIUS_PX: f64 = 12.0;
const MARKER_COLOR: &str = "blue";
const SELECTED_COLOR: &str = "red";
const CLUSTER_COLOR: &str = "#3388ff";

fn canvas() -> Result<HtmlCanvasElement, JsValue> {
    dom::element(dom::CANVAS_ID)?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#marker-canvas is not a <canvas>"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("unexpected canvas context type"))
}

/// Redraws the whole overlay for the current viewport.
pub fn draw_markers(
    viewport: &Viewport,
    store: &MarkerStore,
    selection: &SingleSelection,
    hovered: Option<PageId>,
) -> Result<(), JsValue> {
    let canvas = canvas()?;
    let width = viewport.width_px.max(0.0) as u32;
    let height = viewport.height_px.max(0.0) as u32;
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }

    let ctx = context_2d(&canvas)?;
    ctx.clear_rect(0.0, 0.0, viewport.width_px, viewport.height_px);

    for cluster in cluster_markers(store, viewport, DEFAULT_CELL_PX) {
        if let [only] = cluster.members.as_slice() {
            let Some(record) = store.get(*only) else {
                continue;
            };
            draw_marker(&ctx, viewport, record, selection.is_selected(record.id))?;
        } else {
            draw_cluster(&ctx, viewport, &cluster)?;
        }
    }

    if let Some(id) = hovered
        && let Some(record) = store.get(id)
    {
        draw_tooltip(&ctx, viewport, record)?;
    }

    Ok(())
}

fn draw_marker(
    ctx: &CanvasRenderingContext2d,
    viewport: &Viewport,
    record: &PageRecord,
    selected: bool,
) -> Result<(), JsValue> {
    let px = viewport.geo_to_screen(record.position);
    let color = if selected { SELECTED_COLOR } else { MARKER_COLOR };

    ctx.begin_path();
    ctx.arc(px[0], px[1], MARKER_RADIUS_PX, 0.0, std::f64::consts::TAU)?;
    ctx.set_global_alpha(0.2);
    ctx.set_fill_style_str(color);
    ctx.fill();
    ctx.set_global_alpha(1.0);
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(2.0);
    ctx.stroke();
    Ok(())
}

fn draw_cluster(
    ctx: &CanvasRenderingContext2d,
    viewport: &Viewport,
    cluster: &Cluster,
) -> Result<(), JsValue> {
    let px = viewport.geo_to_screen(cluster.center);

    ctx.begin_path();
    ctx.arc(px[0], px[1], CLUSTER_RADIUS_PX, 0.0, std::f64::consts::TAU)?;
    ctx.set_global_alpha(0.7);
    ctx.set_fill_style_str(CLUSTER_COLOR);
    ctx.fill();
    ctx.set_global_alpha(1.0);

    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&cluster.members.len().to_string(), px[0], px[1])?;
    Ok(())
}

fn draw_tooltip(
    ctx: &CanvasRenderingContext2d,
    viewport: &Viewport,
    record: &PageRecord,
) -> Result<(), JsValue> {
    let px = viewport.geo_to_screen(record.position);
    let views_line = format!("{} views in the last month", record.views);

    ctx.set_font("12px sans-serif");
    let title_width = ctx.measure_text(&record.title)?.width();
    let views_width = ctx.measure_text(&views_line)?.width();
    let width = title_width.max(views_width) + 12.0;
    let height = 34.0;
    let left = px[0] - width / 2.0;
    let top = px[1] - MARKER_RADIUS_PX - height - 6.0;

    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(left, top, width, height);
    ctx.set_stroke_style_str("#666666");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(left, top, width, height);

    ctx.set_fill_style_str("#000000");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&record.title, px[0], top + 10.0)?;
    ctx.fill_text(&views_line, px[0], top + 24.0)?;
    Ok(())
}
