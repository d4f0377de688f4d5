//! DOM synchronization for the search button and the article panel.
//!
//! The host page supplies the elements; this module only toggles their
//! classes, labels, and the iframe source.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlIFrameElement};

use pages::records::PageId;
use search::GateState;

pub const SEARCH_BUTTON_ID: &str = "search-button";
pub const PANEL_ID: &str = "wikipage-frame";
pub const PANEL_IFRAME_ID: &str = "wikipage-iframe";
pub const CANVAS_ID: &str = "marker-canvas";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn element(id: &str) -> Result<Element, JsValue> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

/// Mirrors the gate state onto the search button: label, disabled flag,
/// and the `available`/`unavailable` class pair.
pub fn sync_search_button(state: GateState) -> Result<(), JsValue> {
    let button: HtmlButtonElement = element(SEARCH_BUTTON_ID)?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#search-button is not a <button>"))?;

    button.set_text_content(Some(state.label()));
    button.set_disabled(!state.is_enabled());

    let classes = button.class_list();
    if state.is_enabled() {
        classes.add_1("available")?;
        classes.remove_1("unavailable")?;
    } else {
        classes.add_1("unavailable")?;
        classes.remove_1("available")?;
    }
    Ok(())
}

/// Points the panel iframe at the selected article and shows the panel.
pub fn show_panel(article_url: &str, id: PageId) -> Result<(), JsValue> {
    let iframe: HtmlIFrameElement = element(PANEL_IFRAME_ID)?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#wikipage-iframe is not an <iframe>"))?;
    iframe.set_src(&format!("{article_url}/?curid={id}"));

    let panel = element(PANEL_ID)?;
    panel.class_list().add_1("visible")?;
    panel.class_list().remove_1("hidden")?;
    Ok(())
}

pub fn hide_panel() -> Result<(), JsValue> {
    let panel = element(PANEL_ID)?;
    panel.class_list().add_1("hidden")?;
    panel.class_list().remove_1("visible")?;

    // Stop the embedded page while the panel is hidden.
    let iframe: HtmlIFrameElement = element(PANEL_IFRAME_ID)?
        .dyn_into()
        .map_err(|_| JsValue::from_str("#wikipage-iframe is not an <iframe>"))?;
    iframe.set_src("about:blank");
    Ok(())
}
