//! DOM glue: pointer transform read-back and writes, measurement, CSS variables.

use bartab_roulette::config::{POINTER_OFFSET_X_PX, POINTER_OFFSET_Y_PX};
use bartab_roulette::layout::{DeviceType, PaletteConfig};
use bartab_roulette::{rotation_from_transform, PointerRect};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

/// High-resolution timestamp in milliseconds.
pub fn now_ms() -> f64 {
    gloo_utils::window()
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Device class for the current viewport width.
pub fn current_device() -> DeviceType {
    let width = gloo_utils::window()
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    DeviceType::from_viewport_width(width)
}

/// CSS transform placing the pointer's rotation axis over the wheel center.
pub fn pointer_transform(rotation: f64) -> String {
    format!(
        "translate({}px, {}px) rotate({}deg)",
        POINTER_OFFSET_X_PX, POINTER_OFFSET_Y_PX, rotation
    )
}

pub fn apply_rotation(pointer: &HtmlElement, rotation: f64) {
    if let Err(e) = pointer
        .style()
        .set_property("transform", &pointer_transform(rotation))
    {
        warn!("Failed to set pointer transform: {:?}", e);
    }
}

/// Current pointer rotation, read back from its computed transform.
pub fn read_rotation(pointer: &Element) -> f64 {
    match gloo_utils::window().get_computed_style(pointer) {
        Ok(Some(style)) => style
            .get_property_value("transform")
            .map(|t| rotation_from_transform(&t))
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Bounding box of the pointer as currently laid out.
pub fn measure_pointer(pointer: &Element) -> PointerRect {
    let rect = pointer.get_bounding_client_rect();
    PointerRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// Write palette values as custom properties on the document root.
pub fn set_css_variables(config: &PaletteConfig) {
    let Ok(root) = gloo_utils::document_element().dyn_into::<HtmlElement>() else {
        warn!("Document root is not an HTML element");
        return;
    };
    let style = root.style();
    for (name, value) in config.css_variables() {
        if let Err(e) = style.set_property(name, &value) {
            warn!("Failed to set {}: {:?}", name, e);
        }
    }
    debug!("Palette CSS variables updated: {:?}", config);
}
