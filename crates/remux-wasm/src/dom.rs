//! DOM-backed layout host and the layout functions exported to the page

use remux_core::{ContainerLayout, Layout, LayoutConfig, LayoutHost, Rect, ScrollDirection, ScrollInfo, WindowSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

fn element_by_id(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
}

/// Reads geometry straight from the live document
#[derive(Debug, Default, Clone, Copy)]
pub struct DomLayoutHost;

impl LayoutHost for DomLayoutHost {
    fn scroll_info(&self, id: &str) -> Option<ScrollInfo> {
        let el = element_by_id(id)?;
        let (offset_width, offset_height) = el
            .dyn_ref::<HtmlElement>()
            .map(|html| (f64::from(html.offset_width()), f64::from(html.offset_height())))
            .unwrap_or_default();

        Some(ScrollInfo {
            scroll_top: f64::from(el.scroll_top()),
            scroll_left: f64::from(el.scroll_left()),
            scroll_width: f64::from(el.scroll_width()),
            scroll_height: f64::from(el.scroll_height()),
            client_width: f64::from(el.client_width()),
            client_height: f64::from(el.client_height()),
            offset_width,
            offset_height,
        })
    }

    fn window_size(&self) -> WindowSize {
        let Some(window) = web_sys::window() else {
            return WindowSize::default();
        };
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };
        WindowSize::new(dimension(window.inner_width()), dimension(window.inner_height()))
    }

    fn container_layout(&self, id: &str) -> Option<ContainerLayout> {
        let container = element_by_id(id)?;
        let children = container.children();
        let children = (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| rect_of(&child))
            .collect();

        Some(ContainerLayout {
            bounds: rect_of(&container),
            children,
        })
    }

    fn scroll_child_into_view(&self, id: &str, index: usize) -> bool {
        let Some(child) = element_by_id(id).and_then(|el| el.children().item(index as u32)) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_inline(ScrollLogicalPosition::Start);
        options.set_block(ScrollLogicalPosition::Nearest);
        child.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }
}

fn layout() -> Layout<DomLayoutHost> {
    Layout::new(DomLayoutHost)
}

/// Scroll metrics of an element, or `null` when it does not exist
#[wasm_bindgen(js_name = getScrollInfo)]
pub fn get_scroll_info(id: &str) -> JsValue {
    match layout().scroll_info(id) {
        Some(info) => serde_wasm_bindgen::to_value(&info).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

/// `{ width, height }` of the window
#[wasm_bindgen(js_name = getWindowSize)]
pub fn get_window_size() -> JsValue {
    serde_wasm_bindgen::to_value(&layout().window_size()).unwrap_or(JsValue::NULL)
}

/// Index of the last child of `id` visible by more than the threshold.
///
/// `direction` is `"horizontal"` or anything else for vertical. Returns
/// `undefined` when the container is missing or nothing is visible.
#[wasm_bindgen(js_name = findLastPartiallyVisibleIndex)]
pub fn find_last_partially_visible_index(
    id: &str,
    direction: &str,
    threshold: Option<f64>,
) -> Option<u32> {
    let config = LayoutConfig {
        visibility_threshold: threshold.unwrap_or(remux_core::config::DEFAULT_VISIBILITY_THRESHOLD),
        ..Default::default()
    };
    Layout::with_config(DomLayoutHost, config)
        .find_last_partially_visible_index(id, ScrollDirection::from_flag(direction))
        .map(|index| index as u32)
}

/// Whether `id` is within `triggerOffset` of its scroll end, `undefined` if missing
#[wasm_bindgen(js_name = shouldLoadMore)]
pub fn should_load_more(id: &str, direction: &str, trigger_offset: Option<f64>) -> Option<bool> {
    let config = LayoutConfig {
        load_more_trigger_offset: trigger_offset
            .unwrap_or(remux_core::config::DEFAULT_LOAD_MORE_TRIGGER_OFFSET),
        ..Default::default()
    };
    Layout::with_config(DomLayoutHost, config).should_load_more(id, ScrollDirection::from_flag(direction))
}

/// Smooth-scroll child `index` of `id` into view
#[wasm_bindgen(js_name = scrollChildIntoView)]
pub fn scroll_child_into_view(id: &str, index: u32) -> bool {
    layout().scroll_child_into_view(id, index as usize)
}
