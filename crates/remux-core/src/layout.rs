//! Layout queries for scroll-synced lists and carousels
//!
//! Every query reads the host's live geometry; nothing is cached.

use crate::{
    config::LayoutConfig,
    types::{Rect, ScrollDirection, ScrollInfo, WindowSize},
};
use tracing::trace;

/// Bounding boxes of a container and its direct children, in DOM order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerLayout {
    pub bounds: Rect,
    pub children: Vec<Rect>,
}

/// Source of live layout measurements (the page's DOM in the browser)
pub trait LayoutHost {
    /// Scroll metrics of the element with `id`, if it exists
    fn scroll_info(&self, id: &str) -> Option<ScrollInfo>;

    /// Inner window size
    fn window_size(&self) -> WindowSize;

    /// Bounding boxes of the element with `id` and its children
    fn container_layout(&self, id: &str) -> Option<ContainerLayout>;

    /// Smoothly scroll child `index` of `id` into view. False if either is missing.
    fn scroll_child_into_view(&self, id: &str, index: usize) -> bool;
}

/// Index of the last child overlapping `bounds` by more than `threshold`
/// along `direction`.
pub fn last_partially_visible(
    bounds: &Rect,
    children: &[Rect],
    direction: ScrollDirection,
    threshold: f64,
) -> Option<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.overlap(bounds, direction) > threshold)
        .map(|(index, _)| index)
        .last()
}

/// Layout queries bound to a host
pub struct Layout<H> {
    host: H,
    config: LayoutConfig,
}

impl<H: LayoutHost> Layout<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, LayoutConfig::default())
    }

    pub fn with_config(host: H, config: LayoutConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Scroll snapshot of `id`, `None` when the element is missing
    pub fn scroll_info(&self, id: &str) -> Option<ScrollInfo> {
        self.host.scroll_info(id)
    }

    pub fn window_size(&self) -> WindowSize {
        self.host.window_size()
    }

    /// Last child of `id` that is at least partially visible.
    ///
    /// `None` when the container is missing or no child qualifies.
    pub fn find_last_partially_visible_index(
        &self,
        id: &str,
        direction: ScrollDirection,
    ) -> Option<usize> {
        let layout = self.host.container_layout(id)?;
        let index = last_partially_visible(
            &layout.bounds,
            &layout.children,
            direction,
            self.config.visibility_threshold,
        );
        trace!(id, %direction, children = layout.children.len(), ?index, "Visibility scan");
        index
    }

    /// Same as [`Self::find_last_partially_visible_index`] with "none" folded into 0
    pub fn find_last_partially_visible_index_or_zero(
        &self,
        id: &str,
        direction: ScrollDirection,
    ) -> usize {
        self.find_last_partially_visible_index(id, direction)
            .unwrap_or(0)
    }

    /// Whether `id` is scrolled close enough to its end to fetch the next page
    pub fn should_load_more(&self, id: &str, direction: ScrollDirection) -> Option<bool> {
        self.host
            .scroll_info(id)
            .map(|info| info.should_load_more(direction, self.config.load_more_trigger_offset))
    }

    pub fn scroll_child_into_view(&self, id: &str, index: usize) -> bool {
        self.host.scroll_child_into_view(id, index)
    }
}
