//! Remux WASM - browser glue for the Remux web client
//!
//! Binds the page to Shaka Player and the DOM:
//! - `RemuxPlayer`: single Shaka instance per `<video>` element, playback starts
//!   that resolve with a report instead of failing silently
//! - Layout helpers for scroll-synced lists and carousels
//! - `tracing` output on the browser console
//!
//! ## Usage
//!
//! ```javascript
//! import init, { RemuxPlayer, findLastPartiallyVisibleIndex } from '@remux/wasm';
//!
//! await init();
//! const player = new RemuxPlayer();
//! await player.playShaka('https://cdn.example.com/movie/manifest.mpd');
//! const index = findLastPartiallyVisibleIndex('pl-000042', 'horizontal');
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod logging;
mod player;
mod shaka;

pub use dom::{
    find_last_partially_visible_index, get_scroll_info, get_window_size, scroll_child_into_view,
    should_load_more, DomLayoutHost,
};
pub use player::RemuxPlayer;
pub use shaka::{ShakaEngine, ShakaPlatform};

/// Initialize the WASM module: panic hook plus console logging at `info`
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init("info");
}

/// Set the console log level (`trace` .. `error`, or an `EnvFilter` directive).
///
/// `new RemuxPlayer()` applies its configured `logLevel` the same way.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    logging::init(level.as_deref().unwrap_or("info"));
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
