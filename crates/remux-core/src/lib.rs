//! Remux Core - platform-neutral glue for the Remux web client
//!
//! This crate holds the logic behind the browser bindings:
//! - Player lifecycle over an adaptive-streaming engine (bootstrap, playback start)
//! - Text track descriptors and caption visibility
//! - Layout queries for scroll-synced lists (scroll snapshots, visibility scans)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Remux Core                          │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  ┌──────────────┐                    ┌──────────────┐    │
//! │  │ PlayerHandle │                    │    Layout    │    │
//! │  └──────┬───────┘                    └──────┬───────┘    │
//! │         │                                   │            │
//! │  ┌──────┴───────┐                    ┌──────┴───────┐    │
//! │  │MediaPlatform │                    │  LayoutHost  │    │
//! │  │ MediaEngine  │                    │              │    │
//! │  └──────────────┘                    └──────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine and layout traits are implemented by `remux-wasm` on top of
//! Shaka Player and the DOM.

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod player;
pub mod types;

pub use config::{LayoutConfig, PlayerConfig, TextTrackPolicy};
pub use engine::{ErrorListener, MediaEngine, MediaPlatform};
pub use error::{Error, Result};
pub use layout::{last_partially_visible, ContainerLayout, Layout, LayoutHost};
pub use player::{AutoplayOutcome, PlaybackReport, PlayerHandle, TrackOutcome};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "Remux Core initialized");
}
