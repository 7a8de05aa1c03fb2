//! Media engine seam
//!
//! The adaptive-streaming engine lives outside this crate (Shaka Player in the
//! browser). [`MediaPlatform`] is what the host provides to find elements and
//! construct engines; [`MediaEngine`] is one engine instance.
//!
//! Engine futures are `!Send`: everything runs on the page's event loop.

use crate::{
    types::{TextTrack, TextTrackKind},
    Result,
};
use async_trait::async_trait;

/// Callback receiving engine error descriptions
pub type ErrorListener = Box<dyn Fn(&str)>;

/// One adaptive-streaming engine instance
#[async_trait(?Send)]
pub trait MediaEngine {
    /// Media element handle the engine binds to
    type Element: Clone;

    /// Register a listener for asynchronous engine errors
    fn add_error_listener(&self, listener: ErrorListener);

    /// Bind the engine to `element`
    async fn attach(&self, element: &Self::Element, init_media_source: bool) -> Result<()>;

    /// Unbind the engine from its current element
    async fn detach(&self) -> Result<()>;

    /// Load a manifest or progressive source
    async fn load(&self, url: &str) -> Result<()>;

    /// Side-load a text track for the loaded source
    async fn add_text_track(&self, track: &TextTrack, kind: TextTrackKind) -> Result<()>;

    /// Show or hide rendered text
    fn set_text_track_visibility(&self, visible: bool);

    /// Start playback on `element`. Rejection usually means autoplay was blocked.
    async fn play(&self, element: &Self::Element) -> Result<()>;
}

/// Host environment able to produce engines
pub trait MediaPlatform {
    type Engine: MediaEngine;

    /// Patch missing platform features before any engine is built
    fn install_polyfills(&self);

    /// Look up a media element by id
    fn find_media_element(&self, id: &str) -> Option<<Self::Engine as MediaEngine>::Element>;

    /// Whether the engine can run here at all
    fn is_supported(&self) -> bool;

    /// Construct a detached engine
    fn create_engine(&self) -> Result<Self::Engine>;
}
