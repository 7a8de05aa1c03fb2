//! Player handle - owns the single media engine for a page
//!
//! Coordinates:
//! - Lazy engine creation bound to one video element
//! - Detach / re-attach / load sequencing for each playback start
//! - Optional text track side-loading and caption visibility
//! - Autoplay attempts and playback status

use crate::{
    config::{PlayerConfig, TextTrackPolicy},
    engine::{MediaEngine, MediaPlatform},
    types::{PlaybackStatus, TextTrack},
    Error, Result,
};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::Notify;
use tracing::{debug, error, info, instrument, warn};

type MediaElement<P> = <<P as MediaPlatform>::Engine as MediaEngine>::Element;

enum EngineSlot<E: MediaEngine> {
    Empty,
    /// Engine built, attach still pending
    Initializing,
    /// Engine attached to the element found at bootstrap
    Ready { engine: Rc<E>, element: E::Element },
}

/// Outcome of the autoplay attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum AutoplayOutcome {
    /// Playback never got far enough to try
    #[default]
    NotAttempted,
    /// Autoplay turned off in config
    Disabled,
    Started,
    /// The browser refused to start playback
    Blocked(String),
}

/// Result of side-loading one text track
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackOutcome {
    pub url: String,
    pub lang: String,
    pub applied: bool,
    pub error: Option<String>,
}

/// Everything observable about one playback start
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackReport {
    pub url: String,
    pub status: PlaybackStatus,
    pub tracks_supplied: usize,
    pub text_tracks: Vec<TrackOutcome>,
    /// Why the supplied track list could not be read, if it could not
    pub text_track_error: Option<String>,
    pub captions_visible: bool,
    pub autoplay: AutoplayOutcome,
    pub failure: Option<Error>,
}

impl PlaybackReport {
    fn new(url: &str, tracks_supplied: usize) -> Self {
        Self {
            url: url.to_string(),
            status: PlaybackStatus::Idle,
            tracks_supplied,
            text_tracks: Vec::new(),
            text_track_error: None,
            captions_visible: false,
            autoplay: AutoplayOutcome::NotAttempted,
            failure: None,
        }
    }

    /// True when the source loaded, whether or not autoplay went through
    pub fn is_loaded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Owned handle to the page's media engine.
///
/// At most one engine is ever created per handle; it is never torn down.
pub struct PlayerHandle<P: MediaPlatform> {
    platform: P,
    config: PlayerConfig,
    slot: RefCell<EngineSlot<P::Engine>>,
    /// Woken when a pending attach settles
    initialized: Notify,
    status: RefCell<PlaybackStatus>,
    /// Bumped by every playback start and by `stop`
    generation: Cell<u64>,
}

impl<P: MediaPlatform> PlayerHandle<P> {
    /// Create a handle with the default configuration
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, PlayerConfig::default())
    }

    pub fn with_config(platform: P, config: PlayerConfig) -> Self {
        Self {
            platform,
            config,
            slot: RefCell::new(EngineSlot::Empty),
            initialized: Notify::new(),
            status: RefCell::new(PlaybackStatus::Idle),
            generation: Cell::new(0),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The engine, once bootstrap has completed
    pub fn engine(&self) -> Option<Rc<P::Engine>> {
        self.ready().map(|(engine, _)| engine)
    }

    /// Element the engine was bootstrapped on
    pub fn media_element(&self) -> Option<MediaElement<P>> {
        self.ready().map(|(_, element)| element)
    }

    fn ready(&self) -> Option<(Rc<P::Engine>, MediaElement<P>)> {
        match &*self.slot.borrow() {
            EngineSlot::Ready { engine, element } => Some((Rc::clone(engine), element.clone())),
            _ => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(&*self.slot.borrow(), EngineSlot::Ready { .. })
    }

    /// Ensure an engine exists and is attached to `element_id`.
    ///
    /// A no-op once an engine exists, whatever id is passed. A call made while
    /// another bootstrap is attaching waits for it; if that attempt fails, this
    /// call tries again itself.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self, element_id: &str) -> Result<()> {
        loop {
            let pending = match &*self.slot.borrow() {
                EngineSlot::Ready { .. } => {
                    debug!("Player already initialized");
                    return Ok(());
                }
                EngineSlot::Initializing => Some(self.initialized.notified()),
                EngineSlot::Empty => None,
            };
            match pending {
                Some(notified) => {
                    debug!("Waiting for pending initialization");
                    notified.await;
                }
                None => break,
            }
        }

        self.platform.install_polyfills();

        let element = self.platform.find_media_element(element_id).ok_or_else(|| {
            error!("Video element not found");
            Error::ElementNotFound {
                id: element_id.to_string(),
            }
        })?;

        if !self.platform.is_supported() {
            error!("Media engine not supported");
            return Err(Error::UnsupportedPlatform);
        }

        let engine = self.platform.create_engine()?;
        engine.add_error_listener(Box::new(|message: &str| {
            error!(%message, "Media engine error");
        }));

        *self.slot.borrow_mut() = EngineSlot::Initializing;
        debug!("Attaching media engine");

        let attached = engine.attach(&element, true).await;
        let result = match attached {
            Ok(()) => {
                *self.slot.borrow_mut() = EngineSlot::Ready {
                    engine: Rc::new(engine),
                    element,
                };
                info!("Media engine attached");
                Ok(())
            }
            Err(err) => {
                *self.slot.borrow_mut() = EngineSlot::Empty;
                error!(error = %err, "Media engine attach failed");
                Err(err)
            }
        };
        self.initialized.notify_waiters();
        result
    }

    /// Load `url` into the configured video element and try to play it.
    ///
    /// Never fails: problems are logged and returned in the report.
    #[instrument(skip(self, text_tracks), fields(tracks = text_tracks.len()))]
    pub async fn start_playback(&self, url: &str, text_tracks: &[TextTrack]) -> PlaybackReport {
        let mut report = PlaybackReport::new(url, text_tracks.len());

        if let Err(err) = self.run_playback(url, text_tracks, &mut report).await {
            if err == Error::Superseded {
                debug!("Playback start superseded");
            } else {
                error!(error = %err, "Playback failed");
                self.set_status(PlaybackStatus::Error(err.to_string()));
            }
            report.failure = Some(err);
        }

        report.status = self.status();
        report
    }

    /// Playback start for a track list decoded from page input.
    ///
    /// An unreadable list plays the source without tracks and is recorded in
    /// `text_track_error`.
    pub async fn start_playback_from_input(
        &self,
        url: &str,
        text_tracks: Result<Vec<TextTrack>>,
    ) -> PlaybackReport {
        match text_tracks {
            Ok(tracks) => self.start_playback(url, &tracks).await,
            Err(err) => {
                warn!(error = %err, "Ignoring malformed text tracks");
                let mut report = self.start_playback(url, &[]).await;
                report.text_track_error = Some(err.to_string());
                report
            }
        }
    }

    async fn run_playback(
        &self,
        url: &str,
        text_tracks: &[TextTrack],
        report: &mut PlaybackReport,
    ) -> Result<()> {
        self.bootstrap(&self.config.video_element_id).await?;

        let generation = self.next_generation();
        let (engine, video) = self.ready().ok_or(Error::NotInitialized)?;

        self.set_loading();

        // Re-attach unconditionally once detached, so a superseded start never
        // leaves the engine unbound.
        engine.detach().await?;
        engine.attach(&video, true).await?;
        self.ensure_current(generation)?;

        engine.load(url).await?;
        self.ensure_current(generation)?;
        info!(url, "Source loaded");

        if self.config.text_tracks == TextTrackPolicy::Apply {
            for track in text_tracks {
                let outcome = match engine.add_text_track(track, self.config.text_track_kind).await {
                    Ok(()) => {
                        debug!(url = %track.url, lang = %track.lang, "Text track added");
                        TrackOutcome {
                            url: track.url.clone(),
                            lang: track.lang.clone(),
                            applied: true,
                            error: None,
                        }
                    }
                    Err(err) => {
                        warn!(url = %track.url, error = %err, "Text track rejected");
                        TrackOutcome {
                            url: track.url.clone(),
                            lang: track.lang.clone(),
                            applied: false,
                            error: Some(err.to_string()),
                        }
                    }
                };
                report.text_tracks.push(outcome);
                self.ensure_current(generation)?;
            }
        }

        if !text_tracks.is_empty() && self.config.show_captions_when_tracks_present {
            engine.set_text_track_visibility(true);
            report.captions_visible = true;
        }

        if !self.config.autoplay {
            report.autoplay = AutoplayOutcome::Disabled;
            self.set_status(PlaybackStatus::Paused);
            return Ok(());
        }

        match engine.play(&video).await {
            Ok(()) => {
                report.autoplay = AutoplayOutcome::Started;
                self.ensure_current(generation)?;
                self.set_status(PlaybackStatus::Playing);
            }
            Err(err) => {
                warn!(error = %err, "Autoplay blocked");
                report.autoplay = AutoplayOutcome::Blocked(err.to_string());
                self.ensure_current(generation)?;
                self.set_status(PlaybackStatus::Paused);
            }
        }

        Ok(())
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn ensure_current(&self, generation: u64) -> Result<()> {
        if self.generation.get() == generation {
            Ok(())
        } else {
            Err(Error::Superseded)
        }
    }

    /// Current playback status
    pub fn status(&self) -> PlaybackStatus {
        self.status.borrow().clone()
    }

    fn set_status(&self, status: PlaybackStatus) {
        let previous = self.status.replace(status);
        debug!(from = %previous, to = %self.status.borrow(), "Status change");
    }

    /// A new source is being prepared
    pub fn set_loading(&self) {
        self.set_status(PlaybackStatus::Loading);
    }

    /// The media element started playing
    pub fn notify_play(&self) {
        self.set_status(PlaybackStatus::Playing);
    }

    /// The media element paused
    pub fn notify_pause(&self) {
        self.set_status(PlaybackStatus::Paused);
    }

    /// Close playback. Any playback start still in flight is abandoned.
    pub fn stop(&self) {
        debug!("Stopping playback");
        self.next_generation();
        self.set_status(PlaybackStatus::Stopped);
    }
}
