//! Core types for the Remux web glue

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language code used when a subtitle carries none
pub const UNDEFINED_LANGUAGE: &str = "und";

/// Label used when a subtitle carries no language
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Mime type of addon-provided subtitles
pub const SRT_MIME: &str = "text/srt";

/// Text track kind as understood by the media engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackKind {
    /// Dialogue translation
    #[default]
    Subtitles,
    /// Closed captions
    Captions,
}

impl std::fmt::Display for TextTrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextTrackKind::Subtitles => write!(f, "subtitles"),
            TextTrackKind::Captions => write!(f, "captions"),
        }
    }
}

/// Side-loaded text track descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTrack {
    /// URL to the track file
    pub url: String,
    /// BCP-47 language code, `"und"` when unknown
    #[serde(alias = "language")]
    pub lang: String,
    /// Human-readable label
    pub label: String,
    /// Mime type, left to the engine when absent
    #[serde(default)]
    pub mime: Option<String>,
}

impl TextTrack {
    /// Create a new text track
    pub fn new(
        url: impl Into<String>,
        lang: impl Into<String>,
        label: impl Into<String>,
        mime: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            lang: lang.into(),
            label: label.into(),
            mime,
        }
    }

    /// Build a track from an addon subtitle entry.
    ///
    /// Addon subtitles are SRT and often come without a language.
    pub fn from_subtitle(url: impl Into<String>, lang: Option<String>) -> Self {
        let label = lang.clone().unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        Self {
            url: url.into(),
            lang: lang.unwrap_or_else(|| UNDEFINED_LANGUAGE.to_string()),
            label,
            mime: Some(SRT_MIME.to_string()),
        }
    }
}

/// Axis along which a container scrolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl std::fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollDirection::Horizontal => write!(f, "horizontal"),
            ScrollDirection::Vertical => write!(f, "vertical"),
        }
    }
}

impl ScrollDirection {
    /// Interpret a direction flag coming from the page.
    ///
    /// Only `"horizontal"` selects the horizontal axis; any other flag scans
    /// vertically.
    pub fn from_flag(flag: &str) -> Self {
        if flag == "horizontal" {
            ScrollDirection::Horizontal
        } else {
            ScrollDirection::Vertical
        }
    }
}

impl FromStr for ScrollDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "horizontal" => Ok(ScrollDirection::Horizontal),
            "vertical" => Ok(ScrollDirection::Vertical),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown scroll direction: {other}"
            ))),
        }
    }
}

/// Bounding box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rect from an origin and a size
    pub fn from_origin(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Length of the 1-D intersection with `other` along `direction`.
    ///
    /// Negative when the two boxes are apart on that axis.
    pub fn overlap(&self, other: &Rect, direction: ScrollDirection) -> f64 {
        match direction {
            ScrollDirection::Horizontal => {
                let visible_left = self.left.max(other.left);
                let visible_right = self.right.min(other.right);
                visible_right - visible_left
            }
            ScrollDirection::Vertical => {
                let visible_top = self.top.max(other.top);
                let visible_bottom = self.bottom.min(other.bottom);
                visible_bottom - visible_top
            }
        }
    }
}

/// Scroll and box metrics of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollInfo {
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub offset_width: f64,
    pub offset_height: f64,
}

impl ScrollInfo {
    /// Far edge of the visible region along `direction`
    pub fn scroll_position(&self, direction: ScrollDirection) -> f64 {
        match direction {
            ScrollDirection::Horizontal => self.scroll_left + self.client_width,
            ScrollDirection::Vertical => self.scroll_top + self.client_height,
        }
    }

    /// Total scrollable extent along `direction`
    pub fn max_scroll(&self, direction: ScrollDirection) -> f64 {
        match direction {
            ScrollDirection::Horizontal => self.scroll_width,
            ScrollDirection::Vertical => self.scroll_height,
        }
    }

    /// Distance left before the end of the content
    pub fn remaining(&self, direction: ScrollDirection) -> f64 {
        self.max_scroll(direction) - self.scroll_position(direction)
    }

    /// True once the visible region is within `trigger_offset` of the end
    pub fn should_load_more(&self, direction: ScrollDirection, trigger_offset: f64) -> bool {
        self.remaining(direction) < trigger_offset
    }

    /// True when the element is scrolled to (or past) the top
    pub fn is_at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }
}

/// Inner window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

/// Playback status as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Source is being loaded
    Loading,
    /// Media element is playing
    Playing,
    /// Media element is paused (including blocked autoplay)
    Paused,
    /// Playback was closed by the user or ended
    Stopped,
    /// Playback failed
    Error(String),
}

impl PlaybackStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackStatus::Error(_))
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Loading => write!(f, "loading"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Stopped => write!(f, "stopped"),
            PlaybackStatus::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}
