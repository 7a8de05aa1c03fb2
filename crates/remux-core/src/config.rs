//! Player and layout configuration
//!
//! Both structs decode from the plain objects the page passes in, with every
//! field optional.

use crate::{types::TextTrackKind, Error, Result};
use serde::{Deserialize, Serialize};

/// Element id the player binds to unless configured otherwise
pub const DEFAULT_VIDEO_ELEMENT_ID: &str = "video-player";

/// Minimum overlap, in CSS pixels, for a child to count as visible
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 5.0;

/// Distance from the end of a list at which more items are requested
pub const DEFAULT_LOAD_MORE_TRIGGER_OFFSET: f64 = 1000.0;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// What to do with text tracks handed to a playback start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackPolicy {
    /// Accept the tracks but do not add them to the engine
    #[default]
    Ignore,
    /// Add every track to the engine after the source loads
    Apply,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    /// Id of the `<video>` element the engine attaches to
    pub video_element_id: String,
    /// Text track handling
    pub text_tracks: TextTrackPolicy,
    /// Kind used when tracks are applied
    pub text_track_kind: TextTrackKind,
    /// Turn caption rendering on whenever tracks were supplied
    pub show_captions_when_tracks_present: bool,
    /// Call `play()` once the source has loaded
    pub autoplay: bool,
    /// Log level filter (`trace` .. `error`)
    pub log_level: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_element_id: DEFAULT_VIDEO_ELEMENT_ID.to_string(),
            text_tracks: TextTrackPolicy::Ignore,
            text_track_kind: TextTrackKind::Subtitles,
            show_captions_when_tracks_present: true,
            autoplay: true,
            log_level: "info".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Config that side-loads every supplied track
    pub fn with_text_tracks() -> Self {
        Self {
            text_tracks: TextTrackPolicy::Apply,
            ..Default::default()
        }
    }

    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.video_element_id.trim().is_empty() {
            return Err(Error::InvalidConfig("videoElementId must not be empty".into()));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unknown log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

/// Layout helper configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Overlap a child needs before it counts as visible
    pub visibility_threshold: f64,
    /// Remaining scroll distance that triggers loading more items
    pub load_more_trigger_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            load_more_trigger_offset: DEFAULT_LOAD_MORE_TRIGGER_OFFSET,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.visibility_threshold >= 0.0) {
            return Err(Error::InvalidConfig(
                "visibilityThreshold must be a non-negative number".into(),
            ));
        }
        if !(self.load_more_trigger_offset >= 0.0) {
            return Err(Error::InvalidConfig(
                "loadMoreTriggerOffset must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_config_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.video_element_id, "video-player");
        assert_eq!(config.text_tracks, TextTrackPolicy::Ignore);
        assert!(config.autoplay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_player_config_partial_json() {
        let config = PlayerConfig::from_json(r#"{"textTracks":"apply","logLevel":"debug"}"#).unwrap();
        assert_eq!(config.text_tracks, TextTrackPolicy::Apply);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.video_element_id, "video-player");
    }

    #[test]
    fn test_player_config_rejects_bad_values() {
        assert!(matches!(
            PlayerConfig::from_json(r#"{"videoElementId":"  "}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PlayerConfig::from_json(r#"{"logLevel":"loud"}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            PlayerConfig::from_json("not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_layout_config_validation() {
        assert!(LayoutConfig::default().validate().is_ok());
        let config = LayoutConfig {
            visibility_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = LayoutConfig {
            load_more_trigger_offset: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
