//! Media format and DRM descriptor model types
//!
//! A `Format` describes the encoding in effect for the samples a renderer is
//! about to consume. Formats arrive through stream-change notifications and
//! are otherwise opaque to the pipeline core; renderers use them to set up
//! decoders (out of scope here). The DRM descriptor fields are passed
//! through unmodified to decoder setup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Track type a format (or renderer) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Video,
    Text,
    Metadata,
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackType::Audio => write!(f, "audio"),
            TrackType::Video => write!(f, "video"),
            TrackType::Text => write!(f, "text"),
            TrackType::Metadata => write!(f, "metadata"),
        }
    }
}

/// Opaque DRM descriptor carried by a format
///
/// The pipeline never interprets these; they are handed to decoder setup
/// as-is. Key acquisition is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmInitData {
    /// DRM scheme identifier
    pub scheme_id: Uuid,

    /// Opaque content identifier
    pub content_id: Vec<u8>,

    /// License provider
    pub provider: String,
}

/// Description of a media encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Stable identifier for this format within its source
    pub id: String,

    /// MIME type, e.g. `audio/mp4a-latm` or `video/avc`
    pub mime_type: String,

    /// Codec string, if known
    pub codec: Option<String>,

    /// Average bitrate in bits per second, if known
    pub bitrate: Option<u32>,

    /// Audio sample rate in Hz
    pub sample_rate: Option<u32>,

    /// Audio channel count
    pub channels: Option<u16>,

    /// Video width in pixels
    pub width: Option<u32>,

    /// Video height in pixels
    pub height: Option<u32>,

    /// Video frame rate in frames per second
    pub frame_rate: Option<f32>,

    /// Language of the track, if known
    pub language: Option<String>,

    /// DRM descriptor, if the content is protected
    pub drm: Option<DrmInitData>,
}

impl Format {
    /// Create an audio format
    pub fn audio(id: impl Into<String>, mime_type: impl Into<String>, sample_rate: u32, channels: u16) -> Self {
        Self {
            id: id.into(),
            mime_type: mime_type.into(),
            codec: None,
            bitrate: None,
            sample_rate: Some(sample_rate),
            channels: Some(channels),
            width: None,
            height: None,
            frame_rate: None,
            language: None,
            drm: None,
        }
    }

    /// Create a video format
    pub fn video(id: impl Into<String>, mime_type: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            mime_type: mime_type.into(),
            codec: None,
            bitrate: None,
            sample_rate: None,
            channels: None,
            width: Some(width),
            height: Some(height),
            frame_rate: None,
            language: None,
            drm: None,
        }
    }

    /// Create a text (subtitle) format
    pub fn text(id: impl Into<String>, mime_type: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mime_type: mime_type.into(),
            codec: None,
            bitrate: None,
            sample_rate: None,
            channels: None,
            width: None,
            height: None,
            frame_rate: None,
            language: Some(language.into()),
            drm: None,
        }
    }

    /// Attach a DRM descriptor
    pub fn with_drm(mut self, drm: DrmInitData) -> Self {
        self.drm = Some(drm);
        self
    }

    /// Track type inferred from the MIME type prefix
    ///
    /// Anything that is not audio, video, or text is treated as metadata
    /// (timed ID3, EMSG, and similar side-channel tracks).
    pub fn track_type(&self) -> TrackType {
        if self.mime_type.starts_with("audio/") {
            TrackType::Audio
        } else if self.mime_type.starts_with("video/") {
            TrackType::Video
        } else if self.mime_type.starts_with("text/") {
            TrackType::Text
        } else {
            TrackType::Metadata
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_type_from_mime() {
        assert_eq!(Format::audio("a", "audio/opus", 48_000, 2).track_type(), TrackType::Audio);
        assert_eq!(Format::video("v", "video/avc", 1920, 1080).track_type(), TrackType::Video);
        assert_eq!(Format::text("t", "text/vtt", "en").track_type(), TrackType::Text);

        let emsg = Format::text("m", "application/x-emsg", "und");
        assert_eq!(emsg.track_type(), TrackType::Metadata);
    }

    #[test]
    fn test_drm_fields_pass_through() {
        let drm = DrmInitData {
            scheme_id: Uuid::new_v4(),
            content_id: vec![1, 2, 3],
            provider: "example".to_string(),
        };
        let format = Format::audio("a", "audio/mp4a-latm", 44_100, 2).with_drm(drm.clone());
        assert_eq!(format.drm, Some(drm));
    }

    #[test]
    fn test_serde_round_trip() {
        let format = Format::audio("a1", "audio/opus", 48_000, 2);
        let json = serde_json::to_string(&format).unwrap();
        let back: Format = serde_json::from_str(&json).unwrap();
        assert_eq!(back, format);
    }

    #[test]
    fn test_track_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TrackType::Audio).unwrap(), "\"audio\"");
        assert_eq!(TrackType::Metadata.to_string(), "metadata");
    }
}
