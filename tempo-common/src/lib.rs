//! # Tempo Common Library
//!
//! Shared code for the tempo playback pipeline crates including:
//! - Error types (`Error` enum via thiserror)
//! - Microsecond timeline utilities
//! - Media format and DRM descriptor model types

pub mod error;
pub mod format;
pub mod time;

pub use error::{Error, Result};
pub use format::{DrmInitData, Format, TrackType};
