//! Renderer lifecycle and stream-reading core

pub mod capabilities;
pub mod core;
pub mod driver;
pub mod passthrough;
pub mod state;

pub use capabilities::{AdaptiveSupport, FormatSupport, RendererCapabilities};
pub use core::RendererCore;
pub use driver::{RendererConfiguration, RendererDriver, SourceReader};
pub use passthrough::{PassthroughRenderer, SampleSink};
pub use state::RendererState;
