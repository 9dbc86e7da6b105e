//! Pipeline assembly
//!
//! Wraps a set of concrete renderers in their drivers, assigns each its
//! immutable pipeline index, and validates the assembly-time invariants.
//! Driving the renderers (when to enable, start, render) belongs to the
//! coordinating loop, which iterates the drivers through this container.

use tempo_common::{Error, Result};
use tracing::info;

use crate::clock::MediaClock;
use crate::renderer::{RendererCore, RendererDriver};

/// A fixed set of renderers forming one playback pipeline
pub struct Pipeline {
    renderers: Vec<RendererDriver>,
}

impl Pipeline {
    /// Assemble a pipeline from concrete renderers.
    ///
    /// Indices are assigned in order. Fails if more than one renderer
    /// advertises a media clock.
    pub fn new(cores: Vec<Box<dyn RendererCore>>) -> Result<Self> {
        let mut renderers: Vec<RendererDriver> =
            cores.into_iter().map(RendererDriver::new).collect();
        for (index, renderer) in renderers.iter_mut().enumerate() {
            renderer.set_index(index);
        }

        let clock_count = renderers
            .iter()
            .filter(|renderer| renderer.media_clock().is_some())
            .count();
        if clock_count > 1 {
            return Err(Error::InvalidState(format!(
                "{clock_count} renderers provide a media clock; at most one is allowed"
            )));
        }

        info!(renderer_count = renderers.len(), "Pipeline assembled");
        Ok(Self { renderers })
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RendererDriver> {
        self.renderers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RendererDriver> {
        self.renderers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RendererDriver> {
        self.renderers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RendererDriver> {
        self.renderers.iter_mut()
    }

    /// The pipeline's media clock, if any renderer advertises one
    pub fn media_clock(&self) -> Option<&dyn MediaClock> {
        self.renderers
            .iter()
            .find_map(|renderer| renderer.media_clock())
    }

    /// Whether every renderer has finished all output for the current
    /// enabled span. The coordinating loop transitions the pipeline to its
    /// ended state once this is true.
    pub fn is_ended(&mut self) -> bool {
        self.renderers.iter_mut().all(|renderer| renderer.is_ended())
    }
}
