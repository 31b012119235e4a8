use std::sync::Arc;

use super::processors::*;
use crate::config::ProcessorRegistry;
use crate::errors::RegistryError;
use crate::traits::{Processor, ProcessorId};

/// Factory for creating local (in-process) processor instances
pub struct LocalProcessorFactory;

impl LocalProcessorFactory {
    /// Create a processor instance from its id
    ///
    /// - "sample_frames" -> SampleFramesProcessor
    /// - "score_frames" -> ScoreFramesProcessor
    /// - "select_best_frame" -> SelectBestFrameProcessor
    pub fn create_processor(id: &str) -> Result<Arc<dyn Processor>, RegistryError> {
        match id {
            SampleFramesProcessor::ID => Ok(Arc::new(SampleFramesProcessor::new())),
            ScoreFramesProcessor::ID => Ok(Arc::new(ScoreFramesProcessor::new())),
            SelectBestFrameProcessor::ID => Ok(Arc::new(SelectBestFrameProcessor::new())),
            _ => Err(RegistryError::NotFound(ProcessorId::new(id))),
        }
    }

    /// List all available local processor implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec![
            SampleFramesProcessor::ID,
            ScoreFramesProcessor::ID,
            SelectBestFrameProcessor::ID,
        ]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(id: &str) -> bool {
        Self::list_available_implementations().contains(&id)
    }

    /// Register every local processor into `registry`.
    pub fn register_all(registry: &mut ProcessorRegistry) -> Result<(), RegistryError> {
        for id in Self::list_available_implementations() {
            registry.register(Self::create_processor(id)?)?;
        }
        Ok(())
    }
}
