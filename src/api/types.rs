//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::pipeline::extraction::OcrEngine;

/// Shared context for all API routes and middleware.
/// Wraps `CoreState` plus the OCR collaborator.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub ocr: Arc<dyn OcrEngine>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { core, ocr }
    }
}
