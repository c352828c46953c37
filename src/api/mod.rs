pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::{annotate::Annotator, filter::FilterEngine, upload::UploadSpool};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FilterEngine>,
    pub annotator: Arc<Annotator>,
    pub spool: UploadSpool,
    pub annotate_by_default: bool,
}

impl AppState {
    pub fn new(engine: Arc<FilterEngine>, annotator: Arc<Annotator>, spool: UploadSpool) -> Self {
        Self {
            engine,
            annotator,
            spool,
            annotate_by_default: true,
        }
    }

    /// Set whether lines are annotated when the request does not say.
    pub fn with_annotate_by_default(mut self, annotate: bool) -> Self {
        self.annotate_by_default = annotate;
        self
    }
}
