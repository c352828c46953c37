//! Line-selection core: local substring recall, remote semantic relevance,
//! and original-order merge.

pub mod engine;
pub mod local;
pub mod merge;
pub mod remote;

pub use engine::{EngineConfig, FilterEngine};
pub use local::LocalMatcher;
pub use remote::{LlmRelevanceFilter, RelevanceFilter};
