//! `scorematch-recon`: student result reconciliation engine.
//!
//! Pure engine crate: receives delimited text or pre-loaded rows, fills the
//! portal template from the manual result sheet, and returns the completed
//! table, matched/unmatched logs and run statistics. No CLI or filesystem
//! dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod load;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod stats;
pub mod table;

pub use config::{MatchConfig, ReconConfig};
pub use engine::{reconcile, run, run_csv};
pub use error::{ReconError, Source};
pub use model::{MatchTier, ReconOutput, ReconStats, StudentRecord, TemplateRow};
pub use table::RawTable;
