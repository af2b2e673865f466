//! Data model for SCORM exports.
//!
//! - [`record`]: shapes the host application persists
//! - [`formation`]: the immutable snapshot the generators read
//! - [`document`]: rich-text trees embedded in module content
//! - [`version`]: target SCORM edition and per-request options

mod document;
mod formation;
mod record;
mod version;

pub use document::{DocumentNode, MAX_DOCUMENT_DEPTH, Marks, NodeKind};
pub use formation::{
    EvaluationSet, FormationExport, ModuleContent, ModuleExport, Question, module_page_name,
};
pub use record::{FormationRecord, ModuleRecord};
pub use version::{DEFAULT_MASTERY_SCORE, ExportOptions, ExportRequest, MasteryScore, ScormVersion};
