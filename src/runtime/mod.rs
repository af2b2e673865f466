//! SCORM runtime semantics.
//!
//! The exported package talks to the LMS through `scorm_api.js`. This module
//! is the Rust side of the same contract:
//!
//! - [`CmiVocabulary`]: per-edition method names and CMI paths, also used to
//!   generate the shim
//! - [`HostChannel`]: how calls reach an LMS, with [`NullHost`] for offline
//!   use and [`MemoryHost`] as an in-memory LMS
//! - [`ScormSession`]: lifecycle, data access and semantic helpers
//! - [`grade_quiz`]: the quiz page's scoring rule
//!
//! ```
//! use scormkit::model::ScormVersion;
//! use scormkit::runtime::{MemoryHost, ScormSession};
//!
//! let mut lms = MemoryHost::new(ScormVersion::V1_2);
//! {
//!     let mut session = ScormSession::new(&mut lms, ScormVersion::V1_2);
//!     session.initialize();
//!     session.set_lesson_status("completed");
//! } // dropped: session time written, committed, LMSFinish sent
//! assert_eq!(lms.value("cmi.core.lesson_status"), Some("completed"));
//! ```

mod host;
mod scoring;
mod session;
mod vocabulary;

pub use host::{HostChannel, MemoryHost, NullHost};
pub use scoring::{QuizOutcome, grade_quiz};
pub use session::{ScormSession, merge_progress};
pub use vocabulary::{CmiVocabulary, SCORM_1_2, SCORM_2004, format_session_time};
