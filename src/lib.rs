//! # scormkit
//!
//! Exports courses ("formations") as SCORM 1.2 or SCORM 2004 packages that
//! any LMS can import.
//!
//! ## Features
//!
//! - Manifest, HTML pages, runtime shim and stylesheet in one zip archive
//! - Both SCORM editions from the same content, with edition-specific
//!   manifest schema and CMI vocabulary
//! - Rich-text module content rendered to escaped HTML
//! - Offline packages: no file references a network resource
//! - Manifest and package inspection for verifying generated output
//!
//! ## Quick Start
//!
//! ```
//! use scormkit::clock::FixedClock;
//! use scormkit::export::ScormExporter;
//! use scormkit::model::{ExportOptions, FormationRecord, ModuleRecord, ScormVersion};
//! use scormkit::normalize_formation;
//!
//! let record: FormationRecord = serde_json::from_str(r#"{
//!     "id": "f1",
//!     "titre": "Excel Initiation",
//!     "modules": [
//!         {"id": "m1", "titre": "Cells", "ordre": 1, "duree": 20},
//!         {"id": "m2", "titre": "Formulas", "ordre": 2}
//!     ]
//! }"#)?;
//!
//! let formation = normalize_formation(&record)?;
//! let package = ScormExporter::new()
//!     .with_clock(FixedClock::epoch())
//!     .export(&formation, ScormVersion::V2004, &ExportOptions::default())?;
//!
//! let summary = scormkit::inspect_package(&package.bytes)?;
//! assert_eq!(summary.manifest.items.len(), 2);
//! assert!(summary.is_complete());
//! # Ok::<(), scormkit::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod render;
pub mod runtime;
pub mod service;

pub use error::{Error, Result};
pub use export::{GeneratedPackage, ScormExporter};
pub use inspect::{ManifestSummary, PackageSummary, inspect_package, parse_manifest};
pub use model::{ExportOptions, ExportRequest, FormationExport, MasteryScore, ScormVersion};
pub use normalize::normalize_formation;
