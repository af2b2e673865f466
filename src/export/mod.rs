//! SCORM package generation.
//!
//! Every artifact of a package is produced here as text first, then
//! assembled into a zip archive by [`ScormExporter`]:
//!
//! - `imsmanifest.xml` from [`generate_manifest`]
//! - `index.html`, `module_<n>.html` and `quiz.html` from the page generators
//! - `scorm_api.js` from [`generate_shim`]
//! - `styles.css`, a fixed stylesheet
//!
//! # Example
//!
//! ```
//! use scormkit::clock::FixedClock;
//! use scormkit::export::ScormExporter;
//! use scormkit::model::{FormationRecord, ModuleRecord, ScormVersion, ExportOptions};
//! use scormkit::normalize::normalize_formation;
//!
//! let record = FormationRecord {
//!     id: "f1".into(),
//!     titre: "Excel Initiation".into(),
//!     description: None,
//!     organization_id: None,
//!     modules: vec![ModuleRecord::new("m1", "Cells", 1)],
//!     evaluations_data: None,
//! };
//! let formation = normalize_formation(&record)?;
//! let exporter = ScormExporter::new().with_clock(FixedClock::epoch());
//! let package = exporter.export(&formation, ScormVersion::V1_2, &ExportOptions::default())?;
//! assert!(package.file("imsmanifest.xml").is_some());
//! # Ok::<(), scormkit::Error>(())
//! ```

mod labels;
mod manifest;
mod package;
mod pages;
mod shim;
mod styles;

pub use labels::{ENGLISH, FRENCH, Labels, Locale};
pub use manifest::{ManifestParams, generate_manifest};
pub use package::{ExporterConfig, GeneratedPackage, PackageFile, ScormExporter, package_file_name};
pub use pages::{generate_index_page, generate_module_page, generate_quiz_page, progress_percent};
pub use shim::generate_shim;
pub use styles::STYLESHEET_CSS;

/// Manifest file name, at the package root.
pub const MANIFEST_FILE: &str = "imsmanifest.xml";
/// Launch page of the shared resource.
pub const INDEX_PAGE: &str = "index.html";
pub const QUIZ_PAGE: &str = "quiz.html";
/// Runtime shim every page loads.
pub const SHIM_FILE: &str = "scorm_api.js";
pub const STYLESHEET: &str = "styles.css";
