//! Package assembly: generate every file, then write the zip archive.

use std::io::{Cursor, Seek, Write};

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::model::{ExportOptions, FormationExport, ScormVersion};
use crate::render::slugify;

use super::labels::Locale;
use super::manifest::{ManifestParams, generate_manifest};
use super::pages::{generate_index_page, generate_module_page, generate_quiz_page};
use super::shim::generate_shim;
use super::styles::STYLESHEET_CSS;
use super::{INDEX_PAGE, MANIFEST_FILE, QUIZ_PAGE, SHIM_FILE, STYLESHEET};

/// Default deflate level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Configuration for package assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: u32,
    /// Language of the generated pages.
    pub locale: Locale,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            locale: Locale::default(),
        }
    }
}

/// One file of a package, before compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub path: String,
    pub contents: String,
    pub media_type: &'static str,
}

impl PackageFile {
    fn new(path: impl Into<String>, contents: String, media_type: &'static str) -> Self {
        Self {
            path: path.into(),
            contents,
            media_type,
        }
    }
}

/// A finished package.
#[derive(Debug, Clone)]
pub struct GeneratedPackage {
    pub file_name: String,
    /// Files in archive order.
    pub files: Vec<PackageFile>,
    /// The zip archive.
    pub bytes: Vec<u8>,
}

impl GeneratedPackage {
    pub fn file(&self, path: &str) -> Option<&PackageFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn manifest(&self) -> &str {
        self.file(MANIFEST_FILE).map_or("", |f| f.contents.as_str())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds SCORM packages from normalized formations.
///
/// Generation is pure: the only input besides the formation is the clock,
/// which names the archive.
#[derive(Debug, Clone)]
pub struct ScormExporter<C = SystemClock> {
    config: ExporterConfig,
    clock: C,
}

impl ScormExporter<SystemClock> {
    pub fn new() -> Self {
        Self {
            config: ExporterConfig::default(),
            clock: SystemClock,
        }
    }
}

impl Default for ScormExporter<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ScormExporter<C> {
    pub fn with_config(mut self, config: ExporterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock<D: Clock>(self, clock: D) -> ScormExporter<D> {
        ScormExporter {
            config: self.config,
            clock,
        }
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Generate every file of the package, in archive order.
    pub fn build_files(
        &self,
        formation: &FormationExport,
        version: ScormVersion,
        options: &ExportOptions,
    ) -> Result<Vec<PackageFile>> {
        let locale = self.config.locale;
        let quiz = formation
            .evaluations()
            .filter(|set| options.include_evaluations && !set.is_empty());

        let params = ManifestParams {
            version,
            mastery_score: options.mastery_score,
            include_quiz: quiz.is_some(),
            language: locale.tag(),
        };

        let mut files = Vec::with_capacity(formation.module_count() + 5);
        files.push(PackageFile::new(
            MANIFEST_FILE,
            generate_manifest(formation, &params),
            "application/xml",
        ));
        files.push(PackageFile::new(
            INDEX_PAGE,
            generate_index_page(formation, quiz.is_some(), locale)?,
            "text/html",
        ));
        let total = formation.module_count();
        for module in formation.modules() {
            files.push(PackageFile::new(
                module.page_name(),
                generate_module_page(module, total, locale),
                "text/html",
            ));
        }
        if let Some(set) = quiz {
            files.push(PackageFile::new(
                QUIZ_PAGE,
                generate_quiz_page(set, options.mastery_score, locale)?,
                "text/html",
            ));
        }
        files.push(PackageFile::new(
            SHIM_FILE,
            generate_shim(version),
            "application/javascript",
        ));
        files.push(PackageFile::new(
            STYLESHEET,
            STYLESHEET_CSS.to_string(),
            "text/css",
        ));
        Ok(files)
    }

    /// Write `files` as a zip archive.
    ///
    /// Entries carry a fixed timestamp so identical input yields identical
    /// bytes.
    pub fn write_archive<W: Write + Seek>(&self, files: &[PackageFile], writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let level = self.config.compression_level.min(9);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level)))
            .last_modified_time(zip::DateTime::default());

        for file in files {
            zip.start_file(file.path.as_str(), deflated)?;
            zip.write_all(file.contents.as_bytes())?;
        }
        Ok(zip.finish()?)
    }

    /// Build the complete package for `formation`.
    pub fn export(
        &self,
        formation: &FormationExport,
        version: ScormVersion,
        options: &ExportOptions,
    ) -> Result<GeneratedPackage> {
        let files = self.build_files(formation, version, options)?;
        let bytes = self
            .write_archive(&files, Cursor::new(Vec::new()))?
            .into_inner();
        let file_name = package_file_name(formation.title(), &self.clock);

        tracing::debug!(
            formation_id = formation.id(),
            version = %version,
            files = files.len(),
            bytes = bytes.len(),
            "package assembled"
        );

        if bytes.is_empty() {
            return Err(Error::Generation("empty archive".into()));
        }

        Ok(GeneratedPackage {
            file_name,
            files,
            bytes,
        })
    }
}

/// `scorm_<slug>_<timestamp>.zip`, with the timestamp in UTC to the
/// millisecond.
pub fn package_file_name(title: &str, clock: &impl Clock) -> String {
    let slug = slugify(title);
    let slug = if slug.is_empty() { "formation".to_string() } else { slug };
    let stamp = clock.now().format("%Y-%m-%dT%H-%M-%S-%3fZ");
    format!("scorm_{slug}_{stamp}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::{FormationRecord, ModuleRecord};
    use crate::normalize::normalize_formation;
    use serde_json::json;
    use std::io::Read;
    use zip::ZipArchive;

    fn formation(with_quiz: bool) -> FormationExport {
        let record = FormationRecord {
            id: "f1".into(),
            titre: "Gestion de projet".into(),
            description: None,
            organization_id: None,
            modules: vec![ModuleRecord::new("a", "A", 1), ModuleRecord::new("b", "B", 2)],
            evaluations_data: with_quiz.then(|| {
                json!({"qcm": [{"question": "Q", "options": ["x", "y"], "correctAnswer": 1}]})
            }),
        };
        normalize_formation(&record).unwrap()
    }

    fn exporter() -> ScormExporter<FixedClock> {
        ScormExporter::new().with_clock(FixedClock::at_timestamp(1_700_000_000))
    }

    #[test]
    fn test_archive_order() {
        let pkg = exporter()
            .export(&formation(true), ScormVersion::V1_2, &ExportOptions::default())
            .unwrap();
        let paths: Vec<_> = pkg.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "imsmanifest.xml",
                "index.html",
                "module_1.html",
                "module_2.html",
                "quiz.html",
                "scorm_api.js",
                "styles.css"
            ]
        );

        let mut archive = ZipArchive::new(Cursor::new(pkg.bytes.clone())).unwrap();
        assert_eq!(archive.len(), paths.len());
        for (i, path) in paths.iter().enumerate() {
            let mut entry = archive.by_index(i).unwrap();
            assert_eq!(entry.name(), *path);
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            assert_eq!(contents, pkg.files[i].contents);
        }
    }

    #[test]
    fn test_quiz_omitted_when_disabled_or_empty() {
        let options = ExportOptions {
            include_evaluations: false,
            ..ExportOptions::default()
        };
        let pkg = exporter()
            .export(&formation(true), ScormVersion::V1_2, &options)
            .unwrap();
        assert!(pkg.file("quiz.html").is_none());
        assert!(!pkg.manifest().contains("quiz.html"));

        let pkg = exporter()
            .export(&formation(false), ScormVersion::V1_2, &ExportOptions::default())
            .unwrap();
        assert!(pkg.file("quiz.html").is_none());
    }

    #[test]
    fn test_file_name() {
        let clock = FixedClock::at_timestamp(1_700_000_000);
        assert_eq!(
            package_file_name("Gestion de projet", &clock),
            "scorm_gestion-de-projet_2023-11-14T22-13-20-000Z.zip"
        );
        assert_eq!(
            package_file_name("???", &clock),
            "scorm_formation_2023-11-14T22-13-20-000Z.zip"
        );
    }

    #[test]
    fn test_identical_input_identical_bytes() {
        let f = formation(true);
        let a = exporter().export(&f, ScormVersion::V2004, &ExportOptions::default()).unwrap();
        let b = exporter().export(&f, ScormVersion::V2004, &ExportOptions::default()).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.file_name, b.file_name);
    }

    #[test]
    fn test_compression_level_is_configurable() {
        let build = |level| {
            let config = ExporterConfig {
                compression_level: level,
                ..ExporterConfig::default()
            };
            exporter()
                .with_config(config)
                .export(&formation(false), ScormVersion::V1_2, &ExportOptions::default())
                .unwrap()
        };
        let fast = build(1);
        let best = build(9);
        assert!(best.len() <= fast.len());
        let archive = ZipArchive::new(Cursor::new(best.bytes)).unwrap();
        assert_eq!(archive.len(), 6);
    }
}
