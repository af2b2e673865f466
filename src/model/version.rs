//! SCORM target versions and export options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Target SCORM edition for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScormVersion {
    /// SCORM 1.2 (`API`, `cmi.core.*`).
    #[default]
    #[serde(rename = "SCORM_1_2")]
    V1_2,
    /// SCORM 2004 4th Edition (`API_1484_11`, `cmi.*`).
    #[serde(rename = "SCORM_2004")]
    V2004,
}

impl ScormVersion {
    /// Wire name used by the export endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            ScormVersion::V1_2 => "SCORM_1_2",
            ScormVersion::V2004 => "SCORM_2004",
        }
    }

    /// Value of the manifest `<schemaversion>` element.
    pub fn schema_version(self) -> &'static str {
        match self {
            ScormVersion::V1_2 => "1.2",
            ScormVersion::V2004 => "2004 4th Edition",
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScormVersion {
    type Err = Error;

    /// Accepts the wire names plus the short forms `1.2` and `2004`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCORM_1_2" | "SCORM-1.2" | "SCORM12" | "1.2" => Ok(ScormVersion::V1_2),
            "SCORM_2004" | "SCORM-2004" | "SCORM2004" | "2004" => Ok(ScormVersion::V2004),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }
}

/// Default percentage required to pass.
pub const DEFAULT_MASTERY_SCORE: u8 = 80;

/// Percentage in `0..=100` a learner must reach to be marked passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MasteryScore(u8);

impl MasteryScore {
    /// Clamp an integer into `0..=100`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Build from an optional raw request value.
    ///
    /// Missing or non-finite values fall back to [`DEFAULT_MASTERY_SCORE`];
    /// anything else is rounded and clamped.
    pub fn from_raw(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self(v.round().clamp(0.0, 100.0) as u8),
            _ => Self::default(),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether `percentage` meets the threshold.
    pub fn is_met_by(self, percentage: u8) -> bool {
        percentage >= self.0
    }
}

impl Default for MasteryScore {
    fn default() -> Self {
        Self(DEFAULT_MASTERY_SCORE)
    }
}

impl fmt::Display for MasteryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request export options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub mastery_score: MasteryScore,
    /// Emit `quiz.html` when the formation carries questions.
    pub include_evaluations: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mastery_score: MasteryScore::default(),
            include_evaluations: true,
        }
    }
}

/// A validated export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub formation_id: String,
    pub version: ScormVersion,
    pub options: ExportOptions,
}

impl ExportRequest {
    pub fn new(formation_id: impl Into<String>, version: ScormVersion) -> Self {
        Self {
            formation_id: formation_id.into(),
            version,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }
}
