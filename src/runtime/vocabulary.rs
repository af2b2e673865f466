//! CMI vocabulary per SCORM edition.
//!
//! Both the generated `scorm_api.js` and [`super::ScormSession`] read their
//! method names and data-model paths from these tables.

use crate::model::ScormVersion;

/// Native API method names and CMI element paths for one SCORM edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmiVocabulary {
    pub version: ScormVersion,
    /// Global the LMS exposes on an ancestor window.
    pub api_global: &'static str,
    pub initialize: &'static str,
    pub terminate: &'static str,
    pub get_value: &'static str,
    pub set_value: &'static str,
    pub commit: &'static str,
    /// Completion path (`lesson_status` in 1.2).
    pub completion_status: &'static str,
    /// Separate pass/fail path; 1.2 folds it into `completion_status`.
    pub success_status: Option<&'static str>,
    pub location: &'static str,
    pub score_raw: &'static str,
    pub score_min: &'static str,
    pub score_max: &'static str,
    pub score_scaled: Option<&'static str>,
    /// Native progress element; 1.2 stores progress in suspend data.
    pub progress_measure: Option<&'static str>,
    pub suspend_data: &'static str,
    pub session_time: &'static str,
}

pub const SCORM_1_2: CmiVocabulary = CmiVocabulary {
    version: ScormVersion::V1_2,
    api_global: "API",
    initialize: "LMSInitialize",
    terminate: "LMSFinish",
    get_value: "LMSGetValue",
    set_value: "LMSSetValue",
    commit: "LMSCommit",
    completion_status: "cmi.core.lesson_status",
    success_status: None,
    location: "cmi.core.lesson_location",
    score_raw: "cmi.core.score.raw",
    score_min: "cmi.core.score.min",
    score_max: "cmi.core.score.max",
    score_scaled: None,
    progress_measure: None,
    suspend_data: "cmi.suspend_data",
    session_time: "cmi.core.session_time",
};

pub const SCORM_2004: CmiVocabulary = CmiVocabulary {
    version: ScormVersion::V2004,
    api_global: "API_1484_11",
    initialize: "Initialize",
    terminate: "Terminate",
    get_value: "GetValue",
    set_value: "SetValue",
    commit: "Commit",
    completion_status: "cmi.completion_status",
    success_status: Some("cmi.success_status"),
    location: "cmi.location",
    score_raw: "cmi.score.raw",
    score_min: "cmi.score.min",
    score_max: "cmi.score.max",
    score_scaled: Some("cmi.score.scaled"),
    progress_measure: Some("cmi.progress_measure"),
    suspend_data: "cmi.suspend_data",
    session_time: "cmi.session_time",
};

impl CmiVocabulary {
    pub fn for_version(version: ScormVersion) -> &'static CmiVocabulary {
        match version {
            ScormVersion::V1_2 => &SCORM_1_2,
            ScormVersion::V2004 => &SCORM_2004,
        }
    }
}

/// Format an elapsed session length for the edition's `session_time`.
///
/// 1.2 uses `CMITimespan` (`HH:MM:SS`, hours capped at 9999); 2004 uses an
/// ISO 8601 duration.
///
/// # Examples
///
/// ```
/// use scormkit::model::ScormVersion;
/// use scormkit::runtime::format_session_time;
///
/// assert_eq!(format_session_time(ScormVersion::V1_2, 3725), "01:02:05");
/// assert_eq!(format_session_time(ScormVersion::V2004, 3725), "PT1H2M5S");
/// ```
pub fn format_session_time(version: ScormVersion, seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    match version {
        ScormVersion::V1_2 => format!("{:02}:{:02}:{:02}", hours.min(9999), minutes, secs),
        ScormVersion::V2004 => format!("PT{hours}H{minutes}M{secs}S"),
    }
}
