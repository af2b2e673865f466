//! SCORM runtime session over a [`HostChannel`].
//!
//! Mirrors the generated `scorm_api.js`: every call is a no-op until
//! `initialize` succeeds, and the session is terminated when dropped.

use std::time::Instant;

use serde_json::{Map, Value};

use crate::model::ScormVersion;

use super::host::HostChannel;
use super::scoring::QuizOutcome;
use super::vocabulary::{CmiVocabulary, format_session_time};

/// Statuses that mean the learner has not started yet.
const UNSTARTED_STATUSES: &[&str] = &["", "not attempted", "unknown"];

/// A tracking session with an LMS.
pub struct ScormSession<H: HostChannel> {
    host: H,
    vocab: &'static CmiVocabulary,
    initialized: bool,
    started: Option<Instant>,
}

impl<H: HostChannel> ScormSession<H> {
    pub fn new(host: H, version: ScormVersion) -> Self {
        Self {
            host,
            vocab: CmiVocabulary::for_version(version),
            initialized: false,
            started: None,
        }
    }

    pub fn version(&self) -> ScormVersion {
        self.vocab.version
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Open the session. Returns false when no host answered.
    pub fn initialize(&mut self) -> bool {
        if self.initialized {
            return true;
        }
        let result = self.host.send(self.vocab.initialize, &[""]);
        self.initialized = result.as_deref() == Some("true");
        if self.initialized {
            self.started = Some(Instant::now());
        }
        self.initialized
    }

    /// Record session time, commit and close. Safe to call repeatedly.
    pub fn terminate(&mut self) {
        if !self.initialized {
            return;
        }
        let elapsed = self.started.map_or(0, |t| t.elapsed().as_secs());
        let session_time = format_session_time(self.vocab.version, elapsed);
        self.set_value(self.vocab.session_time, &session_time);
        self.commit();
        self.host.send(self.vocab.terminate, &[""]);
        self.initialized = false;
        self.started = None;
    }

    pub fn get_value(&mut self, element: &str) -> String {
        if !self.initialized {
            return String::new();
        }
        self.host
            .send(self.vocab.get_value, &[element])
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, element: &str, value: &str) -> bool {
        if !self.initialized {
            return false;
        }
        self.host.send(self.vocab.set_value, &[element, value]).as_deref() == Some("true")
    }

    pub fn commit(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.host.send(self.vocab.commit, &[""]).as_deref() == Some("true")
    }

    /// Set the learner status using 1.2 vocabulary.
    ///
    /// On 2004, `passed`/`failed` go to `cmi.success_status` and mark the
    /// attempt completed; other values go to `cmi.completion_status`.
    pub fn set_lesson_status(&mut self, status: &str) {
        match (self.vocab.success_status, status) {
            (Some(success), "passed" | "failed") => {
                self.set_value(success, status);
                self.set_value(self.vocab.completion_status, "completed");
            }
            _ => {
                self.set_value(self.vocab.completion_status, status);
            }
        }
    }

    /// Current status in 1.2 vocabulary.
    pub fn lesson_status(&mut self) -> String {
        if let Some(success) = self.vocab.success_status {
            let s = self.get_value(success);
            if s == "passed" || s == "failed" {
                return s;
            }
        }
        self.get_value(self.vocab.completion_status)
    }

    /// Mark the attempt `incomplete` unless a status was already recorded.
    pub fn mark_attempted(&mut self) {
        let status = self.lesson_status();
        if UNSTARTED_STATUSES.contains(&status.as_str()) {
            self.set_lesson_status("incomplete");
        }
    }

    pub fn set_location(&mut self, location: &str) {
        self.set_value(self.vocab.location, location);
    }

    pub fn location(&mut self) -> String {
        self.get_value(self.vocab.location)
    }

    /// Record a score; 2004 also receives the scaled score.
    pub fn set_score(&mut self, raw: f64, min: f64, max: f64) {
        self.set_value(self.vocab.score_raw, &format_number(raw));
        self.set_value(self.vocab.score_min, &format_number(min));
        self.set_value(self.vocab.score_max, &format_number(max));
        if let Some(scaled) = self.vocab.score_scaled
            && max > min
        {
            self.set_value(scaled, &format_number((raw - min) / (max - min)));
        }
    }

    /// Record progress as a percentage.
    ///
    /// 2004 writes `cmi.progress_measure`; 1.2 merges `{"progress": n}` into
    /// the suspend data.
    pub fn set_progress(&mut self, percent: f64) {
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        match self.vocab.progress_measure {
            Some(measure) => {
                self.set_value(measure, &format_number(percent / 100.0));
            }
            None => {
                let existing = self.get_value(self.vocab.suspend_data);
                let merged = merge_progress(&existing, percent);
                self.set_value(self.vocab.suspend_data, &merged);
            }
        }
    }

    /// Store a graded quiz and commit.
    pub fn record_quiz_outcome(&mut self, outcome: &QuizOutcome) {
        self.set_score(f64::from(outcome.percentage), 0.0, 100.0);
        self.set_lesson_status(outcome.lesson_status());
        self.commit();
    }
}

impl<H: HostChannel> Drop for ScormSession<H> {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Merge a progress value into suspend data.
///
/// Keeps every other key of an existing JSON object; anything that is not a
/// JSON object is replaced by a fresh one.
///
/// # Examples
///
/// ```
/// use scormkit::runtime::merge_progress;
///
/// assert_eq!(merge_progress(r#"{"page":3}"#, 50.0), r#"{"page":3,"progress":50}"#);
/// assert_eq!(merge_progress("not json", 50.0), r#"{"progress":50}"#);
/// ```
pub fn merge_progress(existing: &str, percent: f64) -> String {
    let mut data = match serde_json::from_str::<Value>(existing) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    data.insert("progress".to_string(), number_value(percent));
    Value::Object(data).to_string()
}

/// JSON number without a trailing `.0` for whole values, as JS prints them.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

fn format_number(n: f64) -> String {
    number_value(n).to_string()
}
