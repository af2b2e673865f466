//! `scorm_api.js` generation.
//!
//! The shim exposes a single `ScormAPI` object with the same semantics as
//! [`crate::runtime::ScormSession`]. Method names and CMI paths come from the
//! edition's [`CmiVocabulary`], so a shim only mentions its own edition's
//! data model.

use std::fmt::Write;

use crate::model::ScormVersion;
use crate::render::js_string;
use crate::runtime::CmiVocabulary;

/// Maximum number of parent windows walked while looking for the LMS API.
const MAX_DISCOVERY_HOPS: u32 = 500;

const SESSION_TIME_1_2: &str = r#"
  function pad(n) {
    return (n < 10 ? '0' : '') + n;
  }

  function formatSessionTime(seconds) {
    var h = Math.min(Math.floor(seconds / 3600), 9999);
    var m = Math.floor((seconds % 3600) / 60);
    var s = seconds % 60;
    return pad(h) + ':' + pad(m) + ':' + pad(s);
  }
"#;

const SESSION_TIME_2004: &str = r#"
  function formatSessionTime(seconds) {
    var h = Math.floor(seconds / 3600);
    var m = Math.floor((seconds % 3600) / 60);
    var s = seconds % 60;
    return 'PT' + h + 'H' + m + 'M' + s + 'S';
  }
"#;

const RUNTIME: &str = r#"
  var api = null;
  var initialized = false;
  var startedAt = null;

  function findAPI(win) {
    var hops = 0;
    try {
      while (win) {
        if (win[API_NAME]) {
          return win[API_NAME];
        }
        if (!win.parent || win.parent === win || hops >= MAX_HOPS) {
          break;
        }
        win = win.parent;
        hops++;
      }
    } catch (e) {
      // cross-origin frame
    }
    return null;
  }

  function getAPI() {
    if (api) {
      return api;
    }
    api = findAPI(window);
    if (!api && window.opener) {
      api = findAPI(window.opener);
    }
    return api;
  }

  function call(method, args) {
    var lms = getAPI();
    if (!lms || typeof lms[method] !== 'function') {
      return null;
    }
    try {
      return lms[method].apply(lms, args);
    } catch (e) {
      return null;
    }
  }

  function isTrue(result) {
    return result === true || result === 'true';
  }

  function initialize() {
    if (initialized) {
      return true;
    }
    initialized = isTrue(call(METHODS.initialize, ['']));
    if (initialized) {
      startedAt = Date.now();
    }
    return initialized;
  }

  function terminate() {
    if (!initialized) {
      return false;
    }
    var elapsed = startedAt === null ? 0 : Math.floor((Date.now() - startedAt) / 1000);
    setValue(CMI.sessionTime, formatSessionTime(elapsed));
    commit();
    var result = isTrue(call(METHODS.terminate, ['']));
    initialized = false;
    startedAt = null;
    return result;
  }

  function getValue(element) {
    if (!initialized) {
      return '';
    }
    var value = call(METHODS.getValue, [element]);
    return value === null || value === undefined ? '' : String(value);
  }

  function setValue(element, value) {
    if (!initialized) {
      return false;
    }
    return isTrue(call(METHODS.setValue, [element, String(value)]));
  }

  function commit() {
    if (!initialized) {
      return false;
    }
    return isTrue(call(METHODS.commit, ['']));
  }

  function setLessonStatus(status) {
    if (CMI.successStatus && (status === 'passed' || status === 'failed')) {
      setValue(CMI.successStatus, status);
      return setValue(CMI.completionStatus, 'completed');
    }
    return setValue(CMI.completionStatus, status);
  }

  function getLessonStatus() {
    if (CMI.successStatus) {
      var success = getValue(CMI.successStatus);
      if (success === 'passed' || success === 'failed') {
        return success;
      }
    }
    return getValue(CMI.completionStatus);
  }

  function markAttempted() {
    var status = getLessonStatus();
    if (status === '' || status === 'not attempted' || status === 'unknown') {
      return setLessonStatus('incomplete');
    }
    return true;
  }

  function setLessonLocation(location) {
    return setValue(CMI.location, location);
  }

  function getLessonLocation() {
    return getValue(CMI.location);
  }

  function setScore(raw, min, max) {
    var ok = setValue(CMI.scoreRaw, raw);
    setValue(CMI.scoreMin, min);
    setValue(CMI.scoreMax, max);
    if (CMI.scoreScaled && max > min) {
      setValue(CMI.scoreScaled, (raw - min) / (max - min));
    }
    return ok;
  }

  function setProgress(percent) {
    var p = Math.max(0, Math.min(100, Number(percent) || 0));
    if (CMI.progressMeasure) {
      return setValue(CMI.progressMeasure, p / 100);
    }
    var data = {};
    try {
      var parsed = JSON.parse(getValue(CMI.suspendData));
      if (parsed && typeof parsed === 'object' && !Array.isArray(parsed)) {
        data = parsed;
      }
    } catch (e) {
      // not JSON; start over
    }
    data.progress = p;
    return setValue(CMI.suspendData, JSON.stringify(data));
  }

  return {
    version: VERSION,
    initialize: initialize,
    terminate: terminate,
    getValue: getValue,
    setValue: setValue,
    commit: commit,
    setLessonStatus: setLessonStatus,
    getLessonStatus: getLessonStatus,
    markAttempted: markAttempted,
    setLessonLocation: setLessonLocation,
    getLessonLocation: getLessonLocation,
    setScore: setScore,
    setProgress: setProgress
  };
"#;

/// Generate the runtime shim for `version`.
pub fn generate_shim(version: ScormVersion) -> String {
    let vocab = CmiVocabulary::for_version(version);
    let mut js = String::new();

    writeln!(js, "// SCORM {} runtime adapter", version.schema_version()).unwrap();
    js.push_str("var ScormAPI = (function() {\n  'use strict';\n\n");
    writeln!(js, "  var VERSION = {};", js_string(version.as_str())).unwrap();
    writeln!(js, "  var API_NAME = {};", js_string(vocab.api_global)).unwrap();
    writeln!(js, "  var MAX_HOPS = {MAX_DISCOVERY_HOPS};").unwrap();

    push_table(
        &mut js,
        "METHODS",
        &[
            ("initialize", Some(vocab.initialize)),
            ("terminate", Some(vocab.terminate)),
            ("getValue", Some(vocab.get_value)),
            ("setValue", Some(vocab.set_value)),
            ("commit", Some(vocab.commit)),
        ],
    );
    push_table(
        &mut js,
        "CMI",
        &[
            ("completionStatus", Some(vocab.completion_status)),
            ("successStatus", vocab.success_status),
            ("location", Some(vocab.location)),
            ("scoreRaw", Some(vocab.score_raw)),
            ("scoreMin", Some(vocab.score_min)),
            ("scoreMax", Some(vocab.score_max)),
            ("scoreScaled", vocab.score_scaled),
            ("progressMeasure", vocab.progress_measure),
            ("suspendData", Some(vocab.suspend_data)),
            ("sessionTime", Some(vocab.session_time)),
        ],
    );

    js.push_str(match version {
        ScormVersion::V1_2 => SESSION_TIME_1_2,
        ScormVersion::V2004 => SESSION_TIME_2004,
    });
    js.push_str(RUNTIME);
    js.push_str("})();\n");
    js
}

/// Emit `var name = { key: "value", ... };`, skipping absent entries.
fn push_table(js: &mut String, name: &str, entries: &[(&str, Option<&str>)]) {
    let present: Vec<_> = entries
        .iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();
    writeln!(js, "  var {name} = {{").unwrap();
    for (i, (key, value)) in present.iter().enumerate() {
        let sep = if i + 1 < present.len() { "," } else { "" };
        writeln!(js, "    {key}: {}{sep}", js_string(value)).unwrap();
    }
    js.push_str("  };\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_1_2_vocabulary_only() {
        let js = generate_shim(ScormVersion::V1_2);
        assert!(js.contains("var API_NAME = \"API\";"));
        assert!(js.contains("\"LMSInitialize\""));
        assert!(js.contains("\"LMSFinish\""));
        assert!(js.contains("\"cmi.core.lesson_status\""));
        assert!(js.contains("\"cmi.core.lesson_location\""));
        assert!(!js.contains("cmi.completion_status"));
        assert!(!js.contains("cmi.success_status"));
        assert!(!js.contains("API_1484_11"));
        assert!(!js.contains("\"Terminate\""));
    }

    #[test]
    fn test_2004_vocabulary_only() {
        let js = generate_shim(ScormVersion::V2004);
        assert!(js.contains("var API_NAME = \"API_1484_11\";"));
        assert!(js.contains("\"Initialize\""));
        assert!(js.contains("\"cmi.completion_status\""));
        assert!(js.contains("\"cmi.success_status\""));
        assert!(js.contains("\"cmi.progress_measure\""));
        assert!(js.contains("\"cmi.score.scaled\""));
        assert!(!js.contains("cmi.core."));
        assert!(!js.contains("LMSInitialize"));
    }

    #[test]
    fn test_discovery_is_bounded() {
        let js = generate_shim(ScormVersion::V1_2);
        assert!(js.contains("var MAX_HOPS = 500;"));
        assert!(js.contains("window.opener"));
        assert!(js.contains("catch (e)"));
    }

    #[test]
    fn test_session_time_format_per_edition() {
        assert!(generate_shim(ScormVersion::V1_2).contains("pad(h) + ':'"));
        assert!(generate_shim(ScormVersion::V2004).contains("'PT' + h + 'H'"));
    }

    #[test]
    fn test_exposes_helpers() {
        let js = generate_shim(ScormVersion::V2004);
        for name in [
            "initialize: initialize",
            "terminate: terminate",
            "setLessonStatus: setLessonStatus",
            "getLessonStatus: getLessonStatus",
            "markAttempted: markAttempted",
            "setLessonLocation: setLessonLocation",
            "getLessonLocation: getLessonLocation",
            "setScore: setScore",
            "setProgress: setProgress",
        ] {
            assert!(js.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_table_skips_absent_entries() {
        let mut js = String::new();
        push_table(&mut js, "T", &[("a", Some("x")), ("b", None), ("c", Some("y"))]);
        assert_eq!(js, "  var T = {\n    a: \"x\",\n    c: \"y\"\n  };\n");
    }
}
