//! HTML page generation: index, one page per module, and the quiz.
//!
//! Pages only talk to the LMS through the `ScormAPI` object defined in
//! `scorm_api.js`, so the same markup serves both SCORM editions. Each page
//! opens the session on load and closes it on `pagehide`/`beforeunload`;
//! `terminate()` is idempotent, so both handlers may fire.

use std::fmt::Write;

use serde_json::json;

use crate::error::Result;
use crate::model::{
    EvaluationSet, FormationExport, MasteryScore, ModuleContent, ModuleExport, module_page_name,
};
use crate::render::{escape_html, js_string, js_value, render_document, render_plain_text};

use super::labels::Locale;
use super::{INDEX_PAGE, QUIZ_PAGE, SHIM_FILE, STYLESHEET};

/// Closes the tracking session whichever way the learner leaves the page.
const SESSION_GUARD: &str = r#"
    window.addEventListener('pagehide', function() {
      ScormAPI.terminate();
    });
    window.addEventListener('beforeunload', function() {
      ScormAPI.terminate();
    });
"#;

const INDEX_SCRIPT: &str = r#"
    document.addEventListener('DOMContentLoaded', function() {
      ScormAPI.initialize();
      ScormAPI.markAttempted();
      updateProgress();
      showResume();
      startClock();
    });

    function updateProgress() {
      var status = ScormAPI.getLessonStatus();
      var statusEl = document.getElementById('progress-status');
      if (statusEl && status) {
        statusEl.textContent = statusLabels[status] || status;
      }
    }

    function showResume() {
      var location = ScormAPI.getLessonLocation();
      var link = document.getElementById('resume-link');
      if (link && /^module_\d+\.html$/.test(location)) {
        link.setAttribute('href', location);
        link.classList.remove('hidden');
      }
    }

    function pad(n) {
      return (n < 10 ? '0' : '') + n;
    }

    function startClock() {
      var started = Date.now();
      var timeEl = document.getElementById('progress-time');
      setInterval(function() {
        var secs = Math.floor((Date.now() - started) / 1000);
        var h = Math.floor(secs / 3600);
        var m = Math.floor((secs % 3600) / 60);
        if (timeEl) {
          timeEl.textContent = timeLabel + ': ' + pad(h) + ':' + pad(m) + ':' + pad(secs % 60);
        }
      }, 1000);
    }
"#;

const MODULE_SCRIPT: &str = r#"
    document.addEventListener('DOMContentLoaded', function() {
      ScormAPI.initialize();
      ScormAPI.setLessonLocation(bookmark);
      ScormAPI.markAttempted();
      ScormAPI.setProgress(Math.round(((moduleIndex + 1) / totalModules) * 100));
      ScormAPI.commit();
    });

    function markProgress() {
      ScormAPI.commit();
    }

    function completeFormation() {
      ScormAPI.setLessonStatus('completed');
      ScormAPI.setProgress(100);
      ScormAPI.commit();
      alert(completedMessage);
      window.location.href = 'index.html';
    }
"#;

const QUIZ_SCRIPT: &str = r#"
    document.addEventListener('DOMContentLoaded', function() {
      ScormAPI.initialize();
      ScormAPI.markAttempted();
    });

    document.getElementById('quiz-form').addEventListener('submit', function(e) {
      e.preventDefault();

      var score = 0;
      var total = correctAnswers.length;

      correctAnswers.forEach(function(correct, i) {
        var selected = document.querySelector('input[name="q' + i + '"]:checked');
        if (selected && parseInt(selected.value, 10) === correct) {
          score++;
        }
      });

      var percentage = total > 0 ? Math.round((score / total) * 100) : 0;
      var passed = percentage >= masteryScore;

      ScormAPI.setScore(percentage, 0, 100);
      ScormAPI.setLessonStatus(passed ? 'passed' : 'failed');
      ScormAPI.commit();

      document.getElementById('quiz-form').classList.add('hidden');
      document.getElementById('results').classList.remove('hidden');
      document.getElementById('score-value').textContent = score;
      document.getElementById('result-message').textContent = passed
        ? passedMessage
        : failedMessage + ' (' + masteryScore + '%).';
    });
"#;

/// Generate `index.html`.
pub fn generate_index_page(
    formation: &FormationExport,
    include_quiz: bool,
    locale: Locale,
) -> Result<String> {
    let labels = locale.labels();
    let mut html = String::new();
    push_head(&mut html, locale, formation.title());

    html.push_str("<body>\n  <div class=\"container\">\n    <header class=\"header\">\n");
    writeln!(html, "      <h1>{}</h1>", escape_html(formation.title())).unwrap();
    if let Some(desc) = formation.description() {
        writeln!(html, "      <p class=\"description\">{}</p>", escape_html(desc)).unwrap();
    }
    html.push_str("    </header>\n\n    <main class=\"content\">\n");
    writeln!(html, "      <h2>{}</h2>", escape_html(labels.modules_heading)).unwrap();
    html.push_str("      <div class=\"modules-list\">\n");
    for module in formation.modules() {
        writeln!(
            html,
            "        <a href=\"{}\" class=\"module-card\">",
            module.page_name()
        )
        .unwrap();
        writeln!(
            html,
            "          <span class=\"module-number\">{}</span>",
            module.position()
        )
        .unwrap();
        html.push_str("          <div class=\"module-info\">\n");
        writeln!(html, "            <h3>{}</h3>", escape_html(module.title())).unwrap();
        if let Some(minutes) = module.duration_minutes() {
            writeln!(
                html,
                "            <span class=\"module-duration\">{minutes} {}</span>",
                escape_html(labels.minutes_short)
            )
            .unwrap();
        }
        html.push_str("          </div>\n");
        html.push_str("          <span class=\"module-arrow\">→</span>\n");
        html.push_str("        </a>\n");
    }
    html.push_str("      </div>\n");

    html.push_str("      <div class=\"index-actions\">\n");
    writeln!(
        html,
        "        <a id=\"resume-link\" href=\"{INDEX_PAGE}\" class=\"nav-btn resume hidden\">{}</a>",
        escape_html(labels.resume)
    )
    .unwrap();
    if include_quiz {
        writeln!(
            html,
            "        <a href=\"{QUIZ_PAGE}\" class=\"nav-btn quiz-link\">{}</a>",
            escape_html(labels.quiz_link)
        )
        .unwrap();
    }
    html.push_str("      </div>\n    </main>\n\n");

    html.push_str("    <footer class=\"footer\">\n      <div class=\"progress-info\">\n");
    writeln!(
        html,
        "        <span id=\"progress-status\">{}</span>",
        escape_html(labels.status_not_attempted)
    )
    .unwrap();
    writeln!(
        html,
        "        <span id=\"progress-time\">{}: 00:00:00</span>",
        escape_html(labels.time)
    )
    .unwrap();
    html.push_str("      </div>\n    </footer>\n  </div>\n\n  <script>\n");

    let status_labels = json!({
        "not attempted": labels.status_not_attempted,
        "unknown": labels.status_not_attempted,
        "incomplete": labels.status_incomplete,
        "completed": labels.status_completed,
        "passed": labels.status_passed,
        "failed": labels.status_failed,
    });
    writeln!(html, "    var statusLabels = {};", js_value(&status_labels)?).unwrap();
    writeln!(html, "    var timeLabel = {};", js_string(labels.time)).unwrap();
    html.push_str(INDEX_SCRIPT);
    html.push_str(SESSION_GUARD);
    html.push_str("  </script>\n</body>\n</html>\n");
    Ok(html)
}

/// Generate the page for `module`, one of `total` modules.
pub fn generate_module_page(module: &ModuleExport, total: usize, locale: Locale) -> String {
    let labels = locale.labels();
    let index = module.index();
    let position = module.position();
    let prev_page = (index > 0).then(|| module_page_name(index));
    let next_page = (position < total).then(|| module_page_name(position + 1));
    let progress = progress_percent(index, total);

    let mut html = String::new();
    push_head(&mut html, locale, module.title());

    html.push_str("<body>\n  <div class=\"container\">\n    <header class=\"header\">\n");
    writeln!(
        html,
        "      <div class=\"breadcrumb\">\n        <a href=\"{INDEX_PAGE}\">{}</a> / {} {position}\n      </div>",
        escape_html(labels.home),
        escape_html(labels.module)
    )
    .unwrap();
    writeln!(html, "      <h1>{}</h1>", escape_html(module.title())).unwrap();
    if let Some(minutes) = module.duration_minutes() {
        writeln!(
            html,
            "      <span class=\"duration-badge\">{minutes} {}</span>",
            escape_html(labels.minutes)
        )
        .unwrap();
    }
    html.push_str("    </header>\n\n    <main class=\"content module-content\">\n");

    let body = match module.content() {
        ModuleContent::Document(doc) => render_document(doc),
        ModuleContent::Text(text) => render_plain_text(text),
        ModuleContent::Empty => String::new(),
    };
    if body.is_empty() {
        html.push_str("      <div class=\"placeholder-content\">\n");
        writeln!(
            html,
            "        <p>{} \"{}\"</p>",
            escape_html(labels.placeholder_intro),
            escape_html(module.title())
        )
        .unwrap();
        writeln!(html, "        <p>{}</p>", escape_html(labels.placeholder_body)).unwrap();
        html.push_str("      </div>\n");
    } else {
        writeln!(html, "      {body}").unwrap();
    }
    html.push_str("    </main>\n\n    <nav class=\"navigation\">\n");

    match prev_page {
        Some(prev) => writeln!(
            html,
            "      <a href=\"{prev}\" class=\"nav-btn prev\">{}</a>",
            escape_html(labels.previous)
        ),
        None => writeln!(
            html,
            "      <span class=\"nav-btn disabled\">{}</span>",
            escape_html(labels.previous)
        ),
    }
    .unwrap();
    match next_page {
        Some(next) => writeln!(
            html,
            "      <a href=\"{next}\" class=\"nav-btn next\" onclick=\"markProgress()\">{}</a>",
            escape_html(labels.next)
        ),
        None => writeln!(
            html,
            "      <button type=\"button\" onclick=\"completeFormation()\" class=\"nav-btn complete\">{}</button>",
            escape_html(labels.complete)
        ),
    }
    .unwrap();
    html.push_str("    </nav>\n\n");

    html.push_str("    <footer class=\"footer\">\n      <div class=\"progress-bar\">\n");
    writeln!(
        html,
        "        <div class=\"progress-fill\" id=\"progress-fill\" style=\"width: {progress}%\"></div>"
    )
    .unwrap();
    html.push_str("      </div>\n");
    writeln!(
        html,
        "      <span class=\"progress-text\">{} {position} {} {total}</span>",
        escape_html(labels.module),
        escape_html(labels.of)
    )
    .unwrap();
    html.push_str("    </footer>\n  </div>\n\n  <script>\n");

    writeln!(html, "    var moduleIndex = {index};").unwrap();
    writeln!(html, "    var totalModules = {total};").unwrap();
    writeln!(html, "    var bookmark = {};", js_string(&module.page_name())).unwrap();
    writeln!(
        html,
        "    var completedMessage = {};",
        js_string(labels.completed_alert)
    )
    .unwrap();
    html.push_str(MODULE_SCRIPT);
    html.push_str(SESSION_GUARD);
    html.push_str("  </script>\n</body>\n</html>\n");
    html
}

/// Generate `quiz.html`; grading happens in the page against `mastery`.
pub fn generate_quiz_page(
    evaluations: &EvaluationSet,
    mastery: MasteryScore,
    locale: Locale,
) -> Result<String> {
    let labels = locale.labels();
    let mut html = String::new();
    push_head(&mut html, locale, labels.quiz_title);

    html.push_str("<body>\n  <div class=\"container\">\n    <header class=\"header\">\n");
    writeln!(
        html,
        "      <div class=\"breadcrumb\">\n        <a href=\"{INDEX_PAGE}\">{}</a>\n      </div>",
        escape_html(labels.home)
    )
    .unwrap();
    writeln!(html, "      <h1>{}</h1>", escape_html(labels.quiz_title)).unwrap();
    writeln!(html, "      <p>{}</p>", escape_html(labels.quiz_intro)).unwrap();
    html.push_str("    </header>\n\n    <main class=\"content quiz-content\">\n");
    html.push_str("      <form id=\"quiz-form\">\n");

    for (i, question) in evaluations.questions().iter().enumerate() {
        writeln!(html, "        <div class=\"question\" data-question=\"{i}\">").unwrap();
        writeln!(
            html,
            "          <h3>{} {}</h3>",
            escape_html(labels.question),
            i + 1
        )
        .unwrap();
        writeln!(
            html,
            "          <p class=\"question-text\">{}</p>",
            escape_html(&question.prompt)
        )
        .unwrap();
        html.push_str("          <div class=\"answers\">\n");
        for (j, option) in question.options.iter().enumerate() {
            html.push_str("            <label class=\"answer-option\">\n");
            writeln!(
                html,
                "              <input type=\"radio\" name=\"q{i}\" value=\"{j}\">"
            )
            .unwrap();
            writeln!(html, "              <span>{}</span>", escape_html(option)).unwrap();
            html.push_str("            </label>\n");
        }
        html.push_str("          </div>\n        </div>\n");
    }

    writeln!(
        html,
        "        <button type=\"submit\" class=\"submit-btn\">{}</button>",
        escape_html(labels.submit)
    )
    .unwrap();
    html.push_str("      </form>\n\n");

    html.push_str("      <div id=\"results\" class=\"results hidden\">\n");
    writeln!(html, "        <h2>{}</h2>", escape_html(labels.results)).unwrap();
    writeln!(
        html,
        "        <div class=\"score-display\">\n          <span class=\"score-number\" id=\"score-value\">0</span>\n          <span class=\"score-label\">/ {}</span>\n        </div>",
        evaluations.len()
    )
    .unwrap();
    html.push_str("        <p id=\"result-message\"></p>\n");
    writeln!(
        html,
        "        <a href=\"{INDEX_PAGE}\" class=\"nav-btn\">{}</a>",
        escape_html(labels.back_home)
    )
    .unwrap();
    html.push_str("      </div>\n    </main>\n  </div>\n\n  <script>\n");

    writeln!(
        html,
        "    var correctAnswers = {};",
        js_value(&evaluations.answer_key())?
    )
    .unwrap();
    writeln!(html, "    var masteryScore = {mastery};").unwrap();
    writeln!(html, "    var passedMessage = {};", js_string(labels.quiz_passed)).unwrap();
    writeln!(html, "    var failedMessage = {};", js_string(labels.quiz_failed)).unwrap();
    html.push_str(QUIZ_SCRIPT);
    html.push_str(SESSION_GUARD);
    html.push_str("  </script>\n</body>\n</html>\n");
    Ok(html)
}

/// Width of the progress bar on the page at `index`, in percent.
pub fn progress_percent(index: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (((index + 1) as f64 / total as f64) * 100.0).round() as u32
}

fn push_head(html: &mut String, locale: Locale, title: &str) {
    writeln!(
        html,
        r#"<!DOCTYPE html>
<html lang="{}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{}</title>
  <link rel="stylesheet" href="{STYLESHEET}">
  <script src="{SHIM_FILE}"></script>
</head>"#,
        locale.tag(),
        escape_html(title)
    )
    .unwrap();
}
