//! Quiz grading, as performed by the exported quiz page.
//!
//! The package runs outside the host's trust boundary, so grading happens in
//! the learner's browser against an embedded answer key. This function is
//! the reference for that script.

use crate::model::MasteryScore;

/// Result of grading a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    /// `round(correct / total * 100)`, 0 for an empty quiz.
    pub percentage: u8,
    pub passed: bool,
}

impl QuizOutcome {
    /// Status to report in 1.2 vocabulary.
    pub fn lesson_status(&self) -> &'static str {
        if self.passed { "passed" } else { "failed" }
    }
}

/// Grade responses against an answer key.
///
/// `responses[i]` is the option picked for question `i`, `None` when
/// unanswered. Missing trailing responses count as unanswered.
///
/// # Examples
///
/// ```
/// use scormkit::model::MasteryScore;
/// use scormkit::runtime::grade_quiz;
///
/// let key = [0, 1, 2, 0, 1];
/// let picked = [Some(0), Some(1), Some(2), Some(0), Some(0)];
/// let outcome = grade_quiz(&key, &picked, MasteryScore::new(80));
/// assert_eq!(outcome.percentage, 80);
/// assert!(outcome.passed);
/// ```
pub fn grade_quiz(
    answer_key: &[usize],
    responses: &[Option<usize>],
    mastery: MasteryScore,
) -> QuizOutcome {
    let total = answer_key.len();
    let correct = answer_key
        .iter()
        .enumerate()
        .filter(|&(i, &expected)| responses.get(i).copied().flatten() == Some(expected))
        .count();

    let percentage = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u8
    };

    QuizOutcome {
        correct,
        total,
        percentage,
        passed: mastery.is_met_by(percentage),
    }
}
