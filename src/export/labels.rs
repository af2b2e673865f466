//! User-facing strings of the generated pages.

use serde::{Deserialize, Serialize};

/// Language of the generated pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// BCP 47 tag for `lang` attributes.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Fr => &FRENCH,
            Locale::En => &ENGLISH,
        }
    }
}

/// Page strings for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub home: &'static str,
    pub modules_heading: &'static str,
    pub module: &'static str,
    pub minutes_short: &'static str,
    pub minutes: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub complete: &'static str,
    pub completed_alert: &'static str,
    pub of: &'static str,
    pub placeholder_intro: &'static str,
    pub placeholder_body: &'static str,
    pub resume: &'static str,
    pub time: &'static str,
    pub quiz_link: &'static str,
    pub quiz_title: &'static str,
    pub quiz_intro: &'static str,
    pub question: &'static str,
    pub submit: &'static str,
    pub results: &'static str,
    pub back_home: &'static str,
    pub quiz_passed: &'static str,
    pub quiz_failed: &'static str,
    pub status_not_attempted: &'static str,
    pub status_incomplete: &'static str,
    pub status_completed: &'static str,
    pub status_passed: &'static str,
    pub status_failed: &'static str,
}

pub const FRENCH: Labels = Labels {
    home: "Accueil",
    modules_heading: "Modules de la formation",
    module: "Module",
    minutes_short: "min",
    minutes: "minutes",
    previous: "← Module précédent",
    next: "Module suivant →",
    complete: "Terminer la formation ✓",
    completed_alert: "Félicitations ! Vous avez terminé la formation.",
    of: "sur",
    placeholder_intro: "Contenu du module",
    placeholder_body: "Ce module fait partie de votre formation. Parcourez le contenu puis naviguez vers le module suivant.",
    resume: "Reprendre",
    time: "Temps",
    quiz_link: "Évaluation finale",
    quiz_title: "Évaluation finale",
    quiz_intro: "Répondez aux questions suivantes pour valider votre formation.",
    question: "Question",
    submit: "Valider mes réponses",
    results: "Résultats",
    back_home: "Retour à l'accueil",
    quiz_passed: "Félicitations ! Vous avez réussi l'évaluation.",
    quiz_failed: "Vous n'avez pas atteint le score minimum requis",
    status_not_attempted: "Non commencé",
    status_incomplete: "En cours",
    status_completed: "Terminé",
    status_passed: "Réussi",
    status_failed: "Échoué",
};

pub const ENGLISH: Labels = Labels {
    home: "Home",
    modules_heading: "Course modules",
    module: "Module",
    minutes_short: "min",
    minutes: "minutes",
    previous: "← Previous module",
    next: "Next module →",
    complete: "Finish the course ✓",
    completed_alert: "Congratulations! You have completed the course.",
    of: "of",
    placeholder_intro: "Content of module",
    placeholder_body: "This module is part of your course. Read through it, then move on to the next module.",
    resume: "Resume",
    time: "Time",
    quiz_link: "Final assessment",
    quiz_title: "Final assessment",
    quiz_intro: "Answer the following questions to validate your course.",
    question: "Question",
    submit: "Submit my answers",
    results: "Results",
    back_home: "Back to home",
    quiz_passed: "Congratulations! You passed the assessment.",
    quiz_failed: "You did not reach the required minimum score",
    status_not_attempted: "Not started",
    status_incomplete: "In progress",
    status_completed: "Completed",
    status_passed: "Passed",
    status_failed: "Failed",
};
