//! Export snapshot of a formation.
//!
//! A [`FormationExport`] is built once per export by
//! [`crate::normalize::normalize_formation`] and only read afterwards; the
//! fields are private so positions cannot drift from the module order.

use super::document::DocumentNode;

/// Read-only snapshot of a formation being exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormationExport {
    id: String,
    title: String,
    description: Option<String>,
    modules: Vec<ModuleExport>,
    evaluations: Option<EvaluationSet>,
}

impl FormationExport {
    pub(crate) fn new(
        id: String,
        title: String,
        description: Option<String>,
        modules: Vec<ModuleExport>,
        evaluations: Option<EvaluationSet>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            modules,
            evaluations,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Modules in display order.
    pub fn modules(&self) -> &[ModuleExport] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn evaluations(&self) -> Option<&EvaluationSet> {
        self.evaluations.as_ref()
    }

    /// True when there is at least one question to put on a quiz page.
    pub fn has_questions(&self) -> bool {
        self.evaluations.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// A module in the export snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleExport {
    id: String,
    title: String,
    index: usize,
    source_order: i32,
    duration_minutes: Option<u32>,
    content: ModuleContent,
}

impl ModuleExport {
    pub(crate) fn new(
        id: String,
        title: String,
        index: usize,
        source_order: i32,
        duration_minutes: Option<u32>,
        content: ModuleContent,
    ) -> Self {
        Self {
            id,
            title,
            index,
            source_order,
            duration_minutes,
            content,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 0-based display index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based position used in identifiers and file names.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    /// The `ordre` the host stored; informational only.
    pub fn source_order(&self) -> i32 {
        self.source_order
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    pub fn content(&self) -> &ModuleContent {
        &self.content
    }

    /// Archive path of this module's page.
    pub fn page_name(&self) -> String {
        module_page_name(self.position())
    }
}

/// Archive path of the page at 1-based `position`.
pub fn module_page_name(position: usize) -> String {
    format!("module_{position}.html")
}

/// Body of a module.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleContent {
    /// Structured rich text.
    Document(DocumentNode),
    /// Unstructured text, rendered escaped.
    Text(String),
    #[default]
    Empty,
}

/// Ordered set of multiple-choice questions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationSet {
    questions: Vec<Question>,
}

impl EvaluationSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Correct option index of every question, in order.
    pub fn answer_key(&self) -> Vec<usize> {
        self.questions.iter().map(|q| q.correct_option).collect()
    }
}

/// A single-answer multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: Vec<String>, correct_option: usize) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct_option,
        }
    }
}
