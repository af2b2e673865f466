//! Content normalization.
//!
//! Turns persisted records into the [`FormationExport`] snapshot every
//! generator reads. Display positions come from array order only; the stored
//! `ordre` is carried along for diagnostics but never used for sequencing,
//! so gaps, duplicates and sentinel values such as `-1` cannot break the
//! numbering.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{
    DocumentNode, EvaluationSet, FormationExport, FormationRecord, ModuleContent, ModuleExport,
    ModuleRecord, Question,
};

/// Build the export snapshot for a formation.
///
/// Modules keep the order they are supplied in. Fails only when module
/// content is a malformed or overly deep document tree.
pub fn normalize_formation(record: &FormationRecord) -> Result<FormationExport> {
    let modules = record
        .modules
        .iter()
        .enumerate()
        .map(|(index, module)| normalize_module(index, module))
        .collect::<Result<Vec<_>>>()?;

    let evaluations = record.evaluations_data.as_ref().and_then(parse_evaluations);

    debug!(
        formation_id = %record.id,
        modules = modules.len(),
        questions = evaluations.as_ref().map_or(0, EvaluationSet::len),
        "normalized formation"
    );

    Ok(FormationExport::new(
        record.id.clone(),
        record.titre.clone(),
        non_blank(record.description.as_deref()),
        modules,
        evaluations,
    ))
}

fn normalize_module(index: usize, module: &ModuleRecord) -> Result<ModuleExport> {
    let content = match &module.contenu {
        None | Some(Value::Null) => ModuleContent::Empty,
        Some(Value::String(s)) if s.trim().is_empty() => ModuleContent::Empty,
        Some(Value::String(s)) => ModuleContent::Text(s.clone()),
        Some(doc @ Value::Object(obj)) if obj.contains_key("content") => {
            ModuleContent::Document(DocumentNode::from_json(doc)?)
        }
        Some(_) => {
            debug!(module_id = %module.id, "ignoring unrecognized module content");
            ModuleContent::Empty
        }
    };

    Ok(ModuleExport::new(
        module.id.clone(),
        module.titre.clone(),
        index,
        module.ordre,
        module.duree.filter(|&d| d > 0),
        content,
    ))
}

/// Extract questions from an evaluation payload.
///
/// Accepts `{"qcm": [...]}` or a bare array. Returns `None` when the payload
/// has neither shape.
pub fn parse_evaluations(data: &Value) -> Option<EvaluationSet> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(obj) => obj.get("qcm")?.as_array()?,
        _ => return None,
    };

    let questions = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| parse_question(i, item))
        .collect();

    Some(EvaluationSet::new(questions))
}

fn parse_question(index: usize, item: &Value) -> Option<Question> {
    let prompt = first_str(item, &["question", "text"]).unwrap_or_default();

    let options: Vec<String> = ["options", "answers"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_array))
        .map(|opts| opts.iter().map(option_label).collect())
        .unwrap_or_default();

    if options.is_empty() {
        warn!(question = index, "dropping question without options");
        return None;
    }

    let correct_option = match ["correctAnswer", "correct"]
        .iter()
        .find_map(|key| item.get(*key).filter(|v| !v.is_null()))
    {
        None => 0,
        Some(answer) => resolve_answer(answer, &options).unwrap_or_else(|| {
            warn!(question = index, %answer, "correct answer matches no option");
            options.len()
        }),
    };

    if correct_option >= options.len() {
        warn!(
            question = index,
            correct_option,
            options = options.len(),
            "correct answer index is out of range"
        );
    }

    Some(Question::new(prompt, options, correct_option))
}

/// Resolve an answer given as an index, a numeric string or an option label.
fn resolve_answer(answer: &Value, options: &[String]) -> Option<usize> {
    match answer {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<usize>().ok().or_else(|| {
                options
                    .iter()
                    .position(|o| o.trim() == s)
                    .or_else(|| options.iter().position(|o| o.trim().eq_ignore_ascii_case(s)))
            })
        }
        _ => None,
    }
}

fn option_label(option: &Value) -> String {
    match option {
        Value::String(s) => s.clone(),
        other => first_str(other, &["text", "label"]).unwrap_or_default(),
    }
}

fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
