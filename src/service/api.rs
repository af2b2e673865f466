//! Wire shapes of the export endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{ExportOptions, ExportRequest, MasteryScore, ScormVersion};

/// `POST /export` body, as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportApiRequest {
    #[serde(default)]
    pub formation_id: Option<String>,
    /// Defaults to `SCORM_1_2`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub options: Option<ExportApiOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportApiOptions {
    #[serde(default)]
    pub mastery_score: Option<f64>,
    #[serde(default)]
    pub include_evaluations: Option<bool>,
}

impl ExportApiRequest {
    /// Parse a raw body. Anything that is not a JSON object of the expected
    /// shape is an input error.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|_| Error::Input("Corps de requête invalide".into()))
    }

    /// Validate and convert into a typed request.
    ///
    /// `default_mastery` applies when the body carries no mastery score.
    pub fn into_request(self, default_mastery: MasteryScore) -> Result<ExportRequest> {
        let formation_id = self
            .formation_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Input("formationId est requis".into()))?;

        let version = match self.version.as_deref() {
            None => ScormVersion::default(),
            Some(v) => v.parse()?,
        };

        let options = self.options.unwrap_or_default();
        let options = ExportOptions {
            mastery_score: options
                .mastery_score
                .map_or(default_mastery, |raw| MasteryScore::from_raw(Some(raw))),
            include_evaluations: options.include_evaluations.unwrap_or(true),
        };

        Ok(ExportRequest::new(formation_id, version).with_options(options))
    }
}

/// Successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub success: bool,
    pub file_name: String,
    pub storage_path: String,
    pub download_url: String,
    pub formation: FormationInfo,
    pub version: ScormVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationInfo {
    pub id: String,
    pub titre: String,
    pub modules_count: usize,
}

/// Status code and JSON body, ready for whatever HTTP layer hosts the
/// service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(response: &ExportResponse) -> Self {
        match serde_json::to_value(response) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(&Error::Json(e)),
        }
    }

    /// `{ "error": "..." }` with the status mapped from `err`.
    pub fn error(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "error": client_message(err) }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Message shown to clients. Never includes formation content or internal
/// error details.
pub fn client_message(err: &Error) -> String {
    match err {
        Error::Input(msg) => msg.clone(),
        Error::UnsupportedVersion(_) => {
            "Version SCORM non supportée (attendu SCORM_1_2 ou SCORM_2004)".into()
        }
        Error::NotFound(_) => "Formation non trouvée".into(),
        Error::Storage(_) => "Erreur lors du stockage du package".into(),
        _ => "Erreur lors de l'export du package SCORM".into(),
    }
}
