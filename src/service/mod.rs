//! The export endpoint, independent of any HTTP framework.
//!
//! [`ExportService::handle`] takes the caller's organization and the raw
//! request body and returns a status code with a JSON body. Loading and
//! storing happen behind [`FormationSource`] and [`PackageStorage`]; the
//! package itself is built synchronously in between.
//!
//! ```
//! use scormkit::clock::FixedClock;
//! use scormkit::model::{FormationRecord, ModuleRecord};
//! use scormkit::service::{ExportService, MemoryFormationSource, MemoryStorage};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let source = MemoryFormationSource::new().with_formation(FormationRecord {
//!     id: "f1".into(),
//!     titre: "Excel Initiation".into(),
//!     description: None,
//!     organization_id: Some("org-1".into()),
//!     modules: vec![ModuleRecord::new("m1", "Cells", 1)],
//!     evaluations_data: None,
//! });
//! let service = ExportService::new(source, MemoryStorage::new(), FixedClock::epoch());
//! let response = service.handle("org-1", r#"{"formationId": "f1"}"#).await;
//! assert_eq!(response.status, 200);
//! # });
//! ```

mod api;
mod source;
mod storage;

pub use api::{
    ApiResponse, ExportApiOptions, ExportApiRequest, ExportResponse, FormationInfo,
    client_message,
};
pub use source::{FormationSource, JsonFormationSource, MemoryFormationSource};
pub use storage::{LocalStorage, MemoryStorage, PackageStorage, StoredObject};

use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::ScormConfig;
use crate::error::{Error, Result};
use crate::export::ScormExporter;
use crate::model::{ExportRequest, MasteryScore};
use crate::normalize::normalize_formation;

/// Content type of uploaded packages.
pub const PACKAGE_CONTENT_TYPE: &str = "application/zip";

/// Settings of the request boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// First segment of storage paths.
    pub storage_prefix: String,
    pub signed_url_ttl_secs: u64,
    /// Applied when a request carries no mastery score.
    pub default_mastery: MasteryScore,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            storage_prefix: "scorm-exports".to_string(),
            signed_url_ttl_secs: 3600,
            default_mastery: MasteryScore::default(),
        }
    }
}

/// Export endpoint over a formation source and a package store.
pub struct ExportService<S, T, C> {
    source: S,
    storage: T,
    exporter: ScormExporter<C>,
    settings: ServiceSettings,
}

impl<S: FormationSource, T: PackageStorage, C: Clock> ExportService<S, T, C> {
    pub fn new(source: S, storage: T, clock: C) -> Self {
        Self {
            source,
            storage,
            exporter: ScormExporter::new().with_clock(clock),
            settings: ServiceSettings::default(),
        }
    }

    /// Build a service with export and storage settings from `config`.
    pub fn from_config(source: S, storage: T, clock: C, config: &ScormConfig) -> Self {
        Self {
            source,
            storage,
            exporter: ScormExporter::new()
                .with_config(config.export.exporter_config())
                .with_clock(clock),
            settings: ServiceSettings {
                storage_prefix: config.storage.prefix.trim_matches('/').to_string(),
                signed_url_ttl_secs: config.storage.signed_url_ttl_secs,
                default_mastery: config.export.mastery_score(),
            },
        }
    }

    pub fn with_settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn storage(&self) -> &T {
        &self.storage
    }

    /// Handle a raw request body for `organization_id`.
    pub async fn handle(&self, organization_id: &str, body: &str) -> ApiResponse {
        let request = match ExportApiRequest::from_json(body)
            .and_then(|raw| raw.into_request(self.settings.default_mastery))
        {
            Ok(request) => request,
            Err(e) => {
                warn!(organization_id, error = %e, "rejected export request");
                return ApiResponse::error(&e);
            }
        };

        match self.export(organization_id, &request).await {
            Ok(response) => ApiResponse::ok(&response),
            Err(e) => {
                if e.is_client_error() {
                    warn!(
                        formation_id = %request.formation_id,
                        version = %request.version,
                        error = %e,
                        "export request failed"
                    );
                } else {
                    error!(
                        formation_id = %request.formation_id,
                        version = %request.version,
                        error = %e,
                        "SCORM export failed"
                    );
                }
                ApiResponse::error(&e)
            }
        }
    }

    /// Load, build, store and sign one package.
    pub async fn export(
        &self,
        organization_id: &str,
        request: &ExportRequest,
    ) -> Result<ExportResponse> {
        if !is_path_segment(organization_id) {
            return Err(Error::NotFound("organization".into()));
        }

        let record = self
            .source
            .formation_with_modules(&request.formation_id, organization_id)
            .await?
            .ok_or_else(|| Error::NotFound(request.formation_id.clone()))?;

        let formation = normalize_formation(&record)?;
        let package = self
            .exporter
            .export(&formation, request.version, &request.options)?;

        let storage_path = format!(
            "{}/{organization_id}/{}",
            self.settings.storage_prefix, package.file_name
        );
        let size = package.bytes.len();
        self.storage
            .upload(&storage_path, package.bytes, PACKAGE_CONTENT_TYPE)
            .await?;
        let download_url = self
            .storage
            .create_signed_url(&storage_path, self.settings.signed_url_ttl_secs)
            .await?;

        info!(
            formation_id = %record.id,
            version = %request.version,
            modules = record.modules.len(),
            bytes = size,
            path = %storage_path,
            "SCORM package exported"
        );

        Ok(ExportResponse {
            success: true,
            file_name: package.file_name,
            storage_path,
            download_url,
            formation: FormationInfo {
                id: record.id,
                titre: record.titre,
                modules_count: record.modules.len(),
            },
            version: request.version,
        })
    }
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment() {
        assert!(is_path_segment("org-1"));
        assert!(!is_path_segment(""));
        assert!(!is_path_segment(".."));
        assert!(!is_path_segment("a/b"));
    }
}
