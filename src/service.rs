//! Working out which service a command targets.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::api::types::Service;
use crate::config::{ENV_SERVICE_ID, MANIFEST_FILE};

/// Lookup used to turn `--service-name` into an ID.
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    async fn list_services(&self) -> anyhow::Result<Vec<Service>>;
}

#[derive(Debug, Error)]
pub enum ServiceIdError {
    #[error(
        "no service ID found: pass --service-id or --service-name, set FASTLY_SERVICE_ID, or add service_id to fastly.toml"
    )]
    NotFound,

    #[error("cannot specify both --service-id and --service-name")]
    Conflict,

    #[error("no service named '{0}' found")]
    UnknownName(String),

    #[error("error listing services")]
    Lookup(#[source] anyhow::Error),
}

/// Where a service ID came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    IdFlag,
    NameFlag,
    Env,
    Manifest,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdFlag => f.write_str("--service-id"),
            Self::NameFlag => f.write_str("--service-name"),
            Self::Env => f.write_str(ENV_SERVICE_ID),
            Self::Manifest => f.write_str(MANIFEST_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub id: String,
    pub source: Source,
}

/// Everything a service ID can be derived from.
#[derive(Debug, Clone, Default)]
pub struct ServiceInputs {
    pub id_flag: Option<String>,
    pub name_flag: Option<String>,
    pub env: Option<String>,
    pub manifest: Option<String>,
}

/// `--service-name` is looked up through the API and may not be combined
/// with `--service-id`. Otherwise the flag, then the environment, then the
/// manifest.
pub async fn resolve_service_id(
    inputs: ServiceInputs,
    directory: &dyn ServiceDirectory,
) -> Result<ServiceTarget, ServiceIdError> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let id_flag = non_empty(inputs.id_flag);
    if let Some(name) = non_empty(inputs.name_flag) {
        if id_flag.is_some() {
            return Err(ServiceIdError::Conflict);
        }
        let services = directory
            .list_services()
            .await
            .map_err(ServiceIdError::Lookup)?;
        let found = services
            .into_iter()
            .find(|s| s.name == name)
            .ok_or(ServiceIdError::UnknownName(name))?;
        debug!(service_id = %found.id, name = %found.name, "matched service name");
        return Ok(ServiceTarget {
            id: found.id,
            source: Source::NameFlag,
        });
    }

    let candidates = [
        (id_flag, Source::IdFlag),
        (non_empty(inputs.env), Source::Env),
        (non_empty(inputs.manifest), Source::Manifest),
    ];
    candidates
        .into_iter()
        .find_map(|(id, source)| id.map(|id| ServiceTarget { id, source }))
        .ok_or(ServiceIdError::NotFound)
}
