//! Command handlers, one module per resource.

pub mod acl;
pub mod acl_entry;
pub mod backend;
pub mod dictionary;
pub mod dictionary_entry;
pub mod domain;
pub mod healthcheck;
pub mod kv_store;
pub mod kv_store_entry;
pub mod purge;
pub mod service;
pub mod service_version;

use anyhow::{Context as _, Result};
use thiserror::Error;
use tracing::warn;

use crate::api::Client;
use crate::cli::{Commands, EditTarget, GlobalArgs, ReadTarget, ServiceArgs};
use crate::config::{self, Settings, ENV_SERVICE_ID};
use crate::output::Output;
use crate::service::{resolve_service_id, ServiceInputs};
use crate::version::{ResolutionPolicy, VersionResolver, VersionSpec};

/// Load configuration, build the API client and dispatch.
pub async fn run(command: Commands, globals: &GlobalArgs, out: &Output) -> Result<()> {
    config::load_env()?;
    let settings = Settings::resolve(globals)?;
    let client = Client::new(&settings.endpoint, &settings.token, settings.timeout)
        .context("Failed to create API client")?;
    let ctx = Context { client, out };

    match command {
        Commands::Service(cmd) => service::run(cmd, &ctx).await,
        Commands::ServiceVersion(cmd) => service_version::run(cmd, &ctx).await,
        Commands::Acl(cmd) => acl::run(cmd, &ctx).await,
        Commands::AclEntry(cmd) => acl_entry::run(cmd, &ctx).await,
        Commands::Backend(cmd) => backend::run(cmd, &ctx).await,
        Commands::Domain(cmd) => domain::run(cmd, &ctx).await,
        Commands::Healthcheck(cmd) => healthcheck::run(cmd, &ctx).await,
        Commands::Dictionary(cmd) => dictionary::run(cmd, &ctx).await,
        Commands::DictionaryEntry(cmd) => dictionary_entry::run(cmd, &ctx).await,
        Commands::KvStore(cmd) => kv_store::run(cmd, &ctx).await,
        Commands::KvStoreEntry(cmd) => kv_store_entry::run(cmd, &ctx).await,
        Commands::Purge(args) => purge::run(args, &ctx).await,
    }
}

/// Flag combinations rejected before any request is sent.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("nothing to update: pass {0}")]
    NothingToUpdate(&'static str),

    #[error("purge-all requests cannot be done in soft mode (--soft) and always invalidate all cached content for the service")]
    SoftPurgeAll,

    #[error("no surrogate keys found in {0}")]
    NoSurrogateKeys(String),
}

/// What every handler needs: the API client and the output handle.
pub struct Context<'a> {
    pub client: Client,
    pub out: &'a Output,
}

impl Context<'_> {
    /// Resolve the target service ID from flags, environment or manifest.
    pub async fn service(&self, args: &ServiceArgs) -> Result<String> {
        let env = std::env::var(ENV_SERVICE_ID).ok();
        let manifest = if args.service_id.is_none() && args.service_name.is_none() && env.is_none() {
            manifest_service_id()
        } else {
            None
        };

        let inputs = ServiceInputs {
            id_flag: args.service_id.clone(),
            name_flag: args.service_name.clone(),
            env,
            manifest,
        };
        let target = resolve_service_id(inputs, &self.client).await?;
        self.out
            .info(&format!("Service ID (via {}): {}", target.source, target.id));
        Ok(target.id)
    }

    /// Resolve a version specifier against `policy`, cloning if allowed.
    pub async fn version(
        &self,
        service_id: &str,
        spec: Option<VersionSpec>,
        policy: &ResolutionPolicy,
    ) -> Result<u32> {
        let resolver = VersionResolver::new(&self.client, &self.client);
        let resolved = resolver.resolve(service_id, spec, policy).await?;
        if resolved.cloned {
            self.out.info(&format!(
                "Service version {} is not editable, so it was automatically cloned because --autoclone is enabled. Now operating on version {}.",
                resolved.source, resolved.number
            ));
        }
        Ok(resolved.number)
    }

    /// Service and version for a read.
    pub async fn read_target(&self, target: &ReadTarget) -> Result<(String, u32)> {
        self.read_target_with(target, &ResolutionPolicy::read_only())
            .await
    }

    pub async fn read_target_with(
        &self,
        target: &ReadTarget,
        policy: &ResolutionPolicy,
    ) -> Result<(String, u32)> {
        let service_id = self.service(&target.service).await?;
        let version = self.version(&service_id, target.version, policy).await?;
        Ok((service_id, version))
    }

    /// Service and an editable version, honouring `--autoclone`.
    pub async fn edit_target(&self, target: &EditTarget) -> Result<(String, u32)> {
        self.edit_target_with(target, ResolutionPolicy::editable())
            .await
    }

    pub async fn edit_target_with(
        &self,
        target: &EditTarget,
        policy: ResolutionPolicy,
    ) -> Result<(String, u32)> {
        let policy = policy.with_auto_clone(target.autoclone);
        let service_id = self.service(&target.service).await?;
        let version = self.version(&service_id, target.version, &policy).await?;
        Ok((service_id, version))
    }
}

fn manifest_service_id() -> Option<String> {
    match config::load_manifest(&config::project_dir()) {
        Ok(manifest) => manifest.and_then(|m| m.service_id),
        Err(e) => {
            warn!(error = %format!("{:#}", e), "ignoring unreadable manifest");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context<'a>(server: &mockito::Server, out: &'a Output) -> Context<'a> {
    let client = Client::new(&server.url(), "token", std::time::Duration::from_secs(5)).unwrap();
    Context { client, out }
}

#[cfg(test)]
pub(crate) fn service_flag(id: &str) -> ServiceArgs {
    ServiceArgs {
        service_id: Some(id.to_string()),
        service_name: None,
    }
}
