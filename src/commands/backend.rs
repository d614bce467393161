//! Backend commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::api::types::{Backend, BackendInput};
use crate::cli::{BackendAction, BackendCommand, BackendFields, EditTarget, ReadTarget};
use crate::output::opt;

pub async fn run(cmd: BackendCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        BackendAction::Create {
            target,
            name,
            address,
            fields,
        } => {
            let input = backend_input(Some(name), Some(address), fields);
            create(&target, input, ctx).await
        }
        BackendAction::Delete { target, name } => delete(&target, &name, ctx).await,
        BackendAction::Describe { target, name } => describe(&target, &name, ctx).await,
        BackendAction::List { target } => list(&target, ctx).await,
        BackendAction::Update {
            target,
            name,
            new_name,
            address,
            fields,
        } => {
            let input = backend_input(new_name, address, fields);
            update(&target, &name, input, ctx).await
        }
    }
}

fn backend_input(name: Option<String>, address: Option<String>, f: BackendFields) -> BackendInput {
    BackendInput {
        name,
        address,
        port: f.port,
        comment: f.comment,
        override_host: f.override_host,
        connect_timeout: f.connect_timeout,
        first_byte_timeout: f.first_byte_timeout,
        between_bytes_timeout: f.between_bytes_timeout,
        max_conn: f.max_conn,
        use_ssl: f.use_ssl,
        ssl_cert_hostname: f.ssl_cert_hostname,
        ssl_sni_hostname: f.ssl_sni_hostname,
        healthcheck: f.healthcheck,
        shield: f.shield,
        weight: f.weight,
        auto_loadbalance: f.auto_loadbalance,
        request_condition: f.request_condition,
    }
}

async fn create(target: &EditTarget, input: BackendInput, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let backend: Backend = ctx
        .client
        .create_resource(&service_id, version, &input)
        .await
        .context("Failed to create backend")?;

    ctx.out.success(
        &format!(
            "Created backend {} (service {} version {})",
            backend.name, service_id, version
        ),
        &backend,
    );
    Ok(())
}

async fn delete(target: &EditTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    ctx.client
        .delete_resource::<Backend>(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to delete backend {}", name))?;

    ctx.out.success(
        &format!(
            "Deleted backend {} (service {} version {})",
            name, service_id, version
        ),
        json!({ "service_id": service_id, "version": version, "name": name }),
    );
    Ok(())
}

async fn describe(target: &ReadTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let b: Backend = ctx
        .client
        .get_resource(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to get backend {}", name))?;

    ctx.out.record(
        &b,
        &[
            ("Service ID", b.service_id.clone()),
            ("Version", b.version.to_string()),
            ("Name", b.name.clone()),
            ("Comment", opt(&b.comment)),
            ("Address", opt(&b.address)),
            ("Port", opt(&b.port)),
            ("Override host", opt(&b.override_host)),
            ("Connect timeout", opt(&b.connect_timeout)),
            ("First byte timeout", opt(&b.first_byte_timeout)),
            ("Between bytes timeout", opt(&b.between_bytes_timeout)),
            ("Max connections", opt(&b.max_conn)),
            ("Use SSL", b.use_ssl.to_string()),
            ("SSL cert hostname", opt(&b.ssl_cert_hostname)),
            ("SSL SNI hostname", opt(&b.ssl_sni_hostname)),
            ("Healthcheck", opt(&b.healthcheck)),
            ("Shield", opt(&b.shield)),
            ("Weight", opt(&b.weight)),
            ("Auto loadbalance", b.auto_loadbalance.to_string()),
            ("Request condition", opt(&b.request_condition)),
        ],
    );
    Ok(())
}

async fn list(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let backends: Vec<Backend> = ctx
        .client
        .list_resources(&service_id, version)
        .await
        .context("Failed to list backends")?;

    ctx.out.list(
        &backends,
        &["SERVICE", "VERSION", "NAME", "ADDRESS", "PORT", "COMMENT"],
        |b| {
            vec![
                b.service_id.clone(),
                b.version.to_string(),
                b.name.clone(),
                opt(&b.address),
                opt(&b.port),
                opt(&b.comment),
            ]
        },
    );
    Ok(())
}

async fn update(
    target: &EditTarget,
    name: &str,
    input: BackendInput,
    ctx: &Context<'_>,
) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let backend: Backend = ctx
        .client
        .update_resource(&service_id, version, name, &input)
        .await
        .with_context(|| format!("Failed to update backend {}", name))?;

    ctx.out.success(
        &format!(
            "Updated backend {} (service {} version {})",
            backend.name, service_id, version
        ),
        &backend,
    );
    Ok(())
}
