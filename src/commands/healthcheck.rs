//! Healthcheck commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::api::types::{HealthCheck, HealthCheckInput};
use crate::cli::{EditTarget, HealthcheckAction, HealthcheckCommand, HealthcheckFields, ReadTarget};
use crate::output::opt;

pub async fn run(cmd: HealthcheckCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        HealthcheckAction::Create {
            target,
            name,
            fields,
        } => create(&target, healthcheck_input(Some(name), fields), ctx).await,
        HealthcheckAction::Delete { target, name } => delete(&target, &name, ctx).await,
        HealthcheckAction::Describe { target, name } => describe(&target, &name, ctx).await,
        HealthcheckAction::List { target } => list(&target, ctx).await,
        HealthcheckAction::Update {
            target,
            name,
            new_name,
            fields,
        } => update(&target, &name, healthcheck_input(new_name, fields), ctx).await,
    }
}

fn healthcheck_input(name: Option<String>, f: HealthcheckFields) -> HealthCheckInput {
    HealthCheckInput {
        name,
        comment: f.comment,
        method: f.method,
        host: f.host,
        path: f.path,
        http_version: f.http_version,
        timeout: f.timeout_ms,
        check_interval: f.check_interval,
        expected_response: f.expected_response,
        window: f.window,
        threshold: f.threshold,
        initial: f.initial,
    }
}

async fn create(target: &EditTarget, input: HealthCheckInput, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let hc: HealthCheck = ctx
        .client
        .create_resource(&service_id, version, &input)
        .await
        .context("Failed to create healthcheck")?;

    ctx.out.success(
        &format!(
            "Created healthcheck {} (service {} version {})",
            hc.name, service_id, version
        ),
        &hc,
    );
    Ok(())
}

async fn delete(target: &EditTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    ctx.client
        .delete_resource::<HealthCheck>(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to delete healthcheck {}", name))?;

    ctx.out.success(
        &format!(
            "Deleted healthcheck {} (service {} version {})",
            name, service_id, version
        ),
        json!({ "service_id": service_id, "version": version, "name": name }),
    );
    Ok(())
}

async fn describe(target: &ReadTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let hc: HealthCheck = ctx
        .client
        .get_resource(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to get healthcheck {}", name))?;

    ctx.out.record(
        &hc,
        &[
            ("Service ID", hc.service_id.clone()),
            ("Version", hc.version.to_string()),
            ("Name", hc.name.clone()),
            ("Comment", opt(&hc.comment)),
            ("Method", opt(&hc.method)),
            ("Host", opt(&hc.host)),
            ("Path", opt(&hc.path)),
            ("HTTP version", opt(&hc.http_version)),
            ("Timeout", opt(&hc.timeout)),
            ("Check interval", opt(&hc.check_interval)),
            ("Expected response", opt(&hc.expected_response)),
            ("Window", opt(&hc.window)),
            ("Threshold", opt(&hc.threshold)),
            ("Initial", opt(&hc.initial)),
        ],
    );
    Ok(())
}

async fn list(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let checks: Vec<HealthCheck> = ctx
        .client
        .list_resources(&service_id, version)
        .await
        .context("Failed to list healthchecks")?;

    ctx.out.list(
        &checks,
        &["SERVICE", "VERSION", "NAME", "METHOD", "HOST", "PATH"],
        |hc| {
            vec![
                hc.service_id.clone(),
                hc.version.to_string(),
                hc.name.clone(),
                opt(&hc.method),
                opt(&hc.host),
                opt(&hc.path),
            ]
        },
    );
    Ok(())
}

async fn update(
    target: &EditTarget,
    name: &str,
    input: HealthCheckInput,
    ctx: &Context<'_>,
) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let hc: HealthCheck = ctx
        .client
        .update_resource(&service_id, version, name, &input)
        .await
        .with_context(|| format!("Failed to update healthcheck {}", name))?;

    ctx.out.success(
        &format!(
            "Updated healthcheck {} (service {} version {})",
            hc.name, service_id, version
        ),
        &hc,
    );
    Ok(())
}
