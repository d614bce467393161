//! Service version commands

use anyhow::{Context as _, Result};

use super::Context;
use crate::api::types::UpdateVersionInput;
use crate::cli::{EditTarget, ReadTarget, ServiceArgs, ServiceVersionAction, ServiceVersionCommand};
use crate::output::opt;
use crate::version::ResolutionPolicy;

pub async fn run(cmd: ServiceVersionCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        ServiceVersionAction::List { service } => list(&service, ctx).await,
        ServiceVersionAction::Clone { target } => clone(&target, ctx).await,
        ServiceVersionAction::Activate { target } => activate(&target, ctx).await,
        ServiceVersionAction::Deactivate { target } => deactivate(&target, ctx).await,
        ServiceVersionAction::Lock { target } => lock(&target, ctx).await,
        ServiceVersionAction::Update { target, comment } => update(&target, comment, ctx).await,
        ServiceVersionAction::Stage { target } => stage(&target, ctx).await,
        ServiceVersionAction::Unstage { target } => unstage(&target, ctx).await,
    }
}

async fn list(args: &ServiceArgs, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let versions = ctx
        .client
        .list_versions(&service_id)
        .await
        .with_context(|| format!("Failed to list versions of service {}", service_id))?;

    ctx.out.list(
        &versions,
        &["NUMBER", "ACTIVE", "LOCKED", "STAGING", "COMMENT", "UPDATED"],
        |v| {
            vec![
                v.number.to_string(),
                v.active.to_string(),
                v.locked.to_string(),
                v.staging.to_string(),
                opt(&v.comment),
                opt(&v.updated_at),
            ]
        },
    );
    Ok(())
}

async fn clone(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, number) = ctx.read_target(target).await?;
    let cloned = ctx
        .client
        .clone_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to clone version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!(
            "Cloned service {} version {} to version {}",
            service_id, number, cloned.number
        ),
        &cloned,
    );
    Ok(())
}

async fn activate(target: &EditTarget, ctx: &Context<'_>) -> Result<()> {
    let policy = ResolutionPolicy::editable().with_allow_locked(true);
    let (service_id, number) = ctx.edit_target_with(target, policy).await?;
    let version = ctx
        .client
        .activate_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to activate version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Activated service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}

async fn deactivate(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let policy = ResolutionPolicy::read_only().with_active(true);
    let (service_id, number) = ctx.read_target_with(target, &policy).await?;
    let version = ctx
        .client
        .deactivate_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to deactivate version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Deactivated service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}

async fn lock(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let policy = ResolutionPolicy::editable().with_allow_active(true);
    let (service_id, number) = ctx.read_target_with(target, &policy).await?;
    let version = ctx
        .client
        .lock_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to lock version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Locked service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}

async fn update(target: &EditTarget, comment: String, ctx: &Context<'_>) -> Result<()> {
    let (service_id, number) = ctx.edit_target(target).await?;
    let input = UpdateVersionInput {
        comment: Some(comment),
    };
    let version = ctx
        .client
        .update_version(&service_id, number, &input)
        .await
        .with_context(|| format!("Failed to update version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Updated service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}

async fn stage(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let policy = ResolutionPolicy::read_only().with_staging(false);
    let (service_id, number) = ctx.read_target_with(target, &policy).await?;
    let version = ctx
        .client
        .stage_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to stage version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Staged service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}

async fn unstage(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let policy = ResolutionPolicy::read_only().with_staging(true);
    let (service_id, number) = ctx.read_target_with(target, &policy).await?;
    let version = ctx
        .client
        .unstage_version(&service_id, number)
        .await
        .with_context(|| format!("Failed to unstage version {} of service {}", number, service_id))?;

    ctx.out.success(
        &format!("Unstaged service {} version {}", service_id, number),
        &version,
    );
    Ok(())
}
