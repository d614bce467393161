//! ACL commands

use anyhow::{Context as _, Result};

use super::Context;
use crate::api::types::{Acl, AclInput};
use crate::cli::{AclAction, AclCommand, EditTarget, ReadTarget};
use crate::output::opt;

pub async fn run(cmd: AclCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        AclAction::Create { target, name } => create(&target, name, ctx).await,
        AclAction::Delete { target, name } => delete(&target, &name, ctx).await,
        AclAction::Describe { target, name } => describe(&target, &name, ctx).await,
        AclAction::List { target } => list(&target, ctx).await,
        AclAction::Update {
            target,
            name,
            new_name,
        } => update(&target, &name, new_name, ctx).await,
    }
}

async fn create(target: &EditTarget, name: String, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let input = AclInput { name: Some(name) };
    let acl: Acl = ctx
        .client
        .create_resource(&service_id, version, &input)
        .await
        .context("Failed to create ACL")?;

    ctx.out.success(
        &format!(
            "Created ACL {} (id {}, service {} version {})",
            acl.name, acl.id, service_id, version
        ),
        &acl,
    );
    Ok(())
}

async fn delete(target: &EditTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    ctx.client
        .delete_resource::<Acl>(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to delete ACL {}", name))?;

    ctx.out.success(
        &format!(
            "Deleted ACL {} (service {} version {})",
            name, service_id, version
        ),
        serde_json::json!({ "service_id": service_id, "version": version, "name": name }),
    );
    Ok(())
}

async fn describe(target: &ReadTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let acl: Acl = ctx
        .client
        .get_resource(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to get ACL {}", name))?;

    ctx.out.record(
        &acl,
        &[
            ("Service ID", acl.service_id.clone()),
            ("Version", acl.version.to_string()),
            ("Name", acl.name.clone()),
            ("ID", acl.id.clone()),
            ("Created", opt(&acl.created_at)),
            ("Updated", opt(&acl.updated_at)),
        ],
    );
    Ok(())
}

async fn list(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let acls: Vec<Acl> = ctx
        .client
        .list_resources(&service_id, version)
        .await
        .context("Failed to list ACLs")?;

    ctx.out.list(&acls, &["SERVICE", "VERSION", "NAME", "ID"], |a| {
        vec![
            a.service_id.clone(),
            a.version.to_string(),
            a.name.clone(),
            a.id.clone(),
        ]
    });
    Ok(())
}

async fn update(
    target: &EditTarget,
    name: &str,
    new_name: String,
    ctx: &Context<'_>,
) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let input = AclInput {
        name: Some(new_name),
    };
    let acl: Acl = ctx
        .client
        .update_resource(&service_id, version, name, &input)
        .await
        .with_context(|| format!("Failed to update ACL {}", name))?;

    ctx.out.success(
        &format!(
            "Updated ACL {} (previously: {}, service {} version {})",
            acl.name, name, service_id, version
        ),
        &acl,
    );
    Ok(())
}
