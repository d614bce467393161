//! Domain commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::{Context, UsageError};
use crate::api::types::{Domain, DomainInput};
use crate::cli::{DomainAction, DomainCommand, EditTarget, ReadTarget};
use crate::output::opt;

pub async fn run(cmd: DomainCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        DomainAction::Create {
            target,
            name,
            comment,
        } => {
            let input = DomainInput {
                name: Some(name),
                comment,
            };
            create(&target, input, ctx).await
        }
        DomainAction::Delete { target, name } => delete(&target, &name, ctx).await,
        DomainAction::Describe { target, name } => describe(&target, &name, ctx).await,
        DomainAction::List { target } => list(&target, ctx).await,
        DomainAction::Update {
            target,
            name,
            new_name,
            comment,
        } => {
            let input = DomainInput {
                name: new_name,
                comment,
            };
            update(&target, &name, input, ctx).await
        }
    }
}

async fn create(target: &EditTarget, input: DomainInput, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let domain: Domain = ctx
        .client
        .create_resource(&service_id, version, &input)
        .await
        .context("Failed to create domain")?;

    ctx.out.success(
        &format!(
            "Created domain {} (service {} version {})",
            domain.name, service_id, version
        ),
        &domain,
    );
    Ok(())
}

async fn delete(target: &EditTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    ctx.client
        .delete_resource::<Domain>(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to delete domain {}", name))?;

    ctx.out.success(
        &format!(
            "Deleted domain {} (service {} version {})",
            name, service_id, version
        ),
        json!({ "service_id": service_id, "version": version, "name": name }),
    );
    Ok(())
}

async fn describe(target: &ReadTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let domain: Domain = ctx
        .client
        .get_resource(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to get domain {}", name))?;

    ctx.out.record(
        &domain,
        &[
            ("Service ID", domain.service_id.clone()),
            ("Version", domain.version.to_string()),
            ("Name", domain.name.clone()),
            ("Comment", opt(&domain.comment)),
        ],
    );
    Ok(())
}

async fn list(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let domains: Vec<Domain> = ctx
        .client
        .list_resources(&service_id, version)
        .await
        .context("Failed to list domains")?;

    ctx.out
        .list(&domains, &["SERVICE", "VERSION", "NAME", "COMMENT"], |d| {
            vec![
                d.service_id.clone(),
                d.version.to_string(),
                d.name.clone(),
                opt(&d.comment),
            ]
        });
    Ok(())
}

async fn update(
    target: &EditTarget,
    name: &str,
    input: DomainInput,
    ctx: &Context<'_>,
) -> Result<()> {
    if input.name.is_none() && input.comment.is_none() {
        return Err(UsageError::NothingToUpdate("--new-name or --comment").into());
    }
    let (service_id, version) = ctx.edit_target(target).await?;
    let domain: Domain = ctx
        .client
        .update_resource(&service_id, version, name, &input)
        .await
        .with_context(|| format!("Failed to update domain {}", name))?;

    ctx.out.success(
        &format!(
            "Updated domain {} (service {} version {})",
            domain.name, service_id, version
        ),
        &domain,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{service_flag, test_context};
    use crate::output::Output;
    use crate::version::VersionSpec;

    #[tokio::test]
    async fn list_on_active_version_is_allowed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/abc/version")
            .with_body(r#"[{"number":1,"active":true,"locked":true},{"number":2}]"#)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/service/abc/version/1/domain")
            .with_body(r#"[{"name":"www.example.com","service_id":"abc","version":1}]"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let target = ReadTarget {
            service: service_flag("abc"),
            version: Some(VersionSpec::Active),
        };
        list(&target, &ctx).await.unwrap();
        get.assert_async().await;
    }

    #[tokio::test]
    async fn empty_update_is_rejected_before_any_request() {
        let server = mockito::Server::new_async().await;
        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let target = EditTarget {
            service: service_flag("abc"),
            version: Some(VersionSpec::Number(2)),
            autoclone: false,
        };
        let err = update(&target, "www.example.com", DomainInput::default(), &ctx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing to update"));
    }
}
