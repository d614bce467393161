//! ACL entry commands
//!
//! Entries belong to an ACL, not to a service version, so they can be
//! changed on active and locked versions alike.

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::api::types::AclEntryInput;
use crate::cli::{AclEntryAction, AclEntryCommand, AclEntryFields, ServiceArgs};
use crate::output::opt;

pub async fn run(cmd: AclEntryCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        AclEntryAction::Create {
            service,
            acl_id,
            ip,
            fields,
        } => create(&service, &acl_id, entry_input(Some(ip), fields), ctx).await,
        AclEntryAction::Delete {
            service,
            acl_id,
            id,
        } => delete(&service, &acl_id, &id, ctx).await,
        AclEntryAction::Describe {
            service,
            acl_id,
            id,
        } => describe(&service, &acl_id, &id, ctx).await,
        AclEntryAction::List { service, acl_id } => list(&service, &acl_id, ctx).await,
        AclEntryAction::Update {
            service,
            acl_id,
            id,
            ip,
            fields,
        } => update(&service, &acl_id, &id, entry_input(ip, fields), ctx).await,
    }
}

fn entry_input(ip: Option<String>, f: AclEntryFields) -> AclEntryInput {
    AclEntryInput {
        ip,
        subnet: f.subnet,
        negated: f.negated,
        comment: f.comment,
    }
}

async fn create(
    args: &ServiceArgs,
    acl_id: &str,
    input: AclEntryInput,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let entry = ctx
        .client
        .create_acl_entry(&service_id, acl_id, &input)
        .await
        .with_context(|| format!("Failed to add entry to ACL {}", acl_id))?;

    ctx.out.success(
        &format!(
            "Created ACL entry {} (ip: {}, service {})",
            entry.id, entry.ip, service_id
        ),
        &entry,
    );
    Ok(())
}

async fn delete(args: &ServiceArgs, acl_id: &str, id: &str, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    ctx.client
        .delete_acl_entry(&service_id, acl_id, id)
        .await
        .with_context(|| format!("Failed to delete ACL entry {}", id))?;

    ctx.out.success(
        &format!("Deleted ACL entry {} (service {})", id, service_id),
        json!({ "service_id": service_id, "acl_id": acl_id, "id": id }),
    );
    Ok(())
}

async fn describe(args: &ServiceArgs, acl_id: &str, id: &str, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let entry = ctx
        .client
        .get_acl_entry(&service_id, acl_id, id)
        .await
        .with_context(|| format!("Failed to get ACL entry {}", id))?;

    ctx.out.record(
        &entry,
        &[
            ("Service ID", entry.service_id.clone()),
            ("ACL ID", entry.acl_id.clone()),
            ("ID", entry.id.clone()),
            ("IP", entry.ip.clone()),
            ("Subnet", opt(&entry.subnet)),
            ("Negated", entry.negated.to_string()),
            ("Comment", opt(&entry.comment)),
        ],
    );
    Ok(())
}

async fn list(args: &ServiceArgs, acl_id: &str, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let entries = ctx
        .client
        .list_acl_entries(&service_id, acl_id)
        .await
        .with_context(|| format!("Failed to list entries of ACL {}", acl_id))?;

    ctx.out
        .list(&entries, &["ID", "IP", "SUBNET", "NEGATED", "COMMENT"], |e| {
            vec![
                e.id.clone(),
                e.ip.clone(),
                opt(&e.subnet),
                e.negated.to_string(),
                opt(&e.comment),
            ]
        });
    Ok(())
}

async fn update(
    args: &ServiceArgs,
    acl_id: &str,
    id: &str,
    input: AclEntryInput,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let entry = ctx
        .client
        .update_acl_entry(&service_id, acl_id, id, &input)
        .await
        .with_context(|| format!("Failed to update ACL entry {}", id))?;

    ctx.out.success(
        &format!("Updated ACL entry {} (service {})", entry.id, service_id),
        &entry,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{service_flag, test_context};
    use crate::output::Output;
    use mockito::Matcher;

    #[tokio::test]
    async fn create_does_not_resolve_a_version() {
        let mut server = mockito::Server::new_async().await;
        let versions = server
            .mock("GET", "/service/abc/version")
            .expect(0)
            .create_async()
            .await;
        let post = server
            .mock("POST", "/service/abc/acl/6bYsh/entry")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ip".into(), "192.0.2.0".into()),
                Matcher::UrlEncoded("subnet".into(), "24".into()),
                Matcher::UrlEncoded("negated".into(), "1".into()),
            ]))
            .with_body(r#"{"id":"e1","acl_id":"6bYsh","service_id":"abc","ip":"192.0.2.0","subnet":24,"negated":"1"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let fields = AclEntryFields {
            subnet: Some(24),
            negated: Some(true),
            comment: None,
        };
        create(
            &service_flag("abc"),
            "6bYsh",
            entry_input(Some("192.0.2.0".into()), fields),
            &ctx,
        )
        .await
        .unwrap();
        post.assert_async().await;
        versions.assert_async().await;
    }
}
