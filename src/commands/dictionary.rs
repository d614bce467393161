//! Edge dictionary commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::{Context, UsageError};
use crate::api::types::{Dictionary, DictionaryInput};
use crate::cli::{DictionaryAction, DictionaryCommand, EditTarget, ReadTarget};
use crate::output::opt;

pub async fn run(cmd: DictionaryCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        DictionaryAction::Create {
            target,
            name,
            write_only,
        } => {
            let input = DictionaryInput {
                name: Some(name),
                write_only,
            };
            create(&target, input, ctx).await
        }
        DictionaryAction::Delete { target, name } => delete(&target, &name, ctx).await,
        DictionaryAction::Describe { target, name } => describe(&target, &name, ctx).await,
        DictionaryAction::List { target } => list(&target, ctx).await,
        DictionaryAction::Update {
            target,
            name,
            new_name,
            write_only,
        } => {
            let input = DictionaryInput {
                name: new_name,
                write_only,
            };
            update(&target, &name, input, ctx).await
        }
    }
}

async fn create(target: &EditTarget, input: DictionaryInput, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    let dict: Dictionary = ctx
        .client
        .create_resource(&service_id, version, &input)
        .await
        .context("Failed to create dictionary")?;

    let mut message = format!(
        "Created dictionary {} (id {}, service {} version {})",
        dict.name, dict.id, service_id, version
    );
    if dict.write_only {
        message.push_str(" as write-only");
    }
    ctx.out.success(&message, &dict);
    Ok(())
}

async fn delete(target: &EditTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.edit_target(target).await?;
    ctx.client
        .delete_resource::<Dictionary>(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to delete dictionary {}", name))?;

    ctx.out.success(
        &format!(
            "Deleted dictionary {} (service {} version {})",
            name, service_id, version
        ),
        json!({ "service_id": service_id, "version": version, "name": name }),
    );
    Ok(())
}

async fn describe(target: &ReadTarget, name: &str, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let dict: Dictionary = ctx
        .client
        .get_resource(&service_id, version, name)
        .await
        .with_context(|| format!("Failed to get dictionary {}", name))?;

    ctx.out.record(
        &dict,
        &[
            ("Service ID", dict.service_id.clone()),
            ("Version", dict.version.to_string()),
            ("ID", dict.id.clone()),
            ("Name", dict.name.clone()),
            ("Write only", dict.write_only.to_string()),
            ("Created", opt(&dict.created_at)),
            ("Updated", opt(&dict.updated_at)),
        ],
    );
    Ok(())
}

async fn list(target: &ReadTarget, ctx: &Context<'_>) -> Result<()> {
    let (service_id, version) = ctx.read_target(target).await?;
    let dicts: Vec<Dictionary> = ctx
        .client
        .list_resources(&service_id, version)
        .await
        .context("Failed to list dictionaries")?;

    ctx.out.list(
        &dicts,
        &["SERVICE", "VERSION", "NAME", "ID", "WRITE ONLY"],
        |d| {
            vec![
                d.service_id.clone(),
                d.version.to_string(),
                d.name.clone(),
                d.id.clone(),
                d.write_only.to_string(),
            ]
        },
    );
    Ok(())
}

async fn update(
    target: &EditTarget,
    name: &str,
    input: DictionaryInput,
    ctx: &Context<'_>,
) -> Result<()> {
    if input.name.is_none() && input.write_only.is_none() {
        return Err(UsageError::NothingToUpdate("--new-name or --write-only").into());
    }
    let (service_id, version) = ctx.edit_target(target).await?;
    let dict: Dictionary = ctx
        .client
        .update_resource(&service_id, version, name, &input)
        .await
        .with_context(|| format!("Failed to update dictionary {}", name))?;

    ctx.out.success(
        &format!(
            "Updated dictionary {} (service {} version {})",
            dict.name, service_id, version
        ),
        &dict,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{service_flag, test_context};
    use crate::output::Output;
    use crate::version::VersionSpec;
    use mockito::Matcher;

    #[tokio::test]
    async fn create_write_only() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/abc/version")
            .with_body(r#"[{"number":1}]"#)
            .create_async()
            .await;
        let post = server
            .mock("POST", "/service/abc/version/1/dictionary")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "regions".into()),
                Matcher::UrlEncoded("write_only".into(), "1".into()),
            ]))
            .with_body(r#"{"id":"5clCy","name":"regions","service_id":"abc","version":1,"write_only":true}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let target = EditTarget {
            service: service_flag("abc"),
            version: Some(VersionSpec::Number(1)),
            autoclone: false,
        };
        let input = DictionaryInput {
            name: Some("regions".into()),
            write_only: Some(true),
        };
        create(&target, input, &ctx).await.unwrap();
        post.assert_async().await;
    }
}
