//! Service commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::{Context, UsageError};
use crate::api::types::ServiceInput;
use crate::cli::{ServiceAction, ServiceArgs, ServiceCommand};
use crate::output::opt;
use crate::service::ServiceIdError;

pub async fn run(cmd: ServiceCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        ServiceAction::List => list(ctx).await,
        ServiceAction::Describe { service } => describe(&service, ctx).await,
        ServiceAction::Search { name } => search(&name, ctx).await,
        ServiceAction::Create {
            name,
            service_type,
            comment,
        } => {
            let input = ServiceInput {
                name: Some(name),
                service_type: Some(service_type),
                comment,
            };
            create(input, ctx).await
        }
        ServiceAction::Delete { service } => delete(&service, ctx).await,
        ServiceAction::Update {
            service,
            name,
            comment,
        } => {
            let input = ServiceInput {
                name,
                service_type: None,
                comment,
            };
            update(&service, input, ctx).await
        }
    }
}

async fn create(input: ServiceInput, ctx: &Context<'_>) -> Result<()> {
    let service = ctx
        .client
        .create_service(&input)
        .await
        .context("Failed to create service")?;

    ctx.out.success(
        &format!("Created service {} ({})", service.id, service.name),
        &service,
    );
    Ok(())
}

async fn delete(args: &ServiceArgs, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    ctx.client
        .delete_service(&service_id)
        .await
        .with_context(|| format!("Failed to delete service {}", service_id))?;

    ctx.out.success(
        &format!("Deleted service ID {}", service_id),
        json!({ "id": service_id }),
    );
    Ok(())
}

async fn update(args: &ServiceArgs, input: ServiceInput, ctx: &Context<'_>) -> Result<()> {
    if input.name.is_none() && input.comment.is_none() {
        return Err(UsageError::NothingToUpdate("--name or --comment").into());
    }
    let service_id = ctx.service(args).await?;
    let service = ctx
        .client
        .update_service(&service_id, &input)
        .await
        .with_context(|| format!("Failed to update service {}", service_id))?;

    ctx.out.success(
        &format!("Updated service {}", service.id),
        &service,
    );
    Ok(())
}

async fn list(ctx: &Context<'_>) -> Result<()> {
    let services = ctx
        .client
        .list_services()
        .await
        .context("Failed to list services")?;

    ctx.out.list(&services, &["NAME", "ID", "TYPE", "ACTIVE VERSION", "UPDATED"], |s| {
        vec![
            s.name.clone(),
            s.id.clone(),
            opt(&s.service_type),
            opt(&s.version),
            opt(&s.updated_at),
        ]
    });
    Ok(())
}

async fn describe(args: &ServiceArgs, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let details = ctx
        .client
        .service_details(&service_id)
        .await
        .with_context(|| format!("Failed to describe service {}", service_id))?;

    let active = details.active_version.as_ref().map(|v| v.number);
    let versions = details
        .versions
        .iter()
        .map(|v| v.number.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    ctx.out.record(
        &details,
        &[
            ("ID", details.id.clone()),
            ("Name", details.name.clone()),
            ("Type", opt(&details.service_type)),
            ("Comment", opt(&details.comment)),
            ("Active version", opt(&active)),
            ("Versions", versions),
            ("Created", opt(&details.created_at)),
            ("Updated", opt(&details.updated_at)),
        ],
    );
    Ok(())
}

async fn search(name: &str, ctx: &Context<'_>) -> Result<()> {
    let services = ctx
        .client
        .list_services()
        .await
        .context("Failed to list services")?;
    let found = services
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| ServiceIdError::UnknownName(name.to_string()))?;

    ctx.out.record(
        &found,
        &[
            ("ID", found.id.clone()),
            ("Name", found.name.clone()),
            ("Type", opt(&found.service_type)),
            ("Comment", opt(&found.comment)),
            ("Active version", opt(&found.version)),
            ("Updated", opt(&found.updated_at)),
        ],
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
    async fn update_sends_name_and_comment() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/service/12345")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Foo".into()),
                Matcher::UrlEncoded("comment".into(), "Hello".into()),
            ]))
            .with_body(r#"{"id":"12345","name":"Foo","comment":"Hello"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let input = ServiceInput {
            name: Some("Foo".into()),
            service_type: None,
            comment: Some("Hello".into()),
        };
        update(&service_flag("12345"), input, &ctx).await.unwrap();
        put.assert_async().await;
    }

    #[tokio::test]
    async fn update_without_fields_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let err = update(&service_flag("12345"), ServiceInput::default(), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UsageError>(),
            Some(UsageError::NothingToUpdate(_))
        ));
        put.assert_async().await;
    }

    #[tokio::test]
    async fn delete_by_id() {
        let mut server = mockito::Server::new_async().await;
        let del = server
            .mock("DELETE", "/service/001")
            .with_body(r#"{"status":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        delete(&service_flag("001"), &ctx).await.unwrap();
        del.assert_async().await;
    }

    #[tokio::test]
    async fn search_for_unknown_name_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service")
            .match_query(Matcher::Any)
            .with_body(r#"[{"id":"1","name":"Bar"}]"#)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let err = search("Foo", &ctx).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ServiceIdError>(),
            Some(ServiceIdError::UnknownName(name)) if name == "Foo"
        ));
    }
}
