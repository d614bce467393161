//! Edge dictionary item commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::cli::{DictionaryEntryAction, DictionaryEntryCommand, ServiceArgs};
use crate::output::opt;

pub async fn run(cmd: DictionaryEntryCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        DictionaryEntryAction::Create {
            service,
            dictionary_id,
            key,
            value,
        } => create(&service, &dictionary_id, &key, &value, ctx).await,
        DictionaryEntryAction::Delete {
            service,
            dictionary_id,
            key,
        } => delete(&service, &dictionary_id, &key, ctx).await,
        DictionaryEntryAction::Describe {
            service,
            dictionary_id,
            key,
        } => describe(&service, &dictionary_id, &key, ctx).await,
        DictionaryEntryAction::List {
            service,
            dictionary_id,
        } => list(&service, &dictionary_id, ctx).await,
        DictionaryEntryAction::Update {
            service,
            dictionary_id,
            key,
            value,
        } => update(&service, &dictionary_id, &key, &value, ctx).await,
    }
}

async fn create(
    args: &ServiceArgs,
    dictionary_id: &str,
    key: &str,
    value: &str,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let item = ctx
        .client
        .create_dictionary_item(&service_id, dictionary_id, key, value)
        .await
        .with_context(|| format!("Failed to add item {} to dictionary {}", key, dictionary_id))?;

    ctx.out.success(
        &format!(
            "Created dictionary item {} (service {} dictionary {})",
            item.item_key, service_id, dictionary_id
        ),
        &item,
    );
    Ok(())
}

async fn delete(
    args: &ServiceArgs,
    dictionary_id: &str,
    key: &str,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    ctx.client
        .delete_dictionary_item(&service_id, dictionary_id, key)
        .await
        .with_context(|| format!("Failed to delete item {} from dictionary {}", key, dictionary_id))?;

    ctx.out.success(
        &format!(
            "Deleted dictionary item {} (service {} dictionary {})",
            key, service_id, dictionary_id
        ),
        json!({ "service_id": service_id, "dictionary_id": dictionary_id, "item_key": key }),
    );
    Ok(())
}

async fn describe(
    args: &ServiceArgs,
    dictionary_id: &str,
    key: &str,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let item = ctx
        .client
        .get_dictionary_item(&service_id, dictionary_id, key)
        .await
        .with_context(|| format!("Failed to get item {} of dictionary {}", key, dictionary_id))?;

    ctx.out.record(
        &item,
        &[
            ("Service ID", item.service_id.clone()),
            ("Dictionary ID", item.dictionary_id.clone()),
            ("Item key", item.item_key.clone()),
            ("Item value", item.item_value.clone()),
            ("Updated", opt(&item.updated_at)),
        ],
    );
    Ok(())
}

async fn list(args: &ServiceArgs, dictionary_id: &str, ctx: &Context<'_>) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let items = ctx
        .client
        .list_dictionary_items(&service_id, dictionary_id)
        .await
        .with_context(|| format!("Failed to list items of dictionary {}", dictionary_id))?;

    ctx.out.list(&items, &["KEY", "VALUE", "UPDATED"], |i| {
        vec![i.item_key.clone(), i.item_value.clone(), opt(&i.updated_at)]
    });
    Ok(())
}

async fn update(
    args: &ServiceArgs,
    dictionary_id: &str,
    key: &str,
    value: &str,
    ctx: &Context<'_>,
) -> Result<()> {
    let service_id = ctx.service(args).await?;
    let item = ctx
        .client
        .update_dictionary_item(&service_id, dictionary_id, key, value)
        .await
        .with_context(|| format!("Failed to update item {} of dictionary {}", key, dictionary_id))?;

    ctx.out.success(
        &format!(
            "Updated dictionary item {} (service {} dictionary {})",
            item.item_key, service_id, dictionary_id
        ),
        &item,
    );
    Ok(())
}
