//! KV store commands

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::cli::{KvStoreAction, KvStoreCommand};
use crate::output::opt;

pub async fn run(cmd: KvStoreCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        KvStoreAction::Create { name } => create(&name, ctx).await,
        KvStoreAction::Delete { store_id } => delete(&store_id, ctx).await,
        KvStoreAction::Describe { store_id } => describe(&store_id, ctx).await,
        KvStoreAction::List => list(ctx).await,
    }
}

async fn create(name: &str, ctx: &Context<'_>) -> Result<()> {
    let store = ctx
        .client
        .create_kv_store(name)
        .await
        .with_context(|| format!("Failed to create KV store {}", name))?;

    ctx.out.success(
        &format!("Created KV store {} (id {})", store.name, store.id),
        &store,
    );
    Ok(())
}

async fn delete(store_id: &str, ctx: &Context<'_>) -> Result<()> {
    ctx.client
        .delete_kv_store(store_id)
        .await
        .with_context(|| format!("Failed to delete KV store {}", store_id))?;

    ctx.out.success(
        &format!("Deleted KV store {}", store_id),
        json!({ "id": store_id }),
    );
    Ok(())
}

async fn describe(store_id: &str, ctx: &Context<'_>) -> Result<()> {
    let store = ctx
        .client
        .get_kv_store(store_id)
        .await
        .with_context(|| format!("Failed to get KV store {}", store_id))?;

    ctx.out.record(
        &store,
        &[
            ("ID", store.id.clone()),
            ("Name", store.name.clone()),
            ("Created", opt(&store.created_at)),
            ("Updated", opt(&store.updated_at)),
        ],
    );
    Ok(())
}

async fn list(ctx: &Context<'_>) -> Result<()> {
    let stores = ctx
        .client
        .list_kv_stores()
        .await
        .context("Failed to list KV stores")?;

    ctx.out.list(&stores, &["ID", "NAME", "CREATED"], |s| {
        vec![s.id.clone(), s.name.clone(), opt(&s.created_at)]
    });
    Ok(())
}
