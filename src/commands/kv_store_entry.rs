//! KV store entry commands

use std::io::Write;

use anyhow::{Context as _, Result};
use serde_json::json;

use super::Context;
use crate::cli::{KvStoreEntryAction, KvStoreEntryCommand};

pub async fn run(cmd: KvStoreEntryCommand, ctx: &Context<'_>) -> Result<()> {
    match cmd.action {
        KvStoreEntryAction::Create {
            store_id,
            key,
            value,
        } => create(&store_id, &key, &value, ctx).await,
        KvStoreEntryAction::Delete { store_id, key } => delete(&store_id, &key, ctx).await,
        KvStoreEntryAction::Describe { store_id, key } => describe(&store_id, &key, ctx).await,
        KvStoreEntryAction::List { store_id } => list(&store_id, ctx).await,
    }
}

async fn create(store_id: &str, key: &str, value: &str, ctx: &Context<'_>) -> Result<()> {
    ctx.client
        .put_kv_entry(store_id, key, value)
        .await
        .with_context(|| format!("Failed to insert key {} into KV store {}", key, store_id))?;

    ctx.out.success(
        &format!("Inserted key {} into KV store {}", key, store_id),
        json!({ "store_id": store_id, "key": key }),
    );
    Ok(())
}

async fn delete(store_id: &str, key: &str, ctx: &Context<'_>) -> Result<()> {
    ctx.client
        .delete_kv_entry(store_id, key)
        .await
        .with_context(|| format!("Failed to delete key {} from KV store {}", key, store_id))?;

    ctx.out.success(
        &format!("Deleted key {} from KV store {}", key, store_id),
        json!({ "store_id": store_id, "key": key }),
    );
    Ok(())
}

async fn describe(store_id: &str, key: &str, ctx: &Context<'_>) -> Result<()> {
    let value = ctx
        .client
        .get_kv_entry(store_id, key)
        .await
        .with_context(|| format!("Failed to get key {} from KV store {}", key, store_id))?;

    if ctx.out.is_json() {
        ctx.out.result(value_record(store_id, key, &value));
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&value)
            .and_then(|_| stdout.flush())
            .context("Failed to write value to stdout")?;
    }
    Ok(())
}

/// JSON form of a value. Non-UTF-8 values are given as raw bytes.
fn value_record(store_id: &str, key: &str, value: &[u8]) -> serde_json::Value {
    match std::str::from_utf8(value) {
        Ok(text) => json!({ "store_id": store_id, "key": key, "value": text }),
        Err(_) => json!({ "store_id": store_id, "key": key, "value_bytes": value }),
    }
}

async fn list(store_id: &str, ctx: &Context<'_>) -> Result<()> {
    let keys = ctx
        .client
        .list_kv_keys(store_id)
        .await
        .with_context(|| format!("Failed to list keys of KV store {}", store_id))?;

    if ctx.out.is_json() {
        ctx.out.result(&keys);
    } else {
        for key in &keys {
            println!("{}", key);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_context;
    use crate::output::Output;
    use mockito::Matcher;

    #[tokio::test]
    async fn describe_reads_raw_value() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/resources/stores/kv/st1/keys/greeting")
            .with_body("hello world")
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        describe("st1", "greeting", &ctx).await.unwrap();
        get.assert_async().await;
    }

    #[test]
    fn binary_value_keeps_its_bytes_in_json() {
        let text = value_record("st1", "greeting", b"hello");
        assert_eq!(text["value"], "hello");

        let binary = value_record("st1", "logo", &[0xff, 0x00]);
        assert!(binary.get("value").is_none());
        assert_eq!(binary["value_bytes"], json!([255, 0]));
    }

    #[tokio::test]
    async fn missing_key_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/resources/stores/kv/st1/keys/nope")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"msg":"Record not found"}"#)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let err = delete("st1", "nope", &ctx).await.unwrap_err();
        let api = err.downcast_ref::<crate::api::ApiError>().unwrap();
        assert_eq!(api.status(), Some(404));
    }
}
