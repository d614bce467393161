//! Cache purge

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{Context, UsageError};
use crate::cli::PurgeArgs;

pub async fn run(args: PurgeArgs, ctx: &Context<'_>) -> Result<()> {
    if args.all && args.soft {
        return Err(UsageError::SoftPurgeAll.into());
    }

    // A URL purge is addressed by hostname, no service needed.
    if let Some(url) = &args.url {
        let result = ctx
            .client
            .purge_url(url, args.soft)
            .await
            .with_context(|| format!("Failed to purge {}", url))?;
        ctx.out.success(
            &format!(
                "Purged URL {} (soft: {}, id {})",
                url,
                args.soft,
                result.id.as_deref().unwrap_or("-")
            ),
            &result,
        );
        return Ok(());
    }

    let service_id = ctx.service(&args.service).await?;
    if args.all {
        let result = ctx
            .client
            .purge_all(&service_id)
            .await
            .with_context(|| format!("Failed to purge service {}", service_id))?;
        ctx.out.success(
            &format!("Purged all content for service {} ({})", service_id, result.status),
            &result,
        );
    } else if let Some(path) = &args.file {
        purge_keys(&service_id, path, args.soft, ctx).await?;
    } else if let Some(key) = &args.key {
        let result = ctx
            .client
            .purge_key(&service_id, key, args.soft)
            .await
            .with_context(|| format!("Failed to purge key {}", key))?;
        ctx.out.success(
            &format!(
                "Purged key {} for service {} (soft: {}, id {})",
                key,
                service_id,
                args.soft,
                result.id.as_deref().unwrap_or("-")
            ),
            &result,
        );
    }
    Ok(())
}

async fn purge_keys(service_id: &str, path: &Path, soft: bool, ctx: &Context<'_>) -> Result<()> {
    let keys = read_keys(path).await?;
    let purged = ctx
        .client
        .purge_keys(service_id, &keys, soft)
        .await
        .with_context(|| format!("Failed to purge {} keys for service {}", keys.len(), service_id))?;

    if ctx.out.is_json() {
        ctx.out.result(&purged);
    } else {
        let rows: Vec<(&String, &String)> = purged.iter().collect();
        ctx.out
            .list(&rows, &["KEY", "ID"], |(key, id)| vec![key.to_string(), id.to_string()]);
    }
    Ok(())
}

/// Surrogate keys from a file, one per line. Blank lines are skipped.
async fn read_keys(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read surrogate keys from {:?}", path))?;
    let keys: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if keys.is_empty() {
        return Err(UsageError::NoSurrogateKeys(path.display().to_string()).into());
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{service_flag, test_context};
    use crate::output::Output;
    use mockito::Matcher;

    fn args() -> PurgeArgs {
        PurgeArgs {
            service: service_flag("abc"),
            all: false,
            file: None,
            key: None,
            url: None,
            soft: false,
        }
    }

    #[tokio::test]
    async fn soft_purge_by_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/purge/product-1234")
            .match_header("fastly-soft-purge", "1")
            .with_body(r#"{"status":"ok","id":"1234-5678"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let purge = PurgeArgs {
            key: Some("product-1234".into()),
            soft: true,
            ..args()
        };
        run(purge, &ctx).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn purge_all() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/purge_all")
            .with_body(r#"{"status":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        run(PurgeArgs { all: true, ..args() }, &ctx).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn soft_purge_all_is_rejected_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/purge_all")
            .with_body(r#"{"status":"ok"}"#)
            .expect(0)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        let purge = PurgeArgs {
            all: true,
            soft: true,
            ..args()
        };
        let err = run(purge, &ctx).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UsageError>(),
            Some(UsageError::SoftPurgeAll)
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn purge_keys_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys");
        std::fs::write(&path, "foo\nbar\n\nbaz\n").unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/purge")
            .match_body(Matcher::Json(serde_json::json!({
                "surrogate_keys": ["foo", "bar", "baz"]
            })))
            .with_body(r#"{"foo":"123","bar":"456","baz":"789"}"#)
            .expect(1)
            .create_async()
            .await;

        let out = Output::new(true, false);
        let ctx = test_context(&server, &out);
        run(PurgeArgs { file: Some(path), ..args() }, &ctx)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_key_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys");
        std::fs::write(&path, "\n  \n").unwrap();

        let err = read_keys(&path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UsageError>(),
            Some(UsageError::NoSurrogateKeys(_))
        ));
    }
}
