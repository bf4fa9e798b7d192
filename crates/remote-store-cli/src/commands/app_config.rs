use std::future::Future;

use anyhow::Context;
use remote_store_config::ConfigChange;
use remote_store_data::DocumentStore;
use remote_store_sdk::{AppConfigRequest, RemoteStore, RemoteStoreOptions};
use tracing::warn;

use crate::admin::AppConfigAdmin;
use crate::cli::{CheckArgs, CleanArgs, MigrateArgs, ObserveArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_change, render_check, render_clean, render_migration};

pub(crate) async fn handle_check<S>(ctx: &AppContext<S>, args: CheckArgs) -> CliResult<String>
where
    S: DocumentStore,
{
    let reports = AppConfigAdmin::new(ctx.store.clone())
        .check(args.env)
        .await
        .context("failed to query app-config documents")
        .map_err(CliError::failure)?;
    render_check(&reports, ctx.output)
}

pub(crate) async fn handle_migrate<S>(ctx: &AppContext<S>, args: MigrateArgs) -> CliResult<String>
where
    S: DocumentStore,
{
    let report = AppConfigAdmin::new(ctx.store.clone())
        .migrate(args.env, args.force)
        .await
        .context("failed to migrate app-config documents")
        .map_err(CliError::failure)?;
    render_migration(&report, ctx.output)
}

pub(crate) async fn handle_clean<S>(ctx: &AppContext<S>, args: CleanArgs) -> CliResult<String>
where
    S: DocumentStore,
{
    let summary = AppConfigAdmin::new(ctx.store.clone())
        .clean(args.env)
        .await
        .context("failed to clean app-config documents")
        .map_err(CliError::failure)?;
    render_clean(summary, ctx.output)
}

pub(crate) async fn handle_show<S>(ctx: &AppContext<S>, args: ObserveArgs) -> CliResult<String>
where
    S: DocumentStore + 'static,
{
    let request = request_for(&args)?;
    let change = client(ctx)
        .fetch_app_config(&request)
        .await
        .context("failed to read app-config document")
        .map_err(CliError::failure)?;
    render_change(request.key(), &change, ctx.output)
}

/// Print every observed change until `shutdown` resolves.
pub(crate) async fn handle_watch<S, F>(
    ctx: &AppContext<S>,
    args: ObserveArgs,
    shutdown: F,
) -> CliResult<()>
where
    S: DocumentStore + 'static,
    F: Future<Output = ()>,
{
    let request = request_for(&args)?;
    let key = request.key();
    let format = ctx.output;
    let subscription = client(ctx)
        .subscribe_app_config(&request, move |record, getters| {
            let change = ConfigChange {
                record: record.cloned(),
                getters: *getters,
            };
            match render_change(key, &change, format) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(error = %err, "failed to render app-config change"),
            }
        })
        .await
        .context("failed to watch app-config document")
        .map_err(CliError::failure)?;

    shutdown.await;
    subscription.unsubscribe();
    Ok(())
}

fn client<S>(ctx: &AppContext<S>) -> RemoteStore<S>
where
    S: DocumentStore + 'static,
{
    RemoteStore::new(ctx.store.clone(), RemoteStoreOptions::default())
}

fn request_for(args: &ObserveArgs) -> CliResult<AppConfigRequest> {
    let version = args.client_version.trim();
    if version.is_empty() {
        return Err(CliError::validation("--client-version must not be empty"));
    }
    Ok(AppConfigRequest::new(args.env, args.platform, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use remote_store_config::{Env, Platform};
    use remote_store_data::{FileStore, MemoryStore};
    use remote_store_test_support::fixtures::{RecordBuilder, path_of};
    use std::sync::Arc;
    use std::time::Duration;

    fn context(store: &MemoryStore, output: OutputFormat) -> AppContext<MemoryStore> {
        AppContext::new(Arc::new(store.clone()), output)
    }

    fn observe(version: &str) -> ObserveArgs {
        ObserveArgs {
            env: Env::Dev,
            platform: Platform::Android,
            client_version: version.to_string(),
        }
    }

    #[tokio::test]
    async fn migrate_then_check_round_trip() -> CliResult<()> {
        let store = MemoryStore::new();
        let ctx = context(&store, OutputFormat::Table);

        let migrated = handle_migrate(
            &ctx,
            MigrateArgs {
                env: Env::Dev,
                force: false,
            },
        )
        .await?;
        assert_eq!(migrated.lines().count(), 3);

        let checked = handle_check(&ctx, CheckArgs { env: Env::Dev }).await?;
        assert_eq!(checked, "dev:android: ok\ndev:ios: ok\ndev:web: ok");

        let cleaned = handle_clean(&ctx, CleanArgs { env: Env::Dev }).await?;
        assert_eq!(cleaned, "deleted 3 document(s)");
        assert!(store.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn show_projects_current_record() -> CliResult<()> {
        let store = MemoryStore::new();
        store
            .put(
                &path_of(Env::Dev, Platform::Android),
                RecordBuilder::new(Env::Dev, Platform::Android)
                    .review("3.1.0")
                    .document(),
            )
            .await
            .map_err(CliError::failure)?;
        let ctx = context(&store, OutputFormat::Table);

        let line = handle_show(&ctx, observe("3.1.0")).await?;
        assert_eq!(line, "dev:android maintenance=false review=true update=none");
        Ok(())
    }

    #[tokio::test]
    async fn show_rejects_blank_version() {
        let store = MemoryStore::new();
        let ctx = context(&store, OutputFormat::Table);
        let err = handle_show(&ctx, observe("  "))
            .await
            .err()
            .map(|err| err.exit_code());
        assert_eq!(err, Some(2));
    }

    #[tokio::test]
    async fn watch_returns_after_shutdown() -> CliResult<()> {
        let dir = tempfile::tempdir().map_err(CliError::failure)?;
        let store = FileStore::new(dir.path().join("store.json"))
            .with_poll_interval(Duration::from_millis(20));
        let ctx = AppContext::new(Arc::new(store), OutputFormat::Json);

        tokio::time::timeout(
            Duration::from_secs(2),
            handle_watch(
                &ctx,
                observe("1.0.0"),
                tokio::time::sleep(Duration::from_millis(50)),
            ),
        )
        .await
        .map_err(CliError::failure)??;
        Ok(())
    }
}
