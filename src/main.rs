use std::sync::Arc;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        db_name = %settings.database.name,
        "bookshelf bootstrap starting"
    );

    let db = Arc::new(Database::connect_lazy(&settings.database));

    // A failed connection is logged, not fatal: the listener still comes up
    // and storage-backed routes answer 500 until the database is reachable.
    let conn_check = db.clone();
    tokio::spawn(async move {
        match conn_check.verify().await {
            Ok(()) => tracing::info!("connected to MySQL database"),
            Err(err) => tracing::error!(error = %err, "error connecting to MySQL"),
        }
    });

    let registry = bookshelf::build_registry(db.clone());
    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings.server, shutdown_signal()).await;

    registry.stop_all().await?;
    db.close().await;
    tracing::info!("bookshelf stopped");

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
