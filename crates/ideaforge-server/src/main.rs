mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ideaforge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = match &config.database_url {
        Some(url) => {
            let pool_config = ideaforge_store::PoolConfig::from_app_config(&config);
            // Lazy connect: a configured-but-unreachable database still
            // yields a pool, and per-call fallback takes over from there.
            let pool = ideaforge_store::connect_pool_lazy(url, pool_config)?;
            match ideaforge_store::run_migrations(&pool).await {
                Ok(applied) if applied > 0 => {
                    tracing::info!(applied, "database migrations applied");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "migrations failed; saves will fall back to the snapshot until the primary recovers"
                    );
                }
            }
            Some(pool)
        }
        None => {
            tracing::info!("DATABASE_URL not set, persisting to the snapshot file only");
            None
        }
    };

    let store = Arc::new(ideaforge_store::IdeaStore::new(
        pool,
        config.snapshot_path.clone(),
    ));
    let source = Arc::new(ideaforge_reddit::RedditSource::from_config(&config)?);
    let llm = Arc::new(ideaforge_llm::LlmClient::from_config(&config)?);

    let app = build_app(AppState {
        source,
        llm,
        store,
        sample_count: config.sample_count,
        filter_cap: config.filter_cap,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
