//! phonebookd — the phonebook daemon.
//!
//! Opens the Redis store once, serves the phone → address API until
//! Ctrl-C / SIGTERM, then releases the store connection. Every setting can
//! come from a flag or from the environment.
//!
//! # Usage
//!
//! ```text
//! REDIS_HOST=cache.internal phonebookd --api-port 8080
//! phonebookd --in-memory
//! ```

use anyhow::Context;
use clap::Parser;
use phonebook_store::{KeyValueStore, MemoryStore, RedisStore, StoreConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str =
    "info,phonebookd=debug,phonebook_api=debug,phonebook_store=debug,tower_http=debug";

#[derive(Debug, Parser)]
#[command(name = "phonebookd", about = "Phone to mailing address lookup service")]
struct Cli {
    /// Redis host.
    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    redis_host: String,

    /// Redis port.
    #[arg(long, env = "REDIS_PORT", default_value = "6379")]
    redis_port: u16,

    /// Redis logical database index.
    #[arg(long, env = "REDIS_DB", default_value = "0")]
    redis_db: u32,

    /// Address to bind the HTTP server to.
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    api_host: String,

    /// Port to listen on.
    #[arg(long, env = "API_PORT", default_value = "8000")]
    api_port: u16,

    /// Keep records in process memory instead of Redis (lost on exit).
    #[arg(long, env = "PHONEBOOK_IN_MEMORY")]
    in_memory: bool,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            host: self.redis_host.clone(),
            port: self.redis_port,
            db: self.redis_db,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    if cli.in_memory {
        warn!("running with the in-memory store; records are lost on exit");
        return serve(&cli.api_host, cli.api_port, MemoryStore::new()).await;
    }

    let config = cli.store_config();
    let store = RedisStore::open(&config)?;
    match store.connect().await {
        Ok(()) => info!(url = %config.url(), "redis connected"),
        Err(e) => warn!(url = %config.url(), error = %e, "redis not reachable, will retry on demand"),
    }

    // The store is released whatever way the server ends, bind failures included.
    let result = serve(&cli.api_host, cli.api_port, store.clone()).await;
    store.close().await;

    info!("phonebook daemon stopped");
    result
}

async fn serve<S: KeyValueStore>(host: &str, port: u16, store: S) -> anyhow::Result<()> {
    let router = phonebook_api::build_router(store);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!(addr = %listener.local_addr()?, "API server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["phonebookd"]).unwrap();
        assert_eq!(cli.store_config(), StoreConfig::default());
        assert_eq!(cli.api_host, "0.0.0.0");
        assert_eq!(cli.api_port, 8000);
        assert!(!cli.in_memory);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "phonebookd",
            "--redis-host",
            "cache.internal",
            "--redis-port",
            "6380",
            "--redis-db",
            "2",
            "--api-port",
            "9000",
        ])
        .unwrap();
        assert_eq!(cli.store_config().url(), "redis://cache.internal:6380/2");
        assert_eq!(cli.api_port, 9000);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["phonebookd", "--api-port", "http"]).is_err());
    }

    #[test]
    fn rejects_negative_db_index() {
        let err = Cli::try_parse_from(["phonebookd", "--redis-db=-1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let err = serve("127.0.0.1", port, MemoryStore::new()).await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }
}
