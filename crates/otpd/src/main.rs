mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use otpd_seed::SeedService;

use cli::{Cli, Command, Config};

/// Maximum time to wait for in-flight requests once shutdown starts.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(cli.log_directive())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Hold the non-blocking guards for the lifetime of main so logs flush on exit.
    let _log_guards = init_logging(env_filter, cli.log_file.as_deref())?;

    let config = Config::from_cli(&cli);

    match &cli.command {
        None | Some(Command::Serve) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(config))?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Code) => commands::code(&config, cli.json),
        Some(Command::Verify { code }) => commands::verify(&config, code, cli.json),
        Some(Command::Decrypt { input }) => commands::decrypt(&config, input, cli.json),
    }
}

// ── Daemon ──────────────────────────────────────────────────────────

async fn serve(config: Config) -> anyhow::Result<()> {
    startup_diagnostics(&config);
    ensure_data_dir(&config);

    let service = Arc::new(SeedService::from_config(&config.seed_config()));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(addr = %config.listen, "HTTP adapter listening");

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
    });

    tracing::info!("Ready.");

    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut server => {
            // Server stopped on its own; nothing left to drain.
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(e.into()),
            };
        }
    }

    tracing::info!("Shutting down...");
    cancel.cancel();

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => tracing::warn!(error = %e, "HTTP server exited with error"),
        Ok(Err(e)) => tracing::warn!(error = %e, "HTTP server task failed"),
        Err(_) => tracing::warn!(
            "Shutdown timed out after {:?}, forcing exit",
            SHUTDOWN_TIMEOUT
        ),
    }

    Ok(())
}

/// Full application router: seed routes plus liveness.
fn router(service: Arc<SeedService>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .merge(otpd_seed::routes(service))
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"ok": true}))
}

/// Wait for Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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
}

// ── Startup ─────────────────────────────────────────────────────────

fn startup_diagnostics(config: &Config) {
    tracing::info!("otpd v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Platform: {}", std::env::consts::OS);

    match hostname::get() {
        Ok(h) => tracing::info!("Hostname: {}", h.to_string_lossy()),
        Err(e) => tracing::warn!(error = %e, "Could not determine hostname"),
    }

    tracing::info!("Data dir: {}", config.data_dir.display());
    tracing::info!("TOTP skew tolerance: +/-{} step(s)", config.skew);

    if config.private_key.is_file() {
        tracing::info!("Private key: {}", config.private_key.display());
    } else {
        tracing::warn!(
            path = %config.private_key.display(),
            "Private key not found; /decrypt-seed will fail until it is provisioned"
        );
    }
}

/// Create the data directory up front. Failure is logged, not fatal:
/// the store reports `storage_unavailable` per request instead.
fn ensure_data_dir(config: &Config) {
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::warn!(
            path = %config.data_dir.display(),
            error = %e,
            "Could not create data directory"
        );
    }
}

fn init_logging(
    env_filter: tracing_subscriber::EnvFilter,
    log_file: Option<&std::path::Path>,
) -> anyhow::Result<Vec<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;

    let (nb_stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(nb_stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let (nb_file, file_guard) = tracing_appender::non_blocking(file);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(nb_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        Ok(vec![stderr_guard, file_guard])
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();

        Ok(vec![stderr_guard])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_service(dir: &std::path::Path) -> Arc<SeedService> {
        Arc::new(SeedService::from_config(&otpd_seed::SeedConfig {
            data_dir: dir.to_path_buf(),
            private_key: dir.join("absent.pem"),
            skew: 1,
        }))
    }

    #[tokio::test]
    async fn healthz_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_service(dir.path()));
        let req = Request::get("/healthz").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn seed_routes_are_mounted_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_service(dir.path()));
        let req = Request::get("/generate-2fa").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn ensure_data_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            listen: "127.0.0.1:0".parse().unwrap(),
            data_dir: dir.path().join("data_test"),
            private_key: dir.path().join("k.pem"),
            skew: 1,
        };
        ensure_data_dir(&config);
        assert!(config.data_dir.is_dir());
    }
}
