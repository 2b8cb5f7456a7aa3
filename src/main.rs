// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};
use viewsync::{
    cli::{Cli, Settings},
    constants::{EXIT_CODE_MISCONFIGURED, METRICS_SERVER_PATH, TOKIO_WORKER_THREADS},
    fetcher::HttpListFetcher,
    metrics::gather_metrics,
    pdns::{build_http_client, PdnsClient},
    reconciler::ReconcileContext,
    scheduler::{run_once, PassStatus, Scheduler},
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = match cli.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid settings");
            std::process::exit(EXIT_CODE_MISCONFIGURED);
        }
    };

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("viewsync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(settings))
}

/// Initialize logging.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT=json` for
/// structured output.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(settings: Settings) -> Result<()> {
    info!(
        api_url = %settings.api_url,
        server_id = %settings.server_id,
        config = %settings.config_path.display(),
        "Starting PowerDNS view synchronizer"
    );

    debug!("Creating PowerDNS API client");
    let api = PdnsClient::new(
        &settings.api_url,
        &settings.api_key,
        &settings.server_id,
        settings.timeout,
    )?;

    // Remote lists get their own client so the API key never leaves for a list host
    let fetcher = HttpListFetcher::new(build_http_client(settings.timeout)?);

    let ctx = Arc::new(ReconcileContext::new(
        Arc::new(api),
        Arc::new(fetcher),
        settings.config_path.clone(),
    ));

    if let Some(addr) = settings.metrics_bind_address {
        tokio::spawn(async move {
            if let Err(e) = serve_metrics(addr).await {
                error!(error = %e, bind_address = %addr, "Metrics server stopped");
            }
        });
    }

    if settings.once {
        let status = run_once(ctx).await;
        if status != PassStatus::Applied {
            anyhow::bail!("Single pass finished with status {}", status.as_str());
        }
        return Ok(());
    }

    let passes = Scheduler::new(settings.interval)
        .run(ctx, shutdown_signal())
        .await;

    info!(passes, "View synchronizer stopped");
    Ok(())
}

/// Serve Prometheus metrics until the process exits.
async fn serve_metrics(addr: SocketAddr) -> Result<()> {
    info!(bind_address = %addr, path = METRICS_SERVER_PATH, "Starting metrics server");

    let app = Router::new().route(METRICS_SERVER_PATH, get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler, using Ctrl+C only");
                wait_for_ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            () = wait_for_ctrl_c() => {}
            _ = sigterm.recv() => info!("Received SIGTERM, stopping after the current pass"),
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT, stopping after the current pass"),
        Err(e) => {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    }
}
