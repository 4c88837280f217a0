//! ox-echo
//!
//! Throwaway HTTP listener that prints every POST body it receives

use std::net::SocketAddr;

use axum::{
    Json, Router,
    body::Bytes,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use clap::Parser;
use color_eyre::Result;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ox-echo", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "OX_ECHO_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let filter = EnvFilter::try_from_env("OX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %listener.local_addr()?, "echo listener started");

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("echo listener stopped");
    Ok(())
}

fn router() -> Router {
    Router::new().fallback(echo)
}

async fn echo(method: Method, uri: Uri, body: Bytes) -> Response {
    if method != Method::POST {
        warn!(%method, %uri, "method not allowed");
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    info!(%uri, bytes = body.len(), "received");
    println!("{}", String::from_utf8_lossy(&body));
    (StatusCode::OK, Json(json!({}))).into_response()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
    }
}
