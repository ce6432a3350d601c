mod config;
mod protocol;
mod server;
mod tls;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use config::GatewayConfig;
use matching_engine::{Dispatcher, FillNotifier, OrderBook, SessionRegistry};
use server::Server;

/// TLS line-protocol gateway for the matching engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = GatewayConfig::load(&args.config)?;

    let sessions = Arc::new(SessionRegistry::new());
    for user in &config.users {
        sessions.add_user(user.name.clone(), user.password.clone());
    }
    tracing::info!(users = config.users.len(), "credential table loaded");

    let notifier = Arc::new(FillNotifier::new());
    let dispatcher = Dispatcher::start(
        OrderBook::new(),
        Arc::clone(&notifier),
        Arc::clone(&sessions),
        config.limits.dispatch_queue,
    );

    let acceptor = tls::build_acceptor(&config.tls)?;
    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");

    let server = Server::new(
        Arc::clone(&dispatcher),
        notifier,
        sessions,
        acceptor,
        config.limits.clone(),
    );

    tokio::select! {
        result = server.serve(listener) => result?,
        _ = shutdown_signal() => tracing::info!("shutdown signal received"),
    }

    // Stop accepting first, then let the matcher drain what was queued.
    dispatcher.shutdown().await;
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut term = signal(SignalKind::terminate()).expect("installing SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
