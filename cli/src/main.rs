//! adderls entry point: transport selection and logging setup.
//!
//! The server speaks LSP over stdio by default; `--tcp` listens for a
//! single editor connection instead. In stdio mode stdout carries the
//! protocol, so all logging goes to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use adder_server::PythonBridge;

#[derive(Debug, Parser)]
#[command(name = "adderls", version, about = "A jedi-powered Python language server")]
struct Args {
    /// Listen on TCP instead of speaking LSP over stdio.
    #[arg(long)]
    tcp: bool,

    /// Bind address for --tcp.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port for --tcp.
    #[arg(long, default_value_t = 2087)]
    port: u16,

    /// Python interpreter for the analysis helper (default: python3 from PATH).
    #[arg(long)]
    python: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let bridge = PythonBridge::spawn(args.python.as_deref())?;

    if args.tcp {
        let addr = format!("{}:{}", args.host, args.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        tracing::info!("listening on {addr}");
        let (stream, peer) = listener.accept().await.context("accepting client")?;
        tracing::info!("client connected from {peer}");
        let (read, write) = stream.into_split();
        adder_server::serve(read, write, bridge).await
    } else {
        adder_server::serve(tokio::io::stdin(), tokio::io::stdout(), bridge).await
    }
}
