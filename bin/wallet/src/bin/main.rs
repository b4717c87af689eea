use clap::{Parser, Subcommand};
use client::{Erc20Token, RpcWallet};
use config::NetworkConfig;
use std::{sync::Arc, time::Instant};
use store::{FileStore, TxStatus};
use tracing::{info, warn};
use transfer::{TokenContract, TransferApp, TransferRequest, WalletProvider};
use wallet::{
    config::Config,
    follow,
    metrics::{install_prometheus_exporter, Metrics},
    resolve, send, start,
    view::Renderer,
};

#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Send ERC20 tokens and follow the transfer until it confirms")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Sign locally with this key (hex, with or without 0x prefix). Without
    /// it the RPC endpoint is used as the wallet.
    #[arg(short = 'k', long, env = "PRIVATE_KEY")]
    private_key: Option<String>,

    /// Serve Prometheus metrics on this port
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect the wallet and show the token balance
    Connect,

    /// Send tokens and wait for the transaction to resolve
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in whole tokens, e.g. 1.5
        #[arg(long)]
        amount: String,

        /// Send even if the tracked transaction is still pending
        #[arg(long)]
        replace: bool,
    },

    /// Show the stored transaction and the balance
    Status,

    /// Keep following the transaction, including changes from other sessions
    Watch,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_file(&cli.config)?;
    let network = config.network_config()?;

    info!(
        network = ?config.network,
        chain_id = network.chain_id,
        token = %network.token.address,
        storage = %config.storage_path.display(),
        "Loaded config"
    );

    if let Some(port) = cli.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Serving metrics");
    }

    match cli.private_key.as_deref() {
        Some(private_key) => {
            let account = client::signer_address(private_key)?;
            let provider = client::create_wallet_provider(&config.rpc_url, private_key)?;
            info!(%account, "Signing with local key");

            let wallet =
                RpcWallet::with_local_account(provider.clone(), account, config.poll_interval());
            let token = Erc20Token::new(provider, network.token.address);
            run(cli.command, wallet, token, &config, &network).await
        }
        None => {
            let provider = client::create_provider(&config.rpc_url)?;
            info!(rpc_url = %config.rpc_url, "Using RPC endpoint as wallet");

            let wallet = RpcWallet::new(provider.clone(), config.poll_interval());
            let token = Erc20Token::new(provider, network.token.address);
            run(cli.command, wallet, token, &config, &network).await
        }
    }
}

async fn run<W, T>(
    command: Command,
    wallet: W,
    token: T,
    config: &Config,
    network: &NetworkConfig,
) -> eyre::Result<()>
where
    W: WalletProvider + Clone + 'static,
    T: TokenContract + Clone + 'static,
{
    let store = Arc::new(FileStore::new(config.storage_path.clone(), config.poll_interval()));
    let app = TransferApp::new(wallet, token, store, config.monitor_options());
    let metrics = Metrics::new();
    let mut renderer = Renderer::new(network.explorer.clone());

    let started = Instant::now();
    let resumed = match start(&app).await {
        Ok(resumed) => resumed,
        Err(e) => {
            // still show what was restored
            renderer.show(&app.state());
            return Err(e);
        }
    };

    match command {
        Command::Connect | Command::Status => {
            renderer.show(&app.state());
        }
        Command::Send {
            to,
            amount,
            replace,
        } => {
            let request = TransferRequest::new(to, amount);
            let monitor = match send(&app, &request, replace, &metrics).await {
                Ok(monitor) => monitor,
                Err(e) => {
                    renderer.show(&app.state());
                    return Err(e);
                }
            };

            let outcome = follow(
                app.subscribe(),
                &mut renderer,
                &metrics,
                resolve(monitor, Instant::now(), &metrics),
            )
            .await?;

            if outcome.status == TxStatus::Failed {
                let reason = outcome
                    .error
                    .map_or_else(|| "transaction reverted".to_string(), |e| e.to_string());
                eyre::bail!("Transfer {} failed: {reason}", outcome.hash);
            }
        }
        Command::Watch => {
            let _sync = app.watch_storage();
            if let Some(monitor) = resumed {
                let metrics = metrics.clone();
                tokio::spawn(async move {
                    if let Err(e) = resolve(monitor, started, &metrics).await {
                        warn!(error = %e, "Resumed monitor stopped");
                    }
                });
            }

            follow(
                app.subscribe(),
                &mut renderer,
                &metrics,
                tokio::signal::ctrl_c(),
            )
            .await?;
            info!("Stopped watching");
        }
    }

    Ok(())
}
