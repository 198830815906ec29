use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use stable_swap_client::{
    logger, parse_keypair, CancelToken, ClientConfig, Cluster, PoolRegistry, RpcChain,
    StableSwapClient, SwapRequest,
};
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser)]
#[clap(name = "stable-swap", about = "Solana stable-swap CLI tool")]
struct Cli {
    /// RPC cluster
    #[clap(short, long, env = "STABLE_SWAP_CLUSTER", value_enum, default_value = "dev")]
    cluster: Cluster,

    /// Override the cluster's RPC endpoint
    #[clap(long, env)]
    rpc_url: Option<String>,

    #[clap(long, env, default_value = "info")]
    rust_log: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Work with the saber stable-swap dex
    Saber {
        #[clap(subcommand)]
        command: SaberCommand,
    },
    /// Request an airdrop to an account
    Airdrop { address: Pubkey, sol: u64 },
    /// Get an account's SOL balance
    Balance { address: Pubkey },
    /// Create a new wallet
    Wallet,
}

#[derive(Subcommand)]
enum SaberCommand {
    /// List pools from the published registry
    Pools,
    /// Swap tokens
    Swap {
        /// Pool (swap info) account
        pool: Pubkey,
        /// Amount of token A to send
        amount_in: u64,
        /// Mint of the token sent
        mint_a: Pubkey,
        /// Minimum amount of token B to receive
        minimum_amount_out: u64,
        /// Mint of the token received
        mint_b: Pubkey,

        /// Stable-swap program account, defaults to the mainnet deployment
        #[clap(long, env = "STABLE_SWAP_PROGRAM_ID")]
        program: Option<Pubkey>,

        /// Base58 private key of the paying wallet
        #[clap(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        /// Show accounts in the instruction (don't send the transaction)
        #[clap(short, long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(&cli.rust_log);

    let mut config = ClientConfig::for_cluster(cli.cluster);
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    let cancel = CancelToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received, cancelling");
            canceller.cancel();
        }
    });

    match cli.command {
        Command::Saber { command } => run_saber(command, cli.cluster, config, cancel).await,
        Command::Airdrop { address, sol } => {
            let client = connect(&config, cancel)?;
            let signature = client
                .airdrop(&address, sol)
                .await
                .context("airdrop failed")?;
            info!("{}", signature);
            Ok(())
        }
        Command::Balance { address } => {
            let client = connect(&config, cancel)?;
            let lamports = client
                .balance(&address)
                .await
                .context("balance lookup failed")?;
            info!("Balance lamports: {}", lamports);
            info!(
                "Balance sol: {},{:09} SOL",
                lamports / LAMPORTS_PER_SOL,
                lamports % LAMPORTS_PER_SOL
            );
            Ok(())
        }
        Command::Wallet => {
            let wallet = Keypair::new();
            info!("Private key: {}", wallet.to_base58_string());
            info!("Public key: {}", wallet.pubkey());
            Ok(())
        }
    }
}

async fn run_saber(
    command: SaberCommand,
    cluster: Cluster,
    mut config: ClientConfig,
    cancel: CancelToken,
) -> Result<()> {
    match command {
        SaberCommand::Pools => {
            let registry = PoolRegistry::fetch(cluster).await?;
            registry.list_pools();
            Ok(())
        }
        SaberCommand::Swap {
            pool,
            amount_in,
            mint_a,
            minimum_amount_out,
            mint_b,
            program,
            private_key,
            show,
        } => {
            if let Some(program) = program {
                config.program_id = program.to_string();
            }
            let wallet = parse_keypair(&private_key)?;
            let client = connect(&config, cancel)?;
            let request = SwapRequest {
                pool,
                source_mint: mint_a,
                destination_mint: mint_b,
                amount_in,
                minimum_amount_out,
            };

            if show {
                client.show_swap(&request, &wallet.pubkey()).await?;
                return Ok(());
            }

            let signature = client.swap(&request, &wallet).await?;
            info!("{}", signature);
            Ok(())
        }
    }
}

fn connect(config: &ClientConfig, cancel: CancelToken) -> Result<StableSwapClient<RpcChain>> {
    let program_id = config.get_program_id()?;
    let rpc = RpcChain::new(config);
    info!("Using RPC endpoint {}", rpc.url());
    Ok(StableSwapClient::new(rpc, program_id, cancel))
}
