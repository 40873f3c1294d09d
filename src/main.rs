// This is the entry point for the ledger node and the wallet server
// Each subcommand builds its own context from the config and hands it to the HTTP server

use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::{error, info, LevelFilter};
use pow_ledger::api::{self, WalletGateway};
use pow_ledger::network::messages::WalletResponse;
use pow_ledger::network::{HttpPeerClient, Node, PortScanDiscovery};
use pow_ledger::{Command, Config, Ledger, Opt, Wallet};
use std::process;
use std::sync::Arc;

fn main() {
    // Info level by default, RUST_LOG can still narrow or widen it
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    match command {
        Command::StartNode {
            host,
            port,
            difficulty,
            validation,
            no_mining,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(difficulty) = difficulty {
                config.difficulty = difficulty;
            }
            if let Some(validation) = validation {
                config.validation = validation;
            }
            config.validate()?;
            run_node(&config, !no_mining)?;
        }
        Command::StartWallet { port, gateway } => {
            if let Some(port) = port {
                config.wallet_port = port;
            }
            if let Some(gateway) = gateway {
                config.gateway = gateway;
            }
            config.validate()?;
            run_wallet_server(&config)?;
        }
        Command::CreateWallet => {
            let wallet = Wallet::new()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&WalletResponse::from(&wallet))?
            );
        }
    }
    Ok(())
}

fn run_node(config: &Config, mining: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The miner's wallet receives every block reward this node earns
    let miner = Wallet::new()?;
    info!("Miner private key: {}", miner.get_private_key_hex());
    info!("Miner public key: {}", miner.get_public_key());
    info!("Miner address: {}", miner.get_address());

    let ledger = Ledger::new(&miner.get_address(), config.difficulty)?
        .with_mining_reward(config.mining_reward)
        .with_validation(config.validation);

    // The blocking client has to be built outside the async runtime
    let client = Arc::new(HttpPeerClient::new(config.peer_timeout)?);
    let discovery = PortScanDiscovery::new(config.host, config.port, config.peer_timeout);
    let node = Arc::new(
        Node::new(&config.get_node_addr(), ledger, client, Box::new(discovery))
            .with_mining_interval(config.mining_interval)
            .with_sync_interval(config.neighbor_sync_interval),
    );

    node.sync_neighbors()?;
    node.resolve_conflicts()?;
    node.start_neighbor_sync()?;
    if mining {
        node.start_mining()?;
    }

    let data = web::Data::from(node.clone());
    let bind = (config.host.to_string(), config.port);
    info!(
        "Starting node at http://{} (difficulty {}, validation {})",
        config.get_node_addr(),
        config.difficulty,
        config.validation
    );
    let served = actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .configure(api::init_routes)
        })
        .bind(bind)?
        .run()
        .await
    });

    node.shutdown()?;
    served?;
    info!("Node stopped");
    Ok(())
}

fn run_wallet_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Kept alive here so the blocking client is released outside the runtime
    let client = Arc::new(HttpPeerClient::new(config.peer_timeout)?);
    let gateway = web::Data::new(WalletGateway::new(&config.gateway, client.clone()));
    info!(
        "Starting wallet server on port {} forwarding to {}",
        config.wallet_port, config.gateway
    );
    let port = config.wallet_port;
    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .app_data(gateway.clone())
                .configure(api::init_wallet_routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    })?;
    drop(client);
    Ok(())
}
