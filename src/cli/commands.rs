use crate::core::ChainValidation;
use clap::{Parser, Subcommand};
use std::net::Ipv4Addr;

#[derive(Debug, Parser)]
#[command(name = "pow-ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "startnode", about = "Run a ledger node")]
    StartNode {
        #[arg(long, help = "Host to bind and advertise (NODE_HOST)")]
        host: Option<Ipv4Addr>,
        #[arg(long, help = "HTTP port (NODE_PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Leading zero hex digits required of a block hash")]
        difficulty: Option<usize>,
        #[arg(
            long,
            help = "Checks applied to a neighbor chain: trust-peer, hash-link or full-pow"
        )]
        validation: Option<ChainValidation>,
        #[arg(long, help = "Do not start the recurring mining job")]
        no_mining: bool,
    },
    #[command(name = "startwallet", about = "Run the wallet server")]
    StartWallet {
        #[arg(long, help = "HTTP port (WALLET_PORT)")]
        port: Option<u16>,
        #[arg(long, help = "Node to forward transactions to, host:port (GATEWAY)")]
        gateway: Option<String>,
    },
    #[command(name = "createwallet", about = "Print a new wallet as JSON")]
    CreateWallet,
}
