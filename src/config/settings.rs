use crate::core::{ChainValidation, DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD};
use crate::error::{BlockchainError, Result};
use std::env;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

const NODE_HOST_KEY: &str = "NODE_HOST";
const NODE_PORT_KEY: &str = "NODE_PORT";
const MINING_DIFFICULTY_KEY: &str = "MINING_DIFFICULTY";
const MINING_REWARD_KEY: &str = "MINING_REWARD";
const MINING_INTERVAL_KEY: &str = "MINING_INTERVAL_SECS";
const NEIGHBOR_SYNC_KEY: &str = "NEIGHBOR_SYNC_SECS";
const PEER_TIMEOUT_KEY: &str = "PEER_TIMEOUT_MS";
const CHAIN_VALIDATION_KEY: &str = "CHAIN_VALIDATION";
const WALLET_PORT_KEY: &str = "WALLET_PORT";
const GATEWAY_KEY: &str = "GATEWAY";

/// Process settings, built once in `main` and handed down
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: Ipv4Addr,
    pub port: u16,
    pub difficulty: usize,
    pub mining_reward: f64,
    pub mining_interval: Duration,
    pub neighbor_sync_interval: Duration,
    pub peer_timeout: Duration,
    pub validation: ChainValidation,
    pub wallet_port: u16,
    pub gateway: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: Ipv4Addr::LOCALHOST,
            port: 5001,
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            mining_interval: Duration::from_secs(20),
            neighbor_sync_interval: Duration::from_secs(20),
            peer_timeout: Duration::from_millis(2000),
            validation: ChainValidation::default(),
            wallet_port: 8080,
            gateway: String::from("127.0.0.1:5001"),
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| BlockchainError::Config(format!("Invalid value for {key}: {raw}")))
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` knows about
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(raw) = lookup(NODE_HOST_KEY) {
            config.host = parse(NODE_HOST_KEY, &raw)?;
        }
        if let Some(raw) = lookup(NODE_PORT_KEY) {
            config.port = parse(NODE_PORT_KEY, &raw)?;
        }
        if let Some(raw) = lookup(MINING_DIFFICULTY_KEY) {
            config.difficulty = parse(MINING_DIFFICULTY_KEY, &raw)?;
        }
        if let Some(raw) = lookup(MINING_REWARD_KEY) {
            config.mining_reward = parse(MINING_REWARD_KEY, &raw)?;
        }
        if let Some(raw) = lookup(MINING_INTERVAL_KEY) {
            config.mining_interval = Duration::from_secs(parse(MINING_INTERVAL_KEY, &raw)?);
        }
        if let Some(raw) = lookup(NEIGHBOR_SYNC_KEY) {
            config.neighbor_sync_interval = Duration::from_secs(parse(NEIGHBOR_SYNC_KEY, &raw)?);
        }
        if let Some(raw) = lookup(PEER_TIMEOUT_KEY) {
            config.peer_timeout = Duration::from_millis(parse(PEER_TIMEOUT_KEY, &raw)?);
        }
        if let Some(raw) = lookup(CHAIN_VALIDATION_KEY) {
            config.validation = raw.parse()?;
        }
        if let Some(raw) = lookup(WALLET_PORT_KEY) {
            config.wallet_port = parse(WALLET_PORT_KEY, &raw)?;
        }
        if let Some(raw) = lookup(GATEWAY_KEY) {
            config.gateway = raw.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > 64 {
            return Err(BlockchainError::Config(format!(
                "Difficulty {} exceeds the 64 hex digits of a SHA-256 hash",
                self.difficulty
            )));
        }
        if !self.mining_reward.is_finite() || self.mining_reward < 0.0 {
            return Err(BlockchainError::Config(format!(
                "Invalid mining reward {}",
                self.mining_reward
            )));
        }
        if self.mining_interval.is_zero() || self.neighbor_sync_interval.is_zero() {
            return Err(BlockchainError::Config(
                "Job intervals must be at least one second".to_string(),
            ));
        }
        if self.gateway.is_empty() {
            return Err(BlockchainError::Config("Gateway must not be empty".to_string()));
        }
        Ok(())
    }

    /// `host:port` this node is reachable on
    pub fn get_node_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
