//! Ledger integration tests
//!
//! Mining, admission, balance replay and signing working together.

mod common;

use common::submit_signed;
use pow_ledger::core::meets_difficulty;
use pow_ledger::utils::{base58_decode, ecdsa_p256_sha256_sign_verify};
use pow_ledger::wallet::checksum;
use pow_ledger::{
    address_from_public_key, authenticate, Block, Ledger, ProofOfWork, Signature, Transaction,
    Wallet, MINING_SENDER,
};
use std::sync::Arc;
use std::thread;

#[test]
fn test_mined_block_satisfies_its_own_proof() {
    for difficulty in 1..=3 {
        let ledger = Ledger::new("miner", difficulty).unwrap();
        ledger
            .submit_transaction(MINING_SENDER, "someone", 1.0, None, None)
            .unwrap();
        assert!(ledger.mine().unwrap());

        let block = ledger.last_block().unwrap();
        let hex = block.hash_hex().unwrap();
        assert!(hex.starts_with(&"0".repeat(difficulty)), "{hex} at {difficulty}");

        // Rebuild the block from its stored fields and its wire form
        let rebuilt = Block::new_block(
            block.get_timestamp(),
            block.get_nonce(),
            *block.get_previous_hash(),
            block.get_transactions().to_vec(),
        );
        assert_eq!(rebuilt.hash().unwrap(), block.hash().unwrap());
        let wire: Block = serde_json::from_str(&serde_json::to_string(&block).unwrap()).unwrap();
        assert_eq!(wire.hash().unwrap(), block.hash().unwrap());
        assert!(ProofOfWork::new_proof_of_work(difficulty)
            .validate(&wire)
            .unwrap());
    }
}

#[test]
fn test_chain_links_hold() {
    let ledger = Ledger::new("miner", 1).unwrap();
    for _ in 0..4 {
        ledger
            .submit_transaction(MINING_SENDER, "someone", 1.0, None, None)
            .unwrap();
        assert!(ledger.mine().unwrap());
    }
    let chain = ledger.chain().unwrap();
    assert_eq!(chain.len(), 5);
    for i in 1..chain.len() {
        assert_eq!(*chain[i].get_previous_hash(), chain[i - 1].hash().unwrap());
        assert!(meets_difficulty(&chain[i].hash().unwrap(), 1));
    }
    assert!(ledger.is_valid_chain(&chain).unwrap());
}

#[test]
fn test_genesis_after_creation() {
    let ledger = Ledger::new("miner", 3).unwrap();
    let chain = ledger.chain().unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].get_nonce(), 0);
    assert!(chain[0].get_transactions().is_empty());
    assert_eq!(*chain[0].get_previous_hash(), Block::empty().hash().unwrap());
}

#[test]
fn test_balance_replay() {
    let ledger = Ledger::new("miner", 2).unwrap();
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap().get_address();
    let x = Wallet::new().unwrap();
    let y = Wallet::new().unwrap().get_address();

    assert!(submit_signed(&ledger, &a, &b, 1.0));
    assert!(submit_signed(&ledger, &a, &b, 2.1));
    assert!(ledger.mine().unwrap());
    assert!(submit_signed(&ledger, &x, &y, 1.1));
    assert!(ledger.mine().unwrap());

    let amount = |address: &str| ledger.calculate_total_amount(address).unwrap();
    assert!((amount(&b) - 3.1).abs() < 1e-9);
    assert!((amount(&a.get_address()) + 3.1).abs() < 1e-9);
    assert!((amount(&y) - 1.1).abs() < 1e-9);
    assert!((amount(&x.get_address()) + 1.1).abs() < 1e-9);
    assert!((amount("miner") - 2.0).abs() < 1e-9);
    assert_eq!(amount("nobody"), 0.0);
}

#[test]
fn test_pool_clears_once_per_successful_mine() {
    let ledger = Ledger::new("miner", 1).unwrap();
    let wallet = Wallet::new().unwrap();
    assert!(!ledger.mine().unwrap());

    assert!(submit_signed(&ledger, &wallet, "B", 1.0));
    assert!(ledger.mine().unwrap());
    assert!(ledger.transaction_pool().unwrap().is_empty());
    assert_eq!(ledger.len().unwrap(), 2);

    assert!(!ledger.mine().unwrap());
    assert_eq!(ledger.len().unwrap(), 2);
}

#[test]
fn test_concurrent_mining_appends_once() {
    let ledger = Arc::new(Ledger::new("miner", 2).unwrap());
    ledger
        .submit_transaction(MINING_SENDER, "someone", 1.0, None, None)
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = ledger.clone();
            thread::spawn(move || ledger.mine().unwrap())
        })
        .collect();
    let sealed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|sealed| *sealed)
        .count();

    assert_eq!(sealed, 1);
    assert_eq!(ledger.len().unwrap(), 2);
    assert!(ledger.is_valid_chain(&ledger.chain().unwrap()).unwrap());
}

#[test]
fn test_reward_admission_never_needs_signature() {
    let ledger = Ledger::new("miner", 1).unwrap();
    for value in [0.0, 1.0, 50.0] {
        assert!(ledger
            .submit_transaction(MINING_SENDER, "someone", value, None, None)
            .unwrap());
    }
    assert_eq!(ledger.transaction_pool().unwrap().len(), 3);
}

#[test]
fn test_authentication_roundtrip_and_tampering() {
    let wallet = Wallet::new().unwrap();
    let tx = Transaction::new(&wallet.get_address(), "recipient", 4.2);
    let signature = wallet.sign_transaction(&tx).unwrap();
    assert!(authenticate(&tx, wallet.get_public_key(), &signature));

    let sig_bytes = signature.to_fixed_bytes().unwrap();
    for i in 0..sig_bytes.len() {
        let mut flipped = sig_bytes.clone();
        flipped[i] ^= 0x01;
        let tampered = Signature::from_fixed_bytes(&flipped).unwrap();
        assert!(!authenticate(&tx, wallet.get_public_key(), &tampered), "byte {i}");
    }

    let public_key = wallet.get_public_key().to_uncompressed();
    let message = tx.canonical_bytes().unwrap();
    for i in 0..message.len() {
        let mut flipped = message.clone();
        flipped[i] ^= 0x01;
        assert!(
            !ecdsa_p256_sha256_sign_verify(&public_key, &sig_bytes, &flipped),
            "payload byte {i}"
        );
    }

    let altered = Transaction::new(&wallet.get_address(), "recipient", 4.3);
    assert!(!authenticate(&altered, wallet.get_public_key(), &signature));
}

#[test]
fn test_address_derivation_is_deterministic() {
    let wallet = Wallet::new().unwrap();
    let address = address_from_public_key(wallet.get_public_key());
    assert_eq!(address, wallet.get_address());
    assert_eq!(address, address_from_public_key(wallet.get_public_key()));

    let payload = base58_decode(&address).unwrap();
    let (versioned, check) = payload.split_at(payload.len() - 4);
    assert_eq!(checksum(versioned), check.to_vec());
}
