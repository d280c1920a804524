//! CLI commands for the wallet
//!
//! Implements the command handlers for the CLI interface.

use crate::crypto::{prefixed_digest, sha256, Address, KeyPair};
use crate::ledger::MemoryLedger;
use crate::staking::{StakingCall, StakingVault};
use crate::wallet::{Operation, Wallet, ACCEPT_MAGIC};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Generate signer key pairs and print them
pub fn keygen(count: usize, json_output: bool) -> CliResult<()> {
    for i in 0..count {
        let kp = KeyPair::generate();
        if json_output {
            let record = json!({
                "address": kp.address().to_string(),
                "public_key": kp.public_key_hex(),
                "private_key": kp.private_key_hex(),
            });
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            println!("Key pair #{}", i + 1);
            println!("  Address:     {}", kp.address());
            println!("  Public key:  {}", kp.public_key_hex());
            println!("  Private key: {}", kp.private_key_hex());
        }
    }
    Ok(())
}

/// Sign a 32-byte digest, printing the 65-byte signature record as hex
pub fn sign(private_key: &str, digest_hex: &str, prefix: bool) -> CliResult<()> {
    let kp = KeyPair::from_private_key_hex(private_key)?;
    let digest = parse_digest(digest_hex)?;
    let digest = if prefix {
        prefixed_digest(&digest)
    } else {
        digest
    };

    let record = kp.sign_recoverable(&digest)?;
    println!("{}", hex::encode(record));
    Ok(())
}

/// Run the ad-hoc validator over a digest and signature bundle
pub fn check(
    owners: &[String],
    threshold: usize,
    digest_hex: &str,
    bundle_hex: &str,
) -> CliResult<()> {
    let owners = owners
        .iter()
        .map(|s| Address::from_hex(s))
        .collect::<Result<Vec<_>, _>>()?;
    let digest = parse_digest(digest_hex)?;
    let bundle = hex::decode(bundle_hex.trim_start_matches("0x"))?;

    // The authority identity plays no part in the ad-hoc check
    let wallet = Wallet::new(owners, threshold, KeyPair::generate().address())?;
    let code = wallet.check_signature(&digest, &bundle);

    if code == ACCEPT_MAGIC {
        println!("✅ ACCEPTED (0x{})", hex::encode(code));
    } else {
        println!("❌ REJECTED (0x{})", hex::encode(code));
    }
    Ok(())
}

/// Run the 2-of-3 end-to-end scenario against an in-memory ledger
pub fn demo() -> CliResult<()> {
    println!("🔐 Creating a 2-of-3 wallet...");
    let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
    let owners: Vec<_> = keys.iter().map(|k| k.address()).collect();
    let authority = KeyPair::generate().address();
    let mut wallet = Wallet::new(owners, 2, authority)?;
    println!("  Wallet:    {}", wallet.address());
    println!("  Authority: {}", authority);

    let mut ledger = MemoryLedger::new();
    ledger.credit(wallet.address(), 1_000);

    // A staking vault recoverable only by this wallet
    let vault_address = KeyPair::generate().address();
    let vault = Rc::new(RefCell::new(StakingVault::new(
        wallet.address(),
        chrono::Duration::days(7),
    )));
    vault
        .borrow_mut()
        .stake(KeyPair::generate().address(), 250, chrono::Utc::now())?;
    ledger.register(vault_address, Box::new(Rc::clone(&vault)));

    // 1. Two distinct owners approve: accepted and executed
    let recipient = KeyPair::generate().address();
    let digest = sha256(b"demo: pay the recipient 100");
    let op = signed_operation(recipient, 100, Vec::new(), &digest, &[&keys[0], &keys[1]])?;
    let (data, validated) = wallet.validate_operation(authority, &op, &digest, 0)?;
    wallet.execute(authority, validated, &mut ledger)?;
    println!(
        "✅ Two approvals: executed (validation data 0x{:x}), recipient holds {}",
        data.packed(),
        ledger.balance_of(&recipient)
    );

    // 2. One owner alone: validation aborts, nothing executes
    let digest = sha256(b"demo: pay the recipient 100 more");
    let op = signed_operation(recipient, 100, Vec::new(), &digest, &[&keys[0]])?;
    match wallet.validate_operation(authority, &op, &digest, 0) {
        Err(e) => println!("❌ One approval: {}", e),
        Ok(_) => println!("unexpected acceptance"),
    }

    // 3. The same owner signing twice counts once
    let op = signed_operation(recipient, 100, Vec::new(), &digest, &[&keys[0], &keys[0]])?;
    match wallet.validate_operation(authority, &op, &digest, 0) {
        Err(e) => println!("❌ One owner, two signatures: {}", e),
        Ok(_) => println!("unexpected acceptance"),
    }

    // 4. Governance boundary: 3 -> 2 owners is fine, 2 -> 1 is not
    let caller = keys[0].address();
    wallet.remove_owner(caller, keys[2].address())?;
    println!("✅ Removed one owner, {} remain", wallet.registry().owner_count());
    match wallet.remove_owner(caller, keys[1].address()) {
        Err(e) => println!("❌ Second removal: {}", e),
        Ok(()) => println!("unexpected removal"),
    }

    // 5. Vault recovery, reachable only through the gate
    println!("🏦 Vault holds {} before recovery", vault.borrow().total());
    let digest = sha256(b"demo: recover the vault");
    let payload = serde_json::to_vec(&StakingCall::RecoverTokens {
        to: recipient,
        amount: 250,
    })?;
    let op = signed_operation(vault_address, 0, payload, &digest, &[&keys[0], &keys[1]])?;
    let (_, validated) = wallet.validate_operation(authority, &op, &digest, 0)?;
    wallet.execute(authority, validated, &mut ledger)?;
    println!("🏦 Vault holds {} after recovery", vault.borrow().total());

    println!("Nonce after the accepted operations: {}", wallet.nonce());
    Ok(())
}

/// Build an operation signed over the prefixed digest
fn signed_operation(
    target: Address,
    value: u64,
    payload: Vec<u8>,
    digest: &[u8; 32],
    signers: &[&KeyPair],
) -> CliResult<Operation> {
    let prefixed = prefixed_digest(digest);
    let mut signatures = Vec::new();
    for key in signers {
        signatures.extend_from_slice(&key.sign_recoverable(&prefixed)?);
    }
    Ok(Operation {
        target,
        value,
        payload,
        signatures,
    })
}

fn parse_digest(digest_hex: &str) -> CliResult<[u8; 32]> {
    let bytes = hex::decode(digest_hex.trim_start_matches("0x"))?;
    let digest: [u8; 32] = bytes
        .try_into()
        .map_err(|_| "digest must be exactly 32 bytes")?;
    Ok(digest)
}
