//! Quorum-Wallet CLI Application
//!
//! A command-line interface for threshold multi-signature authorization.

use clap::{Parser, Subcommand};
use quorum_wallet::cli::commands;

#[derive(Parser)]
#[command(name = "quorum")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A threshold multi-signature authorization wallet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate signer key pairs
    Keygen {
        /// Number of key pairs to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign a 32-byte digest with a private key
    Sign {
        /// Hex-encoded private key
        #[arg(short, long)]
        key: String,

        /// Hex-encoded 32-byte digest
        #[arg(short, long)]
        digest: String,

        /// Normalize the digest into the operation-signing domain first
        #[arg(long)]
        prefix: bool,
    },

    /// Check a digest/signature bundle against an owner set
    Check {
        /// Owner address (repeat for each owner)
        #[arg(short, long, required = true)]
        owner: Vec<String>,

        /// Approval threshold
        #[arg(short, long)]
        threshold: usize,

        /// Hex-encoded 32-byte digest
        #[arg(short, long)]
        digest: String,

        /// Hex-encoded concatenated 65-byte signature records
        #[arg(short, long)]
        signatures: String,
    },

    /// Run the 2-of-3 end-to-end scenario against an in-memory ledger
    Demo,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen { count, json } => commands::keygen(count, json),
        Commands::Sign {
            key,
            digest,
            prefix,
        } => commands::sign(&key, &digest, prefix),
        Commands::Check {
            owner,
            threshold,
            digest,
            signatures,
        } => commands::check(&owner, threshold, &digest, &signatures),
        Commands::Demo => commands::demo(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
