//! Token issue/inspect CLI.
//!
//! Issues a time-windowed auth token for a shared secret, or decodes an
//! existing token and reports its issue time and remaining validity.

use clap::{Parser, Subcommand};
use idmask::auth::{decode_token, AuthTokenService};
use idmask::core::config::AuthConfig;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(name = "idmask-token", about = "Issue and inspect idmask auth tokens")]
struct Cli {
    /// Shared secret (falls back to the IDMASK_SECRET environment variable).
    #[arg(long, env = "IDMASK_SECRET")]
    secret: String,

    /// Token validity window in seconds.
    #[arg(long, default_value_t = 300)]
    validity_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a new token for the current time.
    Issue,
    /// Decode a token and report its validity.
    Decode {
        /// The token to decode.
        token: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let service = AuthTokenService::new(AuthConfig {
        secret: cli.secret,
        validity_secs: cli.validity_secs,
    })?;

    match cli.command {
        Command::Issue => {
            let token = service.issue()?;
            println!("{}", token);
        }
        Command::Decode { token } => {
            let Some(parts) = decode_token(&token) else {
                eprintln!("token is not decodable");
                std::process::exit(1);
            };
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
            let expires_at = parts.issued_at + service.validity_secs();
            let valid = service.verify(&token, now);

            println!("issued_at:  {}", parts.issued_at);
            println!("expires_at: {}", expires_at);
            println!("remaining:  {}s", expires_at.saturating_sub(now));
            println!("valid:      {}", valid);
        }
    }
    Ok(())
}
