//! CLI administration tool for club-admin.
//!
//! Talks to the record store directly, without going through the web
//! server, to check connectivity and try out admin accounts.
//!
//! # Usage
//!
//! ```bash
//! # Check that the record store answers
//! cargo run --bin admin -- backend check
//!
//! # Try a login and report whether the account is on its first connection
//! cargo run --bin admin -- login --email admin@club.example
//!
//! # Show the web server configuration
//! cargo run --bin admin -- config
//! ```
//!
//! # Environment Variables
//!
//! - `POCKETBASE_URL` (or `POCKETBASE_SCHEME` / `POCKETBASE_HOST` / `POCKETBASE_PORT`)
//! - `USERS_COLLECTION` (default: `users`)
//!
//! The `config` command reads the full server configuration instead.

use club_admin::config;
use club_admin::domain::auth_store::token_expiry;
use club_admin::domain::repositories::AuthBackend;
use club_admin::infrastructure::pocketbase::PocketBaseClient;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Input, Password};

/// CLI tool for operating club-admin.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Record store operations
    Backend {
        #[command(subcommand)]
        action: BackendAction,
    },

    /// Sign in with an admin account and show what the login screen would do
    Login {
        /// Account email (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Show the web server configuration
    Config,
}

/// Record store subcommands.
#[derive(Subcommand)]
enum BackendAction {
    /// Check the record store health endpoint
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Backend { action } => handle_backend_action(action).await?,
        Commands::Login { email } => try_login(email).await?,
        Commands::Config => show_config()?,
    }

    Ok(())
}

/// Builds a record store client from the environment.
fn backend_client() -> Result<PocketBaseClient> {
    let url = match std::env::var("POCKETBASE_URL") {
        Ok(url) => url,
        Err(_) => {
            let scheme =
                std::env::var("POCKETBASE_SCHEME").unwrap_or_else(|_| "http".to_string());
            let host = std::env::var("POCKETBASE_HOST")
                .context("POCKETBASE_URL or POCKETBASE_HOST must be set")?;
            let port = std::env::var("POCKETBASE_PORT").unwrap_or_else(|_| "8090".to_string());
            format!("{scheme}://{host}:{port}")
        }
    };
    let collection = std::env::var("USERS_COLLECTION").unwrap_or_else(|_| "users".to_string());

    PocketBaseClient::new(&url, collection).context("Failed to create record store client")
}

/// Handles record store diagnostic commands.
async fn handle_backend_action(action: BackendAction) -> Result<()> {
    let client = backend_client()?;

    match action {
        BackendAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking record store at".bright_blue(),
                config::mask_connection_string(client.base_url().as_str()).bright_white()
            );

            client
                .health()
                .await
                .map_err(|e| anyhow::anyhow!("Record store unreachable: {}", e))?;

            println!("{}", "✅ Record store OK".green().bold());
        }
    }

    Ok(())
}

/// Signs in with an admin account.
///
/// # Flow
///
/// 1. Prompt for the email (or use `--email`) and the password
/// 2. Authenticate against the users collection
/// 3. Report the record, the token expiry and which screen the web login
///    would show next
///
/// Nothing is changed in the store; a first-connection account keeps its
/// flag until its owner picks a password in the browser.
async fn try_login(email: Option<String>) -> Result<()> {
    println!("{}", "🔑 Admin login".bright_blue().bold());
    println!();

    let client = backend_client()?;

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let auth = match client.login(email.trim(), &password).await {
        Ok(auth) => auth,
        Err(e) if e.is_rejection() => {
            println!("{}", "❌ Incorrect credentials".red().bold());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Login request failed: {}", e)),
    };

    println!("{}", "✅ Credentials accepted".green().bold());
    println!();
    println!("  ID:    {}", auth.record.id.bright_black());
    println!("  Email: {}", auth.record.email.cyan());

    let expiry = token_expiry(&auth.token)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!("  Token expires: {}", expiry.bright_black());
    println!();

    if auth.record.first_connection {
        println!(
            "{}",
            "⚠️  First connection: the web login will ask for a new password".yellow()
        );
    } else {
        println!("{}", "  Next screen: dashboard".bright_white());
    }
    println!();

    Ok(())
}

/// Prints the web server configuration, secrets masked.
fn show_config() -> Result<()> {
    let config = config::load_from_env()?;

    println!("{}", "ℹ️  Configuration".bright_blue().bold());
    println!();
    println!("  Listen:           {}", config.listen_addr.bright_white());
    println!(
        "  Record store:     {}",
        config::mask_connection_string(&config.pocketbase_url).bright_white()
    );
    println!("  Users collection: {}", config.users_collection.cyan());
    println!("  Club:             {}", config.club.name.cyan());
    println!("  Logo:             {}", config.club.logo_url.bright_black());
    println!(
        "  Session TTL:      {}",
        format!("{}s", config.session_ttl_seconds).bright_white()
    );
    println!(
        "  Secure cookie:    {}",
        if config.cookie_secure {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    println!(
        "  Logging:          {} ({})",
        config.log_level.bright_white(),
        config.log_format.bright_black()
    );
    println!();

    Ok(())
}
