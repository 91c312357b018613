//! ZenZebra CLI - operator commands for the back-office.
//!
//! # Usage
//!
//! ```bash
//! # Create the first admin (the owner) on a fresh project
//! zz-cli admin bootstrap -e owner@zenzebra.in -n "Owner Name"
//!
//! # List admins, marking the owner
//! zz-cli admin list
//!
//! # Show the effective system settings
//! zz-cli settings show
//!
//! # Print the status workflows
//! zz-cli workflow show
//! ```
//!
//! # Commands
//!
//! - `admin bootstrap` - Create the owner account (refuses if any admin exists)
//! - `admin list` - List admin accounts by registration
//! - `settings show` - Settings merged over defaults
//! - `workflow show` - Inquiry and partner request transition tables

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zz-cli")]
#[command(author, version, about = "ZenZebra back-office CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Inspect system settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Inspect status workflows
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create the owner account on a project without admins
    Bootstrap {
        /// Owner email address
        #[arg(short, long)]
        email: String,

        /// Owner display name
        #[arg(short, long)]
        name: String,

        /// Initial password (read from `ZZ_OWNER_PASSWORD` when omitted)
        #[arg(short, long, env = "ZZ_OWNER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List admin accounts
    List,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show effective settings
    Show,
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// Show the transition tables
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Bootstrap {
                email,
                name,
                password,
            } => {
                commands::admin::bootstrap(&email, &name, password).await?;
            }
            AdminAction::List => commands::admin::list().await?,
        },
        Commands::Settings {
            action: SettingsAction::Show,
        } => commands::settings::show().await?,
        Commands::Workflow {
            action: WorkflowAction::Show,
        } => commands::workflow::show(),
    }
    Ok(())
}
