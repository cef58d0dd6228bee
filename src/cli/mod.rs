//! CLI interface for Wicket

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wicket")]
#[command(author = "Krakaw")]
#[command(version = "0.1.0")]
#[command(about = "Small login service with a stateless session gateway", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new wicket.toml configuration file with a generated secret
    Init,

    /// Provision a user in the credential store
    #[command(name = "adduser")]
    AddUser {
        /// Username for the new account
        username: String,

        /// Password; prompted interactively when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Run the HTTP server
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}
