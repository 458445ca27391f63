use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "keyfort")]
#[command(about = "Account authentication and role authorization console", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "keyfort.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an admin account (bootstrap for a fresh install)
    Admin {
        #[arg(long)]
        username: String,
    },
}
