use clap::Parser;

use keyfort::cli::{Cli, Commands};
use keyfort::config::KeyfortConfig;
use keyfort::interactive;
use keyfort::manager::AuthManager;

fn main() {
    let cli = Cli::parse();
    let config = KeyfortConfig::load_or_default(&cli.config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.storage.log_level)),
        )
        .init();

    let mut manager = match AuthManager::new(&config) {
        Ok(manager) => manager,
        Err(e) => {
            // A corrupt store must not be silently replaced; bail and leave
            // the last good file on disk for manual recovery.
            eprintln!("Failed to open account store: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Admin { username }) => create_admin(&mut manager, &username),
        None => interactive::run(&mut manager),
    }
}

fn create_admin(manager: &mut AuthManager, username: &str) {
    let password = interactive::prompt("Admin password: ");
    let confirm = interactive::prompt("Repeat password: ");
    if password != confirm {
        eprintln!("Passwords do not match.");
        std::process::exit(1);
    }
    match manager.bootstrap_admin(username, &password) {
        Ok(()) => println!("Admin account '{}' created.", username),
        Err(e) => {
            eprintln!("Failed to create admin: {}", e);
            std::process::exit(1);
        }
    }
}
