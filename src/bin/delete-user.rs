// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remove a user record by provider and name.
//!
//! Usage: `delete-user <twitch|destinygg> <name> [config.toml]`

use unrustle_auth::{
    config::{Config, DEFAULT_CONFIG_PATH},
    db::UserStore,
    logging::init_logging,
    models::Service,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let (Some(service), Some(name)) = (args.next(), args.next()) else {
        eprintln!("usage: delete-user <twitch|destinygg> <name> [config.toml]");
        std::process::exit(2);
    };
    let config_path = args
        .next()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let service: Service = service.parse()?;
    let config = Config::from_file(&config_path)?;
    let db = UserStore::connect(&config.database).await?;

    if db.delete_user(&name, service).await? {
        tracing::info!(service = %service, name = %name, "Deleted user");
    } else {
        tracing::warn!(service = %service, name = %name, "No such user");
        std::process::exit(1);
    }
    Ok(())
}
