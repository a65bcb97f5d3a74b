mod config;
mod monitor;

use anyhow::{Context, Result};
use config::{Auth, Config};
use log::info;
use monitor::Monitor;
use steam::{Client, Session};

#[tokio::main]
async fn main() -> Result<()> {
    common::setup_env();

    let config = Config::from_env()?;
    let session = authenticate(&config).await?;
    let client = Client::new(config.base_url.clone(), session);
    let monitor = Monitor::new(client, config.into_settings());

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    Ok(())
}

async fn authenticate(config: &Config) -> Result<Session> {
    match &config.auth {
        Auth::Token(session) => Ok(session.clone()),
        Auth::Credentials {
            username,
            password,
            guard_code,
        } => {
            info!("Logging in as {username}");
            let session = steam::login(
                &config.base_url,
                username,
                password,
                guard_code.as_deref(),
            )
            .await
            .context("authentication failed")?;
            info!("Login successful");
            Ok(session)
        }
    }
}
