//! Scan, add and test a network, then dump the card log
//!
//! ```text
//! EYEFI_DIR=/media/EYE-FI/EYEFI cargo run --example manage_networks -- MyNet "pass phrase"
//! ```

use std::time::Duration;

use anyhow::Context;
use eyefi::{Card, NetTestState};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let dir = std::env::var("EYEFI_DIR").unwrap_or_else(|_| "/media/EYE-FI/EYEFI".to_string());
    let mut args = std::env::args().skip(1);
    let essid = args.next().context("usage: manage_networks <essid> <passphrase>")?;
    let passphrase = args.next().context("missing passphrase")?;

    let mut card = Card::open(&dir)
        .await
        .with_context(|| format!("opening card at {}", dir))?;

    println!("Networks in range:");
    for network in card.scan_networks().await?.networks {
        println!("  {:<32} {:>4} dBm  {}", network.essid, network.strength, network.net_type);
    }

    println!("Testing {}...", essid);
    card.test_network(&essid, &passphrase).await?;
    let mut state = NetTestState::NotScanning;
    for _ in 0..30 {
        state = card.network_test_state().await?;
        println!("  {}", state);
        if state.is_success() {
            break;
        }
        sleep(Duration::from_secs(1)).await;
    }
    anyhow::ensure!(state.is_success(), "network test did not succeed: {}", state);

    card.add_network(&essid, &passphrase).await?;

    println!("Configured networks:");
    for network in card.configured_networks().await?.networks {
        println!("  {}", network);
    }

    let log = card.fetch_log().await?;
    println!("--- card log ({} bytes) ---", log.len());
    println!("{}", String::from_utf8_lossy(&log));

    Ok(())
}
