//! Print what the card knows about itself

use eyefi::Card;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyefi::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Control directory on the mounted card
    let dir = std::env::var("EYEFI_DIR").unwrap_or_else(|_| "/media/EYE-FI/EYEFI".to_string());

    println!("Opening card at {}...", dir);
    let mut card = Card::open(dir).await?;

    println!("MAC address:   {}", card.mac_address().await?);
    println!("Firmware:      {}", card.firmware_info().await?);
    println!("API URL:       {}", card.api_url().await?);
    println!("Transfer mode: {}", card.transfer_mode().await?);
    println!("Wireless:      {}", if card.wlan_enabled().await? { "on" } else { "off" });
    println!("Log size:      {} bytes", card.log_length().await?);

    Ok(())
}
