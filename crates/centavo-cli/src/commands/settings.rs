//! Settings command implementations

use std::path::Path;

use anyhow::Result;

use centavo_core::Settings;

use super::settings_path;

pub fn cmd_settings_show(config: Option<&Path>) -> Result<()> {
    let path = settings_path(config)?;
    let settings = Settings::load(&path)?;

    println!("Settings ({})", path.display());
    match settings.sms_sender_number {
        Some(ref number) => println!("  sms sender: {}", number),
        None => println!("  sms sender: any (not restricted)"),
    }

    Ok(())
}

pub fn cmd_settings_set_sender(config: Option<&Path>, number: &str) -> Result<()> {
    let path = settings_path(config)?;
    let mut settings = Settings::load(&path)?;

    settings.set_sender(number);
    settings.save(&path)?;

    match settings.sms_sender_number {
        Some(ref digits) => println!("✅ Only messages from {} will be processed", digits),
        None => println!("✅ Sender cleared; messages from any sender will be processed"),
    }

    Ok(())
}

pub fn cmd_settings_clear_sender(config: Option<&Path>) -> Result<()> {
    let path = settings_path(config)?;
    let mut settings = Settings::load(&path)?;

    settings.clear_sender();
    settings.save(&path)?;
    println!("✅ Sender cleared; messages from any sender will be processed");

    Ok(())
}
