use std::path::Path;

use crate::config::Config;

pub fn cmd_init(path: Option<&Path>) -> anyhow::Result<()> {
    let default_path = Config::default_config_path();
    let path = path.unwrap_or(&default_path);

    if Config::create_default_if_missing(path)? {
        println!("✓ Created {}", path.display());
        println!();
        println!("Set api.base_url to your inventory server, then sign in with:");
        println!("  chemlab login <username>");
    } else {
        println!("Config already exists: {}", path.display());
    }

    Ok(())
}
