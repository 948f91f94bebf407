//! `reelsmith init` — First-time setup.

use reelsmith_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("Reelsmith — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        let config = AppConfig::load()?;
        if config.has_api_key() {
            println!("  API key: configured");
        } else {
            println!("  API key: missing (add `api_key` or set GEMINI_API_KEY)");
        }
        println!("  Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("  Created config.toml at: {}", config_path.display());
    println!("\n  Next steps:");
    println!("    1. Add `api_key = \"...\"` to {}", config_path.display());
    println!("       (or set GEMINI_API_KEY)");
    println!("    2. Put your system prompt in ./chat_prompt.txt");
    println!("    3. Run: reelsmith chat --script script.json\n");

    Ok(())
}
