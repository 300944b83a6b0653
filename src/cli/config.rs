//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::EXAMPLE_CONFIG;
use std::fs;

/// Handle `castctl config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> anyhow::Result<String> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        );
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Set connection.base_url and the admin password, then run `castctl status`.",
        args.output.display()
    ))
}
