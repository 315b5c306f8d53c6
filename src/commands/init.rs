//! @acp:module "Init Command"
//! @acp:summary "Initialize a new policyforge project"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `policyforge init`: writes the config file, creates the store
//! directory and an empty compliance-flag file.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::compliance::{ComplianceFlags, FileFlags};
use crate::config::{Config, StoreBackend};

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Config file to write
    pub config_path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
    /// Author recorded on history entries
    pub author: Option<String>,
    /// Site name fallback
    pub site_name: Option<String>,
    /// Site URL fallback
    pub site_url: Option<String>,
    /// Persistence backend
    pub backend: Option<StoreBackend>,
    /// Skip interactive prompts
    pub yes: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.config_path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        std::process::exit(1);
    }

    let mut config = Config::default();

    let interactive = !options.yes
        && options.author.is_none()
        && options.site_name.is_none()
        && options.site_url.is_none()
        && options.backend.is_none();

    if interactive {
        run_interactive_init(&mut config)?;
    } else {
        apply_cli_options(&mut config, &options);
    }

    if !config.store_dir.exists() {
        std::fs::create_dir_all(&config.store_dir)?;
        println!("{} Created {}", style("✓").green(), config.store_dir.display());
    }

    let flags = FileFlags::new(&config.compliance_file);
    if !flags.path().exists() {
        flags.save(&ComplianceFlags::new())?;
        println!("{} Created {}", style("✓").green(), flags.path().display());
    }

    config.save(&options.config_path)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        options.config_path.display()
    );

    if !config.content_dir.join("templates").exists() {
        println!(
            "{} No templates found under {}; documents will be empty until content is added",
            style("⚠").yellow(),
            config.content_dir.display()
        );
    }

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Run {} to answer the questionnaire",
        style("policyforge answers interactive").cyan()
    );
    println!(
        "  2. Run {} to generate every document",
        style("policyforge generate --all").cyan()
    );

    Ok(())
}

fn run_interactive_init(config: &mut Config) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{} policyforge project setup\n", style("→").cyan());

    config.author = Input::with_theme(&theme)
        .with_prompt("Author name for version history")
        .default(config.author.clone())
        .interact_text()?;

    let site_name: String = Input::with_theme(&theme)
        .with_prompt("Site name (blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    config.site.name = non_empty(site_name);

    let site_url: String = Input::with_theme(&theme)
        .with_prompt("Site URL (blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    config.site.url = non_empty(site_url);

    let backends = [StoreBackend::File, StoreBackend::Sqlite];
    let labels: Vec<&str> = backends.iter().map(|b| b.as_str()).collect();
    let choice = Select::with_theme(&theme)
        .with_prompt("Storage backend")
        .items(&labels)
        .default(0)
        .interact()?;
    config.store_backend = backends[choice];

    Ok(())
}

fn apply_cli_options(config: &mut Config, options: &InitOptions) {
    if let Some(author) = &options.author {
        config.author = author.clone();
    }
    if let Some(name) = &options.site_name {
        config.site.name = non_empty(name.clone());
    }
    if let Some(url) = &options.site_url {
        config.site.url = non_empty(url.clone());
    }
    if let Some(backend) = options.backend {
        config.store_backend = backend;
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_cli_options() {
        let mut config = Config::default();
        let options = InitOptions {
            author: Some("legal".into()),
            site_name: Some("  ".into()),
            site_url: Some("https://acme.test".into()),
            backend: Some(StoreBackend::Sqlite),
            yes: true,
            ..InitOptions::default()
        };
        apply_cli_options(&mut config, &options);
        assert_eq!(config.author, "legal");
        assert_eq!(config.site.name, None);
        assert_eq!(config.site.url.as_deref(), Some("https://acme.test"));
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
    }
}
