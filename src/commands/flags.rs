//! @acp:module "Flags Command"
//! @acp:summary "List and toggle jurisdiction compliance flags"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{anyhow, Result};
use console::style;

use crate::compliance::{FileFlags, Jurisdiction};

/// Subcommand types for the flags command
#[derive(Debug, Clone)]
pub enum FlagsSubcommand {
    List { json: bool },
    Set { assignments: Vec<String> },
}

/// Execute the flags command
pub fn execute_flags(flags: &FileFlags, subcommand: FlagsSubcommand) -> Result<()> {
    match subcommand {
        FlagsSubcommand::List { json } => {
            let current = flags.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&current)?);
                return Ok(());
            }
            println!("{}", style("Compliance flags:").bold());
            for &jurisdiction in Jurisdiction::all() {
                let marker = if current.is_enabled(jurisdiction) {
                    style("●").green()
                } else {
                    style("○").dim()
                };
                println!(
                    "  {} {:<7} {} ({})",
                    marker,
                    jurisdiction.code(),
                    jurisdiction.name(),
                    jurisdiction.region()
                );
            }
            if current.any_enabled() {
                println!(
                    "\n  {} Flags override the target_regions answer for jurisdiction sections",
                    style("→").cyan()
                );
            }
        }

        FlagsSubcommand::Set { assignments } => {
            let mut current = flags.load()?;
            for (jurisdiction, enabled) in parse_flag_assignments(&assignments)? {
                current.set(jurisdiction, enabled);
                let marker = if enabled { style("✓").green() } else { style("✗").red() };
                println!("{} {} = {}", marker, jurisdiction.code(), enabled);
            }
            flags.save(&current)?;
            tracing::info!("Saved compliance flags to {:?}", flags.path());
        }
    }
    Ok(())
}

/// Parse `CODE=bool` pairs such as `GDPR=true`
fn parse_flag_assignments(pairs: &[String]) -> Result<Vec<(Jurisdiction, bool)>> {
    pairs
        .iter()
        .map(|pair| {
            let (code, raw) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected CODE=true|false, got '{}'", pair))?;
            let jurisdiction: Jurisdiction = code.trim().parse()?;
            let enabled = match raw.trim().to_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" => false,
                other => return Err(anyhow!("Invalid flag value '{}' for {}", other, code)),
            };
            Ok((jurisdiction, enabled))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_assignments() {
        let parsed =
            parse_flag_assignments(&["gdpr=on".to_string(), "CCPA=false".to_string()]).unwrap();
        assert_eq!(parsed, vec![(Jurisdiction::Gdpr, true), (Jurisdiction::Ccpa, false)]);
        assert!(parse_flag_assignments(&["GDPR=maybe".to_string()]).is_err());
        assert!(parse_flag_assignments(&["HIPAA=true".to_string()]).is_err());
    }

    #[test]
    fn test_set_persists_flags() {
        let dir = tempfile::tempdir().unwrap();
        let flags = FileFlags::new(dir.path().join("compliance.json"));
        execute_flags(
            &flags,
            FlagsSubcommand::Set {
                assignments: vec!["GDPR=true".to_string()],
            },
        )
        .unwrap();
        assert!(flags.load().unwrap().is_enabled(Jurisdiction::Gdpr));
    }
}
