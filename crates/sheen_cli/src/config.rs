//! sheen.toml handling

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sheen_controller::SheenConfig;

/// File name looked up in a directory
pub const CONFIG_FILE: &str = "sheen.toml";

/// Resolve a `--config` argument: a file, or a directory holding sheen.toml.
fn config_path(path: &Path) -> PathBuf {
    if path.is_file() {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    }
}

/// Parse configuration text.
pub fn parse(content: &str) -> Result<SheenConfig> {
    toml::from_str(content).context("Invalid sheen configuration")
}

/// Load configuration from a file or a directory (looks for sheen.toml)
pub fn load_from_dir(path: &Path) -> Result<SheenConfig> {
    let config_path = config_path(path);

    if !config_path.exists() {
        anyhow::bail!(
            "No {} found in {}. Run `sheen config init` to create one.",
            CONFIG_FILE,
            path.display()
        );
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config = parse(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "Loaded configuration");
    Ok(config)
}

/// Load the explicit `--config`, else `./sheen.toml` if present, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<SheenConfig> {
    match explicit {
        Some(path) => load_from_dir(path),
        None if Path::new(CONFIG_FILE).exists() => load_from_dir(Path::new(".")),
        None => Ok(SheenConfig::default()),
    }
}

/// Serialize to TOML string
pub fn to_toml(config: &SheenConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

/// Write a default sheen.toml into `dir`. Refuses to overwrite unless `force`.
pub fn init(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        );
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&config_path, to_toml(&SheenConfig::default())?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheen_controller::TargetRulePolicy;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), SheenConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config = parse(
            r#"
[controller]
target_policy = "first"

[panel]
debounce_ms = 150
"#,
        )
        .unwrap();

        assert_eq!(config.controller.target_policy, TargetRulePolicy::First);
        assert_eq!(config.controller.name_probe_limit, 20);
        assert_eq!(config.panel.debounce_ms, 150);
        assert_eq!(config.selection.attempts, 10);
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = to_toml(&SheenConfig::default()).unwrap();
        assert!(text.contains("target_policy = \"prefer-second\""));
        assert_eq!(parse(&text).unwrap(), SheenConfig::default());
    }

    #[test]
    fn test_load_from_dir_names_the_file() {
        let dir = std::env::temp_dir().join(format!("sheen-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "[panel]\ndebounce_ms = \"fast\"\n").unwrap();

        let err = load_from_dir(&dir).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse"));
        assert!(format!("{err:#}").contains(CONFIG_FILE));

        fs::write(dir.join(CONFIG_FILE), "[panel]\ndebounce_ms = 250\n").unwrap();
        assert_eq!(load_from_dir(&dir).unwrap().panel.debounce_ms, 250);
        assert_eq!(load_from_dir(&dir.join(CONFIG_FILE)).unwrap().panel.debounce_ms, 250);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(parse("[controller]\ntarget_policy = \"middle\"\n").is_err());
    }
}
