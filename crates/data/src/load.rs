use crate::schema::{BalanceConfig, BALANCE_FILE};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub fn balance_path(assets_dir: &Path) -> PathBuf {
    assets_dir.join(BALANCE_FILE)
}

/// Reads a balance table. Missing fields keep their shipped defaults.
pub fn load_balance_config(path: &Path) -> anyhow::Result<BalanceConfig> {
    let balance: BalanceConfig = load_json(path)?;
    validate_balance(&balance).with_context(|| format!("validate {}", path.display()))?;
    Ok(balance)
}

/// Shipped defaults when no path is given.
pub fn load_balance_config_or_default(path: Option<&Path>) -> anyhow::Result<BalanceConfig> {
    match path {
        Some(path) => load_balance_config(path),
        None => Ok(BalanceConfig::default()),
    }
}

pub fn validate_balance(balance: &BalanceConfig) -> anyhow::Result<()> {
    balance.validate()?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_temp(r#"{ "starting_chips": 250, "reroll_cost": 20 }"#);
        let balance = load_balance_config(file.path()).expect("load");
        assert_eq!(balance.starting_chips, 250);
        assert_eq!(balance.reroll_cost, 20);
        assert_eq!(balance.base_min_bet, 10);
        assert_eq!(balance.stage_final_wave, 25);
    }

    #[test]
    fn empty_object_is_the_default_balance() {
        let file = write_temp("{}");
        let balance = load_balance_config(file.path()).expect("load");
        assert_eq!(balance, BalanceConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected_with_the_path() {
        let file = write_temp(r#"{ "stage_final_wave": 3 }"#);
        let err = load_balance_config(file.path()).expect_err("short stage must fail");
        let message = format!("{err:#}");
        assert!(message.contains("validate"));
        assert!(message.contains("final wave 3"));
    }

    #[test]
    fn malformed_json_reports_parse() {
        let file = write_temp("{ not json");
        let err = load_balance_config(file.path()).expect_err("parse must fail");
        assert!(err.to_string().starts_with("parse "));
    }

    #[test]
    fn missing_file_reports_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_balance_config(&balance_path(dir.path())).expect_err("missing file");
        assert!(err.to_string().starts_with("read "));
    }

    #[test]
    fn no_path_means_defaults() {
        let balance = load_balance_config_or_default(None).expect("defaults");
        assert_eq!(balance, BalanceConfig::default());
    }
}
