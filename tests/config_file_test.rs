use aiployer::app::bootstrap::build_marketplace;
use aiployer::config::TomlConfig;
use aiployer::utils::validation::Validate;
use aiployer::{AppConfig, Catalog, CliConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_config_file_with_custom_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(
        &temp_dir,
        "jobs.toml",
        r#"
[[jobs]]
id = 100
title = "Write a wallet security checklist"
description = "10 practical tips for keeping a seed phrase safe"
reward = 0.12
difficulty = "Medium"
time_estimate = "40 min"
verification_prompt = "Does this show a wallet security checklist with at least 10 tips?"

[[jobs]]
id = 101
title = "Explain gas fees"
description = "One-page explainer"
reward = 0.07
difficulty = "Easy"
time_estimate = "20 min"
verification_prompt = "Does this explain gas fees?"
"#,
    );

    // Windows 路徑需要正規化才能放進 TOML 字串
    let normalized = catalog_path.to_str().unwrap().replace('\\', "/");
    let config_path = write(
        &temp_dir,
        "aiployer.toml",
        &format!(
            r#"
[server]
host = "127.0.0.1"
port = 8088

[solana]
rpc_url = "http://127.0.0.1:8899"
commitment = "finalized"
poll_interval_ms = 50

[catalog]
path = "{}"
"#,
            normalized
        ),
    );

    let file = TomlConfig::from_file(&config_path).unwrap();
    let config = AppConfig::resolve(&CliConfig::default(), file, no_env).unwrap();
    assert_ok!(config.validate());
    assert_eq!(config.bind_address(), "127.0.0.1:8088");

    let market = build_marketplace(&config).unwrap();
    assert_eq!(market.catalog().len(), 2);

    let jobs = market.jobs();
    assert_eq!(jobs[0].id, 100);
    assert_eq!(jobs[1].title, "Explain gas fees");
}

#[test]
fn test_cli_flags_override_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write(
        &temp_dir,
        "aiployer.toml",
        r#"
[server]
port = 8088
"#,
    );

    let cli = CliConfig {
        config: Some(config_path.clone()),
        port: Some(9099),
        host: Some("127.0.0.1".to_string()),
        ..Default::default()
    };
    let file = TomlConfig::from_file(&config_path).unwrap();
    let config = AppConfig::resolve(&cli, file, no_env).unwrap();

    assert_eq!(config.bind_address(), "127.0.0.1:9099");
}

#[test]
fn test_catalog_with_duplicate_ids_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let catalog_path = write(
        &temp_dir,
        "jobs.toml",
        r#"
[[jobs]]
id = 1
title = "A"
description = "a"
reward = 0.1
difficulty = "Easy"
time_estimate = "1 min"
verification_prompt = "a?"

[[jobs]]
id = 1
title = "B"
description = "b"
reward = 0.1
difficulty = "Hard"
time_estimate = "1 min"
verification_prompt = "b?"
"#,
    );

    let config = AppConfig::resolve(&CliConfig::default(), TomlConfig::default(), |name| {
        (name == "CATALOG_PATH").then(|| catalog_path.to_str().unwrap().to_string())
    })
    .unwrap();

    assert!(build_marketplace(&config).is_err());
    assert_err!(Catalog::from_file(&catalog_path).unwrap().validate());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = TomlConfig::from_file("/nonexistent/aiployer.toml").unwrap_err();
    assert!(matches!(err, aiployer::MarketError::IoError(_)));
}
