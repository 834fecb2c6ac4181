use block_lab::config::{ConfigError, LabConfig, ENV_API_BASE, ENV_API_KEY};
use tempfile::tempdir;

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("econ-lab.toml");

    let mut config = LabConfig::default();
    config.api_base = "https://rpc.theblock.example".to_string();
    config.debounce_ms = 120;
    config.economics.base_reward = 2.5;
    config.save(&path).unwrap();

    let loaded = LabConfig::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    assert!(matches!(
        LabConfig::load(&missing),
        Err(ConfigError::IoError(_))
    ));
}

#[test]
fn test_load_rejects_invalid_params() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("econ-lab.toml");
    std::fs::write(&path, "[economics]\nbase_reward = -1.0\n").unwrap();

    assert!(matches!(
        LabConfig::load(&path),
        Err(ConfigError::Economics(_))
    ));
}

// The only test in this binary that touches the environment.
#[test]
fn test_env_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("econ-lab.toml");
    std::fs::write(&path, "api_base = \"http://file.example\"\n").unwrap();

    std::env::set_var(ENV_API_BASE, "http://env.example:9000");
    std::env::set_var(ENV_API_KEY, "token-123");
    let loaded = LabConfig::load(&path);
    let defaulted = LabConfig::load_or_default(dir.path().join("absent.toml"));
    std::env::remove_var(ENV_API_BASE);
    std::env::remove_var(ENV_API_KEY);

    let loaded = loaded.unwrap();
    assert_eq!(loaded.api_base, "http://env.example:9000");
    assert_eq!(loaded.api_key.as_deref(), Some("token-123"));
    assert_eq!(loaded.rpc_url(), "http://env.example:9000/rpc");

    let defaulted = defaulted.unwrap();
    assert_eq!(defaulted.api_base, "http://env.example:9000");
    assert_eq!(defaulted.poll_interval_secs, 5);
}
