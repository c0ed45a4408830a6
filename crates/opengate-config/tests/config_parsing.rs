use std::{env, fs};

use opengate_config::loader::load_config;

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    // Create a temporary TOML configuration file
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("opengate.toml");

    let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
body_limit_bytes = 65536

[storage]
backend = "s3"

[storage.s3]
bucket = "policy-bucket"
endpoint_url = "http://localhost:4566"

[policy]
template_path = "policies/access_policy.rego.tmpl"
active_object_key = "policies/active.rego"
hot_reload = false

[logging]
level = "debug"
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.storage.s3.bucket, "policy-bucket");
    assert!(cfg.storage.s3.use_path_style());
    assert!(!cfg.policy.hot_reload);
    assert_eq!(cfg.logging.level.to_ascii_lowercase(), "debug");

    // 2) Env override should win over file
    unsafe {
        env::set_var("OPENGATE__SERVER__PORT", "9091");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.server.port, 9091);
    unsafe {
        env::remove_var("OPENGATE__SERVER__PORT");
    }

    // 3) Validation failure surfaces as an error
    let bad = toml_content.replace("level = \"debug\"", "level = \"shout\"");
    fs::write(&path, bad).expect("write toml");
    let err = load_config(path.to_str()).unwrap_err();
    assert!(err.contains("logging.level"));
}

#[test]
fn missing_file_falls_back_to_defaults_and_env() {
    // A path that does not exist: only defaults + env apply, and the default
    // s3 backend fails validation without a bucket.
    let err = load_config(Some("does-not-exist.toml")).unwrap_err();
    assert!(err.contains("storage.s3.bucket"));

    unsafe {
        env::set_var("OPENGATE__STORAGE__BACKEND", "memory");
    }
    let cfg = load_config(Some("does-not-exist.toml")).expect("memory backend needs no bucket");
    assert_eq!(cfg.storage.backend, opengate_config::StorageBackend::Memory);
    unsafe {
        env::remove_var("OPENGATE__STORAGE__BACKEND");
    }
}
