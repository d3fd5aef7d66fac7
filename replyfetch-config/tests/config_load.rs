use replyfetch_config::{EndpointConfig, EndpointConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const TWITTER_VARS: [&str; 4] = [
    "TWITTER_API_URL",
    "TWITTER_API_KEY",
    "TWITTER_TIMEOUT_SECS",
    "TWITTER_OUTPUT_DIR",
];

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

fn without_twitter_env<R>(f: impl FnOnce() -> R) -> R {
    temp_env::with_vars_unset(TWITTER_VARS, f)
}

#[test]
#[serial]
fn loads_from_environment() {
    temp_env::with_vars(
        [
            ("TWITTER_API_URL", Some("https://api.example.com/replies")),
            ("TWITTER_API_KEY", Some("k-123")),
            ("TWITTER_TIMEOUT_SECS", Some("4")),
            ("TWITTER_OUTPUT_DIR", None),
        ],
        || {
            let cfg = EndpointConfigLoader::new().load().expect("load env config");
            assert_eq!(cfg.api_url, "https://api.example.com/replies");
            assert_eq!(cfg.api_key, "k-123");
            assert_eq!(cfg.timeout_secs, 4);
            assert!(cfg.output_dir.is_none());
        },
    );
}

#[test]
#[serial]
fn missing_environment_yields_empty_credentials() {
    without_twitter_env(|| {
        let cfg = EndpointConfigLoader::new().load().expect("load empty config");
        assert_eq!(cfg, EndpointConfig::new("", ""));
    });
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    let file_yaml = r#"
api_url: "https://file.example.com/replies"
api_key: "${RF_TEST_FILE_KEY}"
timeout_secs: 12
output_dir: "/tmp/replies"
"#;
    let p = write_yaml(&tmp, "replyfetch.yaml", file_yaml);

    without_twitter_env(|| {
        temp_env::with_vars(
            [
                ("RF_TEST_FILE_KEY", Some("from-placeholder")),
                ("TWITTER_API_URL", Some("https://env.example.com/replies")),
            ],
            || {
                let cfg = EndpointConfigLoader::new()
                    .with_file(&p)
                    .load()
                    .expect("load file config");

                assert_eq!(cfg.api_url, "https://env.example.com/replies");
                assert_eq!(cfg.api_key, "from-placeholder");
                assert_eq!(cfg.timeout_secs, 12);
                assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/replies")));
            },
        );
    });
}

#[test]
#[serial]
fn optional_file_may_be_absent() {
    let tmp = TempDir::new().unwrap();
    without_twitter_env(|| {
        let cfg = EndpointConfigLoader::new()
            .with_optional_file(tmp.path().join("missing.yaml"))
            .load()
            .expect("absent optional file is fine");
        assert_eq!(cfg.timeout_secs, 10);
    });
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let res = EndpointConfigLoader::new()
        .with_file(tmp.path().join("missing.yaml"))
        .load();
    assert!(res.is_err());
}
