//! Integration tests for the layered configuration loader.

use std::fs;
use std::path::Path;
use tabula_config::ConfigLoader;
use tabula_core::TabulaError;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[tokio::test]
async fn test_missing_directory_uses_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new(tmp.path().join("absent")).unwrap();
    let config = loader.get().await;

    assert_eq!(config.database.path, "sqlite/model.db");
    assert_eq!(config.retry.max_attempts, 3);
}

#[tokio::test]
async fn test_default_yaml_is_loaded() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "default.yaml",
        "database:\n  path: models.db\n  max_connections: 8\nretry:\n  delay_ms: 5\n",
    );

    let config = ConfigLoader::new(tmp.path()).unwrap().get().await;
    assert_eq!(config.database.path, "models.db");
    assert_eq!(config.database.max_connections, 8);
    assert_eq!(config.retry.delay_ms, 5);
    assert_eq!(config.retry.max_attempts, 3);
}

#[tokio::test]
async fn test_layer_priorities() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "default.yaml",
        "include:\n  - conf.d/\napp:\n  name: base\ndatabase:\n  path: base.db\nretry:\n  max_attempts: 2\n",
    );
    write(tmp.path(), "custom.yaml", "app:\n  name: custom\nretry:\n  max_attempts: 4\n");
    write(tmp.path(), "conf.d/10-retry.yaml", "retry:\n  max_attempts: 6\n");

    let loader = ConfigLoader::with_overrides(
        tmp.path(),
        ["config_file=custom.yaml", "database.path=cli.db"],
    )
    .unwrap();
    let config = loader.get().await;

    assert_eq!(config.app.name, "custom");
    assert_eq!(config.retry.max_attempts, 6);
    assert_eq!(config.database.path, "cli.db");
}

#[tokio::test]
async fn test_missing_custom_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let result = ConfigLoader::with_overrides(tmp.path(), ["config_file=nope.yaml"]);
    assert!(matches!(result, Err(TabulaError::Configuration(_))));
}

#[tokio::test]
async fn test_malformed_include_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "default.yaml", "include: extra.yaml\n");
    write(tmp.path(), "extra.yaml", "app:\n  name: extra\n");

    let err = ConfigLoader::new(tmp.path()).unwrap_err();
    assert!(matches!(err, TabulaError::Configuration(_)));
    assert!(err.to_string().contains("include"));
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "default.yaml", "retry:\n  max_attempts: 0\n");

    let err = ConfigLoader::new(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}

#[tokio::test]
async fn test_get_value_by_dotted_path() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "default.yaml",
        "include: []\nextra:\n  tags:\n    - alpha\n    - beta\n  limit: 7\n",
    );

    let loader = ConfigLoader::new(tmp.path()).unwrap();
    assert_eq!(loader.get_value::<i64>("extra.limit").await, Some(7));
    assert_eq!(loader.get_value::<String>("extra.tags.1").await, Some("beta".to_string()));
    assert_eq!(loader.get_value::<String>("extra.tags.9").await, None);
    assert_eq!(loader.get_value::<String>("extra.missing").await, None);
    assert_eq!(loader.get_value::<String>("").await, None);
}

#[tokio::test]
async fn test_reload_picks_up_changes() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "default.yaml", "database:\n  path: first.db\n");

    let loader = ConfigLoader::new(tmp.path()).unwrap();
    assert_eq!(loader.get().await.database.path, "first.db");

    write(tmp.path(), "default.yaml", "database:\n  path: second.db\n");
    loader.reload().await.unwrap();
    assert_eq!(loader.get().await.database.path, "second.db");
}
