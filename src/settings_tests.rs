#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.currency_symbol, "R$");
    assert_eq!(settings.currency, "BRL");
    assert_eq!(settings.bill_warning_days, 7);
    assert!(settings.db_path.is_none());
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let paths = Paths::with_base_dir(dir.path());
    assert_eq!(Settings::load(&paths).unwrap(), Settings::default());
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let paths = Paths::with_base_dir(dir.path());
    let settings = Settings {
        bill_warning_days: 3,
        default_account: Some("Inter".into()),
        ..Settings::default()
    };
    settings.save(&paths).unwrap();
    assert_eq!(Settings::load(&paths).unwrap(), settings);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let paths = Paths::with_base_dir(dir.path());
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(paths.settings_file(), r#"{"currency_symbol": "US$"}"#).unwrap();

    let settings = Settings::load(&paths).unwrap();
    assert_eq!(settings.currency_symbol, "US$");
    assert_eq!(settings.currency, "BRL");
    assert_eq!(settings.bill_warning_days, 7);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let paths = Paths::with_base_dir(dir.path());
    std::fs::create_dir_all(dir.path().join("config")).unwrap();
    std::fs::write(paths.settings_file(), "{not json").unwrap();
    assert!(Settings::load(&paths).is_err());
}

#[test]
fn test_db_path_precedence() {
    let dir = TempDir::new().unwrap();
    let paths = Paths::with_base_dir(dir.path());
    let mut settings = Settings::default();

    let default = settings.resolve_db_path(&paths, None).unwrap();
    assert_eq!(default, dir.path().join("data").join("casafin.db"));
    assert!(dir.path().join("data").is_dir());

    settings.db_path = Some(dir.path().join("custom.db"));
    assert_eq!(
        settings.resolve_db_path(&paths, None).unwrap(),
        dir.path().join("custom.db")
    );

    let flag = dir.path().join("flag").join("x.db");
    assert_eq!(settings.resolve_db_path(&paths, Some(flag.clone())).unwrap(), flag);
}
