use std::io::Write;

use reality_link::settings::SettingsError;
use reality_link::Settings;

#[cfg(test)]
mod settings_tests {
    use super::*;

    #[test]
    fn test_settings_toml_overrides_defaults() {
        let toml_content = r#"
name = "reality-eu"
fingerprint = "firefox"
out_dir = "/tmp/reality-out"
xray_bin = "/usr/local/bin/xray"
telegram_chat_id = "@vpn_links"
        "#;

        let settings = Settings::load_from_content(toml_content, "inline").unwrap();

        assert_eq!(settings.name, "reality-eu");
        assert_eq!(settings.fingerprint, "firefox");
        assert_eq!(settings.out_dir, "/tmp/reality-out");
        assert_eq!(settings.xray_bin, "/usr/local/bin/xray");
        assert_eq!(settings.telegram_chat_id, "@vpn_links");

        // untouched fields keep their defaults
        assert_eq!(settings.out, "vless.png");
        assert_eq!(settings.out_png, "vless.png");
        assert_eq!(settings.remote_config_path, "/etc/xray/config.json");
        assert_eq!(settings.ssh_user, "root");
        assert_eq!(settings.telegram_api_base, "https://api.telegram.org");
        assert_eq!(settings.telegram_bot_token, "");
    }

    #[test]
    fn test_empty_settings_file_is_default() {
        let settings = Settings::load_from_content("", "inline").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "telegram_bot_token = \"123:ABC\"").unwrap();
        writeln!(file, "telegram_chat_id = \"42\"").unwrap();

        let settings = Settings::load_from_file(file.path()).unwrap();
        assert!(settings.telegram_enabled());
    }

    #[test]
    fn test_missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_wrong_type_in_settings() {
        let err = Settings::load_from_content("name = 5", "settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Toml { .. }));
    }
}
