use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_linkfolio_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LINKFOLIO_CONFIG_PATH", "/tmp/linkfolio-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/linkfolio-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("linkfolio")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("linkfolio")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert!(s.player.loop_playlist);
    assert!(!s.player.autoplay);
    assert_eq!(s.player.end_of_track, EndOfTrackSetting::RestartCurrent);
    assert!((s.player.volume - 0.7).abs() < f32::EPSILON);
    assert_eq!(s.ui.theme, ThemeSetting::Dark);
    assert_eq!(s.ui.language, LanguageSetting::En);
    assert!(s.analytics.enabled);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_volume() {
    let mut s = Settings::default();
    s.player.volume = 1.5;
    assert!(s.validate().is_err());
    s.player.volume = -0.1;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_end_of_track_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[data]
profile_path = "/srv/site/data.json"
music_dir = "/srv/site/music"

[player]
loop_playlist = false
end_of_track = "advance-next"
volume = 0.4
autoplay = true

[ui]
theme = "light"
language = "vi"

[analytics]
enabled = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LINKFOLIO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let s = Settings::load().unwrap();

    assert_eq!(
        s.data.profile_path,
        std::path::PathBuf::from("/srv/site/data.json")
    );
    assert_eq!(s.data.music_dir, std::path::PathBuf::from("/srv/site/music"));
    // Unset fields keep their defaults.
    assert_eq!(
        s.data.playlist_path,
        std::path::PathBuf::from("music/playlist.json")
    );

    assert!(!s.player.loop_playlist);
    assert_eq!(s.player.end_of_track, EndOfTrackSetting::AdvanceNext);
    assert!((s.player.volume - 0.4).abs() < f32::EPSILON);
    assert!(s.player.autoplay);
    assert_eq!(s.ui.theme, ThemeSetting::Light);
    assert_eq!(s.ui.language, LanguageSetting::Vi);
    assert!(!s.analytics.enabled);
}

#[test]
fn end_of_track_accepts_legacy_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
end_of_track = "repeat-one"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LINKFOLIO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let s = Settings::load().unwrap();
    assert_eq!(s.player.end_of_track, EndOfTrackSetting::RestartCurrent);
}

#[test]
fn storage_dir_prefers_configured_directory() {
    let mut s = Settings::default();
    s.data.storage_dir = Some(std::path::PathBuf::from("/tmp/linkfolio-storage"));
    assert_eq!(
        s.storage_dir(),
        std::path::PathBuf::from("/tmp/linkfolio-storage")
    );
}
