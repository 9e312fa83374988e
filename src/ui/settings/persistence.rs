use super::data::Settings;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const REPO_SETTINGS_FILE: &str = "settings.json";
pub const CUSTOM_SETTINGS_FILE: &str = "custom_settings.json";
const CONFIG_DIR_ENV: &str = "TOMODORANGE_CONFIG_DIR";

/// Locations of the two optional settings layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPaths {
    pub repo_defaults: PathBuf,
    pub overrides: PathBuf,
}

impl SettingsPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            repo_defaults: dir.join(REPO_SETTINGS_FILE),
            overrides: dir.join(CUSTOM_SETTINGS_FILE),
        }
    }

    /// `$TOMODORANGE_CONFIG_DIR` if set, otherwise the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(dir)
    }
}

/// Merges compiled-in defaults, repo defaults and user overrides, and writes
/// user changes back to the override layer.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    paths: SettingsPaths,
}

impl SettingsStore {
    pub fn new(paths: SettingsPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SettingsPaths {
        &self.paths
    }

    /// Never fails: unreadable layers are logged and skipped.
    pub fn load(&self) -> Settings {
        let mut merged = match serde_json::to_value(Settings::default()) {
            Ok(Value::Object(map)) => map,
            _ => return Settings::default(),
        };

        for path in [&self.paths.repo_defaults, &self.paths.overrides] {
            match read_layer(path) {
                Ok(Some(layer)) => overlay(&mut merged, layer, path),
                Ok(None) => debug!("[settings] no layer at {path:?}"),
                Err(err) => warn!("[settings] skipping {path:?}: {err:#}"),
            }
        }

        let mut settings: Settings = serde_json::from_value(Value::Object(merged))
            .map_err(|e| warn!("[settings] merged settings invalid: {e}"))
            .unwrap_or_default();
        settings.sanitize();
        settings
    }

    /// Overwrites the override file with the full snapshot. Failures are
    /// logged and otherwise ignored.
    pub fn save(&self, settings: &Settings) {
        let path = &self.paths.overrides;
        if let Err(err) = write_snapshot(path, settings) {
            warn!("[settings] failed to save {path:?}: {err:#}");
        }
    }
}

fn read_layer(path: &Path) -> Result<Option<Map<String, Value>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("reading {path:?}")),
    };
    let value: Value =
        serde_json::from_str(&contents).with_context(|| format!("parsing {path:?}"))?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        other => anyhow::bail!("expected a JSON object in {path:?}, found {other}"),
    }
}

// Shallow key overwrite. Keys outside the schema are dropped, and a value
// that would make the merged mapping invalid keeps the lower layer's value.
fn overlay(base: &mut Map<String, Value>, layer: Map<String, Value>, source: &Path) {
    for (key, value) in layer {
        let Some(slot) = base.get_mut(&key) else {
            debug!("[settings] ignoring unknown key {key:?} in {source:?}");
            continue;
        };
        let previous = std::mem::replace(slot, value);
        if let Err(err) = serde_json::from_value::<Settings>(Value::Object(base.clone())) {
            warn!("[settings] ignoring invalid {key:?} in {source:?}: {err}");
            base.insert(key, previous);
        }
    }
}

fn write_snapshot(path: &Path, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("serializing settings")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("creating {parent:?}"))?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &json).with_context(|| format!("writing {temp_path:?}"))?;
    fs::rename(&temp_path, path).with_context(|| format!("renaming onto {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::settings::{ColorSetting, TimerStyle};
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    fn store() -> (TempDir, SettingsStore) {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(SettingsPaths::in_dir(dir.path()));
        (dir, store)
    }

    fn write_json(path: &Path, value: Value) {
        fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
    }

    #[test]
    fn fresh_install_yields_compiled_in_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn load_is_idempotent() {
        let (_dir, store) = store();
        write_json(
            &store.paths().repo_defaults,
            json!({"break_minutes": 10, "timer_style": "classic"}),
        );
        write_json(&store.paths().overrides, json!({"text_size": 64}));

        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn overrides_win_then_repo_defaults_then_compiled_in() {
        let (_dir, store) = store();
        let paths = store.paths().clone();
        write_json(&paths.repo_defaults, json!({"work_minutes": 30}));
        write_json(&paths.overrides, json!({"work_minutes": 45}));
        assert_eq!(store.load().work_minutes, 45);

        fs::remove_file(&paths.overrides).unwrap();
        assert_eq!(store.load().work_minutes, 30);

        fs::remove_file(&paths.repo_defaults).unwrap();
        assert_eq!(store.load().work_minutes, 25);
    }

    #[test]
    fn empty_layers_keep_every_default() {
        let (_dir, store) = store();
        write_json(&store.paths().repo_defaults, json!({}));
        write_json(&store.paths().overrides, json!({}));

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let (_dir, store) = store();
        write_json(&store.paths().repo_defaults, json!({"break_minutes": 12}));
        fs::write(&store.paths().overrides, "{ not json").unwrap();

        let settings = store.load();
        assert_eq!(settings.break_minutes, 12);
        assert_eq!(settings.work_minutes, 25);
    }

    #[test]
    fn non_object_layer_is_skipped() {
        let (_dir, store) = store();
        write_json(&store.paths().overrides, json!([1, 2, 3]));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn invalid_values_fall_back_per_key() {
        let (_dir, store) = store();
        write_json(&store.paths().repo_defaults, json!({"work_color": "#112233"}));
        write_json(
            &store.paths().overrides,
            json!({
                "work_color": "orange-ish",
                "timer_style": "sideways",
                "work_minutes": "forty",
                "break_minutes": 7,
                "mystery_key": true,
            }),
        );

        let settings = store.load();
        assert_eq!(settings.work_color, ColorSetting::rgb(0x11, 0x22, 0x33));
        assert_eq!(settings.timer_style, TimerStyle::Orange);
        assert_eq!(settings.work_minutes, 25);
        assert_eq!(settings.break_minutes, 7);
    }

    #[test]
    fn layers_accept_hex_colors_with_alpha() {
        let (_dir, store) = store();
        write_json(&store.paths().repo_defaults, json!({"work_color": "#ff000080"}));
        write_json(&store.paths().overrides, json!({"break_color": "#0f08"}));

        let settings = store.load();
        assert_eq!(settings.work_color.rgba8(), [0xFF, 0x00, 0x00, 0x80]);
        assert_eq!(settings.break_color.rgba8(), [0x00, 0xFF, 0x00, 0x88]);

        store.save(&settings);
        let saved: Value =
            serde_json::from_str(&fs::read_to_string(&store.paths().overrides).unwrap()).unwrap();
        assert_eq!(saved["work_color"], "#ff000080");
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let saved = Settings {
            work_minutes: 50,
            timer_style: TimerStyle::Classic,
            text_opacity: 0.65,
            work_color: ColorSetting::rgb(0x12, 0x34, 0x56),
            work_log_enabled: true,
            ..Settings::default()
        };
        store.save(&saved);

        assert_eq!(store.load(), saved);
    }

    #[test]
    fn save_overwrites_the_whole_override_file() {
        let (_dir, store) = store();
        write_json(
            &store.paths().overrides,
            json!({"work_minutes": 99, "hand_edited": "lost on save"}),
        );
        store.save(&Settings::default());

        let contents = fs::read_to_string(&store.paths().overrides).unwrap();
        let Value::Object(written) = serde_json::from_str(&contents).unwrap() else {
            panic!("override file must hold an object");
        };
        assert_eq!(written["work_minutes"], json!(25));
        assert!(!written.contains_key("hand_edited"));
        assert!(!store.paths().overrides.with_extension("json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(SettingsPaths::in_dir(dir.path().join("nested/config")));
        store.save(&Settings::default());
        assert!(store.paths().overrides.exists());
    }

    #[test]
    fn save_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        // The override path is a directory, so the rename cannot succeed.
        let paths = SettingsPaths::in_dir(dir.path());
        fs::create_dir_all(&paths.overrides).unwrap();
        let store = SettingsStore::new(paths);

        store.save(&Settings::default());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn repo_defaults_then_user_edit_scenario() {
        let (_dir, store) = store();
        write_json(&store.paths().repo_defaults, json!({"work_minutes": 30}));
        let mut settings = store.load();
        assert_eq!(settings.work_minutes, 30);

        settings.work_minutes = 45;
        store.save(&settings);

        let contents = fs::read_to_string(&store.paths().overrides).unwrap();
        let written: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(written["work_minutes"], json!(45));
        assert_eq!(written["break_minutes"], json!(5));
        assert_eq!(store.load().work_minutes, 45);
    }
}
