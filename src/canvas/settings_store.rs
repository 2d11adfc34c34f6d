use crate::canvas::settings::CanvasSettings;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const CANVAS_SETTINGS_FILE_NAME: &str = "canvas_settings.json";

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(CANVAS_SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

/// Loads the settings file next to the executable, falling back to defaults
/// when it does not exist.
pub fn load() -> Result<CanvasSettings> {
    let path = resolve_settings_path()?;
    Ok(load_from_path(&path)?.unwrap_or_default())
}

pub fn save(settings: &CanvasSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

pub fn load_from_path(path: &Path) -> Result<Option<CanvasSettings>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read canvas settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Some(CanvasSettings::default()));
    }

    let mut loaded: CanvasSettings = serde_json::from_str(&content)
        .with_context(|| format!("deserialize canvas settings file {}", path.display()))?;
    loaded.sanitize();
    Ok(Some(loaded))
}

pub fn save_to_path(path: &Path, settings: &CanvasSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create canvas settings folder {}", parent.display()))?;
    }

    let mut sanitized = settings.clone();
    sanitized.sanitize();
    let json =
        serde_json::to_string_pretty(&sanitized).context("serialize canvas settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write canvas settings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::Color;

    #[test]
    fn settings_path_is_resolved_next_to_executable() {
        let exe = Path::new("/tmp/myapp/bin/math_canvas");
        let path = settings_path_from_exe_path(exe).expect("path");
        assert_eq!(
            path,
            Path::new("/tmp/myapp/bin").join(CANVAS_SETTINGS_FILE_NAME)
        );
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        assert_eq!(load_from_path(&path).expect("load"), None);
    }

    #[test]
    fn empty_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        std::fs::write(&path, "  \n").expect("write");
        assert_eq!(
            load_from_path(&path).expect("load"),
            Some(CanvasSettings::default())
        );
    }

    #[test]
    fn save_then_load_returns_same_settings() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(CANVAS_SETTINGS_FILE_NAME);

        let settings = CanvasSettings {
            background_color: Color::rgb(20, 20, 20),
            default_width: 6.0,
            recognizer_endpoint: "http://calc.internal:9000".into(),
            ..CanvasSettings::default()
        };
        save_to_path(&path, &settings).expect("save");
        assert_eq!(load_from_path(&path).expect("load"), Some(settings));
    }

    #[test]
    fn invalid_json_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write");
        let err = load_from_path(&path).expect_err("should fail");
        assert!(format!("{err:#}").contains(CANVAS_SETTINGS_FILE_NAME));
    }
}
