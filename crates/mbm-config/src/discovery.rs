//! Config file layering.
//!
//! Layers, lowest precedence first:
//! 1. `<config_dir>/mbm/config.toml` (user config, `MBM_CONFIG_DIR` overrides the directory)
//! 2. `./mbm.toml` (project-local)
//! 3. An explicit file (`--config` / `MBM_CONFIG`)
//!
//! A present `[session]` table replaces the one from lower layers. Validation
//! runs once, on the merged result.

use std::path::{Path, PathBuf};

use crate::{ConfigError, MbmConfig, Result};

const PROJECT_CONFIG_FILE: &str = "mbm.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "mbm";
const CONFIG_DIR_ENV: &str = "MBM_CONFIG_DIR";

/// Merged configuration plus what went into it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged, validated configuration.
    pub config: MbmConfig,
    /// Files that were merged, lowest precedence first.
    pub sources: Vec<PathBuf>,
    /// Non-fatal problems found while loading.
    pub warnings: Vec<String>,
}

/// Where to look for config layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    /// Directory holding the user `config.toml`. `None` uses [`user_config_dir`].
    pub user_dir: Option<PathBuf>,
    /// Directory holding `mbm.toml`. `None` uses the working directory.
    pub project_dir: Option<PathBuf>,
    /// Explicit config file, merged last.
    pub explicit: Option<PathBuf>,
}

/// Load the user and project layers, then `explicit` on top.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_layers(&ConfigLayers {
        explicit: explicit.map(Path::to_path_buf),
        ..ConfigLayers::default()
    })
}

/// Merge the given layers and validate the result.
///
/// Missing discovered files are skipped and malformed ones are skipped with a
/// warning. The explicit file must exist and parse.
pub fn load_layers(layers: &ConfigLayers) -> Result<LoadedConfig> {
    let mut config = MbmConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    let user_path = match &layers.user_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => user_config_path(),
    };
    let project_path = match &layers.project_dir {
        Some(dir) => dir.join(PROJECT_CONFIG_FILE),
        None => PathBuf::from(PROJECT_CONFIG_FILE),
    };

    for path in user_path.into_iter().chain([project_path]) {
        if !path.is_file() {
            continue;
        }
        match load_config_file(&path) {
            Ok(layer) => {
                config.merge(layer);
                sources.push(path);
            }
            Err(e) => warnings.push(format!("Failed to load {}: {}", path.display(), e)),
        }
    }

    if let Some(path) = &layers.explicit {
        config.merge(load_config_file(path)?);
        sources.push(path.clone());
    }

    config.validate()?;
    check_unbounded_growth(&config, &mut warnings);

    Ok(LoadedConfig {
        config,
        sources,
        warnings,
    })
}

/// Load config from a specific file path (no layering).
pub fn load_config_file(path: &Path) -> Result<MbmConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    MbmConfig::from_toml(&contents)
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config(config: &MbmConfig, path: &Path) -> Result<()> {
    let write_err = |path: &Path, source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_err(path, e))
}

/// The user config file, `<user_config_dir>/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// `MBM_CONFIG_DIR` if set, else the platform config directory plus `mbm`.
pub fn user_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Warn when nothing bounds the number of cached sessions.
fn check_unbounded_growth(config: &MbmConfig, warnings: &mut Vec<String>) {
    let session = config.session();
    if !session.sweep && session.max_entries.is_none() {
        warnings.push(
            "session.sweep is disabled and session.max_entries is unset: abandoned sessions \
             are only reclaimed when looked up again"
                .to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use mbm_types::TtlUnit;

    fn layers(user_dir: &TempDir, project_dir: &TempDir, explicit: Option<&Path>) -> ConfigLayers {
        ConfigLayers {
            user_dir: Some(user_dir.path().to_path_buf()),
            project_dir: Some(project_dir.path().to_path_buf()),
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[session]
ttl = 15
ttl_unit = "minutes"
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        let session = config.session.unwrap();
        assert_eq!(session.ttl, 15);
        assert_eq!(session.ttl_unit, TtlUnit::Minutes);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_project_overrides_user() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            user_dir.path().join("config.toml"),
            "[session]\nttl = 5\nmax_entries = 10\n",
        )
        .unwrap();
        fs::write(project_dir.path().join("mbm.toml"), "[session]\nttl = 7\n").unwrap();

        let loaded = load_layers(&layers(&user_dir, &project_dir, None)).unwrap();

        // Sections replace wholesale, so max_entries falls back to its default.
        let session = loaded.config.session();
        assert_eq!(session.ttl, 7);
        assert_eq!(session.max_entries, None);
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        let loaded = load_layers(&layers(&user_dir, &project_dir, None)).unwrap();

        assert!(loaded.sources.is_empty());
        assert_eq!(loaded.config, MbmConfig::new());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_malformed_layer_is_skipped_with_warning() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(project_dir.path().join("mbm.toml"), "[session\nttl = ").unwrap();

        let loaded = load_layers(&layers(&user_dir, &project_dir, None)).unwrap();

        assert!(loaded.sources.is_empty());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("Failed to load"));
    }

    #[test]
    fn test_invalid_merged_value_is_an_error() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(project_dir.path().join("mbm.toml"), "[session]\nttl = 0\n").unwrap();

        let err = load_layers(&layers(&user_dir, &project_dir, None)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_unbounded_growth_warning() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(project_dir.path().join("mbm.toml"), "[session]\nsweep = false\n").unwrap();

        let loaded = load_layers(&layers(&user_dir, &project_dir, None)).unwrap();

        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("session.sweep"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("mbm.toml");
        let config = MbmConfig::from_toml("[session]\nttl = 3\nttl_unit = \"hours\"\n").unwrap();

        save_config(&config, &path).unwrap();

        assert_eq!(load_config_file(&path).unwrap(), config);
    }

    #[test]
    fn test_explicit_file_replaces_invalid_project_layer() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(project_dir.path().join("mbm.toml"), "[session]\nttl = 0\n").unwrap();
        let explicit = user_dir.path().join("override.toml");
        fs::write(&explicit, "[session]\nttl = 5\n").unwrap();

        let loaded = load_layers(&layers(&user_dir, &project_dir, Some(&explicit))).unwrap();

        assert_eq!(loaded.config.session().ttl, 5);
        assert_eq!(loaded.sources.last(), Some(&explicit));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let missing = project_dir.path().join("absent.toml");

        let err = load_layers(&layers(&user_dir, &project_dir, Some(&missing))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
