//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "multiverse";
const PROJECT_FILES: [&str; 2] = ["multiverse.toml", ".multiverse.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./multiverse.toml` or `./.multiverse.toml`
    /// 3. Global config: `$XDG_CONFIG_HOME/multiverse/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Path::new("."),
            config_path.map(PathBuf::as_path),
        )
    }

    /// Load with explicit discovery roots.
    ///
    /// Missing global and project files are skipped; a missing explicit
    /// file is an error.
    pub fn load_from(
        global: Option<&Path>,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used, highest priority first
    pub fn config_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<7}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND  ] Project:  {}", path.display())),
            None => lines.push(format!(
                "  [       ] Project:  ./{} or ./{}",
                PROJECT_FILES[0], PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            lines.push(format!("  [{:<7}] Global:   {}", mark, path.display()));
        }

        lines.push("  [       ] Default:  built-in defaults".to_string());
        lines
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        for line in Self::config_sources(explicit) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.presets.is_empty());
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_names_app_dir() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.to_string_lossy().contains("multiverse"));
        }
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ConfigLoader::load_from(Some(&dir.path().join("nope.toml")), dir.path(), None).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_project_overrides_global_and_explicit_overrides_project() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[multiverse]\nbranches = 5\njudge = \"global-judge\"\n\n[output]\ncolor = false\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(".multiverse.toml"),
            "[multiverse]\nbranches = 3\n",
        )
        .unwrap();
        let explicit = dir.path().join("explicit.toml");
        fs::write(&explicit, "[multiverse]\njudge = \"explicit-judge\"\n").unwrap();

        let config = ConfigLoader::load_from(Some(&global), dir.path(), None).unwrap();
        assert_eq!(config.multiverse.branches, Some(3));
        assert_eq!(config.multiverse.judge.as_deref(), Some("global-judge"));
        assert!(!config.output.color);

        let config = ConfigLoader::load_from(Some(&global), dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.multiverse.branches, Some(3));
        assert_eq!(config.multiverse.judge.as_deref(), Some("explicit-judge"));
    }

    #[test]
    fn test_named_project_file_wins_over_dotfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("multiverse.toml"), "[multiverse]\nbranches = 4\n").unwrap();
        fs::write(dir.path().join(".multiverse.toml"), "[multiverse]\nbranches = 9\n").unwrap();

        let config = ConfigLoader::load_from(None, dir.path(), None).unwrap();
        assert_eq!(config.multiverse.branches, Some(4));
    }

    #[test]
    fn test_presets_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("presets.toml");
        fs::write(
            &explicit,
            r#"
[[presets]]
name = "pair"
spec = "writer"

[[presets.universes]]
name = "draft"

[[presets.universes]]
name = "edit"
depends_on = ["draft"]
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from(None, dir.path(), Some(&explicit)).unwrap();
        let preset = config.preset("pair").unwrap();
        assert_eq!(preset.universes[1].depends_on, vec!["draft"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(ConfigLoader::load_from(None, dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("bad.toml");
        fs::write(&explicit, "[multiverse]\nbranches = \"many\"\n").unwrap();
        assert!(ConfigLoader::load_from(None, dir.path(), Some(&explicit)).is_err());
    }
}
