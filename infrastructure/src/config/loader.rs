//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "verdict";
const PROJECT_FILES: [&str; 2] = ["verdict.toml", ".verdict.toml"];
const ENV_PREFIX: &str = "VERDICT_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `VERDICT_`-prefixed environment variables (`__` separates sections)
    /// 2. `GEMINI_API_KEY`, then `API_KEY` (backend key only)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./verdict.toml` or `./.verdict.toml`
    /// 5. Global: `$XDG_CONFIG_HOME/verdict/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(Self::global_config_path().as_deref(), config_path)
            .and_then(|figment| figment.extract())
            .map_err(Box::new)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Defaults plus environment variables, ignoring every file (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(Box::new)
    }

    fn figment(
        global_path: Option<&Path>,
        config_path: Option<&PathBuf>,
    ) -> figment::Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global_path.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(Self::with_env(figment))
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::raw().only(&["API_KEY"]).map(|_| "backend.api_key".into()))
            .merge(Env::raw().only(&["GEMINI_API_KEY"]).map(|_| "backend.api_key".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/verdict/config.toml if set,
    /// otherwise falls back to ~/.config/verdict/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Environment: {}* , GEMINI_API_KEY, API_KEY", ENV_PREFIX);

        if let Some(path) = config_path {
            println!("  [FOUND] Explicit: {}", path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./verdict.toml or ./.verdict.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", marker, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
