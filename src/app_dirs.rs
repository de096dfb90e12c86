use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "quickfox";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.data_local_dir().join(format!("{APP_NAME}.log")))
    }
}
