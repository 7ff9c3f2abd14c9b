use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "NdviViewer";
const CONFIG_FILE_NAME: &str = "ndvi_viewer.ini";

/// Returns the cross-platform directory for application data
pub fn get_app_data_dir() -> PathBuf {
    let home_dir = || PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()));

    if cfg!(target_os = "macos") {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME)
    } else if cfg!(target_os = "windows") {
        match std::env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join(APP_DIR_NAME),
            Err(_) => PathBuf::from(".").join(APP_DIR_NAME),
        }
    } else {
        // Linux and other Unix-like systems
        match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg_config_home) => PathBuf::from(xdg_config_home).join(APP_DIR_NAME),
            Err(_) => home_dir().join(".config").join(APP_DIR_NAME),
        }
    }
}

/// Ensures the directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Returns the path to the application configuration file
pub fn get_config_path() -> PathBuf {
    get_app_data_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_lives_in_app_dir() {
        let path = get_config_path();
        assert!(path.ends_with(Path::new(APP_DIR_NAME).join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_directory_exists(&nested).unwrap();
    }
}
