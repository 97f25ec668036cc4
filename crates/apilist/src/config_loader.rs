//! Loading of the optional `apilist.toml` config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use apilist_types::ConfigFile;

/// Load the config from the given path, or from `apilist.toml` in the
/// current directory when present. Running without any config file is
/// fine: every default can be supplied from the command line.
pub fn load_config(path: Option<PathBuf>) -> Result<ConfigFile> {
    let user_path = path.or_else(|| {
        let p = PathBuf::from("apilist.toml");
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = user_path else {
        debug!("No config file found, using built-in defaults");
        return Ok(ConfigFile::default());
    };

    info!("Loading config from: {}", path.display());
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: ConfigFile =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_current_dir<F: FnOnce()>(dir: &std::path::Path, f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let old = std::env::current_dir().expect("current dir");
        std::env::set_current_dir(dir).expect("set current dir");
        f();
        std::env::set_current_dir(old).expect("restore current dir");
    }

    #[test]
    fn missing_config_yields_defaults() {
        let td = TempDir::new().expect("temp");
        with_current_dir(td.path(), || {
            let config = load_config(None).expect("load config");
            assert_eq!(config, ConfigFile::default());
        });
    }

    #[test]
    fn explicit_path_is_parsed() {
        let td = TempDir::new().expect("temp");
        let path = td.path().join("apilist.toml");
        std::fs::write(&path, "[defaults]\nbuild = true\ntarget_path = \"lists\"\n")
            .expect("write config");
        let config = load_config(Some(path)).expect("load config");
        assert_eq!(config.defaults.build, Some(true));
        assert_eq!(
            config.defaults.target_path.as_deref(),
            Some(std::path::Path::new("lists"))
        );
        assert!(config.defaults.build_path.is_none());
        assert!(config.defaults.commit.is_none());
    }

    #[test]
    fn default_location_is_picked_up() {
        let td = TempDir::new().expect("temp");
        std::fs::write(td.path().join("apilist.toml"), "[defaults]\ncommit = true\n")
            .expect("write config");
        with_current_dir(td.path(), || {
            let config = load_config(None).expect("load config");
            assert_eq!(config.defaults.commit, Some(true));
        });
    }

    #[test]
    fn broken_toml_reports_the_path() {
        let td = TempDir::new().expect("temp");
        let path = td.path().join("apilist.toml");
        std::fs::write(&path, "defaults = 3\n").expect("write config");
        let err = load_config(Some(path)).unwrap_err();
        assert!(format!("{err:#}").contains("parse config"));
    }
}
