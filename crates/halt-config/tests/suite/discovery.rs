use std::ffi::OsString;

use halt_config::{
    discover_config_path, load_for_root, with_config_env_lock, ConfigError, ConfigWarning,
    HaltConfig, LoadedConfig, HALT_CONFIG_ENV_VAR,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

struct EnvVarGuard {
    key: &'static str,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    fn set(key: &'static str, value: &std::path::Path) -> Self {
        let prev = std::env::var_os(key);
        std::env::set_var(key, value);
        Self { key, prev }
    }

    fn unset(key: &'static str) -> Self {
        let prev = std::env::var_os(key);
        std::env::remove_var(key);
        Self { key, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

#[test]
fn discovers_halt_toml_in_root() {
    with_config_env_lock(|| {
        let _env = EnvVarGuard::unset(HALT_CONFIG_ENV_VAR);

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("halt.toml");
        std::fs::write(&config_path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let discovered = discover_config_path(dir.path())
            .expect("halt.toml should be discovered when present in the root");
        assert_eq!(
            discovered,
            config_path.canonicalize().unwrap_or(config_path)
        );
    });
}

#[test]
fn falls_back_to_hidden_config_file() {
    with_config_env_lock(|| {
        let _env = EnvVarGuard::unset(HALT_CONFIG_ENV_VAR);

        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(".halt.toml"), "[session]\nstep_timeout_secs = 2.0\n")
            .unwrap();

        let loaded = load_for_root(dir.path()).unwrap();
        assert!(loaded.path.is_some());
        assert_eq!(loaded.config.session.step_timeout_secs, 2.0);
        assert!(loaded.warnings.is_empty());
    });
}

#[test]
fn env_var_overrides_discovery() {
    with_config_env_lock(|| {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("halt.toml"), "").unwrap();
        let custom = dir.path().join("custom.toml");
        std::fs::write(&custom, "[logging]\njson = true\n").unwrap();
        let _env = EnvVarGuard::set(HALT_CONFIG_ENV_VAR, &custom);

        let loaded = load_for_root(dir.path()).unwrap();
        assert_eq!(loaded.path, Some(custom.canonicalize().unwrap_or(custom)));
        assert!(loaded.config.logging.json);
    });
}

#[test]
fn missing_config_yields_defaults() {
    with_config_env_lock(|| {
        let _env = EnvVarGuard::unset(HALT_CONFIG_ENV_VAR);
        let dir = tempdir().unwrap();

        let loaded = load_for_root(dir.path()).unwrap();
        assert_eq!(
            loaded,
            LoadedConfig {
                config: HaltConfig::default(),
                path: None,
                warnings: Vec::new(),
            }
        );
    });
}

#[test]
fn unreadable_env_path_reports_io_error() {
    with_config_env_lock(|| {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist.toml");
        let _env = EnvVarGuard::set(HALT_CONFIG_ENV_VAR, &missing);

        let err = load_for_root(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    });
}

#[test]
fn relative_env_path_resolves_against_root() {
    with_config_env_lock(|| {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("conf")).unwrap();
        let custom = dir.path().join("conf").join("debug.toml");
        std::fs::write(&custom, "").unwrap();
        let _env = EnvVarGuard::set(HALT_CONFIG_ENV_VAR, std::path::Path::new("conf/debug.toml"));

        assert_eq!(
            discover_config_path(dir.path()),
            Some(custom.canonicalize().unwrap_or(custom))
        );
    });
}

#[test]
fn load_returns_validation_warnings() {
    with_config_env_lock(|| {
        let _env = EnvVarGuard::unset(HALT_CONFIG_ENV_VAR);
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("halt.toml"),
            "[logging]\nlevel = \"halt.session=loud\"\n",
        )
        .unwrap();

        let loaded = load_for_root(dir.path()).unwrap();
        assert_eq!(
            loaded.warnings,
            vec![ConfigWarning::LoggingLevelInvalid {
                value: "halt.session=loud".to_string()
            }]
        );
    });
}
