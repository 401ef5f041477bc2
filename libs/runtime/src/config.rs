use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub use store_db::DatabaseConfig;

/// Process configuration: where the app lives, which database it talks to,
/// how it logs, plus one free-form section per module.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base directory for relative log files and SQLite databases.
    #[serde(default)]
    pub home_dir: String,
    pub database: Option<DatabaseConfig>,
    /// `None` falls back to [`default_logging_config`] when logging starts.
    pub logging: Option<LoggingConfig>,
    /// Extra `<module>.yaml` files, each becoming `modules.<module>`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Raw module sections, read through [`AppConfig::module_config`].
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

/// Logging sections keyed by target prefix; `default` covers every other target.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Section {
    /// `trace`..`error`, or `off`.
    pub console_level: String,
    /// Log file relative to `home_dir`; empty disables the file sink.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

const DEFAULT_HOME_SUBDIR: &str = ".inventory";

/// Info on the console, debug into `logs/inventory.log`.
pub fn default_logging_config() -> LoggingConfig {
    let section = Section {
        console_level: "info".into(),
        file: "logs/inventory.log".into(),
        file_level: "debug".into(),
        max_age_days: None,
        max_backups: Some(3),
        max_size_mb: Some(100),
    };
    HashMap::from([("default".to_string(), section)])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            database: Some(DatabaseConfig::new("sqlite://inventory.db")),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Built-in values, overridden by the YAML file, overridden by `APP__*`
    /// environment variables (`__` separates nesting levels).
    ///
    /// `home_dir` comes back absolute and existing.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // database/logging stay unset unless a layer provides them
        let base = AppConfig {
            database: None,
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // APP__DATABASE__URL -> database.url
            .merge(Env::prefixed("APP__").split("__"));

        let path = config_path.as_ref();
        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        config.resolve_home_dir()?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// [`AppConfig::load_layered`] when a path is given, built-in values otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_layered(path);
        }
        let mut config = Self::default();
        config.resolve_home_dir()?;
        Ok(config)
    }

    fn resolve_home_dir(&mut self) -> Result<()> {
        let home = normalize_home_dir(&self.home_dir).context("Cannot resolve home_dir")?;
        self.home_dir = home.to_string_lossy().into_owned();
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Cannot render config as YAML")
    }

    /// `--database-url` replaces the database URL; each `-v` raises the
    /// default console level (debug, then trace).
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(url) = &args.database_url {
            match self.database.as_mut() {
                Some(db) => db.url = url.clone(),
                None => self.database = Some(DatabaseConfig::new(url.clone())),
            }
        }

        let level = match args.verbose {
            0 => return,
            1 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut("default") {
            section.console_level = level.to_string();
        }
    }

    /// Typed view of one module's section; missing sections yield `T::default()`.
    pub fn module_config<T>(&self, module: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{module}'")),
            None => Ok(T::default()),
        }
    }
}

/// The command line flags that touch configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub database_url: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

/// Resolve `home_dir` to an absolute directory and create it.
///
/// Empty means `$HOME/.inventory`; a leading `~` expands to `$HOME`;
/// other relative paths are taken from the current directory.
fn normalize_home_dir(raw: &str) -> Result<PathBuf> {
    let raw = raw.trim();
    let user_home = || -> Result<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .context("HOME is not set")
    };

    let path = if raw.is_empty() {
        user_home()?.join(DEFAULT_HOME_SUBDIR)
    } else if raw == "~" {
        user_home()?
    } else if let Some(rest) = raw.strip_prefix("~/") {
        user_home()?.join(rest)
    } else {
        let p = PathBuf::from(raw);
        if p.is_absolute() {
            p
        } else {
            std::env::current_dir()?.join(p)
        }
    };

    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create home_dir {}", path.display()))?;
    Ok(path)
}

/// Each `<name>.yaml`/`<name>.yml` in `dir` replaces `modules.<name>`.
/// A missing directory contributes nothing.
fn merge_module_files(
    modules: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let name = path.file_stem().and_then(|s| s.to_str());
        let (true, Some(name)) = (is_yaml && path.is_file(), name) else {
            continue;
        };
        let section: serde_yaml::Value = serde_yaml::from_str(&std::fs::read_to_string(&path)?)
            .with_context(|| format!("Invalid module file {}", path.display()))?;
        modules.insert(name.to_string(), serde_json::to_value(section)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct SampleModule {
        page_size: u32,
        label: String,
    }

    fn write_config(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("config.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn defaults_point_at_local_sqlite_and_log_file() {
        let AppConfig {
            home_dir,
            database,
            logging,
            modules,
            ..
        } = AppConfig::default();

        assert!(home_dir.is_empty());
        assert_eq!(database.map(|d| d.url).as_deref(), Some("sqlite://inventory.db"));
        assert_eq!(logging, Some(default_logging_config()));
        assert!(modules.is_empty());
    }

    #[test]
    fn yaml_sections_are_parsed() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("home");
        let yaml = format!(
            r#"
home_dir: "{}"

database:
  url: "sqlite::memory:"
  max_conns: 4
  acquire_timeout: 3s

logging:
  default:
    console_level: debug
    file: ""
  inventory:
    console_level: trace
    file: "logs/inventory.log"
    file_level: info

modules:
  inventory:
    default_page_size: 20
"#,
            home.to_string_lossy().replace('\\', "/")
        );
        let cfg_path = write_config(tmp.path(), &yaml);

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(Path::new(&config.home_dir).is_absolute());
        assert!(home.exists(), "home_dir must be created");

        let db = config.database.as_ref().unwrap();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_conns, Some(4));
        assert_eq!(db.acquire_timeout, Some(std::time::Duration::from_secs(3)));

        let logging = config.logging.as_ref().unwrap();
        assert_eq!(logging["default"].console_level, "debug");
        assert_eq!(logging["inventory"].file_level, "info");
        assert_eq!(config.modules["inventory"]["default_page_size"], 20);
    }

    #[test]
    fn optional_sections_stay_unset() {
        let tmp = tempdir().unwrap();
        let home = tmp.path().join("minimal");
        let yaml = format!("home_dir: \"{}\"\n", home.to_string_lossy().replace('\\', "/"));
        let cfg_path = write_config(tmp.path(), &yaml);

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert_eq!(
            (config.database, config.logging, config.modules.len()),
            (None, None, 0)
        );
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let tmp = tempdir().unwrap();
        let cfg_path = write_config(tmp.path(), "server:\n  port: 8080\n");

        assert!(AppConfig::load_layered(&cfg_path).is_err());
    }

    #[test]
    fn module_files_join_the_modules_bag() {
        let tmp = tempdir().unwrap();
        let extra = tmp.path().join("conf.d");
        fs::create_dir(&extra).unwrap();
        fs::write(
            extra.join("reports.yaml"),
            "page_size: 42\nlabel: monthly\n",
        )
        .unwrap();
        fs::write(extra.join("notes.txt"), "ignored").unwrap();

        let yaml = format!(
            r#"
home_dir: "{}"
modules_dir: "{}"
modules:
  inventory:
    max_page_size: 10
"#,
            tmp.path().join("home").to_string_lossy().replace('\\', "/"),
            extra.to_string_lossy().replace('\\', "/")
        );
        let cfg_path = write_config(tmp.path(), &yaml);

        let modules = AppConfig::load_layered(&cfg_path).unwrap().modules;

        assert_eq!(modules["inventory"]["max_page_size"], 10);
        assert_eq!(modules["reports"]["label"], "monthly");
        assert!(!modules.contains_key("notes"));
    }

    #[test]
    fn module_config_deserializes_or_defaults() {
        let mut config = AppConfig::default();
        config.modules.insert(
            "reports".into(),
            serde_json::json!({ "page_size": 5, "label": "weekly" }),
        );

        let reports: SampleModule = config.module_config("reports").unwrap();
        assert_eq!(
            reports,
            SampleModule {
                page_size: 5,
                label: "weekly".into()
            }
        );

        let missing: SampleModule = config.module_config("absent").unwrap();
        assert_eq!(missing, SampleModule::default());
    }

    #[test]
    fn module_config_type_mismatch_is_an_error() {
        let mut config = AppConfig::default();
        config
            .modules
            .insert("reports".into(), serde_json::json!({ "page_size": "many" }));

        let res: Result<SampleModule> = config.module_config("reports");
        assert!(res.is_err());
    }

    #[test]
    fn verbosity_raises_console_level() {
        for (verbose, expected) in [(0, "info"), (1, "debug"), (2, "trace"), (3, "trace")] {
            let mut config = AppConfig::default();
            config.apply_cli_overrides(&CliArgs {
                verbose,
                ..CliArgs::default()
            });
            assert_eq!(config.logging.unwrap()["default"].console_level, expected);
        }
    }

    #[test]
    fn database_url_flag_creates_missing_section() {
        let mut config = AppConfig {
            database: None,
            ..AppConfig::default()
        };
        let args = CliArgs {
            database_url: Some("sqlite::memory:".into()),
            ..CliArgs::default()
        };

        config.apply_cli_overrides(&args);

        assert_eq!(config.database.unwrap().url, "sqlite::memory:");
    }

    #[test]
    fn yaml_dump_reloads_identically() {
        let mut config = AppConfig::default();
        config
            .modules
            .insert("inventory".into(), serde_json::json!({ "max_page_size": 10 }));

        let reloaded: AppConfig = serde_yaml::from_str(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(reloaded.database, config.database);
        assert_eq!(reloaded.logging, config.logging);
        assert_eq!(reloaded.modules, config.modules);
    }
}
