//! Logging bootstrap.
//!
//! Every section of [`LoggingConfig`] is keyed by a target prefix (usually a
//! crate name such as `inventory` or `store_db`); the `default` section covers
//! everything else. Console output is human readable, file output is JSON
//! written through size-rotated files.

use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- level helpers --------

/// `None` turns the sink off; unknown names fall back to INFO.
fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// Returns true if target == prefix or target starts with "prefix::"
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

fn build_targets(cfg: &LoggingConfig, level_of: impl Fn(&Section) -> Option<LevelFilter>) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .and_then(&level_of)
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |targets, (name, section)| {
            targets.with_target(name.clone(), level_of(section).unwrap_or(LevelFilter::OFF))
        })
}

fn console_targets(cfg: &LoggingConfig) -> Targets {
    build_targets(cfg, |s| parse_level(&s.console_level))
}

fn file_targets(cfg: &LoggingConfig) -> Targets {
    build_targets(cfg, |s| {
        if s.file.trim().is_empty() {
            None
        } else {
            parse_level(&s.file_level)
        }
    })
}

// -------- rotating writer for files --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file writer poisoned"))?
            .flush()
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Create a rotating writer, ensuring the parent directory exists.
fn open_rotating_writer(log_path: &Path, section: &Section) -> io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let limit = match section.max_age_days {
        Some(days) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        None => FileLimit::MaxFiles(section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
    };
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(usize::try_from(max_bytes).unwrap_or(usize::MAX)),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Discards writes when no file is configured for a target.
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes records to per-section files by target prefix, falling back to the
/// default section's file.
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl FileRouter {
    fn from_config(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let mut router = FileRouter {
            default: None,
            by_prefix: HashMap::new(),
        };

        for (name, section) in cfg {
            if section.file.trim().is_empty() {
                continue;
            }
            let path = resolve_log_path(&section.file, base_dir);
            match open_rotating_writer(&path, section) {
                Ok(writer) if name == DEFAULT_SECTION => router.default = Some(writer),
                Ok(writer) => {
                    router.by_prefix.insert(name.clone(), writer);
                }
                Err(e) => eprintln!(
                    "Failed to init log file for '{}': {} ({})",
                    name,
                    path.display(),
                    e
                ),
            }
        }

        router
    }

    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| matches_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    // stdout is reserved for command output
    let ansi = atty::is(atty::Stream::Stderr);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let router = FileRouter::from_config(cfg, base_dir);
    let file_layer = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(file_targets(cfg))
    });

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

// =================== tests ===================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;
    use tracing::Level;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_age_days: None,
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(parse_level("trace"), Some(LevelFilter::TRACE));
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" Info "), Some(LevelFilter::INFO));
        assert_eq!(parse_level("warn"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("ERROR"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("off"), None);
        assert_eq!(parse_level("none"), None);
        assert_eq!(parse_level("bogus"), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_prefix_matching() {
        assert!(matches_prefix("inventory", "inventory"));
        assert!(matches_prefix("inventory::domain::service", "inventory"));
        assert!(!matches_prefix("inventory_cli", "inventory"));
        assert!(!matches_prefix("store_db::repo", "inventory"));
    }

    #[test]
    fn test_console_targets_follow_sections() {
        let mut cfg = default_logging_config();
        cfg.insert("store_db".into(), section("warn", "", ""));
        cfg.insert("inventory".into(), section("trace", "", ""));

        let targets = console_targets(&cfg);
        assert!(targets.would_enable("inventory::domain", &Level::TRACE));
        assert!(targets.would_enable("store_db::repo", &Level::WARN));
        assert!(!targets.would_enable("store_db::repo", &Level::INFO));
        assert!(targets.would_enable("sqlx::query", &Level::INFO));
        assert!(!targets.would_enable("sqlx::query", &Level::DEBUG));
    }

    #[test]
    fn test_file_targets_skip_sections_without_file() {
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "", "debug"));
        cfg.insert("inventory".into(), section("info", "logs/inv.log", "debug"));

        let targets = file_targets(&cfg);
        assert!(targets.would_enable("inventory::domain", &Level::DEBUG));
        assert!(!targets.would_enable("store_db::repo", &Level::ERROR));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let absolute = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&absolute.to_string_lossy(), Path::new("/elsewhere")), absolute);
    }

    #[test]
    fn test_rotating_writer_creates_parent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let mut writer = open_rotating_writer(&p, &section("info", "x", "debug")).unwrap();
        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert!(p.parent().unwrap().exists(), "parent dir must be created");
    }

    #[test]
    fn test_router_prefers_longest_prefix_then_default() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "logs/all.log", "debug"));
        cfg.insert("inventory".into(), section("info", "logs/inv.log", "debug"));
        cfg.insert("store_db".into(), section("info", "", "debug"));

        let router = FileRouter::from_config(&cfg, tmp.path());
        assert!(!router.is_empty());
        assert_eq!(router.by_prefix.len(), 1);

        let inv = router.resolve_for("inventory::domain").unwrap();
        assert!(Arc::ptr_eq(&inv.0, &router.by_prefix["inventory"].0));

        let other = router.resolve_for("store_db::repo").unwrap();
        assert!(Arc::ptr_eq(&other.0, &router.default.as_ref().unwrap().0));
    }
}
