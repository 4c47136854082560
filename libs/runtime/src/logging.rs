use crate::config::{LoggingConfig, Section};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{filter::Targets, fmt};

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF)
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

struct RotWriterHandle(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut w) => w.write(buf),
            // a panicked writer must not take the process down with it
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut w) => w.flush(),
            Err(_) => Ok(()),
        }
    }
}

// -------- path resolution helpers --------

/// Resolve a log file path against `base_dir` (home_dir).
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer(section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!(
                "Failed to create log directory '{}': {}",
                parent.to_string_lossy(),
                e
            );
            return None;
        }
    }

    let max_bytes = section.max_size_mb.unwrap_or(20) * 1024 * 1024;
    let rot = FileRotate::new(
        &log_path,
        AppendCount::new(section.max_backups.unwrap_or(3)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Some(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Build per-sink target filters: the `default` section sets the fallback
/// level, every other key is a crate/target prefix with its own level.
fn console_level(s: &Section) -> &str {
    &s.console_level
}

fn file_level(s: &Section) -> &str {
    &s.file_level
}

fn build_targets(cfg: &LoggingConfig, pick: fn(&Section) -> &str) -> Targets {
    let default = cfg
        .get("default")
        .map(|s| level_filter(pick(s)))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(k, _)| k.as_str() != "default")
        .fold(Targets::new().with_default(default), |targets, (name, s)| {
            targets.with_target(name.clone(), level_filter(pick(s)))
        })
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually app.home_dir)
///
/// Console output goes to stderr; stdout is reserved for the interactive views.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, prelude::*, Registry};

    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let ansi = atty::is(atty::Stream::Stderr);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(build_targets(cfg, console_level));

    let file_writer = cfg
        .get("default")
        .and_then(|s| create_rotating_writer(s, base_dir));

    match file_writer {
        Some(writer) => {
            let file_layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(build_targets(cfg, file_level));
            let _ = Registry::default()
                .with(console_layer)
                .with(file_layer)
                .try_init();
        }
        None => {
            let _ = Registry::default().with(console_layer).try_init();
        }
    }
}

fn init_default_logging() {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::WARN)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.to_string(),
            file: file.to_string(),
            file_level: file_level.to_string(),
            max_backups: Some(1),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_tracing_level("chatty"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("WARN"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(level_filter("none"), LevelFilter::OFF);
    }

    #[test]
    fn relative_log_paths_resolve_against_home() {
        let base = Path::new("/srv/trueque");
        assert_eq!(
            resolve_log_path("logs/app.log", base),
            PathBuf::from("/srv/trueque/logs/app.log")
        );
        assert_eq!(
            resolve_log_path("/var/log/app.log", base),
            PathBuf::from("/var/log/app.log")
        );
    }

    #[test]
    fn empty_file_disables_file_sink() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(create_rotating_writer(&section("info", "", "debug"), tmp.path()).is_none());
        assert!(
            create_rotating_writer(&section("info", "logs/t.log", "debug"), tmp.path()).is_some()
        );
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn crate_sections_override_default_level() {
        let mut cfg: LoggingConfig = HashMap::new();
        cfg.insert("default".into(), section("warn", "", ""));
        cfg.insert("marketplace".into(), section("debug", "", ""));

        let targets = build_targets(&cfg, console_level);
        assert!(targets.would_enable("marketplace::domain", &Level::DEBUG));
        assert!(!targets.would_enable("reqwest", &Level::INFO));
        assert!(targets.would_enable("reqwest", &Level::WARN));
    }
}
