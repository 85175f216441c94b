//! Configuration loading and parsing.
//!
//! Reads `frogger.toml` (or an override path provided by the binary) once at startup and turns
//! its `[leap]` table into default `LeapOptions` plus the freshness window length. The engine
//! itself never touches the file system; hosts pass the resulting options in per leap.
//!
//! Unknown fields are ignored so older binaries tolerate newer files. A file that fails to parse
//! falls back to defaults with a warning rather than aborting startup.

use anyhow::Result;
use core_state::{LeapOptions, RevealMode};
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "frogger.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LeapConfig {
    #[serde(default)]
    pub insert_cursor_left: bool,
    #[serde(default)]
    pub select_to_match: bool,
    #[serde(default)]
    pub search_backwards: bool,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub copy_on_select: bool,
    #[serde(default)]
    pub reveal_range: RevealMode,
    /// Freshness window after a leap, in milliseconds.
    #[serde(default = "LeapConfig::default_repeat_search_timeout")]
    pub repeat_search_timeout: u64,
}

impl Default for LeapConfig {
    fn default() -> Self {
        Self {
            insert_cursor_left: false,
            select_to_match: false,
            search_backwards: false,
            use_regex: false,
            copy_on_select: false,
            reveal_range: RevealMode::Default,
            repeat_search_timeout: Self::default_repeat_search_timeout(),
        }
    }
}

impl LeapConfig {
    const fn default_repeat_search_timeout() -> u64 {
        1000
    }

    /// Options a fresh session starts from before any toggle is flipped.
    pub fn default_options(&self) -> LeapOptions {
        LeapOptions {
            insert_left: self.insert_cursor_left,
            select_to_match: self.select_to_match,
            search_backwards: self.search_backwards,
            use_regex: self.use_regex,
            copy_on_select: self.copy_on_select,
            reveal: self.reveal_range,
        }
    }

    pub fn freshness_window(&self) -> Duration {
        Duration::from_millis(self.repeat_search_timeout)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub leap: LeapConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub path: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("frogger").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                timeout_ms = file.leap.repeat_search_timeout,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                path: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn leap(&self) -> &LeapConfig {
        &self.file.leap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.leap(), &LeapConfig::default());
        assert_eq!(cfg.leap().default_options(), LeapOptions::default());
        assert_eq!(cfg.leap().freshness_window(), Duration::from_millis(1000));
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_leap_table() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[leap]\ninsert_cursor_left = true\nselect_to_match = true\n\
             copy_on_select = true\nreveal_range = \"in_center\"\nrepeat_search_timeout = 250\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let opts = cfg.leap().default_options();
        assert!(opts.insert_left);
        assert!(opts.select_to_match);
        assert!(opts.copy_on_select);
        assert!(!opts.search_backwards);
        assert!(!opts.use_regex);
        assert_eq!(opts.reveal, RevealMode::InCenter);
        assert_eq!(cfg.leap().freshness_window(), Duration::from_millis(250));
        assert_eq!(cfg.path.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn partial_table_keeps_remaining_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[leap]\nsearch_backwards = true\nfuture_knob = 3\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.leap().search_backwards);
        assert_eq!(cfg.leap().repeat_search_timeout, 1000);
        assert_eq!(cfg.leap().reveal_range, RevealMode::Default);
    }

    #[test]
    fn all_reveal_modes_parse() {
        for (name, mode) in [
            ("default", RevealMode::Default),
            ("in_center", RevealMode::InCenter),
            ("in_center_if_outside_viewport", RevealMode::InCenterIfOutsideViewport),
            ("at_top", RevealMode::AtTop),
        ] {
            let file: ConfigFile =
                toml::from_str(&format!("[leap]\nreveal_range = \"{name}\"\n")).unwrap();
            assert_eq!(file.leap.reveal_range, mode);
        }
    }

    #[test]
    fn parse_failure_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[leap]\nrepeat_search_timeout = \"soon\"\n").unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || load_from(Some(tmp.path().to_path_buf())).unwrap());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
        assert_eq!(cfg.leap(), &LeapConfig::default());
    }
}
