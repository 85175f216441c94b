//! Frogger entrypoint: a line-oriented host for the leap engine.
//!
//! Reads commands from stdin (`leap <pattern>`, `next`, `prev`, `again`, `toggle ...`,
//! `caret ...`, `show`, `quit`), applies each leap to an in-memory document and prints the
//! resulting caret and selection. Freshness transitions arrive on the same event channel as
//! input and are printed as they happen.
use anyhow::Result;
use clap::Parser;
use core_actions::io_ops::open_document;
use core_actions::{CommandParser, HostCommand, LeapEngine, LeapResult, MemoryHost};
use core_config::load_from;
use core_events::{
    EVENT_CHANNEL_CAP, Event, FRESHNESS_SEND_FAILURES, TIMERS_ARMED, TIMERS_FIRED, TokioScheduler,
};
use core_state::{OptionToggles, Toggle};
use core_text::Buffer;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Once};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const DEMO_TEXT: &str = "fn leap(pattern: &str) -> Option<usize> {\n    \
                         let caret = host.caret();\n    \
                         find_nearest(text, caret, pattern)\n}\n";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "frogger", version, about = "Leap the caret to the nearest match")]
struct Args {
    /// Optional path to load (UTF-8 text). If omitted a small demo document is used.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `frogger.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Starting caret as a character offset.
    #[arg(long = "caret", default_value_t = 0)]
    pub caret: usize,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("frogger.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "frogger.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_document(args: &Args) -> Result<Buffer> {
        match args.path.as_ref() {
            Some(path) => match open_document(path) {
                Ok(buffer) => Ok(buffer),
                Err(e) => {
                    error!(target: "io", error = %e, "file_open_error");
                    eprintln!("could not open {}: {e:#}", path.display());
                    Buffer::from_str("untitled", "")
                }
            },
            None => Buffer::from_str("demo", DEMO_TEXT),
        }
    }
}

struct HostRuntime {
    engine: LeapEngine,
    host: MemoryHost,
    toggles: OptionToggles,
}

impl HostRuntime {
    /// Handle one command line. Returns `false` when the session should end.
    fn handle_input(&mut self, line: &str) -> bool {
        let command = CommandParser::parse(line);
        let outcome = match command {
            HostCommand::Leap(pattern) => {
                let options = self.toggles.options();
                self.engine.leap(&mut self.host, &pattern, options)
            }
            HostCommand::RepeatForward => self.engine.repeat_forward(&mut self.host),
            HostCommand::RepeatBack => self.engine.repeat_back(&mut self.host),
            HostCommand::LeapAgain => {
                let options = self.toggles.options();
                self.engine
                    .leap_with_previous_search_term(&mut self.host, options)
            }
            HostCommand::Toggle(which) => {
                let value = self.toggles.toggle(which);
                println!("{}: {}", toggle_label(which), on_off(value));
                return true;
            }
            HostCommand::CaretOffset(offset) => {
                self.host.set_caret(offset);
                self.print_caret();
                return true;
            }
            HostCommand::CaretPosition(pos) => {
                self.host.set_caret_position(pos);
                self.print_caret();
                return true;
            }
            HostCommand::Show => {
                self.print_status();
                return true;
            }
            HostCommand::Quit => return false,
            HostCommand::Unknown(s) => {
                if !s.is_empty() {
                    println!("unknown command: {s}");
                }
                return true;
            }
        };

        match outcome {
            Ok(result) => self.apply(&result),
            Err(e) => {
                warn!(target: "runtime", error = %e, "leap_rejected");
                println!("{e}");
            }
        }
        true
    }

    fn apply(&mut self, result: &LeapResult) {
        if !result.ok {
            println!("no match");
            return;
        }
        self.host.apply(result);
        self.print_caret();
        if let Some(text) = result.copy_text.as_deref() {
            println!("copied {} chars", text.chars().count());
        }
    }

    fn print_caret(&self) {
        let selection = self.host.selection();
        if selection.is_empty() {
            println!("caret {}", self.host.caret_position());
        } else {
            println!(
                "caret {} selection {:?}",
                self.host.caret_position(),
                self.host.selected_text()
            );
        }
    }

    fn print_status(&self) {
        self.print_caret();
        for which in [Toggle::InsertLeft, Toggle::SelectToMatch, Toggle::SearchBackwards] {
            println!("{}: {}", toggle_label(which), on_off(self.toggles.get(which)));
        }
        match self.engine.session().previous() {
            Some(prev) => println!(
                "previous leap: {:?} ({})",
                prev.pattern,
                if prev.options.search_backwards { "backward" } else { "forward" }
            ),
            None => println!("previous leap: none"),
        }
    }
}

fn toggle_label(which: Toggle) -> &'static str {
    match which {
        Toggle::InsertLeft => "insert cursor left",
        Toggle::SelectToMatch => "select to match",
        Toggle::SearchBackwards => "search backwards",
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Blocking stdin reader feeding the event channel; ends the session on EOF.
fn spawn_stdin_reader(tx: mpsc::Sender<Event>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.blocking_send(Event::Shutdown);
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let buffer = AppStartup::load_document(&args)?;
    info!(
        target: "runtime.startup",
        buffer = buffer.name.as_str(),
        chars = buffer.len_chars(),
        config_override = args.config.is_some(),
        freshness_ms = config.leap().repeat_search_timeout,
        "bootstrap_complete"
    );

    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let engine = LeapEngine::new(
        Arc::new(TokioScheduler::new(tokio::runtime::Handle::current())),
        Arc::new(tx.clone()),
        config.leap().freshness_window(),
    );
    let mut host = MemoryHost::new(buffer);
    host.set_caret(args.caret);
    let mut runtime = HostRuntime {
        engine,
        host,
        toggles: OptionToggles::new(config.leap().default_options()),
    };
    spawn_stdin_reader(tx);

    runtime.print_caret();
    while let Some(event) = rx.recv().await {
        match event {
            Event::Input(line) => {
                if !runtime.handle_input(&line) {
                    break;
                }
            }
            Event::LeapFreshness { fresh } => {
                tracing::debug!(target: "runtime", fresh, "leap_freshness");
                if !fresh {
                    println!("(leap expired)");
                }
            }
            Event::Shutdown => break,
        }
    }

    runtime.engine.deactivate();
    info!(
        target: "runtime",
        timers_armed = TIMERS_ARMED.load(Ordering::Relaxed),
        timers_fired = TIMERS_FIRED.load(Ordering::Relaxed),
        freshness_send_failures = FRESHNESS_SEND_FAILURES.load(Ordering::Relaxed),
        "shutdown"
    );
    Ok(())
}
