#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{LeapEngine, MemoryHost};
use core_events::{FreshnessListener, ManualScheduler};
use core_state::LeapOptions;
use core_text::Buffer;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const WINDOW: Duration = Duration::from_millis(1000);

/// Records every freshness transition in order.
#[derive(Default)]
pub struct RecordingListener {
    seen: Mutex<Vec<bool>>,
}

impl RecordingListener {
    pub fn seen(&self) -> Vec<bool> {
        self.seen.lock().unwrap().clone()
    }
}

impl FreshnessListener for RecordingListener {
    fn freshness_changed(&self, fresh: bool) {
        self.seen.lock().unwrap().push(fresh);
    }
}

pub struct Fixture {
    pub engine: LeapEngine,
    pub host: MemoryHost,
    pub scheduler: Arc<ManualScheduler>,
    pub listener: Arc<RecordingListener>,
}

pub fn fixture(text: &str, caret: usize) -> Fixture {
    let scheduler = Arc::new(ManualScheduler::new());
    let listener = Arc::new(RecordingListener::default());
    let engine = LeapEngine::new(scheduler.clone(), listener.clone(), WINDOW);
    let mut host = MemoryHost::new(Buffer::from_str("fixture", text).unwrap());
    host.set_caret(caret);
    Fixture {
        engine,
        host,
        scheduler,
        listener,
    }
}

impl Fixture {
    /// Leap and apply the result to the host, like an editor would.
    pub fn leap(&mut self, pattern: &str, options: LeapOptions) -> core_actions::LeapResult {
        let res = self.engine.leap(&mut self.host, pattern, options).unwrap();
        self.host.apply(&res);
        res
    }

    pub fn repeat_forward(&mut self) -> core_actions::LeapResult {
        let res = self.engine.repeat_forward(&mut self.host).unwrap();
        self.host.apply(&res);
        res
    }

    pub fn repeat_back(&mut self) -> core_actions::LeapResult {
        let res = self.engine.repeat_back(&mut self.host).unwrap();
        self.host.apply(&res);
        res
    }
}

pub fn opts() -> LeapOptions {
    LeapOptions::default()
}

pub fn backwards() -> LeapOptions {
    LeapOptions {
        search_backwards: true,
        ..LeapOptions::default()
    }
}

pub fn selecting() -> LeapOptions {
    LeapOptions {
        select_to_match: true,
        ..LeapOptions::default()
    }
}
