//! Host-side option toggles.
//!
//! The host flips these from buttons or keybindings between leaps; they never run a search
//! themselves. Each leap snapshots them into an immutable `LeapOptions`.

use crate::LeapOptions;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    InsertLeft,
    SelectToMatch,
    SearchBackwards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptionToggles {
    defaults: LeapOptions,
    current: LeapOptions,
}

impl OptionToggles {
    /// Seed both the current and the restore-to values from configured defaults.
    pub fn new(defaults: LeapOptions) -> Self {
        Self {
            defaults,
            current: defaults,
        }
    }

    /// Flip one toggle, returning its new value.
    pub fn toggle(&mut self, which: Toggle) -> bool {
        let slot = match which {
            Toggle::InsertLeft => &mut self.current.insert_left,
            Toggle::SelectToMatch => &mut self.current.select_to_match,
            Toggle::SearchBackwards => &mut self.current.search_backwards,
        };
        *slot = !*slot;
        trace!(target: "leap.toggles", ?which, value = *slot, "toggle");
        *slot
    }

    pub fn get(&self, which: Toggle) -> bool {
        match which {
            Toggle::InsertLeft => self.current.insert_left,
            Toggle::SelectToMatch => self.current.select_to_match,
            Toggle::SearchBackwards => self.current.search_backwards,
        }
    }

    /// Options for the next leap.
    pub fn options(&self) -> LeapOptions {
        self.current
    }

    /// Return every toggle to its configured default.
    pub fn restore_defaults(&mut self) {
        self.current = self.defaults;
    }
}
