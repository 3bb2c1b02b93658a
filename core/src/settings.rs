use serde::{Deserialize, Serialize};

use crate::*;

/// Player preferences that affect how a session is run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Regenerate the layout on the first reveal so the clicked cell and its neighbors are clear.
    pub safe_first_reveal: bool,
    pub auto_save: bool,
    pub save_interval_secs: u32,
}

impl Settings {
    pub const fn save_interval(&self) -> u32 {
        if self.save_interval_secs == 0 {
            1
        } else {
            self.save_interval_secs
        }
    }

    /// Whether a running game should be written out after `elapsed_secs` seconds of play.
    pub const fn autosave_due(&self, elapsed_secs: u32) -> bool {
        self.auto_save && elapsed_secs % self.save_interval() == 0
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            safe_first_reveal: true,
            auto_save: true,
            save_interval_secs: 30,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "kaboom:settings:v1";
}
