//! One-shot trigger flags.
//!
//! A trigger is armed by gameplay code ("took_hit", "attack_finished") and
//! consumed by the first reader that pops it, so a transition guarded on a
//! trigger fires once per arming.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of currently armed trigger names.
///
/// # Example
///
/// ```rust
/// use statecraft::TriggerSet;
///
/// let mut triggers = TriggerSet::new();
/// triggers.set_trigger("took_hit", true);
///
/// assert!(triggers.get_trigger("took_hit", false)); // peek
/// assert!(triggers.get_trigger("took_hit", true)); // pop
/// assert!(!triggers.get_trigger("took_hit", true));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSet {
    armed: BTreeSet<String>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (`active = true`) or disarm `name`. Arming twice is the same as
    /// arming once.
    pub fn set_trigger(&mut self, name: &str, active: bool) {
        if active {
            if !self.armed.contains(name) {
                self.armed.insert(name.to_string());
            }
        } else {
            self.armed.remove(name);
        }
    }

    /// Whether `name` is armed; when `pop` is set the trigger is consumed.
    ///
    /// Peeking (`pop = false`) lets several readers observe the same
    /// trigger within a tick; the last of them should pop it.
    pub fn get_trigger(&mut self, name: &str, pop: bool) -> bool {
        if pop {
            self.armed.remove(name)
        } else {
            self.armed.contains(name)
        }
    }

    pub fn pop_trigger(&mut self, name: &str) -> bool {
        self.get_trigger(name, true)
    }

    pub fn peek_trigger(&self, name: &str) -> bool {
        self.armed.contains(name)
    }

    pub fn clear(&mut self) {
        self.armed.clear();
    }

    pub fn armed(&self) -> impl Iterator<Item = &str> {
        self.armed.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}
