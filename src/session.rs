use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::User;

/// Fixed key the identity snapshot is stored under.
pub const SESSION_KEY: &str = "current_user";

/// Persistence for the single bound identity. The snapshot is the full
/// identity record serialized as JSON text; it is read once when the shop
/// is constructed and removed on logout.
///
/// Failures are logged and swallowed: losing the snapshot must never fail
/// a booking-domain operation.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<User>;
    fn save(&self, user: &User);
    fn clear(&self);
}

/// Key-value slot held in memory, the shape of the browser-local storage
/// the presentation layer uses. Cloning shares the underlying slot.
#[derive(Clone, Default)]
pub struct MemorySession {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn load(&self) -> Option<User> {
        let slots = self.slots.lock().ok()?;
        let raw = slots.get(SESSION_KEY)?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                log::warn!("Discarding unreadable session snapshot: {err}");
                None
            }
        }
    }

    fn save(&self, user: &User) {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("Failed to serialize session snapshot: {err}");
                return;
            }
        };
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(SESSION_KEY.to_string(), raw);
        }
    }

    fn clear(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(SESSION_KEY);
        }
    }
}

/// Snapshot stored as a JSON file, so the bound identity survives process
/// restarts the way it survives page reloads in the browser.
#[derive(Clone, Debug)]
pub struct JsonFileSession {
    path: PathBuf,
}

impl JsonFileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for JsonFileSession {
    fn load(&self) -> Option<User> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                log::warn!(
                    "Discarding unreadable session snapshot at {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&self, user: &User) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("Failed to create session directory: {err}");
                return;
            }
        }
        let raw = match serde_json::to_string_pretty(user) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("Failed to serialize session snapshot: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, raw) {
            log::warn!(
                "Failed to write session snapshot to {}: {err}",
                self.path.display()
            );
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to remove session snapshot at {}: {err}",
                    self.path.display()
                );
            }
        }
    }
}
