//! In-memory booking engine for the Studio316 barbershop.
//!
//! Everything lives in process memory behind a single [`Shop`] composition
//! root; the only state that survives a restart is the bound identity
//! snapshot. The presentation layer calls the operations exposed here and
//! renders the [`ShopEvent`]s they broadcast.

mod auth;
mod catalog;
mod config;
mod error;
mod ledger;
mod models;
mod reconciler;
pub mod seed;
mod session;
mod slots;
mod state;

pub use auth::new_id;
pub use config::ShopConfig;
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerStats};
pub use models::{
    Appointment, AppointmentStatus, Barber, BarberStatus, FloorPosition, Service, TimeSlot, User,
};
pub use session::{JsonFileSession, MemorySession, SessionStore, SESSION_KEY};
pub use slots::{AvailabilitySource, SeededAvailability, DEFAULT_OPEN_RATIO};
pub use state::{Shop, ShopBuilder, ShopEvent};
