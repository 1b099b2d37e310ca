use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ShopConfig;
use crate::ledger::Ledger;
use crate::models::TimeSlot;
use crate::state::Shop;

pub const DEFAULT_OPEN_RATIO: f64 = 0.7;

/// Decides whether a slot is open before the ledger is consulted.
///
/// The answer must be stable for a given (barber, date, time): booking
/// re-derives the slot sequence to validate the requested time, and a
/// source that changes its mind between the two derivations would reject
/// slots it just offered.
pub trait AvailabilitySource: Send + Sync {
    fn is_open(&self, barber_id: &str, date: NaiveDate, time: NaiveTime) -> bool;
}

/// Draws base availability from a seeded generator keyed by the slot
/// coordinates, so roughly `open_ratio` of slots are open and every query
/// for the same slot gets the same answer.
#[derive(Debug, Clone)]
pub struct SeededAvailability {
    seed: u64,
    open_ratio: f64,
}

impl SeededAvailability {
    pub fn new(seed: u64) -> Self {
        Self::with_ratio(seed, DEFAULT_OPEN_RATIO)
    }

    pub fn with_ratio(seed: u64, open_ratio: f64) -> Self {
        Self {
            seed,
            open_ratio: open_ratio.clamp(0.0, 1.0),
        }
    }
}

impl AvailabilitySource for SeededAvailability {
    fn is_open(&self, barber_id: &str, date: NaiveDate, time: NaiveTime) -> bool {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        barber_id.hash(&mut hasher);
        date.hash(&mut hasher);
        time.hash(&mut hasher);
        StdRng::seed_from_u64(hasher.finish()).gen_bool(self.open_ratio)
    }
}

/// Slot start times across the open/close window.
pub(crate) fn window_times(open: NaiveTime, close: NaiveTime, slot_minutes: u32) -> Vec<NaiveTime> {
    let step = Duration::minutes(slot_minutes.max(1) as i64);
    let mut times = Vec::new();
    let mut cursor = open;
    while cursor < close {
        times.push(cursor);
        let (next, wrapped) = cursor.overflowing_add_signed(step);
        if wrapped != 0 || next <= cursor {
            break;
        }
        cursor = next;
    }
    times
}

/// Full slot sequence for (barber, date): base availability from the
/// source, then any non-cancelled appointment at the same time forces the
/// slot closed.
pub(crate) fn derive(
    config: &ShopConfig,
    source: &dyn AvailabilitySource,
    ledger: &Ledger,
    barber_id: &str,
    date: NaiveDate,
) -> Vec<TimeSlot> {
    window_times(config.open, config.close, config.slot_minutes)
        .into_iter()
        .map(|time| TimeSlot {
            time,
            available: source.is_open(barber_id, date, time)
                && !ledger.has_conflict(barber_id, date, time),
        })
        .collect()
}

impl Shop {
    /// The slot sequence a booking wizard renders for (barber, date).
    ///
    /// Always returns the full window, even for a barber id the catalog
    /// does not know; callers validate the barber first.
    pub async fn barber_time_slots(&self, barber_id: &str, date: NaiveDate) -> Vec<TimeSlot> {
        let ledger = self.ledger().read().await;
        derive(
            self.config(),
            self.availability(),
            &ledger,
            barber_id,
            date,
        )
    }
}
