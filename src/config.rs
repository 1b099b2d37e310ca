use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;

/// Engine configuration. Defaults mirror the shop's real opening hours:
/// 09:00-18:00 in 30-minute slots, roughly 70% of base slots open.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub slot_minutes: u32,
    /// Fraction of slots the availability source marks open before the
    /// ledger is consulted.
    pub base_availability: f64,
    pub availability_seed: u64,
    pub demo_seed: u64,
    /// Fixed pause applied to login/register/book/cancel, standing in for
    /// the network round-trip the presentation layer expects. `None`
    /// resolves every operation immediately.
    pub simulated_latency: Option<Duration>,
    pub session_file: PathBuf,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            open: hour(9),
            close: hour(18),
            slot_minutes: 30,
            base_availability: 0.7,
            availability_seed: 316,
            demo_seed: 316,
            simulated_latency: Some(Duration::from_millis(500)),
            session_file: PathBuf::from("./data/current_user.json"),
        }
    }
}

impl ShopConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let open = env::var("STUDIO316_OPEN_HOUR")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(hour)
            .unwrap_or(defaults.open);
        let close = env::var("STUDIO316_CLOSE_HOUR")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(hour)
            .unwrap_or(defaults.close);
        let slot_minutes = env::var("STUDIO316_SLOT_MINUTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.slot_minutes);
        let base_availability = env::var("STUDIO316_BASE_AVAILABILITY")
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .map(|ratio| ratio.clamp(0.0, 1.0))
            .unwrap_or(defaults.base_availability);
        let availability_seed = env::var("STUDIO316_AVAILABILITY_SEED")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.availability_seed);
        let demo_seed = env::var("STUDIO316_DEMO_SEED")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.demo_seed);
        let simulated_latency = env::var("STUDIO316_LATENCY_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(|millis| {
                if millis == 0 {
                    None
                } else {
                    Some(Duration::from_millis(millis))
                }
            })
            .unwrap_or(defaults.simulated_latency);
        let session_file = env::var("STUDIO316_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        Self {
            open,
            close,
            slot_minutes,
            base_availability,
            availability_seed,
            demo_seed,
            simulated_latency,
            session_file,
        }
    }
}

fn hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN)
}
