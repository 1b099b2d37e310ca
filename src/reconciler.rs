use chrono::{DateTime, Utc};

use crate::ledger::Ledger;
use crate::models::{AppointmentStatus, Barber, BarberStatus};
use crate::state::{Shop, ShopEvent};

/// Derive each barber's display status from the ledger and the clock.
///
/// A confirmed appointment for today whose start time has passed makes the
/// barber occupied. Manual `Break`/`Off` states are sticky; everyone else
/// falls back to available. Returns the barbers whose status changed.
pub(crate) fn reconcile(
    barbers: &mut [Barber],
    ledger: &Ledger,
    now: DateTime<Utc>,
) -> Vec<(String, BarberStatus)> {
    let today = now.date_naive();
    let current_time = now.time();
    let mut changes = Vec::new();

    for barber in barbers.iter_mut() {
        let busy = ledger.iter().any(|appointment| {
            appointment.barber_id == barber.id
                && appointment.date == today
                && appointment.time <= current_time
                && appointment.status == AppointmentStatus::Confirmed
        });

        let next = if busy {
            BarberStatus::Occupied
        } else if matches!(barber.status, BarberStatus::Break | BarberStatus::Off) {
            barber.status
        } else {
            BarberStatus::Available
        };

        if next != barber.status {
            barber.status = next;
            changes.push((barber.id.clone(), next));
        }
    }

    changes
}

impl Shop {
    /// Re-derive barber statuses against the current wall clock. Runs
    /// automatically after every ledger mutation; the presentation layer
    /// may also call it on a timer so statuses track the passage of time.
    pub async fn refresh_barber_statuses(&self) {
        self.reconcile_at(Utc::now()).await;
    }

    pub(crate) async fn reconcile_at(&self, now: DateTime<Utc>) {
        let changes = {
            let ledger = self.ledger().read().await;
            let mut barbers = self.barber_registry().write().await;
            reconcile(&mut barbers, &ledger, now)
        };
        for (barber_id, status) in changes {
            self.publish(ShopEvent::BarberStatusChanged { barber_id, status });
        }
    }
}
