use chrono::{NaiveDate, NaiveTime, Utc};

use crate::auth::new_id;
use crate::error::{Error, Result};
use crate::models::{Appointment, AppointmentStatus};
use crate::slots;
use crate::state::{Shop, ShopEvent};

/// The complete set of appointment records. Records are appended on
/// booking and mutated in place on cancellation; nothing is ever removed.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<Appointment>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Appointment>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, appointment: Appointment) {
        self.entries.push(appointment);
    }

    pub fn get(&self, appointment_id: &str) -> Option<&Appointment> {
        self.entries.iter().find(|a| a.id == appointment_id)
    }

    pub fn get_mut(&mut self, appointment_id: &str) -> Option<&mut Appointment> {
        self.entries.iter_mut().find(|a| a.id == appointment_id)
    }

    /// True when a non-cancelled appointment already holds (barber, date,
    /// time).
    pub fn has_conflict(&self, barber_id: &str, date: NaiveDate, time: NaiveTime) -> bool {
        self.entries.iter().any(|a| {
            a.barber_id == barber_id
                && a.date == date
                && a.time == time
                && a.status != AppointmentStatus::Cancelled
        })
    }

    pub fn for_user(&self, user_id: &str) -> Vec<Appointment> {
        self.entries
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> Vec<Appointment> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self, today: NaiveDate) -> LedgerStats {
        let mut stats = LedgerStats::default();
        for appointment in &self.entries {
            stats.total += 1;
            match appointment.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
            }
            if appointment.date == today {
                stats.today += 1;
            }
        }
        stats
    }
}

/// Dashboard counters over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub today: usize,
}

impl Shop {
    /// Book a slot for the bound user. The slot check and the append run
    /// under one ledger lock, so two bookings for the same slot cannot
    /// both succeed.
    pub async fn book_appointment(
        &self,
        barber_id: &str,
        service_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Appointment> {
        self.pause().await;
        let user = self.current_user().await.ok_or(Error::Unauthenticated)?;

        let appointment = {
            let mut ledger = self.ledger().write().await;
            let open = slots::derive(self.config(), self.availability(), &ledger, barber_id, date)
                .into_iter()
                .any(|slot| slot.time == time && slot.available);
            if !open {
                return Err(Error::SlotUnavailable { date, time });
            }

            let appointment = Appointment {
                id: new_id(),
                user_id: user.id,
                barber_id: barber_id.to_string(),
                service_id: service_id.to_string(),
                date,
                time,
                status: AppointmentStatus::Confirmed,
                created_at: Utc::now(),
            };
            ledger.append(appointment.clone());
            appointment
        };

        log::info!(
            "Booked appointment {} with barber {} on {} at {}",
            appointment.id,
            appointment.barber_id,
            appointment.date,
            appointment.time.format("%H:%M"),
        );
        self.ledger_changed().await;
        self.publish(ShopEvent::AppointmentBooked {
            appointment: appointment.clone(),
        });
        Ok(appointment)
    }

    /// Cancel an appointment owned by the bound user (admins may cancel
    /// any). The record stays in the ledger with status `Cancelled`, so a
    /// repeated cancel succeeds rather than reporting `NotFound`.
    pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<Appointment> {
        self.pause().await;
        let acting = self.current_user().await;

        let appointment = {
            let mut ledger = self.ledger().write().await;
            let record = ledger
                .get_mut(appointment_id)
                .ok_or_else(|| Error::NotFound(appointment_id.to_string()))?;
            let allowed = acting
                .as_ref()
                .is_some_and(|user| user.id == record.user_id || user.is_admin);
            if !allowed {
                return Err(Error::Forbidden);
            }
            record.status = AppointmentStatus::Cancelled;
            record.clone()
        };

        log::info!("Cancelled appointment {}", appointment.id);
        self.ledger_changed().await;
        self.publish(ShopEvent::AppointmentCancelled {
            appointment: appointment.clone(),
        });
        Ok(appointment)
    }

    /// The bound user's appointments; empty when nobody is logged in.
    pub async fn user_appointments(&self) -> Vec<Appointment> {
        let Some(user) = self.current_user().await else {
            return Vec::new();
        };
        self.ledger().read().await.for_user(&user.id)
    }

    /// Full ledger snapshot, for the admin appointment listing.
    pub async fn appointments(&self) -> Vec<Appointment> {
        self.ledger().read().await.snapshot()
    }

    pub async fn ledger_stats(&self, today: NaiveDate) -> LedgerStats {
        self.ledger().read().await.stats(today)
    }
}
