use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub preferred_barber_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarberStatus {
    Available,
    Occupied,
    Break,
    Off,
}

impl fmt::Display for BarberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BarberStatus::Available => "available",
            BarberStatus::Occupied => "occupied",
            BarberStatus::Break => "break",
            BarberStatus::Off => "off",
        };
        f.write_str(label)
    }
}

/// Where a barber's chair sits on the shop floor, in percent of the
/// floor plan's width and height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloorPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barber {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub specialties: Vec<String>,
    pub bio: String,
    pub status: BarberStatus,
    pub position: FloorPosition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration_minutes: u32,
    pub price_cents: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub barber_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// One bookable unit of time for a barber on a date. Derived on every
/// query, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub available: bool,
}
