use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::config::ShopConfig;
use crate::ledger::Ledger;
use crate::models::{Appointment, Barber, BarberStatus, Service, User};
use crate::seed;
use crate::session::{JsonFileSession, SessionStore};
use crate::slots::{AvailabilitySource, SeededAvailability};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notifications for the presentation layer. Subscribers that fall
/// behind simply miss events; nothing in the engine depends on delivery.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopEvent {
    AppointmentBooked { appointment: Appointment },
    AppointmentCancelled { appointment: Appointment },
    BarberStatusChanged { barber_id: String, status: BarberStatus },
    SessionChanged { user: Option<User> },
}

/// The composition root. Owns the user list, the barber list, the service
/// catalog, the appointment ledger, and the bound session identity, so no
/// state lives in module-level globals. All mutations go through `&self`
/// methods.
pub struct Shop {
    config: ShopConfig,
    users: RwLock<Vec<User>>,
    barbers: RwLock<Vec<Barber>>,
    services: Vec<Service>,
    ledger: RwLock<Ledger>,
    current: RwLock<Option<User>>,
    session: Box<dyn SessionStore>,
    availability: Box<dyn AvailabilitySource>,
    events: broadcast::Sender<ShopEvent>,
}

impl Shop {
    /// Default wiring: demo data, a file-backed session snapshot, and
    /// seeded availability, all per `config`.
    pub fn new(config: ShopConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> ShopBuilder {
        ShopBuilder::default()
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShopEvent> {
        self.events.subscribe()
    }

    pub(crate) fn ledger(&self) -> &RwLock<Ledger> {
        &self.ledger
    }

    pub(crate) fn barber_registry(&self) -> &RwLock<Vec<Barber>> {
        &self.barbers
    }

    pub(crate) fn user_registry(&self) -> &RwLock<Vec<User>> {
        &self.users
    }

    pub(crate) fn service_catalog(&self) -> &[Service] {
        &self.services
    }

    pub(crate) fn current_slot(&self) -> &RwLock<Option<User>> {
        &self.current
    }

    pub(crate) fn session_store(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub(crate) fn availability(&self) -> &dyn AvailabilitySource {
        self.availability.as_ref()
    }

    pub(crate) fn publish(&self, event: ShopEvent) {
        let _ = self.events.send(event);
    }

    /// The fixed pause that stands in for a network round-trip.
    pub(crate) async fn pause(&self) {
        if let Some(delay) = self.config.simulated_latency {
            tokio::time::sleep(delay).await;
        }
    }

    pub(crate) async fn ledger_changed(&self) {
        self.reconcile_at(Utc::now()).await;
    }
}

pub struct ShopBuilder {
    config: ShopConfig,
    session: Option<Box<dyn SessionStore>>,
    availability: Option<Box<dyn AvailabilitySource>>,
    seed_demo: bool,
}

impl Default for ShopBuilder {
    fn default() -> Self {
        Self {
            config: ShopConfig::default(),
            session: None,
            availability: None,
            seed_demo: true,
        }
    }
}

impl ShopBuilder {
    pub fn config(mut self, config: ShopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session_store(mut self, store: impl SessionStore + 'static) -> Self {
        self.session = Some(Box::new(store));
        self
    }

    pub fn availability(mut self, source: impl AvailabilitySource + 'static) -> Self {
        self.availability = Some(Box::new(source));
        self
    }

    /// Whether the shop starts with the demo catalog, users, and a week of
    /// demo appointments. Disable for an empty shop in tests.
    pub fn seed_demo(mut self, seed_demo: bool) -> Self {
        self.seed_demo = seed_demo;
        self
    }

    pub fn build(self) -> Shop {
        let config = self.config;
        let session = self
            .session
            .unwrap_or_else(|| Box::new(JsonFileSession::new(config.session_file.clone())));
        let availability = self.availability.unwrap_or_else(|| {
            Box::new(SeededAvailability::with_ratio(
                config.availability_seed,
                config.base_availability,
            ))
        });

        let (barbers, users, services, appointments) = if self.seed_demo {
            let barbers = seed::demo_barbers();
            let users = seed::demo_users(&barbers);
            let services = seed::demo_services();
            let appointments = seed::demo_appointments(
                &users,
                &barbers,
                &services,
                Utc::now().date_naive(),
                config.demo_seed,
            );
            log::info!(
                "Seeded demo data: {} barbers, {} services, {} appointments",
                barbers.len(),
                services.len(),
                appointments.len(),
            );
            (barbers, users, services, appointments)
        } else {
            (Vec::new(), Vec::new(), Vec::new(), Vec::new())
        };

        let current = session.load();
        if let Some(user) = &current {
            log::info!("Restored session for {}", user.email);
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Shop {
            config,
            users: RwLock::new(users),
            barbers: RwLock::new(barbers),
            services,
            ledger: RwLock::new(Ledger::from_entries(appointments)),
            current: RwLock::new(current),
            session,
            availability,
            events,
        }
    }
}
