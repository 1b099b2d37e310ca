use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use studio316::{
    AppointmentStatus, BarberStatus, Error, MemorySession, SeededAvailability, Shop, ShopConfig,
    ShopEvent,
};

fn test_config() -> ShopConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    ShopConfig {
        simulated_latency: None,
        ..ShopConfig::default()
    }
}

/// An empty shop where every base slot is open, so tests control the
/// ledger completely.
fn empty_shop() -> Shop {
    Shop::builder()
        .config(test_config())
        .session_store(MemorySession::new())
        .availability(SeededAvailability::with_ratio(0, 1.0))
        .seed_demo(false)
        .build()
}

fn demo_shop() -> Shop {
    Shop::builder()
        .config(test_config())
        .session_store(MemorySession::new())
        .build()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 15).expect("valid date")
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

#[tokio::test]
async fn slot_sequence_covers_the_full_window() {
    let shop = demo_shop();
    for barber in shop.barbers().await {
        let slots = shop.barber_time_slots(&barber.id, date()).await;
        assert_eq!(slots.len(), 18);
        for slot in &slots {
            let label = slot.time.format("%H:%M").to_string();
            assert_eq!(label.len(), 5);
            assert!(NaiveTime::parse_from_str(&label, "%H:%M").is_ok());
        }
    }
}

#[tokio::test]
async fn slots_are_returned_even_for_unknown_barbers() {
    let shop = demo_shop();
    assert_eq!(shop.barber_time_slots("no-such-barber", date()).await.len(), 18);
}

#[tokio::test]
async fn booking_requires_a_bound_identity() {
    let shop = empty_shop();
    let result = shop.book_appointment("barber1", "service1", date(), t(10, 0)).await;
    assert_matches!(result, Err(Error::Unauthenticated));
}

#[tokio::test]
async fn booking_marks_the_slot_unavailable_and_records_the_appointment() {
    let shop = empty_shop();
    let user = shop
        .register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");

    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.user_id, user.id);
    assert_eq!(appointment.barber_id, "barber1");
    assert_eq!(appointment.date, date());
    assert_eq!(appointment.time, t(10, 0));

    let slots = shop.barber_time_slots("barber1", date()).await;
    let booked = slots
        .iter()
        .find(|slot| slot.time == t(10, 0))
        .expect("slot in window");
    assert!(!booked.available);

    let mine = shop.user_appointments().await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, appointment.id);
}

#[tokio::test]
async fn double_booking_the_same_slot_fails() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    shop.book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("first booking");

    let second = shop
        .book_appointment("barber1", "service2", date(), t(10, 0))
        .await;
    assert_matches!(second, Err(Error::SlotUnavailable { .. }));
    assert_eq!(shop.appointments().await.len(), 1);

    // a different slot still works
    shop.book_appointment("barber1", "service2", date(), t(10, 30))
        .await
        .expect("second slot");
}

#[tokio::test]
async fn times_outside_the_window_are_unavailable() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let result = shop
        .book_appointment("barber1", "service1", date(), t(18, 30))
        .await;
    assert_matches!(result, Err(Error::SlotUnavailable { .. }));
}

#[tokio::test]
async fn base_closed_slots_cannot_be_booked() {
    let shop = Shop::builder()
        .config(test_config())
        .session_store(MemorySession::new())
        .availability(SeededAvailability::with_ratio(0, 0.0))
        .seed_demo(false)
        .build();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let result = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await;
    assert_matches!(result, Err(Error::SlotUnavailable { .. }));
    assert!(shop.appointments().await.is_empty());
}

#[tokio::test]
async fn cancelling_someone_elses_appointment_is_forbidden() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");

    shop.logout().await;
    shop.register("Bob", "bob@example.com", "pw2", None)
        .await
        .expect("register");

    let result = shop.cancel_appointment(&appointment.id).await;
    assert_matches!(result, Err(Error::Forbidden));

    let ledger = shop.appointments().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn cancelling_while_logged_out_is_forbidden() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");
    shop.logout().await;

    let result = shop.cancel_appointment(&appointment.id).await;
    assert_matches!(result, Err(Error::Forbidden));
}

#[tokio::test]
async fn cancel_is_idempotent_and_never_deletes_the_record() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");

    let cancelled = shop
        .cancel_appointment(&appointment.id)
        .await
        .expect("first cancel");
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let again = shop
        .cancel_appointment(&appointment.id)
        .await
        .expect("second cancel");
    assert_eq!(again.status, AppointmentStatus::Cancelled);

    let ledger = shop.appointments().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn cancelled_slots_open_back_up() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");
    shop.cancel_appointment(&appointment.id)
        .await
        .expect("cancel");

    shop.book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("rebook after cancel");
}

#[tokio::test]
async fn admins_may_cancel_any_appointment() {
    let shop = demo_shop();
    let barber = shop.barbers().await.remove(0);
    shop.login("john@example.com", "pw").await.expect("login");
    // find a free slot rather than assuming one
    let free = shop
        .barber_time_slots(&barber.id, date())
        .await
        .into_iter()
        .find(|slot| slot.available)
        .expect("a free slot");
    let appointment = shop
        .book_appointment(&barber.id, "service1", date(), free.time)
        .await
        .expect("book");

    shop.logout().await;
    shop.login("admin@studio316.com", "pw").await.expect("admin login");
    let cancelled = shop
        .cancel_appointment(&appointment.id)
        .await
        .expect("admin cancel");
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn cancelling_an_unknown_id_is_not_found() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let result = shop.cancel_appointment("missing").await;
    assert_matches!(result, Err(Error::NotFound(id)) if id == "missing");
}

#[tokio::test]
async fn registering_a_taken_email_fails() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let result = shop.register("Bob", "alice@example.com", "pw2", None).await;
    assert_matches!(result, Err(Error::EmailTaken(email)) if email == "alice@example.com");
}

#[tokio::test]
async fn login_is_identity_lookup_by_email() {
    let shop = demo_shop();
    let user = shop
        .login("jane@example.com", "anything at all")
        .await
        .expect("login");
    assert_eq!(user.name, "Jane Smith");
    assert!(shop.is_authenticated().await);

    shop.logout().await;
    let result = shop.login("nobody@example.com", "pw").await;
    assert_matches!(result, Err(Error::InvalidCredentials));
    assert!(!shop.is_authenticated().await);
}

#[tokio::test]
async fn session_snapshot_survives_reconstruction() {
    let store = MemorySession::new();
    {
        let shop = Shop::builder()
            .config(test_config())
            .session_store(store.clone())
            .seed_demo(false)
            .build();
        shop.register("Alice", "alice@example.com", "pw", None)
            .await
            .expect("register");
    }

    let reloaded = Shop::builder()
        .config(test_config())
        .session_store(store.clone())
        .seed_demo(false)
        .build();
    let user = reloaded.current_user().await.expect("restored session");
    assert_eq!(user.email, "alice@example.com");

    reloaded.logout().await;
    let cleared = Shop::builder()
        .config(test_config())
        .session_store(store)
        .seed_demo(false)
        .build();
    assert!(cleared.current_user().await.is_none());
}

#[tokio::test]
async fn preferred_barber_comes_from_the_profile() {
    let shop = demo_shop();
    shop.login("jane@example.com", "pw").await.expect("login");
    let preferred = shop.preferred_barber().await.expect("preferred barber");
    assert_eq!(preferred.name, "Mike Johnson");

    shop.logout().await;
    shop.login("john@example.com", "pw").await.expect("login");
    assert!(shop.preferred_barber().await.is_none());
}

#[tokio::test]
async fn manual_status_overrides_are_admin_only() {
    let shop = demo_shop();
    let barber = shop.barbers().await.remove(0);

    let result = shop.set_barber_status(&barber.id, BarberStatus::Break).await;
    assert_matches!(result, Err(Error::Forbidden));

    shop.login("john@example.com", "pw").await.expect("login");
    let result = shop.set_barber_status(&barber.id, BarberStatus::Break).await;
    assert_matches!(result, Err(Error::Forbidden));

    shop.logout().await;
    shop.login("admin@studio316.com", "pw").await.expect("admin login");
    let updated = shop
        .set_barber_status(&barber.id, BarberStatus::Break)
        .await
        .expect("override");
    assert_eq!(updated.status, BarberStatus::Break);
    let result = shop.set_barber_status("missing", BarberStatus::Off).await;
    assert_matches!(result, Err(Error::NotFound(_)));
}

#[tokio::test]
async fn ledger_stats_track_bookings_and_cancellations() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");
    shop.book_appointment("barber1", "service1", date(), t(11, 0))
        .await
        .expect("book");
    shop.cancel_appointment(&appointment.id)
        .await
        .expect("cancel");

    let stats = shop.ledger_stats(date()).await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.today, 2);
}

#[tokio::test]
async fn mutations_broadcast_events() {
    let shop = empty_shop();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");

    let mut events = shop.subscribe();
    let appointment = shop
        .book_appointment("barber1", "service1", date(), t(10, 0))
        .await
        .expect("book");
    assert_matches!(
        events.recv().await,
        Ok(ShopEvent::AppointmentBooked { appointment: booked }) if booked.id == appointment.id
    );

    shop.cancel_appointment(&appointment.id)
        .await
        .expect("cancel");
    assert_matches!(
        events.recv().await,
        Ok(ShopEvent::AppointmentCancelled { .. })
    );
}

#[tokio::test(start_paused = true)]
async fn simulated_latency_defers_resolution() {
    let config = ShopConfig {
        simulated_latency: Some(std::time::Duration::from_millis(500)),
        ..ShopConfig::default()
    };
    let shop = Shop::builder()
        .config(config)
        .session_store(MemorySession::new())
        .availability(SeededAvailability::with_ratio(0, 1.0))
        .seed_demo(false)
        .build();

    let started = tokio::time::Instant::now();
    shop.register("Alice", "alice@example.com", "pw", None)
        .await
        .expect("register");
    assert!(started.elapsed() >= std::time::Duration::from_millis(500));
}
