use chrono::{Days, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::auth::new_id;
use crate::models::{
    Appointment, AppointmentStatus, Barber, BarberStatus, FloorPosition, Service, User,
};

pub const DEMO_APPOINTMENT_COUNT: usize = 20;

pub fn demo_barbers() -> Vec<Barber> {
    vec![
        Barber {
            id: new_id(),
            name: "Mike Johnson".to_string(),
            avatar: "https://images.unsplash.com/photo-1618077360395-f3068be8e001?w=300"
                .to_string(),
            specialties: strings(&["Classic Cuts", "Fades", "Beard Trims"]),
            bio: "With 10 years of experience, Mike specializes in classic cuts and modern fades."
                .to_string(),
            status: BarberStatus::Available,
            position: FloorPosition { x: 20.0, y: 30.0 },
        },
        Barber {
            id: new_id(),
            name: "Sarah Williams".to_string(),
            avatar: "https://images.unsplash.com/photo-1580489944761-15a19d654956?w=300"
                .to_string(),
            specialties: strings(&["Modern Styles", "Hair Coloring", "Skin Fades"]),
            bio: "Sarah brings creativity and precision to every haircut with 8 years in the industry."
                .to_string(),
            status: BarberStatus::Occupied,
            position: FloorPosition { x: 60.0, y: 30.0 },
        },
        Barber {
            id: new_id(),
            name: "David Martinez".to_string(),
            avatar: "https://images.unsplash.com/photo-1531384441138-2736e62e0919?w=300"
                .to_string(),
            specialties: strings(&["Razor Cuts", "Hot Towel Shaves", "Beard Styling"]),
            bio: "David is our beard and shaving expert with over 12 years of experience."
                .to_string(),
            status: BarberStatus::Break,
            position: FloorPosition { x: 20.0, y: 70.0 },
        },
        Barber {
            id: new_id(),
            name: "Lisa Chen".to_string(),
            avatar: "https://images.unsplash.com/photo-1567532939604-b6b5b0db2604?w=300"
                .to_string(),
            specialties: strings(&["Textured Cuts", "Pompadours", "Kids Cuts"]),
            bio: "Lisa specializes in creating the perfect cut for any hair type and age."
                .to_string(),
            status: BarberStatus::Available,
            position: FloorPosition { x: 60.0, y: 70.0 },
        },
    ]
}

/// Two walk-in customers and the shop admin. Jane prefers the first
/// seeded barber, matching the demo data the UI was built around.
pub fn demo_users(barbers: &[Barber]) -> Vec<User> {
    vec![
        User {
            id: new_id(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: Some("555-123-4567".to_string()),
            is_admin: false,
            preferred_barber_id: None,
        },
        User {
            id: new_id(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("555-987-6543".to_string()),
            is_admin: false,
            preferred_barber_id: barbers.first().map(|barber| barber.id.clone()),
        },
        User {
            id: new_id(),
            name: "Admin User".to_string(),
            email: "admin@studio316.com".to_string(),
            phone: Some("555-111-2222".to_string()),
            is_admin: true,
            preferred_barber_id: None,
        },
    ]
}

pub fn demo_services() -> Vec<Service> {
    vec![
        service("Classic Haircut", "Traditional haircut with scissors and clippers", 30, 2500),
        service("Fade", "Modern fade haircut with precise blending", 45, 3500),
        service("Beard Trim", "Shape and trim your beard to perfection", 20, 1500),
        service("Haircut & Beard Combo", "Complete haircut and beard trim service", 60, 4500),
        service("Hot Towel Shave", "Luxurious hot towel straight razor shave", 45, 3000),
        service("Kids Haircut", "Haircut for children under 12", 20, 1800),
    ]
}

/// Demo appointments spread over the week after `start`, drawn from a
/// seeded generator so the same seed always produces the same schedule.
/// Roughly one in five comes out pending, the rest confirmed.
pub fn demo_appointments(
    users: &[User],
    barbers: &[Barber],
    services: &[Service],
    start: NaiveDate,
    seed: u64,
) -> Vec<Appointment> {
    let customers: Vec<&User> = users.iter().filter(|user| !user.is_admin).collect();
    if customers.is_empty() || barbers.is_empty() || services.is_empty() {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut appointments = Vec::with_capacity(DEMO_APPOINTMENT_COUNT);
    for _ in 0..DEMO_APPOINTMENT_COUNT {
        let day = rng.gen_range(0..7u64);
        let hour = rng.gen_range(9..18u32);
        let minute = if rng.gen_bool(0.5) { 0 } else { 30 };
        let date = start
            .checked_add_days(Days::new(day))
            .unwrap_or(start);
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
        let status = if rng.gen_bool(0.2) {
            AppointmentStatus::Pending
        } else {
            AppointmentStatus::Confirmed
        };

        appointments.push(Appointment {
            id: new_id(),
            user_id: customers[rng.gen_range(0..customers.len())].id.clone(),
            barber_id: barbers[rng.gen_range(0..barbers.len())].id.clone(),
            service_id: services[rng.gen_range(0..services.len())].id.clone(),
            date,
            time,
            status,
            created_at: Utc::now(),
        });
    }
    appointments
}

fn service(name: &str, description: &str, duration_minutes: u32, price_cents: u32) -> Service {
    Service {
        id: new_id(),
        name: name.to_string(),
        description: description.to_string(),
        duration_minutes,
        price_cents,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
