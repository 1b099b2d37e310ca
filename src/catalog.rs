use crate::error::{Error, Result};
use crate::models::{Barber, BarberStatus, Service};
use crate::state::{Shop, ShopEvent};

impl Shop {
    pub async fn barbers(&self) -> Vec<Barber> {
        self.barber_registry().read().await.clone()
    }

    pub async fn barber(&self, barber_id: &str) -> Option<Barber> {
        self.barber_registry()
            .read()
            .await
            .iter()
            .find(|barber| barber.id == barber_id)
            .cloned()
    }

    pub fn services(&self) -> &[Service] {
        self.service_catalog()
    }

    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.service_catalog()
            .iter()
            .find(|service| service.id == service_id)
    }

    /// The bound user's preferred barber, if they picked one.
    pub async fn preferred_barber(&self) -> Option<Barber> {
        let preferred_id = self.current_user().await?.preferred_barber_id?;
        self.barber(&preferred_id).await
    }

    /// Admin-only manual status override. `Break`/`Off` set here stay put
    /// until an admin changes them back; the reconciler never overrides
    /// them.
    pub async fn set_barber_status(&self, barber_id: &str, status: BarberStatus) -> Result<Barber> {
        if !self.is_admin().await {
            return Err(Error::Forbidden);
        }

        let barber = {
            let mut barbers = self.barber_registry().write().await;
            let barber = barbers
                .iter_mut()
                .find(|barber| barber.id == barber_id)
                .ok_or_else(|| Error::NotFound(barber_id.to_string()))?;
            barber.status = status;
            barber.clone()
        };

        log::info!("Barber {} set to {status}", barber.name);
        self.publish(ShopEvent::BarberStatusChanged {
            barber_id: barber.id.clone(),
            status,
        });
        Ok(barber)
    }
}
