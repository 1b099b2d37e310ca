use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::User;
use crate::state::{Shop, ShopEvent};

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Shop {
    /// Look up an identity by email and bind it to the session.
    ///
    /// The password is accepted for interface compatibility but never
    /// checked against anything; there is no credential store behind this
    /// engine and login is identity lookup only.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User> {
        self.pause().await;
        let user = {
            let users = self.user_registry().read().await;
            users.iter().find(|user| user.email == email).cloned()
        };
        let user = user.ok_or(Error::InvalidCredentials)?;
        self.bind(user.clone()).await;
        log::info!("User {} logged in", user.email);
        Ok(user)
    }

    /// Create a new non-admin identity and bind it to the session.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
        phone: Option<&str>,
    ) -> Result<User> {
        self.pause().await;
        let user = {
            let mut users = self.user_registry().write().await;
            if users.iter().any(|user| user.email == email) {
                return Err(Error::EmailTaken(email.to_string()));
            }
            let user = User {
                id: new_id(),
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.map(str::to_string),
                is_admin: false,
                preferred_barber_id: None,
            };
            users.push(user.clone());
            user
        };
        self.bind(user.clone()).await;
        log::info!("Registered new user {}", user.email);
        Ok(user)
    }

    /// Unbind the session identity and drop its snapshot.
    pub async fn logout(&self) {
        let previous = self.current_slot().write().await.take();
        if previous.is_some() {
            self.session_store().clear();
            self.publish(ShopEvent::SessionChanged { user: None });
            log::info!("Session closed");
        }
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current_slot().read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_slot().read().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.current_slot()
            .read()
            .await
            .as_ref()
            .is_some_and(|user| user.is_admin)
    }

    async fn bind(&self, user: User) {
        *self.current_slot().write().await = Some(user.clone());
        self.session_store().save(&user);
        self.publish(ShopEvent::SessionChanged { user: Some(user) });
    }
}
