use std::sync::Mutex;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

/// Source of the signed-in user.
pub trait SessionProvider {
    fn current_user(&self) -> Option<SessionUser>;
    fn sign_out(&self);
}

/// Session taken from `DASHBOARD_USER_ID`, `DASHBOARD_USER_EMAIL` and `DASHBOARD_USER_ADMIN`.
pub struct EnvSession {
    user: Mutex<Option<SessionUser>>,
}

impl EnvSession {
    pub fn load() -> anyhow::Result<Self> {
        let user = match std::env::var("DASHBOARD_USER_ID") {
            Ok(id) => Some(parse_user(
                &id,
                std::env::var("DASHBOARD_USER_EMAIL").ok(),
                std::env::var("DASHBOARD_USER_ADMIN").ok().as_deref(),
            )?),
            Err(_) => {
                warn!("DASHBOARD_USER_ID not set, running without a signed-in user");
                None
            }
        };
        Ok(Self::with_user(user))
    }

    pub fn with_user(user: Option<SessionUser>) -> Self {
        EnvSession {
            user: Mutex::new(user),
        }
    }
}

fn parse_user(id: &str, email: Option<String>, admin: Option<&str>) -> anyhow::Result<SessionUser> {
    let id = Uuid::parse_str(id.trim()).context("DASHBOARD_USER_ID must be a UUID")?;
    let is_admin = matches!(
        admin.map(|value| value.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    );
    Ok(SessionUser {
        id,
        email: email.unwrap_or_default(),
        is_admin,
    })
}

impl SessionProvider for EnvSession {
    fn current_user(&self) -> Option<SessionUser> {
        match self.user.lock() {
            Ok(user) => user.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn sign_out(&self) {
        let mut user = match self.user.lock() {
            Ok(user) => user,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = user.take() {
            info!(email = %previous.email, "signed out");
        }
    }
}

pub fn is_admin(session: &impl SessionProvider) -> bool {
    session.current_user().is_some_and(|user| user.is_admin)
}
