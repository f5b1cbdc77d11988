use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use db::models::User;
use lazy_static::lazy_static;
use regex::Regex;
use web::AppState;

pub const USERNAME_RE: &str = r"^[a-z0-9_]+([a-z0-9_.-]+[a-z0-9_]+)?$";
pub const USERNAME_MAX_CHARS: usize = 64;
pub const EMAIL_MAX_CHARS: usize = 200;
pub const FULL_NAME_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 8;

lazy_static! {
    static ref USERNAME: Regex = Regex::new(USERNAME_RE).unwrap(); // Panic safety: hardcoded pattern
}

pub struct Registration {
    pub name: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
}

impl Registration {
    /// First problem with the form, phrased for the sign-up page.
    pub fn problem(&self) -> Option<&'static str> {
        if self.name.len() > USERNAME_MAX_CHARS || !USERNAME.is_match(&self.name) {
            Some("Usernames use lowercase letters, digits, '_', '.' and '-'")
        } else if !self.email.contains('@') {
            Some("Please enter a valid email address")
        } else if self.email.chars().count() > EMAIL_MAX_CHARS {
            Some("Email address is too long")
        } else if self.password.chars().count() < PASSWORD_MIN_CHARS {
            Some("Password must be at least 8 characters")
        } else if self
            .full_name
            .as_ref()
            .is_some_and(|name| name.chars().count() > FULL_NAME_MAX_CHARS)
        {
            Some("Full name is too long")
        } else {
            None
        }
    }
}

pub async fn register(registration: Registration, state: &Arc<AppState>) -> anyhow::Result<User> {
    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await?;

    let password_hash = match password_hash {
        Ok(hash) => hash,
        Err(_) => return Err(anyhow!("password hashing failed")),
    };

    let full_name = registration
        .full_name
        .filter(|name| !name.trim().is_empty());

    User::create(
        registration.name,
        registration.email,
        full_name,
        password_hash,
        &state.db_pool,
    )
    .await
}

/// The user when `password` matches, `None` for an unknown name or a wrong password.
pub async fn verify_credentials(
    name: &str,
    password: String,
    state: &Arc<AppState>,
) -> anyhow::Result<Option<User>> {
    let user = match User::by_name(name, &state.db_pool).await? {
        Some(user) => user,
        None => return Ok(None),
    };

    let hash = user.password_encrypted.clone();
    let matches = tokio::task::spawn_blocking(move || match PasswordHash::new(&hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    })
    .await?;

    Ok(matches.then_some(user))
}

#[cfg(test)]
mod tests {
    use super::Registration;

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: name.to_string(),
            email: email.to_string(),
            full_name: None,
            password: password.to_string(),
        }
    }

    #[test]
    fn registration_checks() {
        assert_eq!(registration("kage", "kage@example.com", "hunter2hunter2").problem(), None);
        assert_eq!(registration("kage.t-1", "kage@example.com", "hunter2hunter2").problem(), None);

        assert!(registration("Kage", "kage@example.com", "hunter2hunter2").problem().is_some());
        assert!(registration("", "kage@example.com", "hunter2hunter2").problem().is_some());
        assert!(registration("kage.", "kage@example.com", "hunter2hunter2").problem().is_some());
        assert!(registration("kage", "example.com", "hunter2hunter2").problem().is_some());
        assert_eq!(
            registration("kage", "kage@example.com", "short").problem(),
            Some("Password must be at least 8 characters")
        );

        let long_email = format!("{}@example.com", "k".repeat(190));
        assert_eq!(
            registration("kage", &long_email, "hunter2hunter2").problem(),
            Some("Email address is too long")
        );
        let fits = format!("{}@example.com", "k".repeat(188));
        assert_eq!(registration("kage", &fits, "hunter2hunter2").problem(), None);
    }
}
