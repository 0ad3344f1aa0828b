//! Credential operations over any `UserStore`: register and verify.

use tracing::info;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::errors::AppError;
use crate::models::user::{normalize_email, NewUser, User};
use crate::store::UserStore;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Normalized registration input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Registration, AppError> {
    let name = name.map(str::trim).unwrap_or_default();
    let email = email.map(normalize_email).unwrap_or_default();
    let password = password.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "All fields are required (name, email, password)".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Email address is not valid".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(Registration {
        name: name.to_string(),
        email,
        password: password.to_string(),
    })
}

/// Creates the user. A taken email surfaces as `AppError::Conflict`.
pub async fn register<S: UserStore + ?Sized>(
    store: &S,
    registration: Registration,
) -> Result<User, AppError> {
    let password_hash = hash_password_blocking(registration.password).await?;
    let user = store
        .create_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        })
        .await?;
    info!("Registered user {}", user.id);
    Ok(user)
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn verify<S: UserStore + ?Sized>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = store
        .find_user_by_email(&normalize_email(email))
        .await?
        .ok_or_else(invalid)?;

    if verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
        Ok(user)
    } else {
        Err(invalid())
    }
}
