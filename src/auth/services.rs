use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::RegisterRequest,
    password::{hash_password, verify_dummy, verify_password},
    repo::{UserRepo, UserRepoError},
    repo_types::{NewUser, User},
};
use crate::error::AppError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN_CHARS: usize = 8;
// argon2 has no input cap, but clients built against bcrypt-era rules expect one
const PASSWORD_MAX_BYTES: usize = 72;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub(crate) fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.chars().count();
    if len < USERNAME_MIN {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".into(),
        ));
    }
    if len > USERNAME_MAX {
        return Err(AppError::Validation(
            "Username must be at most 50 characters long".into(),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, and underscores".into(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(AppError::Validation(
            "Password cannot exceed 72 UTF-8 bytes".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".into(),
        ));
    }
    Ok(())
}

/// Validates and stores a new account.
pub async fn register(users: &dyn UserRepo, mut payload: RegisterRequest) -> Result<User, AppError> {
    payload.email = payload.email.trim().to_lowercase();

    validate_username(&payload.username)?;
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email address".into()));
    }
    validate_password(&payload.password)?;

    if users.find_by_username(&payload.username).await?.is_some() {
        warn!(username = %payload.username, "username already registered");
        return Err(AppError::Conflict("Username already registered".into()));
    }
    if users.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = users
        .create(NewUser {
            username: &payload.username,
            email: &payload.email,
            password_hash: &hash,
        })
        .await
        .map_err(|e| match e {
            UserRepoError::Duplicate(field) => {
                AppError::Conflict(format!("{} already registered", field))
            }
            UserRepoError::Other(e) => AppError::Internal(e),
        })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Resolves login credentials to an active user.
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn authenticate(users: &dyn UserRepo, username: &str, password: &str) -> Result<User, AppError> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    let bad_credentials = || AppError::Unauthorized("Incorrect username or password".into());

    let Some(user) = users.find_by_username(username).await? else {
        verify_dummy(password);
        warn!(username = %username, "login unknown username");
        return Err(bad_credentials());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(bad_credentials());
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login by inactive user");
        return Err(AppError::InactiveUser);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("john@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john example@x.com"));
        assert!(!is_valid_email("not-an-email"));
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("john_doe42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username("john-doe").is_err());
        assert!(validate_username("john doe").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("Short1A").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        let long = format!("Aa1{}", "é".repeat(35));
        assert!(long.len() > 72);
        assert!(validate_password(&long).is_err());
    }

    #[tokio::test]
    async fn register_normalizes_email_and_hashes_password() {
        let store = MemoryStore::default();
        let user = register(&store, request("john_doe", "  John@Example.COM ", "SecurePass123"))
            .await
            .expect("register");
        assert_eq!(user.email, "john@example.com");
        assert_ne!(user.password_hash, "SecurePass123");
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let store = MemoryStore::default();
        register(&store, request("john_doe", "john@example.com", "SecurePass123"))
            .await
            .unwrap();

        let err = register(&store, request("john_doe", "other@example.com", "SecurePass123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m.contains("Username")));

        let err = register(&store, request("jane_doe", "JOHN@example.com", "SecurePass123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m.contains("Email")));
    }

    #[tokio::test]
    async fn authenticate_checks_credentials() {
        let store = MemoryStore::default();
        let user = register(&store, request("john_doe", "john@example.com", "SecurePass123"))
            .await
            .unwrap();

        let ok = authenticate(&store, "john_doe", "SecurePass123").await.unwrap();
        assert_eq!(ok.id, user.id);

        let wrong = authenticate(&store, "john_doe", "WrongPass123").await.unwrap_err();
        let unknown = authenticate(&store, "nobody", "SecurePass123").await.unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::Unauthorized(_)));

        let empty = authenticate(&store, "", "").await.unwrap_err();
        assert!(matches!(empty, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_refuses_inactive_users() {
        let store = MemoryStore::default();
        let user = register(&store, request("sleepy", "sleepy@example.com", "SecurePass123"))
            .await
            .unwrap();
        store.set_active(user.id, false).await;

        let err = authenticate(&store, "sleepy", "SecurePass123").await.unwrap_err();
        assert!(matches!(err, AppError::InactiveUser));
    }
}
