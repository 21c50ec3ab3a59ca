//! Input validation for room and user identifiers
//!
//! Each violated constraint has its own error so the API layer can tell the
//! client exactly what to fix.

use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Canonical validation limits
// ============================================================================

/// Maximum room id length (bytes)
pub const ROOM_ID_MAX: usize = 32;
/// Maximum username length (bytes)
pub const USERNAME_MAX: usize = 32;
/// Maximum length for both room and user passwords (bytes)
pub const PASSWORD_MAX: usize = 32;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap()
});

/// Validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty room id")]
    EmptyRoomId,

    #[error("room id too long")]
    RoomIdTooLong,

    #[error("room id has invalid char")]
    RoomIdHasInvalidChar,

    #[error("empty password")]
    EmptyPassword,

    #[error("password too long")]
    PasswordTooLong,

    #[error("empty username")]
    EmptyUsername,

    #[error("username too long")]
    UsernameTooLong,

    #[error("username has invalid char")]
    UsernameHasInvalidChar,
}

/// Validation result
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Letters, digits, underscore and hyphen only
#[must_use]
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

pub fn validate_room_id(room_id: &str) -> ValidationResult<()> {
    if room_id.is_empty() {
        return Err(ValidationError::EmptyRoomId);
    }
    if room_id.len() > ROOM_ID_MAX {
        return Err(ValidationError::RoomIdTooLong);
    }
    if !is_identifier(room_id) {
        return Err(ValidationError::RoomIdHasInvalidChar);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if username.len() > USERNAME_MAX {
        return Err(ValidationError::UsernameTooLong);
    }
    if !is_identifier(username) {
        return Err(ValidationError::UsernameHasInvalidChar);
    }
    Ok(())
}

/// Room passwords are optional; an empty one means "no password".
pub fn validate_room_password(password: &str) -> ValidationResult<()> {
    if password.len() > PASSWORD_MAX {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

pub fn validate_user_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.len() > PASSWORD_MAX {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_validation() {
        assert!(validate_room_id("movie_night-01").is_ok());
        assert_eq!(validate_room_id(""), Err(ValidationError::EmptyRoomId));
        assert_eq!(
            validate_room_id(&"a".repeat(ROOM_ID_MAX + 1)),
            Err(ValidationError::RoomIdTooLong)
        );
        assert!(validate_room_id(&"a".repeat(ROOM_ID_MAX)).is_ok());
        assert_eq!(
            validate_room_id("movie night"),
            Err(ValidationError::RoomIdHasInvalidChar)
        );
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice_01").is_ok());
        assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
        assert_eq!(
            validate_username(&"b".repeat(33)),
            Err(ValidationError::UsernameTooLong)
        );
        assert_eq!(
            validate_username("alice!"),
            Err(ValidationError::UsernameHasInvalidChar)
        );
    }

    #[test]
    fn test_non_ascii_is_invalid_char() {
        assert_eq!(
            validate_username("émile"),
            Err(ValidationError::UsernameHasInvalidChar)
        );
        assert_eq!(
            validate_room_id("房间"),
            Err(ValidationError::RoomIdHasInvalidChar)
        );
    }

    #[test]
    fn test_length_is_checked_before_charset() {
        // Over-long and invalid: length wins
        assert_eq!(
            validate_room_id(&"!".repeat(40)),
            Err(ValidationError::RoomIdTooLong)
        );
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_room_password("").is_ok());
        assert_eq!(
            validate_room_password(&"p".repeat(33)),
            Err(ValidationError::PasswordTooLong)
        );
        assert_eq!(validate_user_password(""), Err(ValidationError::EmptyPassword));
        assert!(validate_user_password("hunter2").is_ok());
        assert_eq!(
            validate_user_password(&"p".repeat(33)),
            Err(ValidationError::PasswordTooLong)
        );
    }
}
