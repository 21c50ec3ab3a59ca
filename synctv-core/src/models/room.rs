use serde::{Deserialize, Serialize};

use crate::validation::{
    validate_room_id, validate_room_password, validate_user_password, validate_username,
    ValidationError, ValidationResult,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoomRequest {
    pub room_id: String,
    pub password: String,
    pub username: String,
    pub user_password: String,
    pub hidden: bool,
}

impl CreateRoomRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_room_id(&self.room_id)?;
        validate_room_password(&self.password)?;
        validate_username(&self.username)?;
        validate_user_password(&self.user_password)
    }
}

/// Joining only checks presence; the credentials are verified by the room.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRoomRequest {
    pub room_id: String,
    pub password: String,
    pub username: String,
    pub user_password: String,
}

impl LoginRoomRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        if self.room_id.is_empty() {
            return Err(ValidationError::EmptyRoomId);
        }
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.user_password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetRoomPasswordRequest {
    pub password: String,
}

impl SetRoomPasswordRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_room_password(&self.password)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsernameRequest {
    pub username: String,
}

impl UsernameRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_username(&self.username)
    }
}
