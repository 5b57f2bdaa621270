//! API DTOs (Data Transfer Objects)
//!
//! Request bodies arrive loosely typed and are validated field by field, so a
//! single 400 response lists every problem at once.

use kernel::rating::AverageRating;
use kernel::validation::ValidationErrors;
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::application::{
    ChangePasswordInput, CreateUserInput, Identity, LoginInput, RegisterInput, TokenPair,
    UpdateUserInput, UserDetail,
};
use crate::domain::entity::user::{User, UserFilter, UserSummary};
use crate::domain::value_object::{
    address::Address, email::Email, user_name::UserName, user_role::UserRole,
};

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// Optional field that is validated only when present and non-empty
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<RegisterInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", UserName::new(text(&self.name)));
        let email = errors.check("email", Email::new(text(&self.email)));
        let password = errors.check(
            "password",
            ClearTextPassword::new(self.password.unwrap_or_default()),
        );
        let address = errors.check("address", Address::new(text(&self.address)));

        match (name, email, password, address) {
            (Some(name), Some(email), Some(password), Some(address)) if errors.is_empty() => {
                Ok(RegisterInput {
                    name,
                    email,
                    password,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = errors.check("email", Email::new(text(&self.email)));
        let password = errors.check(
            "password",
            ClearTextPassword::for_verification(self.password.unwrap_or_default()),
        );

        match (email, password) {
            (Some(email), Some(password)) => Ok(LoginInput { email, password }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Password change / refresh
// ============================================================================

/// Password change request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    pub fn validate(self, identity: &Identity) -> Result<ChangePasswordInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let current_password = errors.check(
            "currentPassword",
            ClearTextPassword::for_verification(self.current_password.unwrap_or_default())
                .map_err(|_| "Current password is required"),
        );
        let new_password = errors.check(
            "newPassword",
            ClearTextPassword::new(self.new_password.unwrap_or_default()),
        );

        match (current_password, new_password) {
            (Some(current_password), Some(new_password)) => Ok(ChangePasswordInput {
                user_id: identity.id,
                current_password,
                new_password,
            }),
            _ => Err(errors),
        }
    }
}

/// Refresh request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

// ============================================================================
// Admin user management
// ============================================================================

/// Admin create-user request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<CreateUserInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check("name", UserName::new(text(&self.name)));
        let email = errors.check("email", Email::new(text(&self.email)));
        let password = errors.check(
            "password",
            ClearTextPassword::new(self.password.unwrap_or_default()),
        );
        let address = errors.check("address", Address::new(text(&self.address)));
        let role = errors.check("role", text(&self.role).parse::<UserRole>());

        match (name, email, password, address, role) {
            (Some(name), Some(email), Some(password), Some(address), Some(role))
                if errors.is_empty() =>
            {
                Ok(CreateUserInput {
                    name,
                    email,
                    password,
                    address,
                    role,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Admin update-user request; empty fields are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UpdateUserInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let input = UpdateUserInput {
            name: errors.check_optional("name", supplied(&self.name).map(UserName::new)),
            email: errors.check_optional("email", supplied(&self.email).map(Email::new)),
            address: errors.check_optional("address", supplied(&self.address).map(Address::new)),
            role: errors.check_optional("role", supplied(&self.role).map(str::parse::<UserRole>)),
        };

        errors.into_result()?;
        Ok(input)
    }
}

/// `GET /api/users` filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<String>,
}

impl UserListQuery {
    pub fn validate(self) -> Result<UserFilter, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let role = errors.check_optional("role", supplied(&self.role).map(str::parse::<UserRole>));
        errors.into_result()?;

        Ok(UserFilter {
            name: self.name.filter(|v| !v.is_empty()),
            email: self.email.filter(|v| !v.is_empty()),
            address: self.address.filter(|v| !v.is_empty()),
            role,
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Public user shape
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email.into_db(),
            address: user.address,
            role: user.role,
        }
    }
}

/// Register / login payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token: pair.token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Admin listing row; `ranking` is null for anyone but store owners
#[derive(Debug, Clone, Serialize)]
pub struct UserListItem {
    #[serde(flatten)]
    pub user: UserResponse,
    pub ranking: Option<AverageRating>,
}

impl From<UserSummary> for UserListItem {
    fn from(summary: UserSummary) -> Self {
        Self {
            user: summary.user.into(),
            ranking: summary.ranking,
        }
    }
}

/// Admin detail; store owners carry their store's `rating`
#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<AverageRating>,
}

impl From<UserDetail> for UserDetailResponse {
    fn from(detail: UserDetail) -> Self {
        Self {
            user: detail.user.into(),
            rating: detail.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            address: None,
        }
    }

    #[test]
    fn test_register_reports_every_field() {
        let errors = register("short", "nope", "weak").validate().unwrap_err();
        let fields: Vec<_> = errors.into_inner().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["name", "email", "password"]);
    }

    #[test]
    fn test_register_normalises_email() {
        let input = register("A Perfectly Valid Full Name", "Alice@Example.COM", "Secret#123")
            .validate()
            .unwrap();
        assert_eq!(input.email.as_str(), "alice@example.com");
        assert_eq!(input.address.as_str(), "");
    }

    #[test]
    fn test_login_requires_password() {
        let errors = LoginRequest {
            email: Some("alice@example.com".into()),
            password: Some(String::new()),
        }
        .validate()
        .unwrap_err()
        .into_inner();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Password is required");
    }

    #[test]
    fn test_create_user_rejects_unknown_role() {
        let errors = CreateUserRequest {
            name: Some("A Perfectly Valid Full Name".into()),
            email: Some("bob@example.com".into()),
            password: Some("Secret#123".into()),
            address: Some("1 Main Street".into()),
            role: Some("SUPERUSER".into()),
        }
        .validate()
        .unwrap_err()
        .into_inner();
        assert_eq!(errors[0].field, "role");
        assert_eq!(errors[0].message, "Role must be ADMIN, USER, or STORE_OWNER");
    }

    #[test]
    fn test_update_ignores_empty_fields() {
        let input = UpdateUserRequest {
            name: Some(String::new()),
            role: Some("STORE_OWNER".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(input.name.is_none());
        assert_eq!(input.role, Some(UserRole::StoreOwner));
    }
}
