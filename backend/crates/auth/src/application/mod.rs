//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod config;
pub mod login;
pub mod manage_users;
pub mod refresh_token;
pub mod register;
pub mod tokens;

// Re-exports
pub use authenticate::{AuthenticateUseCase, Identity};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginUseCase};
pub use manage_users::{CreateUserInput, ManageUsersUseCase, UpdateUserInput, UserDetail};
pub use refresh_token::RefreshTokenUseCase;
pub use register::{AuthOutput, RegisterInput, RegisterUseCase};
pub use tokens::{AccessClaims, RefreshClaims, TokenPair};
