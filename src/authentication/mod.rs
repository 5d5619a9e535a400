mod middleware;
mod password;
mod password_validation;
pub mod roles;

pub use middleware::{UserId, require_admin, require_auth};
pub use password::{
    AuthError, CreateUserError, Credentials, NewAccount, check_users_exist, create_initial_admin,
    normalise_email, sign_up, validate_credentials,
};
pub use password_validation::{
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PasswordValidationError, validate_password_length,
};
