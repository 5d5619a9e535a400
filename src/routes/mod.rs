pub mod admin;
pub mod auth;
pub mod blog;
pub mod constants;
pub mod health_check; // Public for OpenAPI annotations
pub mod initial_admin; // Public for OpenAPI annotations
pub mod login;
pub mod site;
pub mod utils;

pub use admin::*;
pub use auth::*;
pub use blog::*;
pub use health_check::*;
pub use initial_admin::*;
pub use login::{login, login_form};
pub use site::*;
