pub mod blog; // Public for OpenAPI annotations
mod dashboard;
mod editor;
mod logout;
pub mod users; // Public for OpenAPI annotations

pub use blog::*;
pub use dashboard::*;
pub use editor::*;
pub use logout::log_out;
pub use users::*;
