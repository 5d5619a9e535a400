//! Messages and paths shared across route handlers

/// Generic error message for internal server errors
pub const ERROR_SOMETHING_WENT_WRONG: &str = "Etwas ist schiefgelaufen. Bitte versuchen Sie es später erneut.";

/// Returned for a failed sign-in, whatever the cause
pub const ERROR_AUTHENTICATION_FAILED: &str = "Invalid login credentials";

/// Error message for missing authentication
pub const ERROR_AUTHENTICATION_REQUIRED: &str = "Bitte melden Sie sich an.";

/// Error message for signed-in users without the admin role
pub const ERROR_ADMIN_REQUIRED: &str = "Sie haben keine Berechtigung für den Admin-Bereich.";

pub const ERROR_POST_NOT_FOUND: &str = "Beitrag nicht gefunden.";

pub const ERROR_RELAY_FAILED: &str =
    "Ihre Anfrage konnte nicht gesendet werden. Bitte versuchen Sie es später erneut.";

pub const ERROR_SIGN_OUT_FAILED: &str =
    "Abmelden fehlgeschlagen. Bitte versuchen Sie es erneut.";

pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";
pub const BLOG_PATH: &str = "/blog";
