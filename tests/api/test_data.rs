//! Shared test data constants to avoid magic strings across integration tests

pub const MISSING_FIELDS_ERROR: &str = "Bitte füllen Sie alle Pflichtfelder aus.";
pub const SELF_DEMOTION_ERROR: &str = "Sie können sich nicht selbst als Admin entfernen.";
pub const NOTHING_TO_EXPORT_ERROR: &str = "Es gibt keine Beiträge zum Exportieren.";
pub const INVALID_CREDENTIALS_ERROR: &str = "Invalid login credentials";

/// Smallest valid PNG: a single transparent pixel.
pub const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];
