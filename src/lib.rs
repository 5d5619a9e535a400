pub mod api_doc;
pub mod authentication;
pub mod autosave;
pub mod configuration;
pub mod contact_relay;
pub mod csv_export;
pub mod domain;
pub mod flash_messages;
pub mod rich_text;
pub mod routes;
pub mod session_state;
pub mod sitemap;
pub mod startup;
pub mod telemetry;
pub mod uploads;
