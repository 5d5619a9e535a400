mod blog_post;
mod contact_request;
mod profile;
mod roles;
pub mod seo;
mod slug;

pub use blog_post::{
    BlogPost, BlogPostStatus, BlogPostSummary, ERROR_MISSING_REQUIRED_FIELDS, PostInput,
    PostValidationError, ValidPost,
};
pub use contact_request::{ContactRequest, validation_messages};
pub use profile::{PublicProfile, UserOverview};
pub use roles::{
    Capability, CapabilitySet, ERROR_SELF_DEMOTION, Role, SelfDemotionError, capabilities_for,
    ensure_not_self_demotion,
};
pub use slug::{Slug, generate_slug, is_url_safe};
