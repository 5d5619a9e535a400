use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parts inquiry from the marketing page. Field names match the relay form.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Bitte geben Sie Ihren Vornamen an."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Bitte geben Sie Ihren Nachnamen an."))]
    pub last_name: String,
    #[validate(email(message = "Bitte geben Sie eine gültige E-Mail-Adresse an."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "Die Telefonnummer ist zu lang."))]
    pub phone: String,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Bitte beschreiben Sie das gewünschte Teil."
    ))]
    pub desired_part: String,
}

impl ContactRequest {
    /// Trims all fields, then validates.
    pub fn parse(self) -> Result<Self, validator::ValidationErrors> {
        let request = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            desired_part: self.desired_part.trim().to_string(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Flattens validator output into the user-facing messages, sorted by field.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect()
}
