use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub const ERROR_SELF_DEMOTION: &str = "Sie können sich nicht selbst als Admin entfernen.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            other => Err(format!("{} is not a known role.", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManagePosts,
    ManageUsers,
    ExportData,
}

/// What a signed-in user may do. Derived once per session from their roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Capability::ManagePosts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn capabilities_for(roles: &[Role]) -> CapabilitySet {
    let mut capabilities = BTreeSet::new();
    for role in roles {
        match role {
            Role::Admin => {
                capabilities.insert(Capability::ManagePosts);
                capabilities.insert(Capability::ManageUsers);
                capabilities.insert(Capability::ExportData);
            }
        }
    }
    CapabilitySet(capabilities)
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{}", ERROR_SELF_DEMOTION)]
pub struct SelfDemotionError;

/// Must be checked before the role table is touched.
pub fn ensure_not_self_demotion(
    current_user: Uuid,
    target_user: Uuid,
) -> Result<(), SelfDemotionError> {
    if current_user == target_user {
        Err(SelfDemotionError)
    } else {
        Ok(())
    }
}
