//! Profile DTOs.

use serde::{Deserialize, Serialize};

use crate::jsonapi::{Document, Resource};

/// JSON:API resource type for the profile (the backend's user record).
pub const PROFILE_TYPE: &str = "users";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

pub type ProfileResource = Resource<ProfileAttributes>;
pub type ProfileViewResponse = Document<ProfileResource>;

impl ProfileResource {
    /// Sentinel for "no profile loaded": empty id, blank fields.
    pub fn empty() -> Self {
        Resource {
            kind: PROFILE_TYPE.to_string(),
            id: String::new(),
            attributes: ProfileAttributes::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Editable profile; `name` and `email` are required, the rest optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: String,
}

impl From<&ProfileAttributes> for ProfileForm {
    fn from(a: &ProfileAttributes) -> Self {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        Self {
            name: a.name.clone(),
            title: optional(&a.title),
            address: optional(&a.address),
            city: optional(&a.city),
            state: optional(&a.state),
            country: optional(&a.country),
            zip: optional(&a.zip),
            phone: optional(&a.phone),
            email: a.email.clone(),
        }
    }
}

/// Partial profile update as sent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Every form field is sent; a blank optional goes out as `""` so the
/// server clears it.
impl From<&ProfileForm> for ProfileUpdate {
    fn from(f: &ProfileForm) -> Self {
        let field = |v: &Option<String>| Some(v.clone().unwrap_or_default());
        Self {
            name: Some(f.name.clone()),
            title: field(&f.title),
            address: field(&f.address),
            city: field(&f.city),
            state: field(&f.state),
            country: field(&f.country),
            zip: field(&f.zip),
            phone: field(&f.phone),
            email: Some(f.email.clone()),
        }
    }
}
