use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{check_envelope, json_api, now, ApiError, AppState, Document, Envelope, Resource};

const USERS: &str = "users";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub name: String,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug)]
pub struct Profile {
    pub id: String,
    pub attributes: ProfileAttributes,
}

impl Profile {
    /// The single signed-in user every bearer token maps to.
    pub fn demo() -> Self {
        let timestamp = now();
        Self {
            id: "1".to_string(),
            attributes: ProfileAttributes {
                name: "Demo User".to_string(),
                email: "demo@example.com".to_string(),
                created_at: timestamp.clone(),
                updated_at: timestamp,
                ..Default::default()
            },
        }
    }

    fn resource(&self) -> Resource<ProfileAttributes> {
        Resource {
            kind: USERS.to_string(),
            id: self.id.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub async fn get_me(State(state): State<AppState>) -> Response {
    let store = state.db.read().await;
    json_api(StatusCode::OK, Document::<_, ()> {
        data: store.profile.resource(),
        meta: None,
    })
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Envelope<ProfileInput>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(envelope) = body?;
    check_envelope(&envelope.data, USERS, Some(&id))?;
    let input = envelope.data.attributes;

    let mut store = state.db.write().await;
    if store.profile.id != id {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "Forbidden",
            "You may only update your own profile.",
        ));
    }

    let mut next = store.profile.attributes.clone();
    if let Some(name) = input.name {
        if name.trim().is_empty() {
            return Err(ApiError::invalid("Name required"));
        }
        next.name = name;
    }
    if let Some(email) = input.email {
        if !email.contains('@') {
            return Err(ApiError::invalid("Email is invalid"));
        }
        next.email = email;
    }
    let optional = [
        (input.title, &mut next.title),
        (input.address, &mut next.address),
        (input.city, &mut next.city),
        (input.state, &mut next.state),
        (input.country, &mut next.country),
        (input.zip, &mut next.zip),
        (input.phone, &mut next.phone),
    ];
    for (value, slot) in optional {
        if let Some(value) = value {
            *slot = value;
        }
    }
    next.updated_at = now();
    store.profile.attributes = next;
    tracing::info!(id = %id, "profile updated");

    Ok(json_api(StatusCode::OK, Document::<_, ()> {
        data: store.profile.resource(),
        meta: None,
    }))
}
