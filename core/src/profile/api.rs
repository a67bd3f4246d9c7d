//! Profile endpoints on [`ApiClient`].

use super::types::{ProfileUpdate, ProfileViewResponse, PROFILE_TYPE};
use crate::client::{encode, ApiClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::jsonapi::UpdateDocument;

impl ApiClient {
    /// `GET /api/v1/me`
    pub fn build_get_profile(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &["api", "v1", "me"], &[], None)
    }

    /// `PATCH /api/v1/users/{id}`
    pub fn build_update_profile(&self, id: &str, attrs: &ProfileUpdate) -> Result<HttpRequest, ApiError> {
        let body = encode(&UpdateDocument::new(PROFILE_TYPE, id, attrs))?;
        Ok(self.request(HttpMethod::Patch, &["api", "v1", "users", id], &[], Some(body)))
    }

    pub fn parse_get_profile(&self, response: HttpResponse) -> Result<ProfileViewResponse, ApiError> {
        self.decode(response)
    }

    pub fn parse_update_profile(&self, response: HttpResponse) -> Result<ProfileViewResponse, ApiError> {
        self.decode(response)
    }
}
