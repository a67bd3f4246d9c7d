//! Postings endpoints on [`ApiClient`].
//!
//! Each operation is a `build_*` method producing an `HttpRequest` and a
//! `parse_*` method consuming the `HttpResponse`. Errors are never caught
//! here; they reach the caller as [`ApiError`].

use super::query::ListQuery;
use super::types::{PostingCreate, PostingShowResponse, PostingUpdate, PostingsListResponse, POSTINGS_TYPE};
use crate::client::{encode, ApiClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::jsonapi::{CreateDocument, UpdateDocument};

const POSTINGS_PATH: [&str; 3] = ["api", "v1", "postings"];

/// Backend parameters for a list request.
///
/// Page number and size are always sent; sort and filters only when present.
pub fn list_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("page[number]".to_string(), query.page.to_string()),
        ("page[size]".to_string(), query.size.to_string()),
    ];
    if let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) {
        params.push(("sort".to_string(), sort.to_string()));
    }
    for (key, value) in query.filters.iter() {
        params.push((format!("filter[{}]", key.as_str()), value.to_string()));
    }
    params
}

impl ApiClient {
    pub fn build_list_postings(&self, query: &ListQuery) -> HttpRequest {
        self.request(HttpMethod::Get, &POSTINGS_PATH, &list_params(query), None)
    }

    pub fn build_get_posting(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &posting_path(id), &[], None)
    }

    pub fn build_create_posting(&self, attrs: &PostingCreate) -> Result<HttpRequest, ApiError> {
        let body = encode(&CreateDocument::new(POSTINGS_TYPE, attrs))?;
        Ok(self.request(HttpMethod::Post, &POSTINGS_PATH, &[], Some(body)))
    }

    pub fn build_update_posting(&self, id: &str, attrs: &PostingUpdate) -> Result<HttpRequest, ApiError> {
        let body = encode(&UpdateDocument::new(POSTINGS_TYPE, id, attrs))?;
        Ok(self.request(HttpMethod::Patch, &posting_path(id), &[], Some(body)))
    }

    pub fn parse_list_postings(&self, response: HttpResponse) -> Result<PostingsListResponse, ApiError> {
        self.decode(response)
    }

    pub fn parse_get_posting(&self, response: HttpResponse) -> Result<PostingShowResponse, ApiError> {
        self.decode(response)
    }

    pub fn parse_create_posting(&self, response: HttpResponse) -> Result<PostingShowResponse, ApiError> {
        self.decode(response)
    }

    pub fn parse_update_posting(&self, response: HttpResponse) -> Result<PostingShowResponse, ApiError> {
        self.decode(response)
    }
}

fn posting_path(id: &str) -> [&str; 4] {
    let [api, version, postings] = POSTINGS_PATH;
    [api, version, postings, id]
}
