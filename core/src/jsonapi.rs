//! JSON:API document envelopes shared by every resource module.
//!
//! Only the members this client reads or writes are modelled: `data`,
//! `meta`, `links`, `jsonapi` on responses, `data.{type,id,attributes}` on
//! requests and `errors[].{title,detail}` on failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The `jsonapi` member of a top-level document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiVersion {
    pub version: String,
}

/// A resource object with typed attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: A,
}

/// A top-level response document. `D` is a single resource or a `Vec` of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<D, M = serde_json::Value> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiVersion>,
    pub data: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

/// `{ "data": { "type", "attributes" } }` sent on create.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDocument<'a, A> {
    pub data: NewResource<'a, A>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewResource<'a, A> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub attributes: &'a A,
}

/// `{ "data": { "type", "id", "attributes" } }` sent on update.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateDocument<'a, A> {
    pub data: ResourceChanges<'a, A>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceChanges<'a, A> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub id: &'a str,
    pub attributes: &'a A,
}

impl<'a, A> CreateDocument<'a, A> {
    pub fn new(kind: &'a str, attributes: &'a A) -> Self {
        Self {
            data: NewResource { kind, attributes },
        }
    }
}

impl<'a, A> UpdateDocument<'a, A> {
    pub fn new(kind: &'a str, id: &'a str, attributes: &'a A) -> Self {
        Self {
            data: ResourceChanges {
                kind,
                id,
                attributes,
            },
        }
    }
}

/// One entry of a JSON:API `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorObject {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            detail: Some(detail.into()),
        }
    }
}

/// Error document body. `errors` stays `None` when the server sent JSON
/// without the member, so callers can tell it apart from an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDocument {
    #[serde(default)]
    pub errors: Option<Vec<ErrorObject>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_document_has_no_id() {
        let attrs = serde_json::json!({"title": "Engineer"});
        let doc = CreateDocument::new("postings", &attrs);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["data"]["type"], "postings");
        assert_eq!(json["data"]["attributes"]["title"], "Engineer");
        assert!(json["data"].get("id").is_none());
    }

    #[test]
    fn update_document_carries_id() {
        let attrs = serde_json::json!({});
        let doc = UpdateDocument::new("users", "7", &attrs);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["data"]["id"], "7");
        assert_eq!(json["data"]["type"], "users");
    }

    #[test]
    fn document_optional_members_default_to_none() {
        let doc: Document<Vec<Resource<serde_json::Value>>> =
            serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(doc.data.is_empty());
        assert!(doc.meta.is_none());
        assert!(doc.links.is_none());
        assert!(doc.jsonapi.is_none());
    }

    #[test]
    fn error_document_distinguishes_missing_errors() {
        let missing: ErrorDocument = serde_json::from_str(r#"{"message":"boom"}"#).unwrap();
        assert!(missing.errors.is_none());

        let empty: ErrorDocument = serde_json::from_str(r#"{"errors":[]}"#).unwrap();
        assert_eq!(empty.errors, Some(Vec::new()));
    }
}
