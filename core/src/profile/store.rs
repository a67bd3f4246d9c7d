//! Profile state for the signed-in user.
//!
//! The profile slot never holds `None`: before the first fetch, after a
//! failed fetch and after `clear_profile` it holds
//! [`ProfileResource::empty`].

use super::types::{ProfileAttributes, ProfileForm, ProfileResource, ProfileUpdate};
use crate::client::ApiClient;
use crate::command::{Command, Slot, Ticket, Tickets};
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::transport::Transport;

pub const NO_PROFILE_LOADED: &str = "No profile loaded.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileState {
    pub profile: ProfileResource,
    pub loading: bool,
    pub error: Option<String>,
    pub save_loading: bool,
    pub save_error: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            profile: ProfileResource::empty(),
            loading: false,
            error: None,
            save_loading: false,
            save_error: None,
        }
    }
}

impl ProfileState {
    pub fn has_profile(&self) -> bool {
        !self.profile.is_empty()
    }

    pub fn attributes(&self) -> Option<&ProfileAttributes> {
        self.has_profile().then_some(&self.profile.attributes)
    }
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    state: ProfileState,
    fetch_tickets: Tickets,
    save_tickets: Tickets,
    /// Save ticket of the pending update and the fetch ticket it holds.
    update_claim: Option<(Ticket, Ticket)>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore {
    pub fn new() -> Self {
        Self {
            state: ProfileState::default(),
            fetch_tickets: Tickets::new(Slot::Profile),
            save_tickets: Tickets::new(Slot::ProfileSave),
            update_claim: None,
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn begin_fetch_profile(&mut self, client: &ApiClient) -> Command {
        self.state.loading = true;
        self.state.error = None;
        Command {
            ticket: self.fetch_tickets.issue(),
            request: client.build_get_profile(),
        }
    }

    pub fn finish_fetch_profile(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<&ProfileResource> {
        if !self.fetch_tickets.is_current(ticket) {
            return None;
        }
        self.state.loading = false;
        match response.and_then(|r| client.parse_get_profile(r)) {
            Ok(doc) => {
                self.state.profile = doc.data;
                Some(&self.state.profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed");
                self.state.profile = ProfileResource::empty();
                self.state.error = Some(e.message());
                None
            }
        }
    }

    pub fn fetch_profile<T: Transport + ?Sized>(&mut self, client: &ApiClient, transport: &T) -> Option<&ProfileResource> {
        let Command { ticket, request } = self.begin_fetch_profile(client);
        let response = transport.execute(request);
        self.finish_fetch_profile(client, ticket, response)
    }

    /// Start saving `form` against the loaded profile's id. Returns `None`
    /// without a request when no profile is loaded. A profile fetch still in
    /// flight is discarded.
    pub fn begin_update(&mut self, client: &ApiClient, form: &ProfileForm) -> Option<Command> {
        self.state.save_loading = true;
        self.state.save_error = None;
        let ticket = self.save_tickets.issue();

        let request = if self.state.has_profile() {
            client.build_update_profile(&self.state.profile.id, &ProfileUpdate::from(form))
        } else {
            Err(ApiError::Validation(NO_PROFILE_LOADED.to_string()))
        };
        match request {
            Ok(request) => {
                self.state.loading = false;
                self.update_claim = Some((ticket, self.fetch_tickets.issue()));
                Some(Command { ticket, request })
            }
            Err(e) => {
                self.state.save_loading = false;
                self.save_failed(&e);
                None
            }
        }
    }

    /// Returns the saved profile. It replaces `profile` unless a fetch or
    /// `clear_profile` happened after the update began.
    pub fn finish_update(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<ProfileResource> {
        let parsed = response.and_then(|r| client.parse_update_profile(r));
        let owns_profile = self
            .update_claim
            .is_some_and(|(save, fetch)| save == ticket && self.fetch_tickets.is_current(fetch));
        if !self.save_tickets.is_current(ticket) {
            return parsed.ok().map(|doc| doc.data);
        }
        self.state.save_loading = false;
        self.update_claim = None;
        match parsed {
            Ok(doc) => {
                tracing::info!(id = %doc.data.id, "profile updated");
                if owns_profile {
                    self.state.profile = doc.data.clone();
                }
                Some(doc.data)
            }
            Err(e) => {
                self.save_failed(&e);
                None
            }
        }
    }

    pub fn update<T: Transport + ?Sized>(
        &mut self,
        client: &ApiClient,
        transport: &T,
        form: &ProfileForm,
    ) -> Option<ProfileResource> {
        let Command { ticket, request } = self.begin_update(client, form)?;
        let response = transport.execute(request);
        self.finish_update(client, ticket, response)
    }

    pub fn clear_profile(&mut self) {
        self.fetch_tickets.issue();
        self.state.profile = ProfileResource::empty();
        self.state.error = None;
        self.state.loading = false;
    }

    fn save_failed(&mut self, error: &ApiError) {
        tracing::warn!(error = %error, "profile save failed");
        self.state.save_error = Some(error.message());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpRequest;

    /// Answers every request with one fixed response.
    struct Fixed {
        status: u16,
        body: String,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                calls: Cell::new(0),
            }
        }
    }

    impl Fixed {
        fn reply(&self) -> HttpResponse {
            HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            }
        }
    }

    impl Transport for Fixed {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.set(self.calls.get() + 1);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client() -> ApiClient {
        ApiClient::anonymous(&ClientConfig::new("http://localhost:3000").unwrap())
    }

    const PROFILE: &str = r#"{"data":{"type":"users","id":"3","attributes":{"name":"Ada","title":"Engineer","email":"ada@example.com","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}}}"#;

    fn form() -> ProfileForm {
        ProfileForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn starts_with_empty_sentinel() {
        let store = ProfileStore::new();
        assert!(!store.state().has_profile());
        assert!(store.state().attributes().is_none());
    }

    #[test]
    fn fetch_profile_populates_state() {
        let mut store = ProfileStore::new();
        let loaded = store.fetch_profile(&client(), &Fixed::new(200, PROFILE)).map(|p| p.id.clone());
        assert_eq!(loaded.as_deref(), Some("3"));
        assert!(store.state().has_profile());
        assert_eq!(store.state().attributes().unwrap().title, "Engineer");
        assert!(!store.state().loading);
    }

    #[test]
    fn fetch_failure_resets_to_sentinel() {
        let mut store = ProfileStore::new();
        let c = client();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));
        let failed = store.fetch_profile(&c, &Fixed::new(401, r#"{"errors":[{"title":"Unauthenticated"}]}"#));

        assert!(failed.is_none());
        assert_eq!(store.state().profile, ProfileResource::empty());
        assert_eq!(store.state().error.as_deref(), Some("Unauthenticated"));
        assert!(store.state().save_error.is_none());
    }

    #[test]
    fn update_without_profile_fails_locally() {
        let transport = Fixed::new(200, PROFILE);
        let mut store = ProfileStore::new();
        assert!(store.update(&client(), &transport, &form()).is_none());
        assert_eq!(transport.calls.get(), 0);
        assert_eq!(store.state().save_error.as_deref(), Some(NO_PROFILE_LOADED));
        assert!(!store.state().save_loading);
    }

    #[test]
    fn update_replaces_profile_with_server_copy() {
        let c = client();
        let mut store = ProfileStore::new();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));

        let updated = PROFILE.replace("\"Ada\"", "\"Ada Lovelace\"");
        let name = store
            .update(&c, &Fixed::new(200, &updated), &form())
            .map(|p| p.attributes.name.clone());
        assert_eq!(name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(store.state().profile.attributes.name, "Ada Lovelace");
    }

    #[test]
    fn update_failure_keeps_profile() {
        let c = client();
        let mut store = ProfileStore::new();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));
        let result = store.update(
            &c,
            &Fixed::new(422, r#"{"errors":[{"title":"Invalid","detail":"Email is invalid"}]}"#),
            &form(),
        );
        assert!(result.is_none());
        assert_eq!(store.state().save_error.as_deref(), Some("Email is invalid"));
        assert_eq!(store.state().profile.id, "3");
    }

    #[test]
    fn clear_profile_returns_to_sentinel() {
        let c = client();
        let mut store = ProfileStore::new();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));
        store.clear_profile();
        assert!(!store.state().has_profile());
        assert!(store.state().error.is_none());
    }

    #[test]
    fn update_discards_profile_fetch_in_flight() {
        let c = client();
        let mut store = ProfileStore::new();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));

        let fetch = store.begin_fetch_profile(&c);
        let update = store.begin_update(&c, &form()).unwrap();
        assert!(!store.state().loading);

        let updated = PROFILE.replace("\"Ada\"", "\"Ada Lovelace\"");
        store.finish_update(&c, update.ticket, Ok(Fixed::new(200, &updated).reply()));
        let stale = store.finish_fetch_profile(&c, fetch.ticket, Ok(Fixed::new(200, PROFILE).reply()));

        assert!(stale.is_none());
        assert_eq!(store.state().profile.attributes.name, "Ada Lovelace");
    }

    #[test]
    fn fetch_started_after_update_keeps_its_result() {
        let c = client();
        let mut store = ProfileStore::new();
        store.fetch_profile(&c, &Fixed::new(200, PROFILE));

        let update = store.begin_update(&c, &form()).unwrap();
        let fetch = store.begin_fetch_profile(&c);
        let fresh = PROFILE.replace("\"Ada\"", "\"Ada King\"");
        store.finish_fetch_profile(&c, fetch.ticket, Ok(Fixed::new(200, &fresh).reply()));

        let older = PROFILE.replace("\"Ada\"", "\"Ada Lovelace\"");
        let saved = store.finish_update(&c, update.ticket, Ok(Fixed::new(200, &older).reply()));

        assert_eq!(saved.map(|p| p.attributes.name), Some("Ada Lovelace".to_string()));
        assert_eq!(store.state().profile.attributes.name, "Ada King");
        assert!(!store.state().save_loading);
    }
}
