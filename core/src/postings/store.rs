//! Postings state: the list page, the record being viewed, and saves.
//!
//! # Design
//! Three independent slots, each with its own loading/error pair and ticket
//! counter: the list, the current record, and create/update. A failing
//! detail fetch never touches list state and vice versa. Actions never
//! return errors; failures are reduced to a display string with
//! [`ApiError::message`] and stored on the slot's error field.

use super::api;
use super::form::PostingForm;
use super::query::ListQuery;
use super::types::{PageMeta, PostingAttributes, PostingResource, PostingUpdate, PostingsListMeta};
use crate::client::ApiClient;
use crate::command::{Command, Slot, Ticket, Tickets};
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::transport::Transport;

/// Observable postings state, read by the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingsState {
    pub items: Vec<PostingResource>,
    pub is_loading: bool,
    pub error: Option<String>,

    /// Requested page, size, sort and filters; page and size are realigned
    /// with the server after every successful list fetch.
    pub query: ListQuery,
    pub meta: Option<PostingsListMeta>,

    pub current: Option<PostingResource>,
    pub current_loading: bool,
    pub current_error: Option<String>,

    pub save_loading: bool,
    pub save_error: Option<String>,
}

impl Default for PostingsState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
            query: ListQuery::default(),
            meta: None,
            current: None,
            current_loading: false,
            current_error: None,
            save_loading: false,
            save_error: None,
        }
    }
}

impl PostingsState {
    pub fn page_number(&self) -> u32 {
        self.query.page
    }

    pub fn page_size(&self) -> u32 {
        self.query.size
    }

    pub fn page(&self) -> Option<&PageMeta> {
        self.meta.as_ref().and_then(|m| m.page.as_ref())
    }

    pub fn has_prev(&self) -> bool {
        self.page().is_some_and(|p| p.current_page > 1)
    }

    pub fn has_next(&self) -> bool {
        self.page().is_some_and(|p| p.current_page < p.last_page)
    }

    /// `"{from}–{to} of {total}"`, or empty before the first fetch.
    pub fn range_label(&self) -> String {
        match self.page() {
            Some(p) => format!("{}–{} of {}", p.from.unwrap_or(0), p.to.unwrap_or(0), p.total),
            None => String::new(),
        }
    }

    pub fn current_id(&self) -> &str {
        self.current.as_ref().map_or("", |c| c.id.as_str())
    }

    pub fn current_attributes(&self) -> Option<&PostingAttributes> {
        self.current.as_ref().map(|c| &c.attributes)
    }
}

#[derive(Debug, Clone)]
pub struct PostingsStore {
    state: PostingsState,
    list_tickets: Tickets,
    current_tickets: Tickets,
    save_tickets: Tickets,
    /// Save ticket of the pending update and the `current` ticket it holds.
    update_claim: Option<(Ticket, Ticket)>,
}

impl Default for PostingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PostingsStore {
    pub fn new() -> Self {
        Self {
            state: PostingsState::default(),
            list_tickets: Tickets::new(Slot::PostingsList),
            current_tickets: Tickets::new(Slot::PostingsCurrent),
            save_tickets: Tickets::new(Slot::PostingsSave),
            update_claim: None,
        }
    }

    pub fn state(&self) -> &PostingsState {
        &self.state
    }

    /// Replace page, size, sort and filters, typically from a parsed URL.
    pub fn set_query(&mut self, query: ListQuery) {
        self.state.query = query;
    }

    // --- list ---

    pub fn begin_fetch_list(&mut self, client: &ApiClient) -> Command {
        self.state.is_loading = true;
        self.state.error = None;
        Command {
            ticket: self.list_tickets.issue(),
            request: client.build_list_postings(&self.state.query),
        }
    }

    /// Apply a list response. Returns `false` if the ticket was stale.
    pub fn finish_fetch_list(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> bool {
        if !self.list_tickets.is_current(ticket) {
            return false;
        }
        match response.and_then(|r| client.parse_list_postings(r)) {
            Ok(doc) => {
                self.state.items = doc.data;
                self.state.meta = doc.meta;
                if let Some(page) = self.state.page().copied() {
                    self.state.query.page = page.current_page;
                    self.state.query.size = page.per_page;
                }
                tracing::debug!(count = self.state.items.len(), page = self.state.query.page, "postings list loaded");
            }
            Err(e) => {
                tracing::warn!(error = %e, "postings list fetch failed");
                self.state.error = Some(e.message());
            }
        }
        self.state.is_loading = false;
        true
    }

    pub fn fetch_list<T: Transport + ?Sized>(&mut self, client: &ApiClient, transport: &T) {
        let Command { ticket, request } = self.begin_fetch_list(client);
        let response = transport.execute(request);
        self.finish_fetch_list(client, ticket, response);
    }

    /// `set_query` followed by `fetch_list`.
    pub fn sync_from_route<T: Transport + ?Sized>(&mut self, query: ListQuery, client: &ApiClient, transport: &T) {
        self.set_query(query);
        self.fetch_list(client, transport);
    }

    /// The query that reproduces the current page in a URL.
    pub fn route_query(&self) -> Vec<(String, String)> {
        super::query::build(&self.state.query)
    }

    /// Parameters the next list request will carry.
    pub fn list_params(&self) -> Vec<(String, String)> {
        api::list_params(&self.state.query)
    }

    // --- current record ---

    pub fn begin_fetch_one(&mut self, client: &ApiClient, id: &str) -> Command {
        self.state.current_loading = true;
        self.state.current_error = None;
        Command {
            ticket: self.current_tickets.issue(),
            request: client.build_get_posting(id),
        }
    }

    pub fn finish_fetch_one(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<&PostingResource> {
        if !self.current_tickets.is_current(ticket) {
            return None;
        }
        self.state.current_loading = false;
        match response.and_then(|r| client.parse_get_posting(r)) {
            Ok(doc) => {
                self.state.current = Some(doc.data);
                self.state.current.as_ref()
            }
            Err(e) => {
                tracing::warn!(error = %e, "posting fetch failed");
                self.state.current_error = Some(e.message());
                self.state.current = None;
                None
            }
        }
    }

    pub fn fetch_one<T: Transport + ?Sized>(
        &mut self,
        client: &ApiClient,
        transport: &T,
        id: &str,
    ) -> Option<&PostingResource> {
        let Command { ticket, request } = self.begin_fetch_one(client, id);
        let response = transport.execute(request);
        self.finish_fetch_one(client, ticket, response)
    }

    /// Drop the current record; an in-flight fetch or update for it no
    /// longer writes `current`.
    pub fn clear_current(&mut self) {
        self.current_tickets.issue();
        self.state.current = None;
        self.state.current_error = None;
        self.state.current_loading = false;
    }

    // --- saves ---

    /// Start a create. Returns `None` without issuing a request when the
    /// form is incomplete; the reason is left in `save_error`.
    pub fn begin_create(&mut self, client: &ApiClient, form: &PostingForm) -> Option<Command> {
        let ticket = self.start_save();
        let request = form
            .to_create()
            .and_then(|attrs| client.build_create_posting(&attrs));
        self.save_command(ticket, request)
    }

    /// A create superseded by a later save still returns the created
    /// resource, but leaves the save flags to the newer action.
    pub fn finish_create(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<PostingResource> {
        let parsed = response.and_then(|r| client.parse_create_posting(r));
        if !self.save_tickets.is_current(ticket) {
            return parsed.ok().map(|doc| doc.data);
        }
        self.state.save_loading = false;
        match parsed {
            Ok(doc) => {
                tracing::info!(id = %doc.data.id, "posting created");
                Some(doc.data)
            }
            Err(e) => self.save_failed(&e),
        }
    }

    pub fn create<T: Transport + ?Sized>(
        &mut self,
        client: &ApiClient,
        transport: &T,
        form: &PostingForm,
    ) -> Option<PostingResource> {
        let Command { ticket, request } = self.begin_create(client, form)?;
        let response = transport.execute(request);
        self.finish_create(client, ticket, response)
    }

    /// Start an update. It also takes over the `current` slot, so a detail
    /// fetch already in flight is discarded.
    pub fn begin_update(&mut self, client: &ApiClient, id: &str, attrs: &PostingUpdate) -> Option<Command> {
        let ticket = self.start_save();
        let request = client.build_update_posting(id, attrs);
        if request.is_ok() {
            self.state.current_loading = false;
            self.update_claim = Some((ticket, self.current_tickets.issue()));
        }
        self.save_command(ticket, request)
    }

    /// On success the server's representation replaces `current`, unless a
    /// fetch or `clear_current` happened after the update began.
    pub fn finish_update(
        &mut self,
        client: &ApiClient,
        ticket: Ticket,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<PostingResource> {
        let parsed = response.and_then(|r| client.parse_update_posting(r));
        let owns_current = self.owns_current(ticket);
        if !self.save_tickets.is_current(ticket) {
            return parsed.ok().map(|doc| doc.data);
        }
        self.state.save_loading = false;
        self.update_claim = None;
        match parsed {
            Ok(doc) => {
                tracing::info!(id = %doc.data.id, "posting updated");
                if owns_current {
                    self.state.current = Some(doc.data.clone());
                    self.state.current_error = None;
                }
                Some(doc.data)
            }
            Err(e) => self.save_failed(&e),
        }
    }

    pub fn update<T: Transport + ?Sized>(
        &mut self,
        client: &ApiClient,
        transport: &T,
        id: &str,
        attrs: &PostingUpdate,
    ) -> Option<PostingResource> {
        let Command { ticket, request } = self.begin_update(client, id, attrs)?;
        let response = transport.execute(request);
        self.finish_update(client, ticket, response)
    }

    fn owns_current(&self, save_ticket: Ticket) -> bool {
        self.update_claim
            .is_some_and(|(save, current)| save == save_ticket && self.current_tickets.is_current(current))
    }

    fn start_save(&mut self) -> Ticket {
        self.state.save_loading = true;
        self.state.save_error = None;
        self.save_tickets.issue()
    }

    fn save_command(
        &mut self,
        ticket: Ticket,
        request: Result<crate::http::HttpRequest, ApiError>,
    ) -> Option<Command> {
        match request {
            Ok(request) => Some(Command { ticket, request }),
            Err(e) => {
                self.state.save_loading = false;
                self.save_failed(&e)
            }
        }
    }

    fn save_failed<R>(&mut self, error: &ApiError) -> Option<R> {
        tracing::warn!(error = %error, "posting save failed");
        self.state.save_error = Some(error.message());
        None
    }
}
