//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the stores through
//! `UreqTransport` over real HTTP. Validates that request building, header
//! handling, response parsing and state reconciliation agree with the
//! server's actual wire format.

use std::sync::Arc;

use jobtrack_core::postings::{EmploymentType, FilterKey, PostingFilters, PostingStatus, PostingUpdate, Source, WorkMode};
use jobtrack_core::{
    ApiClient, ClientConfig, ListQuery, MemoryTokenStore, PostingForm, PostingsStore, ProfileForm, ProfileStore,
    TokenStore, Transport, UreqTransport,
};

const APP_TOKEN: &str = "integration-app-token";

/// Start the mock server on a background thread and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let settings = mock_server::Settings {
                app_token: Some(APP_TOKEN.to_string()),
                ..mock_server::Settings::default()
            };
            mock_server::run_with(listener, settings).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn signed_in_client(base_url: &str) -> ApiClient {
    let config = ClientConfig::new(base_url).unwrap().with_app_token(APP_TOKEN);
    ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("user-token")))
}

fn form(title: &str, company: &str, status: PostingStatus) -> PostingForm {
    PostingForm {
        source: Some(Source::LinkedIn),
        employment_type: Some(EmploymentType::FullTime),
        work_mode: Some(WorkMode::Remote),
        status: Some(status),
        source_id: "li-1".to_string(),
        url: "https://example.com/job".to_string(),
        company: company.to_string(),
        title: title.to_string(),
        description: "Build things".to_string(),
        cover_letter: None,
    }
}

#[test]
fn postings_lifecycle() {
    let base_url = start_server();
    let client = signed_in_client(&base_url);
    let transport = UreqTransport::new();
    let mut store = PostingsStore::new();

    // Step 1: empty list.
    store.fetch_list(&client, &transport);
    assert!(store.state().error.is_none(), "{:?}", store.state().error);
    assert!(store.state().items.is_empty());
    assert_eq!(store.state().range_label(), "0–0 of 0");

    // Step 2: server-side validation error surfaces as save_error.
    let created = store.create(&client, &transport, &form("", "Acme", PostingStatus::New));
    assert!(created.is_none());
    assert_eq!(store.state().save_error.as_deref(), Some("Title required"));

    // Step 3: create enough postings for three pages of ten.
    for i in 0..25 {
        let status = if i % 2 == 0 { PostingStatus::New } else { PostingStatus::Postulated };
        let created = store.create(&client, &transport, &form(&format!("Job {i:02}"), "Acme", status));
        assert!(created.is_some(), "create {i}: {:?}", store.state().save_error);
    }
    assert!(store.state().save_error.is_none());

    // Step 4: page two of ten.
    store.sync_from_route(
        ListQuery {
            page: 2,
            size: 10,
            sort: Some("title".to_string()),
            ..ListQuery::default()
        },
        &client,
        &transport,
    );
    let state = store.state();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.items[0].attributes.title, "Job 10");
    assert_eq!(state.range_label(), "11–20 of 25");
    assert!(state.has_prev());
    assert!(state.has_next());

    // Step 5: server caps the page size; local paging follows it.
    store.set_query(ListQuery {
        size: 200,
        ..ListQuery::default()
    });
    store.fetch_list(&client, &transport);
    assert_eq!(store.state().page_size(), 100);
    assert_eq!(store.state().items.len(), 25);

    // Step 6: filters.
    store.set_query(ListQuery {
        filters: PostingFilters::default()
            .with_status(PostingStatus::Postulated)
            .with(FilterKey::Title, "job 1"),
        ..ListQuery::default()
    });
    store.fetch_list(&client, &transport);
    let titles: Vec<&str> = store
        .state()
        .items
        .iter()
        .map(|p| p.attributes.title.as_str())
        .collect();
    assert_eq!(titles, ["Job 11", "Job 13", "Job 15", "Job 17", "Job 19"]);

    // Step 7: show and update.
    let id = store.state().items[0].id.clone();
    let fetched = store.fetch_one(&client, &transport, &id).cloned().unwrap();
    assert_eq!(fetched.attributes.title, "Job 11");

    let update = PostingUpdate {
        status: Some(PostingStatus::InterviewScheduled),
        cover_letter: Some(Some("Dear hiring manager".to_string())),
        ..PostingUpdate::default()
    };
    let updated = store.update(&client, &transport, &id, &update).unwrap();
    assert_eq!(updated.attributes.status, PostingStatus::InterviewScheduled);
    let current = store.state().current_attributes().unwrap();
    assert_eq!(current.cover_letter.as_deref(), Some("Dear hiring manager"));
    assert_eq!(current.updated_at, updated.attributes.updated_at);

    // Step 8: unknown id leaves the list alone.
    let items_before = store.state().items.clone();
    assert!(store.fetch_one(&client, &transport, "does-not-exist").is_none());
    assert!(store.state().current.is_none());
    assert_eq!(
        store.state().current_error.as_deref(),
        Some("Posting does-not-exist does not exist.")
    );
    assert_eq!(store.state().items, items_before);
    assert!(store.state().error.is_none());

    // Step 9: bad sort is reported on the list slot.
    store.set_query(ListQuery {
        sort: Some("-salary".to_string()),
        ..ListQuery::default()
    });
    store.fetch_list(&client, &transport);
    assert_eq!(
        store.state().error.as_deref(),
        Some("Unsupported sort field 'salary'.")
    );
    assert_eq!(store.state().items, items_before);
}

#[test]
fn profile_lifecycle() {
    let base_url = start_server();
    let client = signed_in_client(&base_url);
    let transport = UreqTransport::new();
    let mut store = ProfileStore::new();

    let loaded = store.fetch_profile(&client, &transport).cloned().unwrap();
    assert_eq!(loaded.id, "1");
    assert_eq!(loaded.attributes.name, "Demo User");

    let mut edit = ProfileForm::from(&loaded.attributes);
    edit.city = Some("Montréal".to_string());
    edit.phone = Some("555-0100".to_string());
    let saved = store.update(&client, &transport, &edit).unwrap();
    assert_eq!(saved.attributes.city, "Montréal");
    assert_eq!(store.state().profile.attributes.phone, "555-0100");

    // Blanking a field clears it on the server.
    edit.phone = None;
    store.update(&client, &transport, &edit).unwrap();
    let reloaded = store.fetch_profile(&client, &transport).cloned().unwrap();
    assert_eq!(reloaded.attributes.phone, "");
    assert_eq!(reloaded.attributes.city, "Montréal");

    edit.email = "not-an-email".to_string();
    assert!(store.update(&client, &transport, &edit).is_none());
    assert_eq!(store.state().save_error.as_deref(), Some("Email is invalid"));
    assert_eq!(store.state().profile.attributes.email, "demo@example.com");
}

#[test]
fn signed_out_client_is_rejected() {
    let base_url = start_server();
    let config = ClientConfig::new(&base_url).unwrap().with_app_token(APP_TOKEN);
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::new(&config, Arc::clone(&tokens));
    let transport = UreqTransport::new();
    let mut store = ProfileStore::new();

    assert!(!tokens.is_authenticated());
    assert!(store.fetch_profile(&client, &transport).is_none());
    assert_eq!(store.state().error.as_deref(), Some("Missing bearer token."));
    assert!(!store.state().has_profile());

    tokens.set_token("fresh-token").unwrap();
    assert!(store.fetch_profile(&client, &transport).is_some());
}

#[test]
fn wrong_app_token_is_rejected() {
    let base_url = start_server();
    let config = ClientConfig::new(&base_url).unwrap().with_app_token("wrong");
    let client = ApiClient::new(&config, Arc::new(MemoryTokenStore::with_token("user-token")));
    let mut store = PostingsStore::new();

    store.fetch_list(&client, &UreqTransport::new());
    assert_eq!(store.state().error.as_deref(), Some("Invalid application token."));
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let client = signed_in_client(&format!("http://{addr}"));
    let transport = UreqTransport::new();

    let err = transport.execute(client.build_get_profile()).unwrap_err();
    assert_eq!(err.status(), None);

    let mut store = PostingsStore::new();
    store.fetch_list(&client, &transport);
    assert!(store.state().error.is_some());
    assert!(!store.state().is_loading);
}
