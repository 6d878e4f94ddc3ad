//! Shared test doubles for the client integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dashkit_client::{
    ApiClient, ClientConfig, MemoryTokenStore, Navigator, NotificationSink, Severity,
};
use wiremock::MockServer;

/// Notification sink that records every message it receives.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(m, _)| m == message)
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// Navigator that records every redirect.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// A client wired to a mock server plus its observable collaborators.
pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryTokenStore>,
    pub sink: Arc<RecordingSink>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    /// Builds a client against `server` with a pre-seeded session.
    pub fn with_session(server: &MockServer, access_token: &str, refresh_token: &str) -> Self {
        let store = Arc::new(MemoryTokenStore::with_session(access_token, refresh_token));
        Self::build(server, store)
    }

    /// Builds a client against `server` with an empty token store.
    pub fn without_session(server: &MockServer) -> Self {
        Self::build(server, Arc::new(MemoryTokenStore::new()))
    }

    fn build(server: &MockServer, store: Arc<MemoryTokenStore>) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let config = ClientConfig::with_base_url(&server.uri()).unwrap();
        let client = ApiClient::new(
            config,
            store.clone(),
            sink.clone(),
            navigator.clone(),
        )
        .unwrap();
        Self {
            client,
            store,
            sink,
            navigator,
        }
    }
}
