//! Common test utilities for integration tests.

use fake_sms::commands::Session;
use number_registry::NumberRegistry;
use sms_client::{ApiProvider, ScrapeProvider};
use tempfile::TempDir;
use wiremock::MockServer;

/// Temp directories backing one test session.
pub struct TestDirs {
    pub db: TempDir,
    pub export: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        Self {
            db: TempDir::new().unwrap(),
            export: TempDir::new().unwrap(),
        }
    }

    pub fn registry(&self) -> NumberRegistry {
        NumberRegistry::new(self.db.path())
    }
}

/// Session talking to a mock JSON API.
pub fn api_session(mock_server: &MockServer, dirs: &TestDirs) -> Session {
    let provider = ApiProvider::new(mock_server.uri(), None).unwrap();
    Session::new(Box::new(provider), dirs.registry(), dirs.export.path())
}

/// Session talking to a mock scraped website.
pub fn scrape_session(mock_server: &MockServer, dirs: &TestDirs) -> Session {
    let provider = ScrapeProvider::new(mock_server.uri(), None).unwrap();
    Session::new(Box::new(provider), dirs.registry(), dirs.export.path())
}
