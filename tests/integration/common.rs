//! Common test harness for UAA client integration tests.
//!
//! [`FakeUaa`] wraps a wiremock server that plays the UAA token endpoint and
//! whatever SCIM endpoints a test mounts.

use std::sync::Once;

use serde_json::{Value, json};
use uaa::{UaaClient, UaaCredentials};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Installs a `tracing` subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Credentials selecting the client credentials grant.
pub fn admin_credentials() -> UaaCredentials {
    UaaCredentials::new("admin").with_client_secret("adminsecret")
}

/// Credentials selecting the password grant.
pub fn user_credentials() -> UaaCredentials {
    UaaCredentials::new("app").with_client_secret("appclientsecret").with_user("marissa", "koala")
}

/// A SCIM list response wrapping `resources`.
pub fn page(resources: Vec<Value>) -> Value {
    let total = resources.len();
    json!({
        "resources": resources,
        "startIndex": 1,
        "itemsPerPage": 100,
        "totalResults": total,
        "schemas": ["urn:scim:schemas:core:1.0"]
    })
}

/// A token endpoint response.
pub fn token_body(access_token: &str, expires_in: i64, refresh_token: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "scim.read scim.write",
        "jti": "6b1d5e0c"
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = Value::from(refresh_token);
    }
    body
}

/// A fake UAA server.
pub struct FakeUaa {
    pub server: MockServer,
}

impl FakeUaa {
    pub async fn start() -> Self {
        init_tracing();
        Self { server: MockServer::start().await }
    }

    /// Issues `access_token` from `/oauth/token`, expecting `calls` requests.
    pub async fn issue_token(&self, access_token: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(token_body(access_token, 43199, None)),
            )
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Builds a client for this server.
    pub fn client(&self, credentials: UaaCredentials) -> UaaClient {
        UaaClient::builder()
            .url(self.server.uri())
            .insecure()
            .credentials(credentials)
            .build()
            .expect("client should build")
    }

    /// Paths of all requests received so far, in order.
    pub async fn received_paths(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }
}
