use std::{net::SocketAddr, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sentinel::{
    config::{AppConfig, ServerConfig},
    http_server,
    models::rule::NewRule,
    notification::{AlertDispatcher, DiscordWebhookDispatcher},
    persistence::{SqliteRuleRepository, traits::RuleRepository},
};
use sha2::Sha256;
use tokio::task;

type HmacSha256 = Hmac<Sha256>;

/// The global Alchemy signing secret configured on test servers.
pub const TEST_ALCHEMY_SECRET: &str = "test-signing-secret";

pub async fn create_test_repo() -> Arc<SqliteRuleRepository> {
    let repo = SqliteRuleRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory repo");
    repo.run_migrations().await.expect("Failed to run migrations");
    Arc::new(repo)
}

pub async fn create_test_repo_without_migrations() -> Arc<SqliteRuleRepository> {
    let repo = SqliteRuleRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory repo");
    Arc::new(repo)
}

pub fn test_rule(name: &str, contract_address: &str, subscription_id: &str) -> NewRule {
    NewRule {
        name: name.to_string(),
        owner_address: "0xowner".to_string(),
        network_id: "ETH_SEPOLIA".to_string(),
        contract_address: contract_address.to_string(),
        event_name: "Transfer".to_string(),
        subscription_id: subscription_id.to_string(),
    }
}

/// Seeds an action row for a rule. Actions have no API surface of their
/// own, so tests write them directly.
pub async fn attach_action(
    repo: &SqliteRuleRepository,
    rule_id: i64,
    kind: &str,
    target_url: &str,
    secret: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO actions (rule_id, kind, target_url, webhook_secret) VALUES (?, ?, ?, ?)",
    )
    .bind(rule_id)
    .bind(kind)
    .bind(target_url)
    .bind(secret)
    .execute(repo.pool())
    .await
    .expect("Failed to insert action");
}

/// Computes the hex HMAC for the Alchemy signature header.
pub fn sign_alchemy(secret: &str, body: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Builds a `whsec_`-style secret around the given key bytes.
pub fn svix_secret(key: &[u8]) -> String {
    format!("whsec_{}", BASE64.encode(key))
}

/// Computes the `v1,...` entry for the Svix signature header.
pub fn sign_svix(secret: &str, id: &str, timestamp: &str, body: &str) -> String {
    let (_, encoded_key) = secret.split_once('_').expect("secret must have a prefix");
    let key = BASE64.decode(encoded_key).expect("secret key must be base64");
    let mut mac = HmacSha256::new_from_slice(&key).unwrap();
    mac.update(format!("{id}.{timestamp}.{body}").as_bytes());
    format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
}

pub struct TestServer {
    pub address: SocketAddr,
    pub server_handle: task::JoinHandle<()>,
    pub client: Client,
}

impl TestServer {
    pub async fn new(repo: Arc<SqliteRuleRepository>) -> Self {
        Self::with_alchemy_secret(repo, Some(TEST_ALCHEMY_SECRET)).await
    }

    pub async fn with_alchemy_secret(
        repo: Arc<SqliteRuleRepository>,
        alchemy_secret: Option<&str>,
    ) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get address");
        drop(listener); // Release port for the app to use

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".to_string(),
            alchemy_signing_secret: alchemy_secret.map(String::from),
            server: ServerConfig { listen_address: addr.to_string() },
            ..Default::default()
        });

        let dispatcher = Arc::new(
            DiscordWebhookDispatcher::new(&config.dispatch).expect("Failed to build dispatcher"),
        );

        // Spawn the actual app server
        let server_handle = task::spawn(async move {
            http_server::run_server_from_config(
                config,
                repo as Arc<dyn RuleRepository>,
                dispatcher as Arc<dyn AlertDispatcher>,
            )
            .await;
        });

        // Wait for server to start
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        Self { address: addr, server_handle, client: Client::new() }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{}{}", self.address, path))
            .send()
            .await
            .expect("Request failed")
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("http://{}{}", self.address, path))
    }

    pub fn cleanup(&self) {
        self.server_handle.abort();
    }
}
