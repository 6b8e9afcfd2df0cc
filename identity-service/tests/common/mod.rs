use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenIssuer;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::models::Username;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::user::errors::UserError;
use tokio::sync::RwLock;

const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
const TEST_ISSUER: &str = "pos-backend";
const TEST_AUDIENCE: &str = "pos-clients";

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_repo = Arc::new(InMemoryUserRepository::new());
        let token_issuer = Arc::new(TokenIssuer::new(
            TEST_JWT_SECRET,
            TEST_ISSUER.to_string(),
            TEST_AUDIENCE.to_string(),
        ));
        let user_service = Arc::new(UserService::new(user_repo, token_issuer));

        let router = create_router(user_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(
                TEST_JWT_SECRET,
                TEST_ISSUER.to_string(),
                TEST_AUDIENCE.to_string(),
            ),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }
}

/// In-memory user record store with the same contract as the Postgres
/// adapter, including the version-guarded update.
pub struct InMemoryUserRepository {
    records: RwLock<HashMap<i32, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut records = self.records.write().await;
        if records.contains_key(&user.id.0) {
            return Err(UserError::AlreadyExists(user.id.0));
        }
        if records.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        records.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.records.read().await.get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.records.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id.0);
        Ok(users)
    }

    async fn update(&self, user: User, expected_version: i64) -> Result<User, UserError> {
        let mut records = self.records.write().await;
        let Some(existing) = records.get(&user.id.0) else {
            return Err(UserError::NotFound(user.id.0));
        };
        if existing.version != expected_version {
            return Err(UserError::ConcurrentModification(user.id.0));
        }
        if records
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        let updated = User {
            version: expected_version + 1,
            ..user
        };
        records.insert(updated.id.0, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        match self.records.write().await.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(UserError::NotFound(id.0)),
        }
    }
}
