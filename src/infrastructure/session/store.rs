//! In-memory browser session store.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::domain::auth_store::AuthStore;
use crate::domain::entities::Notice;
use crate::domain::login_flow::LoginScreen;

type HmacSha256 = Hmac<Sha256>;

/// Everything the server remembers about one browser.
#[derive(Debug)]
pub struct BrowserSession {
    pub auth: AuthStore,
    pub screen: LoginScreen,
    /// Notice to show once on the dashboard.
    pub flash: Option<Notice>,
    last_seen: Instant,
}

impl BrowserSession {
    fn new() -> Self {
        Self {
            auth: AuthStore::new(),
            screen: LoginScreen::new(),
            flash: None,
            last_seen: Instant::now(),
        }
    }
}

/// Shared handle to one browser session.
///
/// The lock is a plain [`Mutex`]; it must never be held across an `.await`.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    inner: Arc<Mutex<BrowserSession>>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lock(&self) -> MutexGuard<'_, BrowserSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Browser sessions keyed by a random id.
///
/// Ids travel to the browser as `<id>.<mac>`, where `mac` is the hex
/// HMAC-SHA256 of the id under the server's session secret. Values with a bad
/// MAC never reach the map.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<BrowserSession>>>>,
    signing_secret: String,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key for cookie values
    /// - `ttl` - idle time after which a session is dropped
    pub fn new(signing_secret: String, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            signing_secret,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a new session and returns it with the cookie value to send.
    pub fn create(&self) -> (Session, String) {
        let bytes: [u8; 32] = rand::random();
        let id = hex::encode(bytes);
        let inner = Arc::new(Mutex::new(BrowserSession::new()));

        self.write().insert(id.clone(), inner.clone());
        let cookie_value = format!("{id}.{}", self.sign(&id));

        (Session { id, inner }, cookie_value)
    }

    /// Looks up the session named by a cookie value and marks it as seen.
    ///
    /// Returns `None` for forged values, unknown ids and idle-expired sessions.
    pub fn get(&self, cookie_value: &str) -> Option<Session> {
        let id = self.verify(cookie_value)?;
        let inner = self.read().get(id).cloned()?;

        {
            let mut session = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if session.last_seen.elapsed() >= self.ttl {
                drop(session);
                self.write().remove(id);
                return None;
            }
            session.last_seen = Instant::now();
        }

        Some(Session {
            id: id.to_string(),
            inner,
        })
    }

    /// Returns the existing session, or a fresh one plus the cookie value to set.
    pub fn get_or_create(&self, cookie_value: Option<&str>) -> (Session, Option<String>) {
        match cookie_value.and_then(|v| self.get(v)) {
            Some(session) => (session, None),
            None => {
                let (session, cookie) = self.create();
                (session, Some(cookie))
            }
        }
    }

    pub fn remove(&self, id: &str) {
        self.write().remove(id);
    }

    /// Drops every idle-expired session. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| {
            s.lock().unwrap_or_else(PoisonError::into_inner).last_seen.elapsed() < self.ttl
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    fn sign(&self, id: &str) -> String {
        let mut mac = self.mac();
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (id, signature) = cookie_value.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(id)
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Mutex<BrowserSession>>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Mutex<BrowserSession>>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodically removes idle sessions until the process exits.
pub async fn run_session_sweeper(store: Arc<SessionStore>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    interval.tick().await;

    loop {
        interval.tick().await;
        let removed = store.sweep();
        if removed > 0 {
            tracing::debug!(removed, remaining = store.len(), "Expired sessions swept");
        }
    }
}
