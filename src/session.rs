use crate::error::StoreError;
use std::collections::HashMap;

/// Storage key for the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key for the username.
pub const USERNAME_KEY: &str = "username";

/// Scoped key-value persistence for session state.
///
/// Implementations are expected to wrap the platform's secure string store.
/// Writes report their outcome; callers decide whether a failed write is
/// fatal for the flow that triggered it.
pub trait SessionStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Backs tests and platforms with no secure storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Secure store with a plain fallback tier.
///
/// When the platform provides no secure backend (`primary` is `None`),
/// all operations go to the fallback string store instead. The fallback
/// is less secure but always available.
#[derive(Debug)]
pub struct FallbackStore<P, F> {
    primary: Option<P>,
    fallback: F,
}

impl<P, F> FallbackStore<P, F> {
    pub fn new(primary: Option<P>, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Whether the secure tier is in use.
    pub fn is_secure(&self) -> bool {
        self.primary.is_some()
    }
}

impl<P: SessionStore, F: SessionStore> SessionStore for FallbackStore<P, F> {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match &mut self.primary {
            Some(primary) => primary.set(key, value),
            None => self.fallback.set(key, value),
        }
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match &self.primary {
            Some(primary) => primary.get(key),
            None => self.fallback.get(key),
        }
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        match &mut self.primary {
            Some(primary) => primary.delete(key),
            None => self.fallback.delete(key),
        }
    }
}

/// What the store currently holds. The two keys are independent: either
/// may be present without the other, and no integrity between them is
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl SessionSnapshot {
    /// Read both keys from the store.
    pub fn load<S: SessionStore>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            token: store.get(ACCESS_TOKEN_KEY)?,
            username: store.get(USERNAME_KEY)?,
        })
    }

    /// A session is usable for protected calls when a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Persist a fresh session after a successful login. Overwrites any
/// previous session.
pub fn save_session<S: SessionStore>(
    store: &mut S,
    token: &str,
    username: &str,
) -> Result<(), StoreError> {
    store.set(ACCESS_TOKEN_KEY, token)?;
    store.set(USERNAME_KEY, username)?;
    Ok(())
}

/// Remove both session keys. Nothing in the client calls this
/// automatically; it exists so a host can build a logout flow.
pub fn clear_session<S: SessionStore>(store: &mut S) -> Result<(), StoreError> {
    store.delete(ACCESS_TOKEN_KEY)?;
    store.delete(USERNAME_KEY)?;
    Ok(())
}
