use crate::domain::error::DomainError;
use crate::domain::user::Role;
use crate::infrastructure::security::decode_claims_unverified;
use chrono::Utc;
use tracing::{debug, warn};

/// Persistence seam for the session token, standing in for browser storage.
pub trait TokenStore {
    fn save(&mut self, token: &str);
    fn load(&self) -> Option<String>;
    fn clear(&mut self);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn load(&self) -> Option<String> {
        self.token.clone()
    }

    fn clear(&mut self) {
        self.token = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub role: Role,
}

/// Client-side auth state, passed explicitly to whatever needs it rather than
/// held in an ambient global. Claims are decoded without signature checks.
/// This drives navigation only; the server re-verifies every request.
pub struct AuthSession<S: TokenStore> {
    store: S,
    current: Option<SessionUser>,
}

impl<S: TokenStore> AuthSession<S> {
    /// Startup step: adopt a persisted token if it decodes and has not
    /// expired, otherwise discard it.
    pub fn initialize(store: S) -> Self {
        let mut session = Self {
            store,
            current: None,
        };

        if let Some(token) = session.store.load() {
            match decode_session_user(&token) {
                Ok(user) => {
                    debug!(user_id = %user.id, "Restored session from persisted token");
                    session.current = Some(user);
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unusable persisted token");
                    session.store.clear();
                }
            }
        }

        session
    }

    /// Adopts a freshly issued token after login or registration.
    pub fn establish(&mut self, token: &str) -> Result<&SessionUser, DomainError> {
        let user = decode_session_user(token)?;
        self.store.save(token);
        Ok(self.current.insert(user))
    }

    /// Logout teardown: forget the token and the decoded claims.
    pub fn clear(&mut self) {
        self.store.clear();
        self.current = None;
    }

    /// Global handler for an Unauthorized response: the session is over.
    pub fn session_ended(&mut self) {
        debug!("Server rejected session token, clearing session");
        self.clear();
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Drives admin navigation only. Not a security boundary.
    pub fn is_admin(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|u| u.role == Role::Admin)
    }

    /// Value for the `Authorization` header on outgoing requests.
    pub fn bearer_header(&self) -> Option<String> {
        if self.current.is_none() {
            return None;
        }
        self.store.load().map(|token| format!("Bearer {}", token))
    }
}

fn decode_session_user(token: &str) -> Result<SessionUser, DomainError> {
    let claims = decode_claims_unverified(token)
        .map_err(|e| DomainError::Validation(format!("Malformed token: {}", e)))?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(DomainError::Validation("Token has expired".to_string()));
    }

    Ok(SessionUser {
        id: claims.sub,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::security::generate_token;

    const SECRET: &str = "server-side-secret";

    #[test]
    fn test_initialize_with_empty_store_is_anonymous() {
        let session = AuthSession::initialize(MemoryTokenStore::new());
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert!(session.bearer_header().is_none());
    }

    #[test]
    fn test_initialize_restores_persisted_token() {
        let token = generate_token("user-1", Role::Admin, SECRET, 3600).unwrap();
        let session = AuthSession::initialize(MemoryTokenStore::with_token(&token));

        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert_eq!(session.current_user().unwrap().id, "user-1");
    }

    #[test]
    fn test_initialize_discards_expired_token() {
        let token = generate_token("user-1", Role::User, SECRET, -60).unwrap();
        let session = AuthSession::initialize(MemoryTokenStore::with_token(&token));

        assert!(!session.is_authenticated());
        // The unusable token is also purged from the store
        assert!(session.store.load().is_none());
    }

    #[test]
    fn test_initialize_discards_garbage_token() {
        let session = AuthSession::initialize(MemoryTokenStore::with_token("not-a-jwt"));
        assert!(!session.is_authenticated());
        assert!(session.store.load().is_none());
    }

    #[test]
    fn test_establish_decodes_role_without_server_secret() {
        let token = generate_token("user-2", Role::User, SECRET, 3600).unwrap();
        let mut session = AuthSession::initialize(MemoryTokenStore::new());

        let user = session.establish(&token).unwrap();
        assert_eq!(user.id, "user-2");
        assert_eq!(user.role, Role::User);
        assert!(!session.is_admin());
        assert_eq!(
            session.bearer_header().unwrap(),
            format!("Bearer {}", token)
        );
    }

    #[test]
    fn test_establish_rejects_expired_token() {
        let token = generate_token("user-2", Role::User, SECRET, -60).unwrap();
        let mut session = AuthSession::initialize(MemoryTokenStore::new());

        assert!(session.establish(&token).is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear_and_session_ended_drop_everything() {
        let token = generate_token("user-3", Role::Admin, SECRET, 3600).unwrap();
        let mut session = AuthSession::initialize(MemoryTokenStore::with_token(&token));
        assert!(session.is_authenticated());

        session.session_ended();
        assert!(!session.is_authenticated());
        assert!(session.bearer_header().is_none());
        assert!(session.store.load().is_none());
    }
}
