//! The identity-provider collaborator.
//!
//! Credentials, password hashing, session issuance, and email delivery
//! live outside this crate. The core only ever sees an opaque subject id
//! per authenticated request and asks the provider to perform the few
//! operations the invitation flow needs.

use async_trait::async_trait;

use crate::crypto::SecretString;
use crate::error::AdminError;

/// The authenticated principal of a request, as reported by the identity
/// provider. Carries no authorization state; roles come from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestIdentity {
    /// Opaque, stable subject id.
    pub subject: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a session token to its identity, or `None` when the
    /// session is missing, expired, or revoked.
    async fn resolve_session(
        &self,
        session_token: &SecretString,
    ) -> Result<Option<RequestIdentity>, AdminError>;

    /// Creates a credentialed account and returns its subject id.
    /// The provider owns password hashing.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<String, AdminError>;

    /// Delivers an invitation token out-of-band (email).
    async fn deliver_invitation(
        &self,
        email: &str,
        token: &SecretString,
    ) -> Result<(), AdminError>;
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for std::sync::Arc<T> {
    async fn resolve_session(
        &self,
        session_token: &SecretString,
    ) -> Result<Option<RequestIdentity>, AdminError> {
        (**self).resolve_session(session_token).await
    }

    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<String, AdminError> {
        (**self).create_account(email, password).await
    }

    async fn deliver_invitation(
        &self,
        email: &str,
        token: &SecretString,
    ) -> Result<(), AdminError> {
        (**self).deliver_invitation(email, token).await
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockIdentityProvider;

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::Mutex;

    use super::*;

    /// In-memory identity provider for tests.
    ///
    /// Sessions are registered explicitly; deliveries and account
    /// creations are recorded so tests can assert on side effects (or
    /// their absence). Failure flags exercise the degraded paths.
    #[derive(Default)]
    pub struct MockIdentityProvider {
        pub sessions: Mutex<Vec<(String, RequestIdentity)>>,
        pub accounts: Mutex<Vec<(String, String)>>,
        pub deliveries: Mutex<Vec<String>>,
        pub resolve_calls: Mutex<usize>,
        pub fail_account_creation: Mutex<bool>,
        pub fail_delivery: Mutex<bool>,
        next_subject: Mutex<u64>,
    }

    impl MockIdentityProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a live session for `subject`/`email` under `token`.
        pub fn add_session(&self, token: &str, subject: &str, email: &str) {
            self.sessions.lock().unwrap().push((
                token.to_owned(),
                RequestIdentity {
                    subject: subject.to_owned(),
                    email: email.to_owned(),
                },
            ));
        }

        pub fn fail_account_creation(&self, fail: bool) {
            *self.fail_account_creation.lock().unwrap() = fail;
        }

        pub fn fail_delivery(&self, fail: bool) {
            *self.fail_delivery.lock().unwrap() = fail;
        }

        pub fn delivery_count(&self) -> usize {
            self.deliveries.lock().unwrap().len()
        }

        pub fn account_count(&self) -> usize {
            self.accounts.lock().unwrap().len()
        }

        /// Number of session lookups performed; lets tests assert that a
        /// rejected request never reached authentication.
        pub fn resolve_count(&self) -> usize {
            *self.resolve_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl IdentityProvider for MockIdentityProvider {
        async fn resolve_session(
            &self,
            session_token: &SecretString,
        ) -> Result<Option<RequestIdentity>, AdminError> {
            *self.resolve_calls.lock().unwrap() += 1;

            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .iter()
                .find(|(t, _)| t == session_token.expose_secret())
                .map(|(_, identity)| identity.clone()))
        }

        async fn create_account(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<String, AdminError> {
            if *self.fail_account_creation.lock().unwrap() {
                return Err(AdminError::Internal("account creation failed".to_owned()));
            }

            let subject = {
                let mut next = self.next_subject.lock().unwrap();
                *next += 1;
                format!("subject-{}", *next)
            };

            self.accounts
                .lock()
                .unwrap()
                .push((subject.clone(), email.to_owned()));

            Ok(subject)
        }

        async fn deliver_invitation(
            &self,
            email: &str,
            _token: &SecretString,
        ) -> Result<(), AdminError> {
            if *self.fail_delivery.lock().unwrap() {
                return Err(AdminError::Internal("delivery failed".to_owned()));
            }

            self.deliveries.lock().unwrap().push(email.to_owned());
            Ok(())
        }
    }
}
