//! The per-request guard: CSRF origin verification, authentication, and
//! authorization, composed in that order with short-circuit semantics.
//!
//! Identity is explicit: callers build a [`RequestContext`] from the raw
//! request and pass it in. There is no ambient "current user", so the
//! guard is fully testable with synthetic identities.
//!
//! All checks are read-only with respect to the store. The first failing
//! check aborts the request; an unauthenticated CSRF attempt never
//! reaches the identity provider.

use crate::config::AdminConfig;
use crate::crypto::SecretString;
use crate::error::AdminError;
use crate::identity::{IdentityProvider, RequestIdentity};
use crate::repository::{Profile, ProfileRepository};
use crate::roles::{has_resource_permission, Resource, ResourceAction, StaffRole};

/// Everything the guard needs to know about an inbound request,
/// extracted by the transport layer before any check runs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// `Origin` header, if present.
    pub origin: Option<String>,
    /// `Referer` header, if present. Consulted only when `Origin` is
    /// absent.
    pub referer: Option<String>,
    /// Opaque session token, if the request carried one.
    pub session_token: Option<SecretString>,
}

impl RequestContext {
    /// Context for an anonymous request (no session, no origin).
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Origin allow-list for state-changing requests.
#[derive(Debug, Clone)]
pub struct CsrfPolicy {
    allowed_origins: Vec<String>,
}

impl CsrfPolicy {
    pub fn new<I, S>(allowed_origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: allowed_origins
                .into_iter()
                .map(|s| s.into().trim_end_matches('/').to_owned())
                .collect(),
        }
    }

    /// Verifies a state-changing request's declared origin.
    ///
    /// `Origin` must match an allow-list entry exactly; when absent, a
    /// `Referer` whose prefix matches an allowed origin is accepted.
    /// Anything else, including a request declaring no origin at all, is
    /// rejected with a fixed error regardless of payload contents.
    pub fn verify(&self, ctx: &RequestContext) -> Result<(), AdminError> {
        if let Some(origin) = ctx.origin.as_deref() {
            let origin = origin.trim_end_matches('/');
            if self.allowed_origins.iter().any(|a| a == origin) {
                return Ok(());
            }
            return Err(AdminError::CsrfRejected);
        }

        if let Some(referer) = ctx.referer.as_deref() {
            if self
                .allowed_origins
                .iter()
                .any(|a| referer == a || referer.starts_with(&format!("{a}/")))
            {
                return Ok(());
            }
        }

        Err(AdminError::CsrfRejected)
    }
}

/// Composes the three per-request checks over an identity provider and
/// the profile store.
pub struct RequestGuard<P, D>
where
    P: ProfileRepository,
    D: IdentityProvider,
{
    profiles: P,
    provider: D,
    csrf: CsrfPolicy,
    max_payload_bytes: usize,
}

impl<P, D> RequestGuard<P, D>
where
    P: ProfileRepository,
    D: IdentityProvider,
{
    pub fn new(profiles: P, provider: D, config: &AdminConfig) -> Self {
        Self {
            profiles,
            provider,
            csrf: CsrfPolicy::new(config.allowed_origins.iter().cloned()),
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Check 1: CSRF. Must run before authentication on every
    /// state-changing request.
    pub fn verify_origin(&self, ctx: &RequestContext) -> Result<(), AdminError> {
        self.csrf.verify(ctx)
    }

    /// Rejects request bodies at or above the configured ceiling.
    /// Runs before field validation; field validity is irrelevant.
    pub fn check_payload_size(&self, body_len: usize) -> Result<(), AdminError> {
        if body_len >= self.max_payload_bytes {
            return Err(AdminError::PayloadTooLarge);
        }
        Ok(())
    }

    /// Check 2: authentication. Resolves the session against the
    /// identity provider; never inspects the request body.
    pub async fn authenticate(&self, ctx: &RequestContext) -> Result<RequestIdentity, AdminError> {
        let token = ctx
            .session_token
            .as_ref()
            .ok_or(AdminError::Unauthenticated)?;

        self.provider
            .resolve_session(token)
            .await?
            .ok_or(AdminError::Unauthenticated)
    }

    /// Check 3: authorization against an explicit allowed-role list.
    ///
    /// Re-reads the profile from the store on every call; roles are never
    /// cached across requests. Missing profile, inactive account, or a
    /// role outside the list all fail identically with `Forbidden`.
    pub async fn authorize(
        &self,
        identity: &RequestIdentity,
        allowed: &[StaffRole],
    ) -> Result<Profile, AdminError> {
        let profile = self
            .profiles
            .find_by_id(&identity.subject)
            .await?
            .ok_or(AdminError::Forbidden)?;

        if !profile.is_active || !allowed.contains(&profile.role) {
            return Err(AdminError::Forbidden);
        }

        Ok(profile)
    }

    /// Check 3, resource-scoped: membership in the static permission
    /// table instead of a caller-supplied list.
    pub async fn authorize_resource(
        &self,
        identity: &RequestIdentity,
        resource: Resource,
        action: ResourceAction,
    ) -> Result<Profile, AdminError> {
        let profile = self
            .profiles
            .find_by_id(&identity.subject)
            .await?
            .ok_or(AdminError::Forbidden)?;

        if !profile.is_active || !has_resource_permission(profile.role, resource, action) {
            return Err(AdminError::Forbidden);
        }

        Ok(profile)
    }

    /// Full gate for state-changing endpoints: CSRF, then
    /// authentication, then authorization, short-circuiting on the first
    /// failure.
    pub async fn require(
        &self,
        ctx: &RequestContext,
        allowed: &[StaffRole],
    ) -> Result<Profile, AdminError> {
        self.verify_origin(ctx)?;
        let identity = self.authenticate(ctx).await?;
        self.authorize(&identity, allowed).await
    }

    /// Gate for privileged read endpoints: authentication and
    /// authorization without the CSRF check (reads are not state-changing).
    pub async fn require_read(
        &self,
        ctx: &RequestContext,
        allowed: &[StaffRole],
    ) -> Result<Profile, AdminError> {
        let identity = self.authenticate(ctx).await?;
        self.authorize(&identity, allowed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityProvider;
    use crate::repository::MockProfileRepository;
    use std::sync::Arc;

    const ORIGIN: &str = "https://admin.centro.org";

    fn guard() -> (
        Arc<MockProfileRepository>,
        Arc<MockIdentityProvider>,
        RequestGuard<Arc<MockProfileRepository>, Arc<MockIdentityProvider>>,
    ) {
        let profiles = Arc::new(MockProfileRepository::new());
        let provider = Arc::new(MockIdentityProvider::new());
        let config = AdminConfig::new().with_origins([ORIGIN]);
        let g = RequestGuard::new(Arc::clone(&profiles), Arc::clone(&provider), &config);
        (profiles, provider, g)
    }

    fn ctx(origin: Option<&str>, token: Option<&str>) -> RequestContext {
        RequestContext {
            origin: origin.map(ToOwned::to_owned),
            referer: None,
            session_token: token.map(SecretString::new),
        }
    }

    #[test]
    fn test_csrf_accepts_allowed_origin() {
        let policy = CsrfPolicy::new([ORIGIN]);
        assert!(policy.verify(&ctx(Some(ORIGIN), None)).is_ok());
        // trailing slash tolerated
        assert!(policy
            .verify(&ctx(Some("https://admin.centro.org/"), None))
            .is_ok());
    }

    #[test]
    fn test_csrf_rejects_foreign_origin() {
        let policy = CsrfPolicy::new([ORIGIN]);
        assert_eq!(
            policy.verify(&ctx(Some("https://evil.example"), None)),
            Err(AdminError::CsrfRejected)
        );
    }

    #[test]
    fn test_csrf_rejects_missing_origin() {
        let policy = CsrfPolicy::new([ORIGIN]);
        assert_eq!(
            policy.verify(&RequestContext::anonymous()),
            Err(AdminError::CsrfRejected)
        );
    }

    #[test]
    fn test_csrf_referer_fallback() {
        let policy = CsrfPolicy::new([ORIGIN]);

        let ok = RequestContext {
            origin: None,
            referer: Some(format!("{ORIGIN}/admin/users")),
            session_token: None,
        };
        assert!(policy.verify(&ok).is_ok());

        // prefix trickery is not a match
        let evil = RequestContext {
            origin: None,
            referer: Some("https://admin.centro.org.evil.example/".to_owned()),
            session_token: None,
        };
        assert_eq!(policy.verify(&evil), Err(AdminError::CsrfRejected));
    }

    #[tokio::test]
    async fn test_require_checks_csrf_before_auth() {
        let (_profiles, provider, guard) = guard();
        // a session exists, but the origin is wrong: CSRF must fail first
        provider.add_session("tok", "subj-1", "a@b.org");

        let result = guard
            .require(
                &ctx(Some("https://evil.example"), Some("tok")),
                &[StaffRole::Owner],
            )
            .await;

        assert_eq!(result.unwrap_err(), AdminError::CsrfRejected);
    }

    #[tokio::test]
    async fn test_authenticate_no_session() {
        let (_profiles, _provider, guard) = guard();

        let result = guard.authenticate(&ctx(Some(ORIGIN), None)).await;
        assert_eq!(result.unwrap_err(), AdminError::Unauthenticated);

        let result = guard.authenticate(&ctx(Some(ORIGIN), Some("unknown"))).await;
        assert_eq!(result.unwrap_err(), AdminError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_authorize_role_membership() {
        let (profiles, provider, guard) = guard();
        provider.add_session("tok", "subj-1", "officer@centro.org");
        profiles.seed("subj-1", "officer@centro.org", StaffRole::Officer);

        let identity = guard.authenticate(&ctx(Some(ORIGIN), Some("tok"))).await.unwrap();

        assert!(guard
            .authorize(&identity, &[StaffRole::Owner, StaffRole::Admin])
            .await
            .is_err());
        assert!(guard
            .authorize(&identity, &[StaffRole::Officer])
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_authorize_missing_profile_is_forbidden() {
        let (_profiles, provider, guard) = guard();
        provider.add_session("tok", "subj-ghost", "ghost@centro.org");

        let identity = guard.authenticate(&ctx(Some(ORIGIN), Some("tok"))).await.unwrap();
        let result = guard.authorize(&identity, &[StaffRole::Officer]).await;
        assert_eq!(result.unwrap_err(), AdminError::Forbidden);
    }

    #[tokio::test]
    async fn test_authorize_inactive_account() {
        let (profiles, provider, guard) = guard();
        provider.add_session("tok", "subj-1", "admin@centro.org");
        profiles.seed("subj-1", "admin@centro.org", StaffRole::Admin);
        profiles.set_active("subj-1", false).await.unwrap();

        let identity = guard.authenticate(&ctx(Some(ORIGIN), Some("tok"))).await.unwrap();
        let result = guard.authorize(&identity, &[StaffRole::Admin]).await;
        assert_eq!(result.unwrap_err(), AdminError::Forbidden);
    }

    #[tokio::test]
    async fn test_authorize_resource() {
        let (profiles, provider, guard) = guard();
        provider.add_session("tok", "subj-1", "officer@centro.org");
        profiles.seed("subj-1", "officer@centro.org", StaffRole::Officer);

        let identity = guard.authenticate(&ctx(Some(ORIGIN), Some("tok"))).await.unwrap();

        assert!(guard
            .authorize_resource(&identity, Resource::Classes, ResourceAction::Edit)
            .await
            .is_ok());
        assert!(guard
            .authorize_resource(&identity, Resource::Users, ResourceAction::Delete)
            .await
            .is_err());
    }

    #[test]
    fn test_payload_ceiling() {
        let (_profiles, _provider, guard) = guard();
        let max = AdminConfig::default().max_payload_bytes;

        assert!(guard.check_payload_size(max - 1).is_ok());
        assert_eq!(
            guard.check_payload_size(max).unwrap_err(),
            AdminError::PayloadTooLarge
        );
        assert_eq!(
            guard.check_payload_size(max + 1).unwrap_err(),
            AdminError::PayloadTooLarge
        );
    }
}
