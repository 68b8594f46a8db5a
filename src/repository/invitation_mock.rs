use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::{CreateInvitation, Invitation, InvitationRepository, Page};
use crate::error::AdminError;

/// In-memory invitation repository for tests.
///
/// The acceptance path performs its check-and-set under a single lock,
/// mirroring the conditional update the real backend issues.
#[derive(Default)]
pub struct MockInvitationRepository {
    pub invitations: Mutex<Vec<Invitation>>,
    next_id: Mutex<i64>,
}

impl MockInvitationRepository {
    pub fn new() -> Self {
        Self {
            invitations: Mutex::new(vec![]),
            next_id: Mutex::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        id
    }
}

#[async_trait]
impl InvitationRepository for MockInvitationRepository {
    async fn create(&self, data: CreateInvitation) -> Result<Invitation, AdminError> {
        let invitation = Invitation {
            id: self.next_id(),
            email: data.email,
            role: data.role,
            token_hash: data.token_hash,
            invited_by: data.invited_by,
            expires_at: data.expires_at,
            accepted_at: None,
            created_at: Utc::now(),
        };

        let mut invitations = self.invitations.lock().unwrap();

        // emulates the partial unique index on active rows
        if invitations
            .iter()
            .any(|i| i.email.eq_ignore_ascii_case(&invitation.email) && i.is_active())
        {
            return Err(AdminError::InvitationPending);
        }

        invitations.push(invitation.clone());
        drop(invitations);

        Ok(invitation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invitation>, AdminError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Invitation>, AdminError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations
            .iter()
            .find(|i| i.token_hash == token_hash)
            .cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<Invitation>, AdminError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations
            .iter()
            .find(|i| i.email.eq_ignore_ascii_case(email) && i.is_active())
            .cloned())
    }

    async fn accept_pending(&self, token_hash: &str) -> Result<Option<Invitation>, AdminError> {
        let mut invitations = self.invitations.lock().unwrap();
        let now = Utc::now();

        // check-and-set under one lock: exactly one caller can observe
        // accepted_at == None for a given token
        if let Some(invitation) = invitations.iter_mut().find(|i| {
            i.token_hash == token_hash && i.accepted_at.is_none() && i.expires_at > now
        }) {
            invitation.accepted_at = Some(now);
            return Ok(Some(invitation.clone()));
        }

        Ok(None)
    }

    async fn delete(&self, id: i64) -> Result<(), AdminError> {
        let mut invitations = self.invitations.lock().unwrap();
        let len_before = invitations.len();
        invitations.retain(|i| i.id != id);
        if invitations.len() < len_before {
            Ok(())
        } else {
            Err(AdminError::NotFound)
        }
    }

    async fn list(&self, page: Page) -> Result<Vec<Invitation>, AdminError> {
        let invitations = self.invitations.lock().unwrap();
        Ok(invitations
            .iter()
            .rev()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn delete_expired(&self) -> Result<u64, AdminError> {
        let mut invitations = self.invitations.lock().unwrap();
        let now = Utc::now();
        let len_before = invitations.len();
        invitations.retain(|i| i.accepted_at.is_some() || i.expires_at > now);
        Ok((len_before - invitations.len()) as u64)
    }
}
