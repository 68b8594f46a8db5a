use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use super::{CreateProfile, Page, Profile, ProfileRepository, UpsertProfile};
use crate::error::AdminError;
use crate::roles::StaffRole;

/// In-memory profile repository for tests.
#[derive(Default)]
pub struct MockProfileRepository {
    pub profiles: Mutex<Vec<Profile>>,
}

impl MockProfileRepository {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(vec![]),
        }
    }

    /// Seeds a profile directly, bypassing validation. Test setup only.
    pub fn seed(&self, id: &str, email: &str, role: StaffRole) {
        let now = Utc::now();
        self.profiles.lock().unwrap().push(Profile {
            id: id.to_owned(),
            email: email.to_owned(),
            full_name: "Seeded User".to_owned(),
            role,
            invited_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        });
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn create(&self, data: CreateProfile) -> Result<Profile, AdminError> {
        let mut profiles = self.profiles.lock().unwrap();

        // emulates the unique index on lower(email)
        if profiles
            .iter()
            .any(|p| p.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AdminError::EmailTaken);
        }

        let now = Utc::now();
        let profile = Profile {
            id: data.id,
            email: data.email,
            full_name: data.full_name,
            role: data.role,
            invited_by: data.invited_by,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        profiles.push(profile.clone());
        drop(profiles);

        Ok(profile)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AdminError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AdminError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn upsert_self(&self, data: UpsertProfile) -> Result<Profile, AdminError> {
        let mut profiles = self.profiles.lock().unwrap();
        let now = Utc::now();

        if let Some(profile) = profiles.iter_mut().find(|p| p.id == data.id) {
            profile.full_name = data.full_name;
            profile.email = data.email;
            profile.updated_at = now;
            return Ok(profile.clone());
        }

        let profile = Profile {
            id: data.id,
            email: data.email,
            full_name: data.full_name,
            role: StaffRole::Officer,
            invited_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        profiles.push(profile.clone());
        drop(profiles);

        Ok(profile)
    }

    async fn update_role(&self, id: &str, role: StaffRole) -> Result<Profile, AdminError> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(profile) = profiles.iter_mut().find(|p| p.id == id) {
            profile.role = role;
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        } else {
            Err(AdminError::NotFound)
        }
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Profile, AdminError> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(profile) = profiles.iter_mut().find(|p| p.id == id) {
            profile.is_active = is_active;
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        } else {
            Err(AdminError::NotFound)
        }
    }

    async fn delete(&self, id: &str) -> Result<(), AdminError> {
        let mut profiles = self.profiles.lock().unwrap();
        let len_before = profiles.len();
        profiles.retain(|p| p.id != id);
        if profiles.len() < len_before {
            Ok(())
        } else {
            Err(AdminError::NotFound)
        }
    }

    async fn list(&self, page: Page) -> Result<Vec<Profile>, AdminError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}
