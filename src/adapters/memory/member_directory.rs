//! In-memory member directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, ErrorCode};
use crate::ports::MemberDirectory;

/// `is_member` flags by email.
///
/// When the directory runs standalone every email is treated as a known
/// account; `set_member` creates the entry on first write.
#[derive(Default)]
pub struct InMemoryMemberDirectory {
    flags: RwLock<HashMap<Email, bool>>,
    unavailable: AtomicBool,
}

impl InMemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail, simulating an unreachable user store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "member directory unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn is_member(&self, email: &Email) -> Result<Option<bool>, DomainError> {
        self.check_available()?;
        Ok(self.flags.read().await.get(email).copied())
    }

    async fn set_member(&self, email: &Email, is_member: bool) -> Result<(), DomainError> {
        self.check_available()?;
        self.flags.write().await.insert(email.clone(), is_member);
        Ok(())
    }
}
