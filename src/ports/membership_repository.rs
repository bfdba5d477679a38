//! Membership repository port.
//!
//! Defines the contract for persisting and retrieving Membership aggregates.
//!
//! # Design
//!
//! - **Keyed by email**: one record per member
//! - **Secondary index**: the current cycle's referral code resolves to the
//!   owning record without scanning
//! - **Optimistic locking**: `update` is a compare-and-swap on `version`
//!
//! # Example
//!
//! ```ignore
//! async fn credit(repo: &dyn MembershipRepository, code: &str) -> Result<(), DomainError> {
//!     let Some(mut membership) = repo.find_by_referral_code(code).await? else {
//!         return Ok(());
//!     };
//!     membership.credit_referral(ReferredParty::new("Devi"), ReferralKind::Registration)?;
//!     repo.update(&mut membership).await
//! }
//! ```

use crate::domain::foundation::{DomainError, Email};
use crate::domain::membership::Membership;
use async_trait::async_trait;

/// Repository port for Membership aggregate persistence.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Save a first-cycle membership.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if a record already exists for the email
    ///   or the referral code is already indexed
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, membership: &Membership) -> Result<(), DomainError>;

    /// Replace an existing membership if its stored version still matches.
    ///
    /// On success `membership.version` is bumped to the stored value.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` if the stored version moved or the record
    ///   is gone
    /// - `DatabaseError` on persistence failure
    async fn update(&self, membership: &mut Membership) -> Result<(), DomainError>;

    /// Find a membership by member email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Membership>, DomainError>;

    /// Find the membership whose current code matches `code`.
    ///
    /// Matching ignores case and surrounding whitespace.
    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Membership>, DomainError>;

    /// All memberships.
    async fn list_all(&self) -> Result<Vec<Membership>, DomainError>;
}
