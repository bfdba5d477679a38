//! Writes claim progress onto the owning membership's reward track.

use crate::domain::foundation::Email;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::MembershipRepository;

/// Attempts at projecting a claim before giving up on a contended record.
pub const MAX_PROJECTION_ATTEMPTS: usize = 3;

/// Loads the membership for `email`, applies `change`, and stores it.
///
/// `change` returns `false` when it left the record alone; nothing is written
/// then. A lost compare-and-swap reloads the record and reapplies `change`.
pub(super) async fn project_onto_membership<F>(
    memberships: &dyn MembershipRepository,
    email: &Email,
    change: F,
) -> Result<Membership, MembershipError>
where
    F: Fn(&mut Membership) -> Result<bool, MembershipError>,
{
    let mut attempt = 1;
    loop {
        let mut membership = memberships
            .find_by_email(email)
            .await?
            .ok_or_else(|| MembershipError::not_found(email.clone()))?;
        if !change(&mut membership)? {
            return Ok(membership);
        }

        match memberships.update(&mut membership).await {
            Ok(()) => return Ok(membership),
            Err(e) if e.is_conflict() && attempt < MAX_PROJECTION_ATTEMPTS => {
                tracing::debug!(email = %email, attempt, "Membership changed concurrently, retrying claim projection");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
