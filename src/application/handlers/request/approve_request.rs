//! ApproveMembershipRequestHandler - Activates or renews a membership.
//!
//! # Flow
//!
//! 1. Resolve the request's plan (legacy default when unknown)
//! 2. Existing, fully claimed membership: roll the cycle over.
//!    No membership: start a first cycle.
//!    Existing membership with open rewards: refuse.
//! 3. Mark the request approved
//! 4. Best-effort, concurrently: set `is_member` and credit the referrer
//! 5. Dispatch the approval email in the background

use std::sync::Arc;

use crate::domain::foundation::MembershipRequestId;
use crate::domain::membership::{Membership, MembershipError, ReferralKind, ReferredParty};
use crate::domain::request::MembershipRequest;
use crate::ports::{
    MemberDirectory, MembershipRepository, MembershipRequestRepository, Notifier, PlanCatalog,
};

use super::super::effects::{
    dispatch_notification, set_member_flag, DegradedEffect, NotificationKind,
};
use super::super::membership::{CreditOutcome, CycleRollover, ReferralCreditor};

#[derive(Debug, Clone)]
pub struct ApproveMembershipRequestCommand {
    pub id: MembershipRequestId,
}

#[derive(Debug, Clone)]
pub struct ApproveMembershipRequestResult {
    pub membership: Membership,
    pub request: MembershipRequest,
    /// True when an earlier cycle was archived.
    pub renewed: bool,
    /// Referrer after crediting, when the request carried a valid code.
    pub referrer: Option<Membership>,
    pub degraded: Vec<DegradedEffect>,
}

pub struct ApproveMembershipRequestHandler {
    requests: Arc<dyn MembershipRequestRepository>,
    memberships: Arc<dyn MembershipRepository>,
    plans: Arc<dyn PlanCatalog>,
    directory: Arc<dyn MemberDirectory>,
    notifier: Arc<dyn Notifier>,
    creditor: Arc<ReferralCreditor>,
    rollover: Arc<CycleRollover>,
}

impl ApproveMembershipRequestHandler {
    pub fn new(
        requests: Arc<dyn MembershipRequestRepository>,
        memberships: Arc<dyn MembershipRepository>,
        plans: Arc<dyn PlanCatalog>,
        directory: Arc<dyn MemberDirectory>,
        notifier: Arc<dyn Notifier>,
        creditor: Arc<ReferralCreditor>,
        rollover: Arc<CycleRollover>,
    ) -> Self {
        Self {
            requests,
            memberships,
            plans,
            directory,
            notifier,
            creditor,
            rollover,
        }
    }

    pub async fn handle(
        &self,
        cmd: ApproveMembershipRequestCommand,
    ) -> Result<ApproveMembershipRequestResult, MembershipError> {
        let mut request = self
            .requests
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| MembershipError::request_not_found(cmd.id))?;
        if !request.is_pending() {
            return Err(MembershipError::request_already_decided(
                request.id,
                request.status.as_str(),
            ));
        }

        let plan = self.plans.resolve(request.plan_id.as_deref()).await?;

        let (membership, renewed) = match self.memberships.find_by_email(&request.email).await? {
            Some(mut existing) if existing.is_fully_claimed() => {
                existing.name = request.name.clone();
                existing.mobile = request.mobile.clone();
                self.rollover.roll_over(&mut existing, &plan).await?;
                (existing, true)
            }
            Some(_) => {
                return Err(MembershipError::active_membership_exists(request.email));
            }
            None => {
                let code = self.rollover.issue_code(&request.name).await?;
                let membership = Membership::activate(
                    request.email.clone(),
                    request.name.clone(),
                    request.mobile.clone(),
                    &plan,
                    code,
                );
                self.memberships.insert(&membership).await?;
                (membership, false)
            }
        };

        request.approve()?;
        self.requests.update(&request).await?;
        tracing::info!(
            request_id = %request.id,
            email = %membership.email,
            plan_id = %plan.id,
            renewed,
            referral_code = %membership.referral_code,
            "Membership request approved"
        );

        let (flag, credit) = futures::join!(
            set_member_flag(self.directory.as_ref(), &membership.email, true),
            self.credit_referrer(&request),
        );

        let mut degraded: Vec<DegradedEffect> = flag.into_iter().collect();
        let referrer = match credit {
            Some(Ok(outcome)) => {
                degraded.extend(outcome.degraded);
                Some(outcome.membership)
            }
            Some(Err(effect)) => {
                degraded.push(effect);
                None
            }
            None => None,
        };

        let notifier = self.notifier.clone();
        let approved = membership.clone();
        dispatch_notification(NotificationKind::MembershipApproved, async move {
            notifier.membership_approved(&approved).await
        });

        Ok(ApproveMembershipRequestResult {
            membership,
            request,
            renewed,
            referrer,
            degraded,
        })
    }

    async fn credit_referrer(
        &self,
        request: &MembershipRequest,
    ) -> Option<Result<CreditOutcome, DegradedEffect>> {
        let code = request.referral_code.as_deref()?;
        let party = ReferredParty::new(request.name.clone())
            .with_email(request.email.clone())
            .with_mobile(request.mobile.clone());

        Some(
            self.creditor
                .credit(code, party, ReferralKind::Membership)
                .await
                .map_err(|e| {
                    tracing::warn!(referral_code = %code, request_id = %request.id, error = %e, "Referrer not credited");
                    DegradedEffect::ReferralCredit {
                        referral_code: code.to_string(),
                        reason: e.message(),
                    }
                }),
        )
    }
}
