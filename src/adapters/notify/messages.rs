//! Email message composition.

use crate::domain::claim::{ClaimDetails, ClaimStatus, RewardClaim};
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Builds workflow emails for one storefront.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    store_name: String,
    admin_email: String,
}

impl MessageComposer {
    pub fn new(store_name: impl Into<String>, admin_email: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            admin_email: admin_email.into(),
        }
    }

    fn wrap(&self, title: &str, content: &str) -> String {
        format!(
            "<h1>{store}</h1><h2>{title}</h2>{content}<p>{store}</p>",
            store = self.store_name,
            title = title,
            content = content
        )
    }

    pub fn membership_request_received(&self, request: &MembershipRequest) -> EmailMessage {
        let mut content = format!(
            "<p>A new membership request has been submitted.</p>\
             <p><strong>Name:</strong> {}<br><strong>Email:</strong> {}<br>\
             <strong>Mobile:</strong> {}<br><strong>Submitted:</strong> {}</p>",
            request.name,
            request.email,
            request.mobile,
            request.submitted_at.as_datetime().format("%d %B %Y"),
        );
        if let Some(code) = &request.referral_code {
            content.push_str(&format!("<p><strong>Referral Code Used:</strong> {}</p>", code));
        }
        content.push_str("<p>Review the payment and approve or reject the request.</p>");

        EmailMessage {
            to: self.admin_email.clone(),
            subject: format!("New Membership Request - {}", request.name),
            html: self.wrap("New Membership Request", &content),
        }
    }

    pub fn membership_approved(&self, membership: &Membership) -> EmailMessage {
        let plan = &membership.plan;
        let mut rewards = String::new();
        if plan.cashback_enabled {
            rewards.push_str(&format!(
                "<li>Get <strong>100% Money Back</strong> after {} successful referrals</li>",
                plan.cashback_goal
            ));
        }
        if plan.gold_enabled {
            rewards.push_str(&format!(
                "<li>Earn a <strong>Gold Coin</strong> after {} successful referrals</li>",
                plan.gold_goal
            ));
        }
        let content = format!(
            "<p>Congratulations! Your {} membership has been approved.</p>\
             <p><strong>Your Referral Code:</strong> {}</p><ul>{}</ul>",
            plan.name, membership.referral_code, rewards
        );

        EmailMessage {
            to: membership.email.to_string(),
            subject: format!("Membership Approved - Welcome to {}!", self.store_name),
            html: self.wrap("Membership Approved!", &content),
        }
    }

    pub fn reward_claim_submitted(&self, claim: &RewardClaim) -> EmailMessage {
        let details = match &claim.details {
            ClaimDetails::Cashback {
                account_holder,
                upi_id,
                bank_account,
                ifsc,
            } => format!(
                "<p><strong>Account Holder:</strong> {}<br><strong>UPI ID:</strong> {}<br>\
                 <strong>Account Number:</strong> {}<br><strong>IFSC:</strong> {}</p>",
                account_holder,
                upi_id.as_deref().unwrap_or("N/A"),
                bank_account.as_deref().unwrap_or("N/A"),
                ifsc.as_deref().unwrap_or("N/A"),
            ),
            ClaimDetails::Gold { delivery_address } => {
                format!("<p><strong>Delivery Address:</strong> {}</p>", delivery_address)
            }
        };
        let label = claim.reward_type().display_name();
        let content = format!(
            "<p>A new {} claim has been submitted.</p>\
             <p><strong>Name:</strong> {}<br><strong>Email:</strong> {}<br>\
             <strong>Mobile:</strong> {}</p>{}",
            label, claim.name, claim.email, claim.mobile, details
        );

        EmailMessage {
            to: self.admin_email.clone(),
            subject: format!("New {} Claim - {}", label, claim.name),
            html: self.wrap("New Reward Claim", &content),
        }
    }

    /// `None` for statuses the member is not told about.
    pub fn claim_status_changed(&self, claim: &RewardClaim) -> Option<EmailMessage> {
        let label = claim.reward_type().display_name();
        let (title, message) = match claim.status {
            ClaimStatus::InProgress => (
                "Claim In Progress".to_string(),
                format!(
                    "Your {} claim is now being processed. We will update you once it is completed.",
                    label
                ),
            ),
            ClaimStatus::Completed => (
                "Claim Completed!".to_string(),
                match claim.details {
                    ClaimDetails::Cashback { .. } => {
                        "Your money back has been transferred to your account.".to_string()
                    }
                    ClaimDetails::Gold { .. } => {
                        "Your gold coin has been dispatched to your address.".to_string()
                    }
                },
            ),
            ClaimStatus::Pending | ClaimStatus::Rejected => return None,
        };
        let content = format!(
            "<p>{}</p><p><strong>Claim Type:</strong> {}<br><strong>Status:</strong> {}</p>\
             <p>Thank you for being a valued member of {}!</p>",
            message,
            label,
            claim.status.as_str().replace('_', " ").to_uppercase(),
            self.store_name
        );

        Some(EmailMessage {
            to: claim.email.to_string(),
            subject: format!("{} Claim Update - {}", label, title),
            html: self.wrap(&title, &content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Email;
    use crate::domain::membership::{ReferralCode, LEGACY_DEFAULT_PLAN};
    use crate::domain::request::NewMembershipRequest;

    fn composer() -> MessageComposer {
        MessageComposer::new("Gurubagavan Sarees", "owner@example.com")
    }

    fn claim(details: ClaimDetails) -> RewardClaim {
        RewardClaim::submit(
            Email::new("meena@example.com").unwrap(),
            "Meena",
            "9000000001",
            None,
            details,
        )
        .unwrap()
    }

    #[test]
    fn request_alert_goes_to_admin_with_code() {
        let request = MembershipRequest::submit(NewMembershipRequest {
            name: "Kavya".to_string(),
            email: Email::new("kavya@example.com").unwrap(),
            mobile: "9000000002".to_string(),
            referral_code: Some("abc123".to_string()),
            plan_id: None,
            screenshot_url: None,
        })
        .unwrap();

        let message = composer().membership_request_received(&request);
        assert_eq!(message.to, "owner@example.com");
        assert_eq!(message.subject, "New Membership Request - Kavya");
        assert!(message.html.contains("ABC123"));
    }

    #[test]
    fn approval_lists_only_enabled_rewards() {
        let mut plan = LEGACY_DEFAULT_PLAN.clone();
        plan.gold_enabled = false;
        let membership = Membership::activate(
            Email::new("meena@example.com").unwrap(),
            "Meena",
            "9000000001",
            &plan,
            ReferralCode::new("MEE1234").unwrap(),
        );

        let message = composer().membership_approved(&membership);
        assert_eq!(message.to, "meena@example.com");
        assert!(message.html.contains("MEE1234"));
        assert!(message.html.contains("Money Back"));
        assert!(!message.html.contains("Gold Coin"));
    }

    #[test]
    fn claim_alert_includes_payout_details() {
        let message = composer().reward_claim_submitted(&claim(ClaimDetails::Cashback {
            account_holder: "Meena R".to_string(),
            upi_id: Some("meena@upi".to_string()),
            bank_account: None,
            ifsc: None,
        }));
        assert_eq!(message.to, "owner@example.com");
        assert_eq!(message.subject, "New Money Back Claim - Meena");
        assert!(message.html.contains("meena@upi"));
    }

    #[test]
    fn status_update_only_for_progress_and_completion() {
        let mut c = claim(ClaimDetails::Gold {
            delivery_address: "12 Temple St".to_string(),
        });
        assert!(composer().claim_status_changed(&c).is_none());

        c.status = ClaimStatus::InProgress;
        let message = composer().claim_status_changed(&c).unwrap();
        assert_eq!(message.subject, "Gold Coin Claim Update - Claim In Progress");
        assert!(message.html.contains("IN PROGRESS"));

        c.status = ClaimStatus::Rejected;
        assert!(composer().claim_status_changed(&c).is_none());
    }
}
