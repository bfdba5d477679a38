//! Membership request handlers.

mod approve_request;
mod get_requests;
mod reject_request;
mod submit_request;

pub use approve_request::{
    ApproveMembershipRequestCommand, ApproveMembershipRequestHandler,
    ApproveMembershipRequestResult,
};
pub use get_requests::{
    GetPendingRequestHandler, GetPendingRequestQuery, ListMembershipRequestsHandler,
};
pub use reject_request::{RejectMembershipRequestCommand, RejectMembershipRequestHandler};
pub use submit_request::{
    SubmitMembershipRequestCommand, SubmitMembershipRequestHandler, SubmitMembershipRequestResult,
};
