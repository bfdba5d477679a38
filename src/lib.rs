//! Membership Rewards - Referral reward lifecycle engine
//!
//! This crate turns a one-time membership payment into a referral reward
//! cycle: admins approve payment requests, referral codes collect credits
//! toward a plan-defined milestone, members claim cashback and gold coin
//! rewards, and fully claimed cycles roll over into the next one.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
