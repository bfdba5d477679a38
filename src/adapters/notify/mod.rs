//! Notifier adapters.
//!
//! - `messages` - Subject and body composition shared by every sender
//! - `resend` - Delivery through the Resend HTTP API
//! - `logging` - Writes messages to the log instead of sending them
//! - `recording` - Captures messages for test assertions

mod logging;
mod messages;
mod recording;
mod resend;

pub use logging::LoggingNotifier;
pub use messages::{EmailMessage, MessageComposer};
pub use recording::RecordingNotifier;
pub use resend::{ResendConfig, ResendNotifier};
