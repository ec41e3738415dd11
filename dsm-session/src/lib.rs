//! # DSM Session
//!
//! Page-side draft handling for the decision-support method pages:
//! - Scraping and restoring page fields ([`fields`])
//! - Deciding when to autosave ([`autosave`])
//! - Deciding whether leaving the page needs confirmation ([`navigation`])
//! - Talking to the draft service ([`client`], [`session`])

pub mod autosave;
pub mod client;
pub mod fields;
pub mod navigation;
pub mod session;

pub use autosave::{AutoSaveTracker, SaveDecision};
pub use client::{ClientError, DraftClient};
pub use fields::{gather, restore, FieldRegistry, FieldSink, FieldSource, MemoryFields};
pub use navigation::{LeaveDecision, NavigationContext, NavigationEvent};
pub use session::{DraftSession, SaveOutcome, DEFAULT_AUTOSAVE_INTERVAL};
