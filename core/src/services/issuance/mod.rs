//! Verification code issuance
//!
//! Emails a caller-supplied code to an address, then records the code under
//! that address with the store's server time:
//! - Message rendering from the configured template
//! - Dispatch through a mail transport
//! - Record write through a document store (last write wins)

mod config;
mod service;
mod traits;
mod types;


pub use config::VerificationIssuerConfig;
pub use service::VerificationCodeIssuer;
pub use traits::{DocumentStoreTrait, MailTransportTrait};
pub use types::{DispatchReceipt, IssueCodeResult, IssuerHealth, CheckOutcome};
