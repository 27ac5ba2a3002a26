//! Business services containing domain logic and use cases.

pub mod issuance;

pub use issuance::{
    CheckOutcome, DispatchReceipt, DocumentStoreTrait, IssueCodeResult, IssuerHealth,
    MailTransportTrait, VerificationCodeIssuer, VerificationIssuerConfig,
};
