//! Data Transfer Objects for the callable endpoint

pub mod verification;

pub use verification::{SendCodeRequest, SendCodeResponse};
