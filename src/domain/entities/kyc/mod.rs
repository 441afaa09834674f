pub mod kyc_submission;

pub use kyc_submission::*;
