//! # APIエンドポイント

pub mod sign_claim;
pub mod signer_info;

pub use sign_claim::handle_sign_claim;
pub use signer_info::handle_signer_info;
