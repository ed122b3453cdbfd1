//! Transaction message decoding.
//!
//! Turns a JSON transaction description into the signer's address and
//! the canonical bytes that address must sign.
//!
//! - `tx`: the closed set of transaction kinds and the JSON parser
//! - `sign_doc`: rendering of the sign document

pub mod sign_doc;
pub mod tx;

pub use sign_doc::NATIVE_DENOM;
pub use tx::{
    RedelegateDetail, StakeDetail, TransferDetail, TxKind, TxMessage, VoteDetail, VoteOption,
    WithdrawRewardDetail,
};
