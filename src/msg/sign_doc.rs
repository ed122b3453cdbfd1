//! Canonical sign bytes.
//!
//! The document is compact amino-style JSON with a fixed key order:
//!
//! ```text
//! {"account_number":N,"chain_id":"...","fee":{"amount":[{"denom":"cet","amount":"..."}],"gas":"..."},
//!  "memo":"...","msg":[{"type":"...","value":{...}}],"sequence":N}
//! ```
//!
//! Struct field order fixes the key order, and serde_json handles string
//! escaping.

use serde::Serialize;
use serde_json::value::{to_raw_value, RawValue};

use super::tx::{TxKind, TxMessage};
use crate::errors::{ColdVaultError, Result};

/// Denomination of fees and staking amounts.
pub const NATIVE_DENOM: &str = "cet";

#[derive(Serialize)]
struct Coin<'a> {
    denom: &'a str,
    amount: &'a str,
}

#[derive(Serialize)]
struct StdFee<'a> {
    amount: [Coin<'a>; 1],
    gas: &'a str,
}

#[derive(Serialize)]
struct SignDoc<'a> {
    account_number: i64,
    chain_id: &'a str,
    fee: StdFee<'a>,
    memo: &'a str,
    msg: &'a RawValue,
    sequence: i64,
}

#[derive(Serialize)]
struct Typed<T> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: T,
}

#[derive(Serialize)]
struct MsgSend<'a> {
    from_address: &'a str,
    to_address: &'a str,
    amount: [Coin<'a>; 1],
    unlock_time: &'static str,
}

#[derive(Serialize)]
struct MsgWithdrawDelegationReward<'a> {
    delegator_address: &'a str,
    validator_address: &'a str,
}

/// Body of both `MsgDelegate` and `MsgUndelegate`.
#[derive(Serialize)]
struct MsgDelegate<'a> {
    delegator_address: &'a str,
    validator_address: &'a str,
    amount: Coin<'a>,
}

#[derive(Serialize)]
struct MsgBeginRedelegate<'a> {
    delegator_address: &'a str,
    validator_src_address: &'a str,
    validator_dst_address: &'a str,
    amount: Coin<'a>,
}

#[derive(Serialize)]
struct MsgVote<'a> {
    proposal_id: String,
    voter: &'a str,
    option: &'static str,
}

/// Render a one-element message list.
fn single<T: Serialize>(kind: &'static str, value: T) -> Result<Box<RawValue>> {
    to_raw_value(&[Typed { kind, value }])
        .map_err(|e| ColdVaultError::SerializationError(format!("{kind}: {e}")))
}

fn native(amount: &str) -> Coin<'_> {
    Coin {
        denom: NATIVE_DENOM,
        amount,
    }
}

impl TxKind {
    /// The `msg` array of the sign document.
    pub fn msgs_json(&self) -> Result<Box<RawValue>> {
        match self {
            Self::Transfer(tx) => single(
                "bankx/MsgSend",
                MsgSend {
                    from_address: &tx.from,
                    to_address: &tx.to,
                    amount: [Coin {
                        denom: &tx.denom,
                        amount: &tx.amount,
                    }],
                    unlock_time: "0",
                },
            ),
            Self::WithdrawDelegatorReward(tx) => single(
                "cosmos-sdk/MsgWithdrawDelegationReward",
                MsgWithdrawDelegationReward {
                    delegator_address: &tx.delegator,
                    validator_address: &tx.validator,
                },
            ),
            Self::Delegate(tx) => single(
                "cosmos-sdk/MsgDelegate",
                MsgDelegate {
                    delegator_address: &tx.delegator,
                    validator_address: &tx.validator,
                    amount: native(&tx.amount),
                },
            ),
            Self::Undelegate(tx) => single(
                "cosmos-sdk/MsgUndelegate",
                MsgDelegate {
                    delegator_address: &tx.delegator,
                    validator_address: &tx.validator,
                    amount: native(&tx.amount),
                },
            ),
            Self::Redelegate(tx) => single(
                "cosmos-sdk/MsgBeginRedelegate",
                MsgBeginRedelegate {
                    delegator_address: &tx.delegator,
                    validator_src_address: &tx.validator_src,
                    validator_dst_address: &tx.validator_dst,
                    amount: native(&tx.amount),
                },
            ),
            Self::Vote(tx) => single(
                "cosmos-sdk/MsgVote",
                MsgVote {
                    proposal_id: tx.proposal_id.to_string(),
                    voter: &tx.voter,
                    option: tx.option.as_str(),
                },
            ),
            Self::Raw { msgs, .. } => RawValue::from_string(msgs.clone())
                .map_err(|e| ColdVaultError::InvalidMessage(format!("raw: messages: {e}"))),
        }
    }
}

impl TxMessage {
    /// Bytes the signer's key signs.
    pub fn sign_bytes(&self) -> Result<Vec<u8>> {
        let msg = self.kind.msgs_json()?;
        let doc = SignDoc {
            account_number: self.account_number,
            chain_id: &self.chain_id,
            fee: StdFee {
                amount: [native(&self.fee)],
                gas: &self.gas,
            },
            memo: &self.memo,
            msg: &msg,
            sequence: self.sequence,
        };
        serde_json::to_vec(&doc).map_err(|e| ColdVaultError::SerializationError(format!("sign doc: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_string(json: &str) -> String {
        let msg = TxMessage::parse(json).unwrap();
        String::from_utf8(msg.sign_bytes().unwrap()).unwrap()
    }

    #[test]
    fn transfer_document() {
        let got = sign_string(
            r#"{"tx_type":"transfer","tx":{"amount":"1","denom":"cet","from":"coinex1a","to":"coinex1b"},
               "account_number":5,"sequence":7,"fee":"100","gas":"200000","memo":"hi","chain_id":"coinexdex"}"#,
        );
        assert_eq!(
            got,
            r#"{"account_number":5,"chain_id":"coinexdex","fee":{"amount":[{"denom":"cet","amount":"100"}],"gas":"200000"},"memo":"hi","msg":[{"type":"bankx/MsgSend","value":{"from_address":"coinex1a","to_address":"coinex1b","amount":[{"denom":"cet","amount":"1"}],"unlock_time":"0"}}],"sequence":7}"#
        );
    }

    #[test]
    fn vote_proposal_id_is_a_string() {
        let got = sign_string(
            r#"{"tx_type":"vote","tx":{"proposal_id":12,"voter":"coinex1v","option":"NoWithVeto"},"chain_id":"c"}"#,
        );
        assert!(got.contains(
            r#""msg":[{"type":"cosmos-sdk/MsgVote","value":{"proposal_id":"12","voter":"coinex1v","option":"NoWithVeto"}}]"#
        ));
    }

    #[test]
    fn redelegate_uses_native_denom() {
        let got = sign_string(
            r#"{"tx_type":"redelegate","tx":{"amount":"9","delegator":"d","validator_src":"s","validator_dst":"t"}}"#,
        );
        assert!(got.contains(
            r#"{"type":"cosmos-sdk/MsgBeginRedelegate","value":{"delegator_address":"d","validator_src_address":"s","validator_dst_address":"t","amount":{"denom":"cet","amount":"9"}}}"#
        ));
    }

    #[test]
    fn undelegate_and_delegate_differ_only_in_type() {
        let tx = r#"{"amount":"3","delegator":"d","validator":"v"}"#;
        let d = sign_string(&format!(r#"{{"tx_type":"delegate","tx":{tx}}}"#));
        let u = sign_string(&format!(r#"{{"tx_type":"undelegate","tx":{tx}}}"#));
        assert_eq!(d.replace("MsgDelegate", "MsgUndelegate"), u);
    }

    #[test]
    fn raw_messages_are_spliced_verbatim() {
        let got = sign_string(
            r#"{"tx_type":"raw","tx":["coinex1s","[{\"type\":\"custom/Msg\",\"value\":{\"z\":1,\"a\":2}}]"],"sequence":1}"#,
        );
        assert!(got.contains(r#""msg":[{"type":"custom/Msg","value":{"z":1,"a":2}}],"sequence":1}"#));
    }

    #[test]
    fn memo_is_escaped() {
        let got = sign_string(
            r#"{"tx_type":"withdraw_delegator_reward","tx":{"delegator":"d","validator":"v"},"memo":"say \"hi\""}"#,
        );
        assert!(got.contains(r#""memo":"say \"hi\"""#));
        assert!(serde_json::from_str::<serde_json::Value>(&got).is_ok());
    }
}
