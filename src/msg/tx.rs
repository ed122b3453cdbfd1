//! Transaction descriptions and their parser.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::errors::{ColdVaultError, Result};

// ---------------------------------------------------------------------------
// Per-kind details
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferDetail {
    pub amount: String,
    pub denom: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawRewardDetail {
    pub delegator: String,
    pub validator: String,
}

/// Shared by `delegate` and `undelegate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StakeDetail {
    pub amount: String,
    pub delegator: String,
    pub validator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedelegateDetail {
    pub amount: String,
    pub delegator: String,
    pub validator_src: String,
    pub validator_dst: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoteDetail {
    pub proposal_id: i64,
    pub voter: String,
    pub option: VoteOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum VoteOption {
    Yes,
    No,
    Abstain,
    NoWithVeto,
}

impl VoteOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Abstain => "Abstain",
            Self::NoWithVeto => "NoWithVeto",
        }
    }
}

impl FromStr for VoteOption {
    type Err = ColdVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            "Abstain" => Ok(Self::Abstain),
            "NoWithVeto" => Ok(Self::NoWithVeto),
            other => Err(ColdVaultError::InvalidMessage(format!(
                "invalid vote option {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for VoteOption {
    type Error = ColdVaultError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// TxKind
// ---------------------------------------------------------------------------

/// Every transaction kind the signer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    Transfer(TransferDetail),
    WithdrawDelegatorReward(WithdrawRewardDetail),
    Delegate(StakeDetail),
    Undelegate(StakeDetail),
    Redelegate(RedelegateDetail),
    Vote(VoteDetail),
    /// Pre-rendered message list, signed as given.
    Raw { signer: String, msgs: String },
}

impl TxKind {
    /// The `tx_type` tag this kind is parsed from.
    pub fn tx_type(&self) -> &'static str {
        match self {
            Self::Transfer(_) => "transfer",
            Self::WithdrawDelegatorReward(_) => "withdraw_delegator_reward",
            Self::Delegate(_) => "delegate",
            Self::Undelegate(_) => "undelegate",
            Self::Redelegate(_) => "redelegate",
            Self::Vote(_) => "vote",
            Self::Raw { .. } => "raw",
        }
    }

    /// Address whose key must sign this transaction.
    pub fn signer(&self) -> &str {
        match self {
            Self::Transfer(tx) => &tx.from,
            Self::WithdrawDelegatorReward(tx) => &tx.delegator,
            Self::Delegate(tx) | Self::Undelegate(tx) => &tx.delegator,
            Self::Redelegate(tx) => &tx.delegator,
            Self::Vote(tx) => &tx.voter,
            Self::Raw { signer, .. } => signer,
        }
    }

    fn from_parts(tx_type: &str, tx: Value) -> Result<Self> {
        Ok(match tx_type {
            "transfer" => Self::Transfer(detail(tx_type, tx)?),
            "withdraw_delegator_reward" => Self::WithdrawDelegatorReward(detail(tx_type, tx)?),
            "delegate" => Self::Delegate(detail(tx_type, tx)?),
            "undelegate" => Self::Undelegate(detail(tx_type, tx)?),
            "redelegate" => Self::Redelegate(detail(tx_type, tx)?),
            "vote" => Self::Vote(detail(tx_type, tx)?),
            "raw" => {
                let parts: Vec<String> = detail(tx_type, tx)?;
                let [signer, msgs]: [String; 2] = parts.try_into().map_err(|_| {
                    ColdVaultError::InvalidMessage(
                        "raw: tx must be [signer, messages JSON]".into(),
                    )
                })?;
                // Must be valid JSON, since it is spliced into the sign document.
                RawValue::from_string(msgs.clone())
                    .map_err(|e| ColdVaultError::InvalidMessage(format!("raw: messages: {e}")))?;
                Self::Raw { signer, msgs }
            }
            other => {
                return Err(ColdVaultError::InvalidMessage(format!(
                    "unknown tx_type {other:?}"
                )))
            }
        })
    }
}

fn detail<T: DeserializeOwned>(tx_type: &str, tx: Value) -> Result<T> {
    serde_json::from_value(tx).map_err(|e| ColdVaultError::InvalidMessage(format!("{tx_type}: {e}")))
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer(tx) => write!(
                f,
                "transfer {} {} from {} to {}",
                tx.amount, tx.denom, tx.from, tx.to
            ),
            Self::WithdrawDelegatorReward(tx) => write!(
                f,
                "withdraw rewards of {} from validator {}",
                tx.delegator, tx.validator
            ),
            Self::Delegate(tx) => write!(
                f,
                "delegate {} cet from {} to validator {}",
                tx.amount, tx.delegator, tx.validator
            ),
            Self::Undelegate(tx) => write!(
                f,
                "undelegate {} cet of {} from validator {}",
                tx.amount, tx.delegator, tx.validator
            ),
            Self::Redelegate(tx) => write!(
                f,
                "redelegate {} cet of {} from validator {} to {}",
                tx.amount, tx.delegator, tx.validator_src, tx.validator_dst
            ),
            Self::Vote(tx) => write!(
                f,
                "{} votes {} on proposal {}",
                tx.voter,
                tx.option.as_str(),
                tx.proposal_id
            ),
            Self::Raw { signer, msgs } => write!(f, "raw messages signed by {signer}: {msgs}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TxMessage
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope {
    tx: Value,
    tx_type: String,
    #[serde(default)]
    account_number: i64,
    #[serde(default)]
    sequence: i64,
    #[serde(default)]
    fee: String,
    #[serde(default)]
    gas: String,
    #[serde(default)]
    memo: String,
    #[serde(default)]
    chain_id: String,
}

/// A decoded transaction description, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxMessage {
    pub kind: TxKind,
    pub account_number: i64,
    pub sequence: i64,
    /// Fee amount, in cet.
    pub fee: String,
    pub gas: String,
    pub memo: String,
    pub chain_id: String,
}

impl TxMessage {
    /// Decode a JSON transaction description.
    ///
    /// ```text
    /// {"tx_type":"transfer","tx":{"amount":"1","denom":"cet","from":"coinex1...","to":"coinex1..."},
    ///  "account_number":5,"sequence":7,"fee":"100","gas":"200000","memo":"","chain_id":"coinexdex"}
    /// ```
    pub fn parse(json: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(json)
            .map_err(|e| ColdVaultError::InvalidMessage(e.to_string()))?;

        Ok(Self {
            kind: TxKind::from_parts(&envelope.tx_type, envelope.tx)?,
            account_number: envelope.account_number,
            sequence: envelope.sequence,
            fee: envelope.fee,
            gas: envelope.gas,
            memo: envelope.memo,
            chain_id: envelope.chain_id,
        })
    }

    pub fn signer(&self) -> &str {
        self.kind.signer()
    }

    pub fn tx_type(&self) -> &'static str {
        self.kind.tx_type()
    }
}
