//! Raw staking logs as handed over by the log-decoding collaborator.
//!
//! A raw log names its event and carries loosely typed `args`. Decoding turns
//! it into a typed [`LoggedEvent`]; logs of any other event kind decode to
//! `None` and are dropped before reduction.

use crate::domain::{Address, Amount, LoggedEvent, PoolId, StakeEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStakeLog {
    pub block_number: u64,
    /// Required for every known event kind; logs without it cannot be
    /// placed in chain order and are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{event} log in block {block} has no logIndex")]
    MissingLogIndex { event: String, block: u64 },
    #[error("{event} log at {block}:{log_index} is missing arg {arg}")]
    MissingArg {
        event: String,
        block: u64,
        log_index: u64,
        arg: &'static str,
    },
    #[error("{event} log at {block}:{log_index} has invalid arg {arg}: {value}")]
    InvalidArg {
        event: String,
        block: u64,
        log_index: u64,
        arg: &'static str,
        value: String,
    },
}

impl RawStakeLog {
    /// Decode into a typed event.
    ///
    /// Returns `Ok(None)` when the event kind is absent or unrecognized.
    pub fn decode(&self) -> Result<Option<LoggedEvent>, DecodeError> {
        let Some(kind) = self.event.as_deref() else {
            return Ok(None);
        };
        if !StakeEvent::KNOWN_KINDS.contains(&kind) {
            return Ok(None);
        }
        let Some(log_index) = self.log_index else {
            return Err(DecodeError::MissingLogIndex {
                event: kind.to_string(),
                block: self.block_number,
            });
        };

        let event = match kind {
            "Deposit" => StakeEvent::Deposit {
                wallet: self.address_arg("user")?,
                amount: self.amount_arg("amount")?,
            },
            "Withdraw" => StakeEvent::Withdraw {
                wallet: self.address_arg("user")?,
                amount: self.amount_arg("amount")?,
            },
            "DepositNft" => StakeEvent::DepositNft {
                wallet: self.address_arg("user")?,
                pool_id: self.pool_arg("poolId")?,
                token_id: self.token_arg("tokenId")?,
                amount: self.amount_arg("amount")?,
            },
            "WithdrawNft" => StakeEvent::WithdrawNft {
                wallet: self.address_arg("user")?,
                pool_id: self.pool_arg("poolId")?,
                token_id: self.token_arg("tokenId")?,
                amount: self.amount_arg("amount")?,
            },
            "DepositPairNft" => StakeEvent::DepositPairNft {
                wallet: self.address_arg("user")?,
                main_pool_id: self.pool_arg("mainTypePoolId")?,
                main_token_id: self.token_arg("mainTokenId")?,
                bakc_token_id: self.token_arg("bakcTokenId")?,
                combined_amount: self.amount_arg("amount")?,
            },
            "WithdrawPairNft" => StakeEvent::WithdrawPairNft {
                wallet: self.address_arg("user")?,
                main_pool_id: self.pool_arg("mainTypePoolId")?,
                main_token_id: self.token_arg("mainTokenId")?,
                combined_amount: self.amount_arg("amount")?,
            },
            _ => return Ok(None),
        };

        Ok(Some(LoggedEvent {
            block_number: self.block_number,
            log_index,
            transaction_hash: self.transaction_hash.clone(),
            event,
        }))
    }

    fn arg(&self, name: &'static str) -> Result<&serde_json::Value, DecodeError> {
        self.args
            .get(name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| DecodeError::MissingArg {
                event: self.event.clone().unwrap_or_default(),
                block: self.block_number,
                log_index: self.log_index.unwrap_or_default(),
                arg: name,
            })
    }

    fn invalid(&self, name: &'static str, value: &serde_json::Value) -> DecodeError {
        DecodeError::InvalidArg {
            event: self.event.clone().unwrap_or_default(),
            block: self.block_number,
            log_index: self.log_index.unwrap_or_default(),
            arg: name,
            value: value.to_string(),
        }
    }

    fn address_arg(&self, name: &'static str) -> Result<Address, DecodeError> {
        let value = self.arg(name)?;
        value
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Address::new(s.trim().to_string()))
            .ok_or_else(|| self.invalid(name, value))
    }

    fn amount_arg(&self, name: &'static str) -> Result<Amount, DecodeError> {
        let value = self.arg(name)?;
        parse_numeric(value).ok_or_else(|| self.invalid(name, value))
    }

    fn pool_arg(&self, name: &'static str) -> Result<PoolId, DecodeError> {
        let value = self.arg(name)?;
        parse_numeric(value)
            .filter(|a| !a.is_negative())
            .and_then(|a| a.to_string().parse::<u64>().ok())
            .map(PoolId)
            .ok_or_else(|| self.invalid(name, value))
    }

    /// Token ids are normalized to their decimal string form.
    fn token_arg(&self, name: &'static str) -> Result<String, DecodeError> {
        let value = self.arg(name)?;
        parse_numeric(value)
            .filter(|a| !a.is_negative())
            .map(|a| a.to_string())
            .ok_or_else(|| self.invalid(name, value))
    }
}

/// Accepts decimal/hex strings, JSON integers and ethers `BigNumber` objects.
fn parse_numeric(value: &serde_json::Value) -> Option<Amount> {
    match value {
        serde_json::Value::String(s) => Amount::parse(s).ok(),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(Amount::from_base_units(u128::from(u)))
            } else {
                n.as_i64().and_then(|i| Amount::parse(&i.to_string()).ok())
            }
        }
        serde_json::Value::Object(obj) => obj
            .get("hex")
            .or_else(|| obj.get("_hex"))
            .and_then(|h| h.as_str())
            .and_then(|h| Amount::parse(h).ok()),
        _ => None,
    }
}
