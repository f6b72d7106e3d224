//! Staking events recognized by the reducer.

use crate::domain::{Address, Amount, EventOrderingKey, PoolId};
use serde::{Deserialize, Serialize};

/// A decoded staking event.
///
/// Plain token `Deposit`/`Withdraw` carry no pool or token; they land in the
/// synthetic fungible position (pool 0, empty token id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum StakeEvent {
    Deposit {
        wallet: Address,
        amount: Amount,
    },
    Withdraw {
        wallet: Address,
        amount: Amount,
    },
    #[serde(rename_all = "camelCase")]
    DepositNft {
        wallet: Address,
        pool_id: PoolId,
        token_id: String,
        amount: Amount,
    },
    #[serde(rename_all = "camelCase")]
    WithdrawNft {
        wallet: Address,
        pool_id: PoolId,
        token_id: String,
        amount: Amount,
    },
    #[serde(rename_all = "camelCase")]
    DepositPairNft {
        wallet: Address,
        main_pool_id: PoolId,
        main_token_id: String,
        bakc_token_id: String,
        combined_amount: Amount,
    },
    #[serde(rename_all = "camelCase")]
    WithdrawPairNft {
        wallet: Address,
        main_pool_id: PoolId,
        main_token_id: String,
        combined_amount: Amount,
    },
}

impl StakeEvent {
    /// Every event name the reducer understands.
    pub const KNOWN_KINDS: [&'static str; 6] = [
        "Deposit",
        "Withdraw",
        "DepositNft",
        "WithdrawNft",
        "DepositPairNft",
        "WithdrawPairNft",
    ];

    pub fn wallet(&self) -> &Address {
        match self {
            StakeEvent::Deposit { wallet, .. }
            | StakeEvent::Withdraw { wallet, .. }
            | StakeEvent::DepositNft { wallet, .. }
            | StakeEvent::WithdrawNft { wallet, .. }
            | StakeEvent::DepositPairNft { wallet, .. }
            | StakeEvent::WithdrawPairNft { wallet, .. } => wallet,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StakeEvent::Deposit { .. } => "Deposit",
            StakeEvent::Withdraw { .. } => "Withdraw",
            StakeEvent::DepositNft { .. } => "DepositNft",
            StakeEvent::WithdrawNft { .. } => "WithdrawNft",
            StakeEvent::DepositPairNft { .. } => "DepositPairNft",
            StakeEvent::WithdrawPairNft { .. } => "WithdrawPairNft",
        }
    }
}

/// A [`StakeEvent`] tagged with its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedEvent {
    pub block_number: u64,
    pub log_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(flatten)]
    pub event: StakeEvent,
}

impl LoggedEvent {
    pub fn new(block_number: u64, log_index: u64, event: StakeEvent) -> Self {
        Self {
            block_number,
            log_index,
            transaction_hash: None,
            event,
        }
    }

    pub fn ordering_key(&self) -> EventOrderingKey {
        EventOrderingKey::from_event(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_serde_tag() {
        let event = StakeEvent::DepositPairNft {
            wallet: Address::new("0xabc".to_string()),
            main_pool_id: PoolId(2),
            main_token_id: "8828".to_string(),
            bakc_token_id: "7113".to_string(),
            combined_amount: Amount::from_whole_tokens(2898),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.kind());
        assert_eq!(json["mainTokenId"], "8828");
        assert_eq!(json["combinedAmount"], "2898000000000000000000");
        assert!(StakeEvent::KNOWN_KINDS.contains(&event.kind()));
    }

    #[test]
    fn test_logged_event_flattens_payload() {
        let logged = LoggedEvent::new(
            16119150,
            3,
            StakeEvent::Deposit {
                wallet: Address::new("0xabc".to_string()),
                amount: Amount::from_base_units(1000),
            },
        );
        let json = serde_json::to_value(&logged).unwrap();
        assert_eq!(json["blockNumber"], 16119150);
        assert_eq!(json["event"], "Deposit");
        assert_eq!(json["amount"], "1000");

        let back: LoggedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, logged);
    }
}
