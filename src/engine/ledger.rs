use crate::domain::{Address, Amount, PoolId};
use std::collections::HashMap;

/// Identifies one staking slot of one wallet.
///
/// Plain token stake uses pool 0 with an empty token id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub wallet: Address,
    pub pool_id: PoolId,
    pub token_id: String,
}

impl PositionKey {
    pub fn new(wallet: Address, pool_id: PoolId, token_id: String) -> Self {
        Self {
            wallet,
            pool_id,
            token_id,
        }
    }

    /// The synthetic slot shared by all of a wallet's plain token stake.
    pub fn fungible(wallet: Address) -> Self {
        Self::new(wallet, PoolId::FUNGIBLE, String::new())
    }
}

/// Stake held in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StakePosition {
    /// The position's own staked amount.
    pub amount: Amount,
    /// Paired token id while a pairing is active.
    pub pair_token_id: Option<String>,
    /// Portion of combined pair deposits allocated to the paired side.
    pub pair_amount: Amount,
}

impl StakePosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paired(&self) -> bool {
        self.pair_token_id.is_some()
    }
}

/// Mapping of [`PositionKey`] to [`StakePosition`] built by one reduction pass.
///
/// Wallets and their slots iterate in first-seen order so summaries are
/// reproducible for the same input sequence.
#[derive(Debug, Clone, Default)]
pub struct StakeLedger {
    positions: HashMap<PositionKey, StakePosition>,
    wallets: Vec<WalletSlots>,
    wallet_index: HashMap<Address, usize>,
}

#[derive(Debug, Clone)]
struct WalletSlots {
    wallet: Address,
    keys: Vec<PositionKey>,
}

impl StakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position for `key`, created zeroed if absent.
    pub fn entry(&mut self, key: PositionKey) -> &mut StakePosition {
        if !self.positions.contains_key(&key) {
            let slot = match self.wallet_index.get(&key.wallet) {
                Some(&idx) => idx,
                None => {
                    self.wallets.push(WalletSlots {
                        wallet: key.wallet.clone(),
                        keys: Vec::new(),
                    });
                    self.wallet_index
                        .insert(key.wallet.clone(), self.wallets.len() - 1);
                    self.wallets.len() - 1
                }
            };
            self.wallets[slot].keys.push(key.clone());
        }
        self.positions.entry(key).or_default()
    }

    pub fn get(&self, key: &PositionKey) -> Option<&StakePosition> {
        self.positions.get(key)
    }

    /// Wallets in first-seen order.
    pub fn wallets(&self) -> impl Iterator<Item = &Address> {
        self.wallets.iter().map(|w| &w.wallet)
    }

    /// A wallet's positions in first-seen order.
    pub fn positions_of<'a>(
        &'a self,
        wallet: &Address,
    ) -> impl Iterator<Item = (&'a PositionKey, &'a StakePosition)> + 'a {
        let keys: &'a [PositionKey] = match self.wallet_index.get(wallet) {
            Some(&idx) => self.wallets[idx].keys.as_slice(),
            None => &[],
        };
        keys.iter()
            .filter_map(move |k| self.positions.get(k).map(|p| (k, p)))
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s.to_string())
    }

    #[test]
    fn test_entry_creates_zeroed_position() {
        let mut ledger = StakeLedger::new();
        let pos = ledger.entry(PositionKey::fungible(addr("0xa")));
        assert_eq!(*pos, StakePosition::new());
        assert!(!pos.is_paired());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.wallet_count(), 1);
    }

    #[test]
    fn test_entry_is_stable_across_calls() {
        let mut ledger = StakeLedger::new();
        let key = PositionKey::new(addr("0xa"), PoolId(1), "42".to_string());
        ledger.entry(key.clone()).amount = Amount::from_base_units(5);
        ledger.entry(key.clone()).amount += Amount::from_base_units(5);

        assert_eq!(ledger.get(&key).unwrap().amount, Amount::from_base_units(10));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_iteration_is_first_seen_order() {
        let mut ledger = StakeLedger::new();
        ledger.entry(PositionKey::new(addr("0xb"), PoolId(2), "9".to_string()));
        ledger.entry(PositionKey::fungible(addr("0xa")));
        ledger.entry(PositionKey::new(addr("0xb"), PoolId(1), "1".to_string()));
        ledger.entry(PositionKey::new(addr("0xb"), PoolId(2), "9".to_string()));

        let wallets: Vec<_> = ledger.wallets().map(|w| w.as_str()).collect();
        assert_eq!(wallets, vec!["0xb", "0xa"]);

        let tokens: Vec<_> = ledger
            .positions_of(&addr("0xb"))
            .map(|(k, _)| (k.pool_id, k.token_id.as_str()))
            .collect();
        assert_eq!(tokens, vec![(PoolId(2), "9"), (PoolId(1), "1")]);
    }

    #[test]
    fn test_wallets_are_case_sensitive_keys() {
        let mut ledger = StakeLedger::new();
        ledger.entry(PositionKey::fungible(addr("0xAB")));
        ledger.entry(PositionKey::fungible(addr("0xab")));
        assert_eq!(ledger.wallet_count(), 2);
        assert_eq!(ledger.positions_of(&addr("0xcd")).count(), 0);
    }
}
