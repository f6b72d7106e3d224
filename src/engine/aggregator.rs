use crate::domain::{Address, Amount, Decimal, PoolId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::StakeLedger;

/// Total stake per pool across all wallets, in base units.
///
/// Pool 3 is the synthetic sum of all active pairing amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTotals(pub BTreeMap<PoolId, Amount>);

impl PoolTotals {
    pub fn new() -> Self {
        PoolTotals(PoolId::REPORTED.iter().map(|p| (*p, Amount::ZERO)).collect())
    }

    pub fn get(&self, pool: PoolId) -> Amount {
        self.0.get(&pool).cloned().unwrap_or_default()
    }

    fn add(&mut self, pool: PoolId, amount: &Amount) {
        *self.0.entry(pool).or_default() += amount.clone();
    }

    /// Whole-token decimal strings, exact to the last base unit.
    pub fn to_display(&self) -> BTreeMap<PoolId, String> {
        self.0
            .iter()
            .map(|(pool, amount)| (*pool, amount.to_ether_string()))
            .collect()
    }
}

impl Default for PoolTotals {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of positions contributing to each pool.
///
/// Pool 3 counts once per active pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCounts(pub BTreeMap<PoolId, u64>);

impl PoolCounts {
    pub fn new() -> Self {
        PoolCounts(PoolId::REPORTED.iter().map(|p| (*p, 0)).collect())
    }

    pub fn get(&self, pool: PoolId) -> u64 {
        self.0.get(&pool).copied().unwrap_or_default()
    }

    fn increment(&mut self, pool: PoolId) {
        *self.0.entry(pool).or_default() += 1;
    }
}

impl Default for PoolCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// One staked slot as reported in a wallet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStake {
    /// Pool label.
    #[serde(rename = "type")]
    pub pool_type: String,
    pub token: String,
    pub amount: Decimal,
    pub pair: Option<String>,
    pub pair_amount: Decimal,
}

/// Per-wallet view of the ledger in whole-token decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub address: Address,
    /// Stake per pool for this wallet.
    pub stakes: BTreeMap<PoolId, Decimal>,
    pub tokens: Vec<TokenStake>,
}

/// Derived figures of one reduction pass. Immutable until the next pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeSnapshot {
    pub totals: PoolTotals,
    pub counts: PoolCounts,
    pub wallets: Vec<WalletSummary>,
}

/// Walks a completed ledger and derives totals, counts and summaries.
pub struct Aggregator;

impl Aggregator {
    /// Amounts too large for a display decimal are clamped in summaries;
    /// [`PoolTotals`] always stays exact.
    pub fn aggregate(ledger: &StakeLedger) -> StakeSnapshot {
        let mut totals = PoolTotals::new();
        let mut counts = PoolCounts::new();
        let mut wallets = Vec::with_capacity(ledger.wallet_count());

        for wallet in ledger.wallets() {
            let mut per_pool = PoolTotals::new();
            let mut tokens = Vec::new();

            for (key, position) in ledger.positions_of(wallet) {
                if position.amount.is_negative() || position.pair_amount.is_negative() {
                    warn!(
                        "Negative balance for {} pool={} token={:?}: amount={} pair_amount={}",
                        wallet, key.pool_id, key.token_id, position.amount, position.pair_amount
                    );
                }

                tokens.push(TokenStake {
                    pool_type: key.pool_id.label(),
                    token: key.token_id.clone(),
                    amount: display(wallet, &position.amount),
                    pair: position.pair_token_id.clone(),
                    pair_amount: display(wallet, &position.pair_amount),
                });

                per_pool.add(key.pool_id, &position.amount);
                totals.add(key.pool_id, &position.amount);
                counts.increment(key.pool_id);

                if position.is_paired() {
                    per_pool.add(PoolId::PAIRED, &position.pair_amount);
                    totals.add(PoolId::PAIRED, &position.pair_amount);
                    counts.increment(PoolId::PAIRED);
                }
            }

            let stakes = per_pool
                .0
                .iter()
                .map(|(pool, amount)| (*pool, display(wallet, amount)))
                .collect();

            wallets.push(WalletSummary {
                address: wallet.clone(),
                stakes,
                tokens,
            });
        }

        StakeSnapshot {
            totals,
            counts,
            wallets,
        }
    }
}

fn display(wallet: &Address, amount: &Amount) -> Decimal {
    if let Err(e) = amount.to_decimal() {
        warn!("Clamping display value for {}: {}", wallet, e);
    }
    amount.to_decimal_saturating()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PositionKey, StakeLedger};

    fn addr(s: &str) -> Address {
        Address::new(s.to_string())
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_empty_ledger_reports_all_pools_zeroed() {
        let snapshot = Aggregator::aggregate(&StakeLedger::new());
        assert_eq!(snapshot.totals.0.len(), 4);
        assert!(snapshot.totals.0.values().all(|a| a.is_zero()));
        assert!(snapshot.counts.0.values().all(|c| *c == 0));
        assert!(snapshot.wallets.is_empty());
    }

    #[test]
    fn test_paired_position_feeds_synthetic_pool() {
        let mut ledger = StakeLedger::new();
        let pos = ledger.entry(PositionKey::new(addr("0xa"), PoolId(2), "8828".to_string()));
        pos.amount = Amount::from_whole_tokens(2042);
        pos.pair_amount = Amount::from_whole_tokens(856);
        pos.pair_token_id = Some("7113".to_string());

        let snapshot = Aggregator::aggregate(&ledger);
        assert_eq!(snapshot.totals.get(PoolId(2)), Amount::from_whole_tokens(2042));
        assert_eq!(snapshot.totals.get(PoolId::PAIRED), Amount::from_whole_tokens(856));
        assert_eq!(snapshot.counts.get(PoolId(2)), 1);
        assert_eq!(snapshot.counts.get(PoolId::PAIRED), 1);

        let wallet = &snapshot.wallets[0];
        assert_eq!(wallet.stakes[&PoolId(2)], d("2042"));
        assert_eq!(wallet.stakes[&PoolId::PAIRED], d("856"));
        assert_eq!(
            wallet.tokens[0],
            TokenStake {
                pool_type: "mayc".to_string(),
                token: "8828".to_string(),
                amount: d("2042"),
                pair: Some("7113".to_string()),
                pair_amount: d("856"),
            }
        );
    }

    #[test]
    fn test_unpaired_leftover_pair_amount_is_not_counted() {
        let mut ledger = StakeLedger::new();
        let pos = ledger.entry(PositionKey::new(addr("0xa"), PoolId(1), "1".to_string()));
        pos.pair_amount = Amount::from_whole_tokens(10);

        let snapshot = Aggregator::aggregate(&ledger);
        assert!(snapshot.totals.get(PoolId::PAIRED).is_zero());
        assert_eq!(snapshot.counts.get(PoolId::PAIRED), 0);
        assert_eq!(snapshot.counts.get(PoolId(1)), 1);
        assert_eq!(snapshot.wallets[0].tokens[0].pair_amount, d("10"));
    }

    #[test]
    fn test_unreported_pool_gets_its_own_bucket() {
        let mut ledger = StakeLedger::new();
        ledger
            .entry(PositionKey::new(addr("0xa"), PoolId(9), "5".to_string()))
            .amount = Amount::from_whole_tokens(1);

        let snapshot = Aggregator::aggregate(&ledger);
        assert_eq!(snapshot.totals.get(PoolId(9)), Amount::from_whole_tokens(1));
        assert_eq!(snapshot.counts.get(PoolId(9)), 1);
        assert_eq!(snapshot.wallets[0].tokens[0].pool_type, "pool9");
    }

    #[test]
    fn test_totals_display_is_exact() {
        let mut ledger = StakeLedger::new();
        ledger.entry(PositionKey::fungible(addr("0xa"))).amount =
            Amount::parse("73672405488529540367431").unwrap();

        let snapshot = Aggregator::aggregate(&ledger);
        let display = snapshot.totals.to_display();
        assert_eq!(display[&PoolId::FUNGIBLE], "73672.405488529540367431");
        assert_eq!(display[&PoolId::PAIRED], "0.0");
    }

    #[test]
    fn test_oversized_position_is_clamped_not_fatal() {
        let huge = Amount::parse(&"9".repeat(50)).unwrap();
        let mut ledger = StakeLedger::new();
        ledger.entry(PositionKey::fungible(addr("0xa"))).amount = huge.clone();
        ledger.entry(PositionKey::fungible(addr("0xb"))).amount = Amount::from_base_units(1000);

        let snapshot = Aggregator::aggregate(&ledger);
        assert_eq!(
            snapshot.wallets[0].tokens[0].amount,
            Decimal::new(rust_decimal::Decimal::MAX)
        );
        assert_eq!(snapshot.wallets[1].tokens[0].amount, d("0.000000000000001"));
        assert_eq!(
            snapshot.totals.get(PoolId::FUNGIBLE),
            huge + Amount::from_base_units(1000)
        );
    }
}
