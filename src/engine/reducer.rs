use crate::domain::{Address, Amount, PoolId, StakeEvent};
use num_bigint::BigInt;

use super::{PositionKey, StakeLedger};

/// Cap on the part of a combined pair deposit credited to the paired side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCap(Amount);

impl PairCap {
    /// Cap in whole tokens, i.e. `tokens * 10^18` base units.
    pub fn whole_tokens(tokens: u64) -> Self {
        PairCap(Amount::from_whole_tokens(tokens))
    }

    /// Cap computed as `base^18` base units.
    ///
    /// Reproduces legacy output, where the cap was raised to the token's
    /// decimals instead of scaled by them.
    pub fn literal_power(base: u64) -> Self {
        PairCap(Amount::new(
            BigInt::from(base).pow(crate::domain::TOKEN_DECIMALS),
        ))
    }

    pub fn amount(&self) -> &Amount {
        &self.0
    }

    /// Split a combined pair amount into `(own, paired)` parts.
    ///
    /// Anything above the cap stays with the main position.
    pub fn split(&self, combined: Amount) -> (Amount, Amount) {
        if combined > self.0 {
            (combined - self.0.clone(), self.0.clone())
        } else {
            (Amount::ZERO, combined)
        }
    }
}

impl Default for PairCap {
    fn default() -> Self {
        PairCap::whole_tokens(856)
    }
}

/// Applies single events to a [`StakeLedger`].
///
/// Withdrawals are plain subtraction: balances are not checked and may go
/// negative when the upstream feed is incomplete or misordered.
#[derive(Debug, Clone, Default)]
pub struct EventReducer {
    pair_cap: PairCap,
}

impl EventReducer {
    pub fn new(pair_cap: PairCap) -> Self {
        Self { pair_cap }
    }

    pub fn pair_cap(&self) -> &PairCap {
        &self.pair_cap
    }

    /// Apply one event, touching only the position it targets.
    ///
    /// Callers must fold events in (block_number, log_index) order.
    pub fn apply(&self, ledger: &mut StakeLedger, event: &StakeEvent) {
        match event {
            StakeEvent::Deposit { wallet, amount } => {
                self.handle_fungible(ledger, wallet, amount.clone(), Direction::In)
            }
            StakeEvent::Withdraw { wallet, amount } => {
                self.handle_fungible(ledger, wallet, amount.clone(), Direction::Out)
            }
            StakeEvent::DepositNft {
                wallet,
                pool_id,
                token_id,
                amount,
            } => self.handle_nft(
                ledger,
                wallet,
                *pool_id,
                token_id,
                amount.clone(),
                Direction::In,
            ),
            StakeEvent::WithdrawNft {
                wallet,
                pool_id,
                token_id,
                amount,
            } => self.handle_nft(
                ledger,
                wallet,
                *pool_id,
                token_id,
                amount.clone(),
                Direction::Out,
            ),
            StakeEvent::DepositPairNft {
                wallet,
                main_pool_id,
                main_token_id,
                bakc_token_id,
                combined_amount,
            } => self.handle_pair_deposit(
                ledger,
                wallet,
                *main_pool_id,
                main_token_id,
                bakc_token_id,
                combined_amount.clone(),
            ),
            StakeEvent::WithdrawPairNft {
                wallet,
                main_pool_id,
                main_token_id,
                combined_amount,
            } => self.handle_pair_withdraw(
                ledger,
                wallet,
                *main_pool_id,
                main_token_id,
                combined_amount.clone(),
            ),
        }
    }

    /// Fold a whole ordered sequence into a fresh ledger.
    pub fn fold<'a, I>(&self, events: I) -> StakeLedger
    where
        I: IntoIterator<Item = &'a StakeEvent>,
    {
        let mut ledger = StakeLedger::new();
        for event in events {
            self.apply(&mut ledger, event);
        }
        ledger
    }

    fn handle_fungible(
        &self,
        ledger: &mut StakeLedger,
        wallet: &Address,
        amount: Amount,
        direction: Direction,
    ) {
        let position = ledger.entry(PositionKey::fungible(wallet.clone()));
        direction.apply(&mut position.amount, amount);
    }

    fn handle_nft(
        &self,
        ledger: &mut StakeLedger,
        wallet: &Address,
        pool_id: PoolId,
        token_id: &str,
        amount: Amount,
        direction: Direction,
    ) {
        let key = PositionKey::new(wallet.clone(), pool_id, token_id.to_string());
        let position = ledger.entry(key);
        direction.apply(&mut position.amount, amount);
    }

    fn handle_pair_deposit(
        &self,
        ledger: &mut StakeLedger,
        wallet: &Address,
        main_pool_id: PoolId,
        main_token_id: &str,
        bakc_token_id: &str,
        combined: Amount,
    ) {
        let (own, paired) = self.pair_cap.split(combined);
        let key = PositionKey::new(wallet.clone(), main_pool_id, main_token_id.to_string());
        let position = ledger.entry(key);

        position.amount += own;
        position.pair_amount += paired;
        position.pair_token_id = Some(bakc_token_id.to_string());
    }

    /// Mirror of the deposit split. The pairing marker is always cleared,
    /// even when some pair amount remains.
    fn handle_pair_withdraw(
        &self,
        ledger: &mut StakeLedger,
        wallet: &Address,
        main_pool_id: PoolId,
        main_token_id: &str,
        combined: Amount,
    ) {
        let (own, paired) = self.pair_cap.split(combined);
        let key = PositionKey::new(wallet.clone(), main_pool_id, main_token_id.to_string());
        let position = ledger.entry(key);

        position.amount -= own;
        position.pair_amount -= paired;
        position.pair_token_id = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

impl Direction {
    fn apply(self, balance: &mut Amount, amount: Amount) {
        match self {
            Direction::In => *balance += amount,
            Direction::Out => *balance -= amount,
        }
    }
}
