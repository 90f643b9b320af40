//! Per-sender transaction list
//!
//! Holds one sender's pending transactions keyed by nonce, partitioned into
//! a processable prefix and an unprocessable tail. The processable set is
//! always a prefix of the sorted nonces, starting at the smallest nonce
//! present; promotion and demotion move the boundary.

use crate::error::{TxPoolError, TxPoolResult};
use crate::events::RemoveReason;
use crate::pool::PooledTransaction;
use forge_primitives::{Address, H256, Nonce, U256};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A transaction displaced by sender-list admission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evicted {
    /// Id of the displaced transaction
    pub id: H256,
    /// Why it was displaced
    pub reason: RemoveReason,
}

/// One sender's pending transactions
#[derive(Debug)]
pub struct TransactionList {
    sender: Address,
    by_nonce: BTreeMap<Nonce, Arc<PooledTransaction>>,
    processable: BTreeSet<Nonce>,
    max_size: usize,
    min_replacement_fee_difference: U256,
}

impl TransactionList {
    /// Create an empty list for a sender
    pub fn new(sender: Address, max_size: usize, min_replacement_fee_difference: U256) -> Self {
        Self {
            sender,
            by_nonce: BTreeMap::new(),
            processable: BTreeSet::new(),
            max_size,
            min_replacement_fee_difference,
        }
    }

    /// The sender this list belongs to
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Number of transactions held
    pub fn len(&self) -> usize {
        self.by_nonce.len()
    }

    /// True when the list holds nothing
    pub fn is_empty(&self) -> bool {
        self.by_nonce.is_empty()
    }

    /// Get the transaction holding a nonce
    pub fn get(&self, nonce: Nonce) -> Option<&Arc<PooledTransaction>> {
        self.by_nonce.get(&nonce)
    }

    /// True when the nonce is in the processable prefix
    pub fn is_processable(&self, nonce: Nonce) -> bool {
        self.processable.contains(&nonce)
    }

    /// Highest processable nonce, if any
    pub fn max_processable_nonce(&self) -> Option<Nonce> {
        self.processable.iter().next_back().copied()
    }

    /// All nonces in ascending order
    pub fn nonces(&self) -> impl Iterator<Item = Nonce> + '_ {
        self.by_nonce.keys().copied()
    }

    /// Admit a transaction into the list.
    ///
    /// Same-nonce conflicts are replacements: rejected when the incumbent is
    /// processable or the fee increase is below the configured difference,
    /// otherwise the incumbent is displaced and the replacement installed as
    /// unprocessable. A full list evicts its highest unprocessable nonce to
    /// make room, but never for a transaction that would become the new
    /// maximum, and never by breaking the processable prefix.
    pub fn add(
        &mut self,
        tx: Arc<PooledTransaction>,
        processable: bool,
    ) -> TxPoolResult<Option<Evicted>> {
        let nonce = tx.nonce();

        if let Some(incumbent) = self.by_nonce.get(&nonce) {
            if self.processable.contains(&nonce) {
                return Err(TxPoolError::ProcessableNonceLocked(nonce));
            }
            let required = incumbent
                .tx
                .fee
                .saturating_add(self.min_replacement_fee_difference);
            if tx.tx.fee < required {
                return Err(TxPoolError::InsufficientReplacementFee {
                    incumbent: incumbent.tx.fee,
                    offered: tx.tx.fee,
                    required,
                });
            }
            let replaced = self.by_nonce.insert(nonce, tx);
            return Ok(replaced.map(|old| Evicted {
                id: old.id(),
                reason: RemoveReason::Replaced,
            }));
        }

        let mut displaced = None;
        if self.by_nonce.len() >= self.max_size {
            let is_new_max = self
                .by_nonce
                .keys()
                .next_back()
                .is_some_and(|&max| nonce > max);
            if is_new_max {
                return Err(TxPoolError::PoolFullForAccount(self.sender));
            }
            let victim = self
                .by_nonce
                .keys()
                .rev()
                .copied()
                .find(|n| !self.processable.contains(n));
            let Some(victim_nonce) = victim else {
                // every entry is processable; nothing may be displaced
                return Err(TxPoolError::PoolFullForAccount(self.sender));
            };
            displaced = self.by_nonce.remove(&victim_nonce).map(|old| Evicted {
                id: old.id(),
                reason: RemoveReason::PoolFull,
            });
        }

        // a nonce below the processable floor invalidates the prefix; the
        // next reorganization re-promotes whatever still validates
        if self
            .processable
            .iter()
            .next()
            .is_some_and(|&min| nonce < min)
        {
            self.demote_after(nonce);
        }

        self.by_nonce.insert(nonce, tx);
        if processable {
            self.processable.insert(nonce);
        }
        Ok(displaced)
    }

    /// Remove the transaction holding a nonce. Returns false when absent.
    pub fn remove(&mut self, nonce: Nonce) -> bool {
        if self.by_nonce.remove(&nonce).is_some() {
            self.processable.remove(&nonce);
            true
        } else {
            false
        }
    }

    /// Mark the given nonces processable. Nonces not present in the list are
    /// ignored; re-promoting an already processable nonce is a no-op.
    pub fn promote(&mut self, nonces: &[Nonce]) {
        for &nonce in nonces {
            if self.by_nonce.contains_key(&nonce) {
                self.processable.insert(nonce);
            }
        }
    }

    /// Move every processable entry with a nonce above the bound back to
    /// unprocessable.
    pub fn demote_after(&mut self, nonce: Nonce) {
        self.processable.retain(|&n| n <= nonce);
    }

    /// Move every processable entry back to unprocessable.
    pub fn demote_all(&mut self) {
        self.processable.clear();
    }

    /// Processable transactions in ascending nonce order
    pub fn get_processable(&self) -> Vec<Arc<PooledTransaction>> {
        self.processable
            .iter()
            .filter_map(|n| self.by_nonce.get(n))
            .cloned()
            .collect()
    }

    /// Unprocessable transactions in ascending nonce order
    pub fn get_unprocessable(&self) -> Vec<Arc<PooledTransaction>> {
        self.by_nonce
            .iter()
            .filter(|(n, _)| !self.processable.contains(n))
            .map(|(_, tx)| tx.clone())
            .collect()
    }

    /// The contiguous unprocessable run that could be promoted next: nonces
    /// stepping by one from just above the highest processable nonce, or
    /// from the smallest nonce present when nothing is processable.
    pub fn get_promotable(&self) -> Vec<Arc<PooledTransaction>> {
        let start = match self.max_processable_nonce() {
            Some(max) => match max.checked_add(1) {
                Some(next) => next,
                None => return Vec::new(),
            },
            None => match self.by_nonce.keys().next() {
                Some(&min) => min,
                None => return Vec::new(),
            },
        };

        let mut run = Vec::new();
        let mut expected = start;
        for (&nonce, tx) in self.by_nonce.range(start..) {
            if nonce != expected {
                break;
            }
            run.push(tx.clone());
            expected = match nonce.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        run
    }
}
