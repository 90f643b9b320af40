//! Transaction pool implementation

use crate::clock::{Clock, SystemClock};
use crate::config::PoolConfig;
use crate::error::{TxPoolError, TxPoolResult};
use crate::events::{EventBus, PoolEvent, RemoveReason};
use crate::job;
use crate::priority_queue::FeePriorityQueue;
use crate::sender_list::TransactionList;
use async_trait::async_trait;
use forge_crypto::address_of;
use forge_primitives::{Address, H256, Nonce, U256};
use forge_types::{Transaction, TxVerdict};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Error reported by the injected validator callback
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("apply callback failed: {0}")]
pub struct ApplyError(pub String);

/// The validator seam.
///
/// Judges whether transactions would apply cleanly against current chain
/// state, one verdict per input in order. The callback must be pure with
/// respect to pool state; the pool may hold no locks while awaiting it.
#[async_trait]
pub trait ApplyTransactions: Send + Sync {
    /// Validate a batch of transactions against current state
    async fn apply(&self, transactions: &[Transaction]) -> Result<Vec<TxVerdict>, ApplyError>;
}

/// Transaction with metadata cached at admission
#[derive(Debug)]
pub struct PooledTransaction {
    /// The transaction as admitted
    pub tx: Transaction,
    /// Sender address derived from the public key
    pub sender: Address,
    /// Fee priority, computed once from the encoded size
    pub fee_priority: U256,
    /// Admission timestamp in milliseconds
    pub received_at: u64,
}

impl PooledTransaction {
    /// Transaction id
    pub fn id(&self) -> H256 {
        self.tx.id
    }

    /// Transaction nonce
    pub fn nonce(&self) -> Nonce {
        self.tx.nonce
    }
}

struct PoolInner {
    all: HashMap<H256, Arc<PooledTransaction>>,
    lists: HashMap<Address, TransactionList>,
    queue: FeePriorityQueue,
}

/// Transaction pool.
///
/// Owns the id index, the per-sender lists, and the fee priority queue, and
/// keeps them consistent across admission, eviction, replacement,
/// reorganization, and expiration. Mutations take an internal lock that is
/// never held across the validator callback; removals are therefore allowed
/// to interleave with an in-flight `apply`, and stale verdicts are
/// discarded when it returns.
pub struct TransactionPool {
    config: PoolConfig,
    applier: Arc<dyn ApplyTransactions>,
    clock: Arc<dyn Clock>,
    inner: Mutex<PoolInner>,
    events: EventBus,
    reorg_guard: tokio::sync::Mutex<()>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    jobs: Mutex<Vec<JoinHandle<()>>>,
}

impl TransactionPool {
    /// Create a pool using the system wall clock
    pub fn new(config: PoolConfig, applier: Arc<dyn ApplyTransactions>) -> Self {
        Self::with_clock(config, applier, Arc::new(SystemClock))
    }

    /// Create a pool with an injected clock
    pub fn with_clock(
        config: PoolConfig,
        applier: Arc<dyn ApplyTransactions>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            applier,
            clock,
            inner: Mutex::new(PoolInner {
                all: HashMap::new(),
                lists: HashMap::new(),
                queue: FeePriorityQueue::new(),
            }),
            events: EventBus::new(),
            reorg_guard: tokio::sync::Mutex::new(()),
            shutdown: Mutex::new(None),
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Number of transactions held
    pub fn len(&self) -> usize {
        self.inner.lock().all.len()
    }

    /// True when the pool holds nothing
    pub fn is_empty(&self) -> bool {
        self.inner.lock().all.is_empty()
    }

    /// Register a handler for pool events
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&PoolEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler);
    }

    /// Admit a transaction.
    ///
    /// Re-admitting a transaction already in the pool is an idempotent
    /// no-op. A transaction below the entrance fee-priority floor, one that
    /// cannot displace any resident of a full pool, or one the validator
    /// rejects outright is refused with the corresponding error.
    pub async fn add(&self, tx: Transaction) -> TxPoolResult<()> {
        let id = tx.id;
        let fee_priority = tx.fee_priority();
        let sender = address_of(&tx.sender_public_key);

        if self.inner.lock().all.contains_key(&id) {
            tracing::debug!("duplicate admission of {id} is a no-op");
            return Ok(());
        }

        if fee_priority < self.config.min_entrance_fee_priority {
            return Err(TxPoolError::InsufficientEntranceFee {
                priority: fee_priority,
                minimum: self.config.min_entrance_fee_priority,
            });
        }

        let mut events = Vec::new();
        {
            let mut inner = self.inner.lock();
            self.make_room(&mut inner, fee_priority, &mut events)?;
        }
        // eviction events become visible before the probe suspension
        self.events.emit_all(&events);
        events.clear();

        let verdict = self.probe(&tx).await?;
        if !verdict.is_ok() && !verdict.has_nonce_mismatch() {
            return Err(TxPoolError::InvalidTransaction(verdict_message(&verdict)));
        }

        let result = self.finish_admission(tx, sender, fee_priority, verdict.is_ok(), &mut events);
        self.events.emit_all(&events);
        if result.is_ok() {
            tracing::debug!("admitted transaction {id} from {sender}");
        }
        result
    }

    /// Remove a transaction by id. Returns false when it was absent.
    pub fn remove(&self, id: &H256) -> bool {
        let mut events = Vec::new();
        let removed = {
            let mut inner = self.inner.lock();
            Self::remove_entry(&mut inner, *id, RemoveReason::Explicit, &mut events)
        };
        self.events.emit_all(&events);
        removed
    }

    /// Look up a transaction by id
    pub fn get(&self, id: &H256) -> Option<Transaction> {
        self.inner.lock().all.get(id).map(|p| p.tx.clone())
    }

    /// True when the id is in the pool
    pub fn contains(&self, id: &H256) -> bool {
        self.inner.lock().all.contains_key(id)
    }

    /// Snapshot of every transaction in the pool
    pub fn get_all(&self) -> Vec<Transaction> {
        self.inner
            .lock()
            .all
            .values()
            .map(|p| p.tx.clone())
            .collect()
    }

    /// Snapshot of one sender's transactions in ascending nonce order
    pub fn get_sender_transactions(&self, sender: &Address) -> Vec<Transaction> {
        let inner = self.inner.lock();
        match inner.lists.get(sender) {
            Some(list) => list
                .nonces()
                .filter_map(|n| list.get(n))
                .map(|p| p.tx.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Processable transactions per sender, ascending nonce order.
    ///
    /// Returns deep copies; mutating the result cannot affect pool state.
    /// Senders without processable transactions are omitted.
    pub fn get_processable_transactions(&self) -> HashMap<Address, Vec<Transaction>> {
        let inner = self.inner.lock();
        inner
            .lists
            .iter()
            .filter_map(|(addr, list)| {
                let txs: Vec<Transaction> = list
                    .get_processable()
                    .iter()
                    .map(|p| p.tx.clone())
                    .collect();
                if txs.is_empty() {
                    None
                } else {
                    Some((*addr, txs))
                }
            })
            .collect()
    }

    /// Re-partition every sender list against fresh validator verdicts.
    ///
    /// For each sender the current processable prefix plus the contiguous
    /// unprocessable run behind it is re-validated; the longest all-OK
    /// prefix becomes the new processable set. At most one reorganization
    /// runs at a time; a second caller is coalesced and returns false.
    pub async fn reorganize(&self) -> bool {
        let Ok(_guard) = self.reorg_guard.try_lock() else {
            return false;
        };

        let senders: Vec<Address> = self.inner.lock().lists.keys().copied().collect();
        for sender in senders {
            let candidates: Vec<Arc<PooledTransaction>> = {
                let inner = self.inner.lock();
                let Some(list) = inner.lists.get(&sender) else {
                    continue;
                };
                let mut candidates = list.get_processable();
                candidates.extend(list.get_promotable());
                candidates
            };
            if candidates.is_empty() {
                continue;
            }

            let txs: Vec<Transaction> = candidates.iter().map(|p| p.tx.clone()).collect();
            let verdicts = match self.applier.apply(&txs).await {
                Ok(verdicts) if verdicts.len() == txs.len() => verdicts,
                Ok(verdicts) => {
                    tracing::warn!(
                        "apply returned {} verdicts for {} candidates of {sender}",
                        verdicts.len(),
                        txs.len()
                    );
                    vec![TxVerdict::Fail(Vec::new()); txs.len()]
                }
                Err(e) => {
                    tracing::warn!("apply failed while reorganizing {sender}: {e}");
                    vec![TxVerdict::Fail(Vec::new()); txs.len()]
                }
            };

            let mut inner = self.inner.lock();
            let Some(list) = inner.lists.get_mut(&sender) else {
                continue;
            };

            // discard verdicts for entries removed during the suspension
            let mut ok_nonces: Vec<Nonce> = Vec::new();
            let mut broken = false;
            for (pooled, verdict) in candidates.iter().zip(&verdicts) {
                let present = list
                    .get(pooled.nonce())
                    .is_some_and(|held| held.id() == pooled.id());
                if !present {
                    continue;
                }
                if broken || !verdict.is_ok() {
                    broken = true;
                    continue;
                }
                ok_nonces.push(pooled.nonce());
            }

            // the new processable set must still be a prefix of the sorted
            // nonces; entries admitted during the suspension may have
            // slipped below the old frontier
            let mut promote = Vec::new();
            let mut ok_iter = ok_nonces.iter().peekable();
            for nonce in list.nonces().collect::<Vec<_>>() {
                match ok_iter.peek() {
                    Some(&&ok) if ok == nonce => {
                        promote.push(nonce);
                        ok_iter.next();
                    }
                    _ => break,
                }
            }

            match promote.last() {
                Some(&last) => {
                    list.demote_after(last);
                    list.promote(&promote);
                }
                None => list.demote_all(),
            }
        }
        true
    }

    /// Remove every transaction older than the configured expiry age.
    /// Returns the number removed.
    pub fn expire(&self) -> usize {
        let now = self.clock.now_millis();
        let expiry = self.config.transaction_expiry_time.as_millis() as u64;

        let mut events = Vec::new();
        let expired = {
            let mut inner = self.inner.lock();
            let expired: Vec<H256> = inner
                .all
                .values()
                .filter(|p| now.saturating_sub(p.received_at) > expiry)
                .map(|p| p.id())
                .collect();
            for id in &expired {
                Self::remove_entry(&mut inner, *id, RemoveReason::Expired, &mut events);
            }
            expired.len()
        };
        if expired > 0 {
            tracing::debug!("expired {expired} transactions");
        }
        self.events.emit_all(&events);
        expired
    }

    /// Start the reorganize and expire tickers. Idempotent while running.
    pub fn start(self: Arc<Self>) {
        let mut shutdown = self.shutdown.lock();
        if shutdown.is_some() {
            return;
        }
        let (tx, rx) = watch::channel(false);

        let pool = Arc::clone(&self);
        let reorganize = job::spawn_interval_job(
            self.config.transaction_reorganization_interval,
            rx.clone(),
            move || {
                let pool = Arc::clone(&pool);
                async move {
                    pool.reorganize().await;
                }
            },
        );

        let pool = Arc::clone(&self);
        let expire = job::spawn_interval_job(self.config.transaction_expire_interval, rx, move || {
            let pool = Arc::clone(&pool);
            async move {
                pool.expire();
            }
        });

        self.jobs.lock().extend([reorganize, expire]);
        *shutdown = Some(tx);
        tracing::debug!("transaction pool started");
    }

    /// Cancel both tickers. An in-flight reorganization completes; no
    /// further ticks fire. Pending validator calls are not aborted.
    pub fn stop(&self) {
        if let Some(tx) = self.shutdown.lock().take() {
            let _ = tx.send(true);
            tracing::debug!("transaction pool stop requested");
        }
        self.jobs.lock().clear();
    }

    async fn probe(&self, tx: &Transaction) -> TxPoolResult<TxVerdict> {
        let mut verdicts = match self.applier.apply(std::slice::from_ref(tx)).await {
            Ok(verdicts) => verdicts,
            Err(e) => {
                tracing::warn!("apply failed during admission probe: {e}");
                return Err(TxPoolError::InvalidTransaction(e.to_string()));
            }
        };
        if verdicts.len() != 1 {
            tracing::warn!(
                "apply returned {} verdicts for a single-transaction probe",
                verdicts.len()
            );
            return Err(TxPoolError::InvalidTransaction(
                "verdict count mismatch".to_string(),
            ));
        }
        Ok(verdicts.remove(0))
    }

    /// Ensure a slot is free for an incoming transaction with the given fee
    /// priority, evicting a resident when the pool is at capacity.
    fn make_room(
        &self,
        inner: &mut PoolInner,
        fee_priority: U256,
        events: &mut Vec<PoolEvent>,
    ) -> TxPoolResult<()> {
        if inner.all.len() < self.config.max_transactions {
            return Ok(());
        }
        if let Some((min_priority, _)) = inner.queue.peek_min() {
            if fee_priority <= min_priority {
                return Err(TxPoolError::PoolFull(self.config.max_transactions));
            }
        }
        if Self::evict_unprocessable(inner, events) || Self::evict_processable(inner, events) {
            Ok(())
        } else {
            Err(TxPoolError::PoolFull(self.config.max_transactions))
        }
    }

    /// Sender-list admission and index registration after the apply probe.
    fn finish_admission(
        &self,
        tx: Transaction,
        sender: Address,
        fee_priority: U256,
        verdict_ok: bool,
        events: &mut Vec<PoolEvent>,
    ) -> TxPoolResult<()> {
        let mut inner = self.inner.lock();
        if inner.all.contains_key(&tx.id) {
            return Ok(());
        }
        // the probe was a suspension point; capacity may have been consumed
        // meanwhile
        self.make_room(&mut inner, fee_priority, events)?;

        let nonce = tx.nonce;
        // a verdict of OK on the immediate successor of the processable
        // frontier (or for a fresh sender) promotes directly; everything
        // else waits for the next reorganization
        let processable = verdict_ok
            && match inner.lists.get(&sender) {
                None => true,
                Some(list) => {
                    list.max_processable_nonce().and_then(|max| max.checked_add(1))
                        == Some(nonce)
                }
            };

        let id = tx.id;
        let received_at = self.clock.now_millis();
        let pooled = Arc::new(PooledTransaction {
            tx,
            sender,
            fee_priority,
            received_at,
        });

        let max_per_account = self.config.max_transactions_per_account;
        let min_diff = self.config.min_replacement_fee_difference;
        let outcome = inner
            .lists
            .entry(sender)
            .or_insert_with(|| TransactionList::new(sender, max_per_account, min_diff))
            .add(Arc::clone(&pooled), processable);

        match outcome {
            Ok(Some(victim)) => {
                inner.all.remove(&victim.id);
                inner.queue.remove(&victim.id);
                events.push(PoolEvent::Removed {
                    id: victim.id,
                    reason: victim.reason,
                });
            }
            Ok(None) => {}
            Err(e) => {
                if inner.lists.get(&sender).is_some_and(|l| l.is_empty()) {
                    inner.lists.remove(&sender);
                }
                return Err(e);
            }
        }

        inner.all.insert(id, pooled);
        inner.queue.insert(fee_priority, received_at, id);
        events.push(PoolEvent::Added { id });
        Ok(())
    }

    /// Evict the lowest-priority unprocessable transaction, if any.
    fn evict_unprocessable(inner: &mut PoolInner, events: &mut Vec<PoolEvent>) -> bool {
        let victim = inner.queue.iter_ascending().find(|id| {
            let Some(pooled) = inner.all.get(id) else {
                return false;
            };
            let Some(list) = inner.lists.get(&pooled.sender) else {
                return false;
            };
            !list.is_processable(pooled.nonce())
        });
        match victim {
            Some(id) => {
                tracing::debug!("evicting unprocessable transaction {id}");
                Self::remove_entry(inner, id, RemoveReason::PoolFull, events)
            }
            None => false,
        }
    }

    /// Evict a processable transaction: among every sender's highest
    /// processable nonce, the one with the minimum fee priority loses, ties
    /// going to the lexicographically smaller sender address. Removing a
    /// frontier entry keeps the remaining prefix intact.
    fn evict_processable(inner: &mut PoolInner, events: &mut Vec<PoolEvent>) -> bool {
        let mut victim: Option<(U256, Address, H256)> = None;
        for (addr, list) in &inner.lists {
            let Some(nonce) = list.max_processable_nonce() else {
                continue;
            };
            let Some(pooled) = list.get(nonce) else {
                continue;
            };
            let candidate = (pooled.fee_priority, *addr, pooled.id());
            let better = match &victim {
                None => true,
                Some((priority, address, _)) => {
                    (candidate.0, candidate.1) < (*priority, *address)
                }
            };
            if better {
                victim = Some(candidate);
            }
        }
        match victim {
            Some((_, _, id)) => {
                tracing::debug!("evicting processable frontier transaction {id}");
                Self::remove_entry(inner, id, RemoveReason::PoolFull, events)
            }
            None => false,
        }
    }

    /// Remove an id from every index, dropping the sender list when it
    /// empties. Collects the removal event for the caller to emit.
    fn remove_entry(
        inner: &mut PoolInner,
        id: H256,
        reason: RemoveReason,
        events: &mut Vec<PoolEvent>,
    ) -> bool {
        let Some(pooled) = inner.all.remove(&id) else {
            return false;
        };
        inner.queue.remove(&id);
        if let Some(list) = inner.lists.get_mut(&pooled.sender) {
            list.remove(pooled.nonce());
            if list.is_empty() {
                inner.lists.remove(&pooled.sender);
            }
        }
        events.push(PoolEvent::Removed { id, reason });
        true
    }
}

fn verdict_message(verdict: &TxVerdict) -> String {
    match verdict {
        TxVerdict::Ok => String::new(),
        TxVerdict::Fail(errors) if errors.is_empty() => "validation failed".to_string(),
        TxVerdict::Fail(errors) => errors
            .iter()
            .map(|e| format!("{}: expected {}, got {}", e.data_path, e.expected, e.actual))
            .collect::<Vec<_>>()
            .join("; "),
    }
}
