//! In-memory single-flight LRU cache for rendered prompts.
//!
//! One mutex guards the whole table; every critical section is a few map
//! operations and is never held across an await, so a plain std mutex is
//! enough. Waiters park on a `watch` channel created by the leader. The
//! channel is subscribed while the table lock is held, which closes the
//! wake-up race: if the entry was still pending when a waiter looked, the
//! leader cannot have completed yet. A drop guard clears the pending slot
//! if the leader's future is cancelled mid-compute, so waiters always get
//! woken and one of them takes over as the new leader.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

use crate::domain::foundation::UserId;
use crate::domain::selection::DecisionFingerprint;
use crate::ports::{CacheError, CacheOutcome, CachedPrompt, ComputeFuture, PromptCache};

/// Bounded, single-flight prompt cache for one process.
pub struct InMemoryPromptCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

struct CacheState {
    entries: HashMap<DecisionFingerprint, Entry>,
    /// Recency token -> fingerprint, oldest first. Only ready entries are
    /// tracked here; pending computes are transient and never evicted.
    recency: BTreeMap<u64, DecisionFingerprint>,
    clock: u64,
}

enum Entry {
    Ready {
        cached: CachedPrompt,
        recency_token: u64,
    },
    Pending {
        done: watch::Sender<()>,
    },
}

impl InMemoryPromptCache {
    /// Creates a cache holding at most `capacity` ready entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                clock: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheState {
    fn next_token(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Moves a ready entry to the most-recent position.
    fn touch(&mut self, fingerprint: &DecisionFingerprint) {
        let token = self.next_token();
        if let Some(Entry::Ready { recency_token, .. }) = self.entries.get_mut(fingerprint) {
            self.recency.remove(recency_token);
            *recency_token = token;
            self.recency.insert(token, fingerprint.clone());
        }
    }

    /// Removes a ready entry; pending computes are left to their leader.
    fn remove_ready(&mut self, fingerprint: &DecisionFingerprint) -> bool {
        let token = match self.entries.get(fingerprint) {
            Some(Entry::Ready { recency_token, .. }) => *recency_token,
            _ => return false,
        };
        self.recency.remove(&token);
        self.entries.remove(fingerprint);
        true
    }

    /// Removes a pending slot and wakes its waiters.
    fn abandon_pending(&mut self, fingerprint: &DecisionFingerprint) {
        if matches!(self.entries.get(fingerprint), Some(Entry::Pending { .. })) {
            if let Some(Entry::Pending { done }) = self.entries.remove(fingerprint) {
                let _ = done.send(());
            }
        }
    }

    fn ready_count(&self) -> usize {
        self.recency.len()
    }

    /// Evicts least-recently-used ready entries until within capacity.
    fn evict_to(&mut self, capacity: usize) {
        while self.ready_count() > capacity {
            let Some((&oldest, _)) = self.recency.iter().next() else {
                break;
            };
            if let Some(fingerprint) = self.recency.remove(&oldest) {
                self.entries.remove(&fingerprint);
            }
        }
    }
}

/// Clears the leader's pending slot if its future is dropped mid-compute.
struct PendingGuard<'a> {
    cache: &'a InMemoryPromptCache,
    fingerprint: Option<DecisionFingerprint>,
}

impl PendingGuard<'_> {
    fn disarm(&mut self) {
        self.fingerprint = None;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(fingerprint) = self.fingerprint.take() {
            self.cache.lock().abandon_pending(&fingerprint);
        }
    }
}

#[async_trait]
impl PromptCache for InMemoryPromptCache {
    async fn get_or_compute(
        &self,
        fingerprint: DecisionFingerprint,
        compute: Box<dyn FnOnce() -> ComputeFuture + Send>,
    ) -> Result<CacheOutcome, CacheError> {
        loop {
            let mut rx = {
                let mut state = self.lock();
                match state.entries.get(&fingerprint) {
                    Some(Entry::Ready { cached, .. }) => {
                        let cached = cached.clone();
                        state.touch(&fingerprint);
                        return Ok(CacheOutcome { cached, hit: true });
                    }
                    Some(Entry::Pending { done }) => done.subscribe(),
                    None => {
                        let (done, _) = watch::channel(());
                        state
                            .entries
                            .insert(fingerprint.clone(), Entry::Pending { done });
                        break;
                    }
                }
            };

            // Wait for the leader; a dropped sender wakes us just as well
            // as an explicit send. Loop to re-read the entry: on leader
            // success it is ready, otherwise it is gone and one waiter
            // becomes the next leader.
            let _ = rx.changed().await;
        }

        // Leader path: run the compute with no lock held. The guard keeps
        // waiters from hanging if this future is cancelled here.
        let mut guard = PendingGuard {
            cache: self,
            fingerprint: Some(fingerprint.clone()),
        };
        let result = compute().await;

        let mut state = self.lock();
        guard.disarm();
        let pending = state.entries.remove(&fingerprint);

        match result {
            Ok(cached) => {
                let token = state.next_token();
                state.entries.insert(
                    fingerprint.clone(),
                    Entry::Ready {
                        cached: cached.clone(),
                        recency_token: token,
                    },
                );
                state.recency.insert(token, fingerprint);
                state.evict_to(self.capacity);

                if let Some(Entry::Pending { done }) = pending {
                    let _ = done.send(());
                }
                Ok(CacheOutcome { cached, hit: false })
            }
            Err(err) => {
                // Never cache a failure; waking the waiters lets one of
                // them retry as the new leader.
                if let Some(Entry::Pending { done }) = pending {
                    let _ = done.send(());
                }
                Err(err)
            }
        }
    }

    async fn invalidate(&self, user_id: &UserId) -> usize {
        let mut state = self.lock();
        let stale: Vec<DecisionFingerprint> = state
            .entries
            .iter()
            .filter(|(fingerprint, entry)| {
                matches!(entry, Entry::Ready { .. }) && fingerprint.user_id() == user_id
            })
            .map(|(fingerprint, _)| fingerprint.clone())
            .collect();

        for fingerprint in &stale {
            state.remove_ready(fingerprint);
        }
        stale.len()
    }

    async fn invalidate_key(&self, fingerprint: &DecisionFingerprint) -> bool {
        self.lock().remove_ready(fingerprint)
    }

    async fn entry_count(&self) -> usize {
        self.lock().ready_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::catalog::{AttributeCategory, ProfileVersion};
    use crate::domain::rendering::{PromptRenderer, TokenBudget};
    use crate::domain::selection::{
        AttributePick, Decision, GenerationConstraints, PickOrigin,
    };

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn fingerprint(user_id: &str, temperature: f64) -> DecisionFingerprint {
        DecisionFingerprint::compute(
            user(user_id),
            ProfileVersion::initial(),
            &GenerationConstraints::none(),
            temperature,
            0.1,
        )
    }

    fn cached_prompt(user_id: &str, value: &str) -> CachedPrompt {
        let decision = Decision::new(
            user(user_id),
            ProfileVersion::initial(),
            0.7,
            vec![AttributePick {
                category: AttributeCategory::Garment,
                value: value.to_string(),
                origin: PickOrigin::Exploit,
                posterior_mean: Some(0.5),
            }],
        );
        let prompt = PromptRenderer::new().render(
            &decision,
            &GenerationConstraints::none(),
            TokenBudget::default(),
        );
        CachedPrompt { prompt, decision }
    }

    fn compute_returning(
        calls: Arc<AtomicUsize>,
        cached: CachedPrompt,
    ) -> Box<dyn FnOnce() -> ComputeFuture + Send> {
        Box::new(move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(cached)
            })
        })
    }

    #[tokio::test]
    async fn miss_computes_then_hit_does_not() {
        let cache = InMemoryPromptCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let fp = fingerprint("u1", 0.7);

        let first = cache
            .get_or_compute(
                fp.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            )
            .await
            .unwrap();
        assert!(!first.hit);

        let second = cache
            .get_or_compute(
                fp,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "coat")),
            )
            .await
            .unwrap();
        assert!(second.hit);
        assert_eq!(second.cached, first.cached);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_compute_once() {
        let cache = Arc::new(InMemoryPromptCache::new(10));
        let calls = Arc::new(AtomicUsize::new(0));
        let fp = fingerprint("u1", 0.7);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let fp = fp.clone();
            handles.push(tokio::spawn(async move {
                let slow_compute: Box<dyn FnOnce() -> ComputeFuture + Send> =
                    Box::new(move || {
                        Box::pin(async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(cached_prompt("u1", "dress"))
                        })
                    });
                cache.get_or_compute(fp, slow_compute).await.unwrap()
            }));
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = &outcomes[0].cached;
        assert!(outcomes.iter().all(|o| &o.cached == first));
        assert_eq!(outcomes.iter().filter(|o| !o.hit).count(), 1);
    }

    #[tokio::test]
    async fn failed_compute_is_not_cached() {
        let cache = InMemoryPromptCache::new(10);
        let fp = fingerprint("u1", 0.7);

        let failing: Box<dyn FnOnce() -> ComputeFuture + Send> = Box::new(|| {
            Box::pin(async { Err(CacheError::Compute("selector blew up".to_string())) })
        });
        assert!(cache.get_or_compute(fp.clone(), failing).await.is_err());
        assert_eq!(cache.entry_count().await, 0);

        // Next caller retries and succeeds.
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = cache
            .get_or_compute(
                fp,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            )
            .await
            .unwrap();
        assert!(!outcome.hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_leader_does_not_strand_waiters() {
        let cache = Arc::new(InMemoryPromptCache::new(10));
        let fp = fingerprint("u1", 0.7);

        // A leader that would compute forever.
        let leader = {
            let cache = Arc::clone(&cache);
            let fp = fp.clone();
            tokio::spawn(async move {
                let never: Box<dyn FnOnce() -> ComputeFuture + Send> = Box::new(|| {
                    Box::pin(async {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Err(CacheError::Compute("unreachable".to_string()))
                    })
                });
                cache.get_or_compute(fp, never).await
            })
        };

        // Let the leader claim the pending slot, then abandon it.
        tokio::time::sleep(Duration::from_millis(20)).await;
        leader.abort();
        let _ = leader.await;

        // A fresh caller must be able to take over and complete.
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            cache.get_or_compute(
                fp,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            ),
        )
        .await
        .expect("waiter must not hang after leader cancellation")
        .unwrap();

        assert!(!outcome.hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lru_eviction_keeps_recently_used_entries() {
        let cache = InMemoryPromptCache::new(2);
        let calls = Arc::new(AtomicUsize::new(0));
        let fp_a = fingerprint("u1", 0.3);
        let fp_b = fingerprint("u1", 0.7);
        let fp_c = fingerprint("u1", 1.1);

        for fp in [&fp_a, &fp_b] {
            cache
                .get_or_compute(
                    fp.clone(),
                    compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
                )
                .await
                .unwrap();
        }

        // Touch A so B becomes least recently used.
        cache
            .get_or_compute(
                fp_a.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "x")),
            )
            .await
            .unwrap();

        cache
            .get_or_compute(
                fp_c.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "coat")),
            )
            .await
            .unwrap();

        assert_eq!(cache.entry_count().await, 2);
        let hit_a = cache
            .get_or_compute(
                fp_a,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "y")),
            )
            .await
            .unwrap();
        assert!(hit_a.hit, "A was touched and must survive");

        let miss_b = cache
            .get_or_compute(
                fp_b,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "z")),
            )
            .await
            .unwrap();
        assert!(!miss_b.hit, "B was LRU and must have been evicted");
    }

    #[tokio::test]
    async fn invalidate_is_scoped_to_one_user() {
        let cache = InMemoryPromptCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let fp_u1 = fingerprint("u1", 0.7);
        let fp_u2 = fingerprint("u2", 0.7);

        cache
            .get_or_compute(
                fp_u1.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            )
            .await
            .unwrap();
        cache
            .get_or_compute(
                fp_u2.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u2", "coat")),
            )
            .await
            .unwrap();

        assert_eq!(cache.invalidate(&user("u1")).await, 1);

        let miss = cache
            .get_or_compute(
                fp_u1,
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            )
            .await
            .unwrap();
        assert!(!miss.hit);

        let hit = cache
            .get_or_compute(
                fp_u2,
                compute_returning(Arc::clone(&calls), cached_prompt("u2", "coat")),
            )
            .await
            .unwrap();
        assert!(hit.hit, "other user's entries must be untouched");
    }

    #[tokio::test]
    async fn invalidate_key_drops_a_single_entry() {
        let cache = InMemoryPromptCache::new(10);
        let calls = Arc::new(AtomicUsize::new(0));
        let fp = fingerprint("u1", 0.7);

        cache
            .get_or_compute(
                fp.clone(),
                compute_returning(Arc::clone(&calls), cached_prompt("u1", "dress")),
            )
            .await
            .unwrap();

        assert!(cache.invalidate_key(&fp).await);
        assert!(!cache.invalidate_key(&fp).await);
        assert_eq!(cache.entry_count().await, 0);
    }
}
