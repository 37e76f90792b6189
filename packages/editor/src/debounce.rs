//! # Debounced Reparsing
//!
//! Clause edits arrive on every keystroke; reparsing waits for a quiet
//! period. Each notification (re)arms a gate:
//!
//! ```text
//! notify(A) ──┐ 200ms
//! notify(A') ─┼──────── superseded(A)
//!             └── 500ms quiet ──▶ reparse(A') ──▶ Completed
//! ```
//!
//! With [`DebounceScope::Shared`] the reparser has a single gate, so an edit to
//! any clause supersedes a pending edit to any other clause.
//! [`DebounceScope::PerFragment`] keeps one gate per fragment id instead.
//!
//! Reparses of one reparser never overlap; a reparse that has passed its gate
//! runs to completion even if newer notifications arrive.

use clause_model::Fragment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::cancel::CancellationToken;
use crate::coordinator::ReparseCoordinator;
use crate::errors::EditorError;
use crate::result::ReparseResult;

/// Which notifications share a debounce gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DebounceScope {
    /// One gate for every fragment
    #[default]
    Shared,
    /// One gate per fragment id
    PerFragment,
}

/// Final state of one notification
#[derive(Debug, Clone, PartialEq)]
pub enum Debounced {
    Completed(ReparseResult),
    /// A later notification replaced this one before its quiet period ended
    Superseded,
}

/// Handle for a notification's eventual outcome
#[derive(Debug)]
pub struct PendingReparse {
    fragment_id: String,
    outcome: oneshot::Receiver<Debounced>,
}

impl PendingReparse {
    pub fn fragment_id(&self) -> &str {
        &self.fragment_id
    }

    pub async fn outcome(self) -> Debounced {
        // A dropped sender means the reparser shut down before firing
        self.outcome.await.unwrap_or(Debounced::Superseded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GateKey {
    Shared,
    Fragment(String),
}

struct Gate {
    generation: u64,
    fragment_id: String,
    waiter: Option<oneshot::Sender<Debounced>>,
    timer: JoinHandle<()>,
}

struct Inner {
    runtime: Handle,
    coordinator: Arc<ReparseCoordinator>,
    quiet_period: Duration,
    scope: DebounceScope,
    gates: Mutex<HashMap<GateKey, Gate>>,
    generations: AtomicU64,
    running: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
}

impl Inner {
    fn gates(&self) -> MutexGuard<'_, HashMap<GateKey, Gate>> {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key_for(&self, fragment: &Fragment) -> GateKey {
        match self.scope {
            DebounceScope::Shared => GateKey::Shared,
            DebounceScope::PerFragment => GateKey::Fragment(fragment.id.clone()),
        }
    }
}

/// Debouncing front end for a [`ReparseCoordinator`]
#[derive(Clone)]
pub struct DebouncedReparser {
    inner: Arc<Inner>,
}

impl DebouncedReparser {
    /// Build a reparser whose timers run on the current tokio runtime.
    ///
    /// Fails with [`EditorError::NoRuntime`] outside a runtime.
    pub fn new(
        coordinator: Arc<ReparseCoordinator>,
        quiet_period: Duration,
        scope: DebounceScope,
    ) -> Result<Self, EditorError> {
        let runtime = Handle::try_current().map_err(|_| EditorError::NoRuntime)?;
        Ok(Self::with_runtime(runtime, coordinator, quiet_period, scope))
    }

    /// Build a reparser whose timers run on `runtime`
    pub fn with_runtime(
        runtime: Handle,
        coordinator: Arc<ReparseCoordinator>,
        quiet_period: Duration,
        scope: DebounceScope,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                runtime,
                coordinator,
                quiet_period,
                scope,
                gates: Mutex::new(HashMap::new()),
                generations: AtomicU64::new(0),
                running: tokio::sync::Mutex::new(()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.inner.quiet_period
    }

    pub fn scope(&self) -> DebounceScope {
        self.inner.scope
    }

    /// Report that `fragment` changed
    pub fn notify(&self, fragment: Fragment) -> PendingReparse {
        let key = self.inner.key_for(&fragment);
        let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let fragment_id = fragment.id.clone();
        let (tx, rx) = oneshot::channel();

        let mut gates = self.inner.gates();
        if let Some(previous) = gates.remove(&key) {
            supersede(previous);
        }

        let timer = self.inner.runtime.spawn(fire(
            Arc::clone(&self.inner),
            key.clone(),
            generation,
            fragment,
        ));
        gates.insert(
            key,
            Gate {
                generation,
                fragment_id: fragment_id.clone(),
                waiter: Some(tx),
                timer,
            },
        );

        PendingReparse {
            fragment_id,
            outcome: rx,
        }
    }

    /// Notifications still waiting for their quiet period
    pub fn pending(&self) -> usize {
        self.inner.gates().len()
    }

    /// Drop pending notifications and cancel in-flight regeneration
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        let drained: Vec<Gate> = self.inner.gates().drain().map(|(_, gate)| gate).collect();
        for gate in drained {
            supersede(gate);
        }
    }
}

fn supersede(gate: Gate) {
    gate.timer.abort();
    if let Some(waiter) = gate.waiter {
        let _ = waiter.send(Debounced::Superseded);
    }
    tracing::debug!(fragment = %gate.fragment_id, "superseded pending reparse");
}

async fn fire(inner: Arc<Inner>, key: GateKey, generation: u64, fragment: Fragment) {
    tokio::time::sleep(inner.quiet_period).await;

    let waiter = {
        let mut gates = inner.gates();
        match gates.get(&key) {
            Some(gate) if gate.generation == generation => {
                gates.remove(&key).and_then(|gate| gate.waiter)
            }
            _ => return,
        }
    };
    let Some(waiter) = waiter else {
        return;
    };

    let _running = inner.running.lock().await;
    if inner.cancel.is_cancelled() {
        let _ = waiter.send(Debounced::Superseded);
        return;
    }

    tracing::debug!(fragment = %fragment.id, "quiet period elapsed, reparsing");
    let result = inner
        .coordinator
        .reparse_with_cancel(&fragment, &inner.cancel)
        .await;
    let _ = waiter.send(Debounced::Completed(result));
}
