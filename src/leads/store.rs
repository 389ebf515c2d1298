//! Lead store: append-only in-memory list of captured leads with broadcast
//! to interested views.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::info;

use super::model::Lead;
use super::scoring;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Append-only lead list, alive for the lifetime of the owning session.
///
/// There is no update, delete or deduplication: two conversations with
/// identical answers produce two entries.
pub struct LeadStore {
    leads: RwLock<Vec<Lead>>,
    tx: broadcast::Sender<Lead>,
}

impl LeadStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            leads: RwLock::new(Vec::new()),
            tx,
        })
    }

    /// Subscribe to newly appended leads.
    pub fn subscribe(&self) -> broadcast::Receiver<Lead> {
        self.tx.subscribe()
    }

    /// Append a finalized lead.
    pub async fn append(&self, lead: Lead) {
        info!(
            lead_id = %lead.id,
            user_type = %lead.user_type(),
            score = scoring::score(&lead.details),
            "Lead captured"
        );

        {
            let mut leads = self.leads.write().await;
            leads.push(lead.clone());
        }

        // Ok if nobody is listening
        let _ = self.tx.send(lead);
    }

    /// All leads in insertion order.
    pub async fn list(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }

    /// Leads matching `predicate`, in insertion order.
    pub async fn filter<F>(&self, predicate: F) -> Vec<Lead>
    where
        F: Fn(&Lead) -> bool,
    {
        let leads = self.leads.read().await;
        leads.iter().filter(|l| predicate(l)).cloned().collect()
    }

    /// Number of leads matching `predicate`.
    pub async fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Lead) -> bool,
    {
        let leads = self.leads.read().await;
        leads.iter().filter(|l| predicate(l)).count()
    }

    pub async fn len(&self) -> usize {
        self.leads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leads.read().await.is_empty()
    }
}
