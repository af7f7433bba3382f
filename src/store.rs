//! In-memory price table shared between the fetcher and the render path

use crate::{error::FetchError, types::PriceSnapshot};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

#[derive(Debug)]
struct TableState {
    snapshots: Vec<PriceSnapshot>,
    last_updated: Option<DateTime<Utc>>,
    generation: u64,
}

/// One snapshot per coin, parallel to the coin set
///
/// There is a single writer ([`PriceFetcher`](crate::fetcher::PriceFetcher))
/// and the table only ever changes through [`PriceTable::commit`], which
/// swaps every entry at once. Readers see either the previous table or the
/// new one, never a mix.
#[derive(Debug)]
pub struct PriceTable {
    state: RwLock<TableState>,
}

impl PriceTable {
    /// Creates a table of `len` default snapshots
    pub fn new(len: usize) -> Self {
        Self {
            state: RwLock::new(TableState {
                snapshots: vec![PriceSnapshot::default(); len],
                last_updated: None,
                generation: 0,
            }),
        }
    }

    /// Replaces the whole table
    ///
    /// The candidate must have exactly one entry per coin; otherwise nothing
    /// changes.
    pub async fn commit(&self, candidate: Vec<PriceSnapshot>) -> Result<(), FetchError> {
        let mut state = self.state.write().await;
        if candidate.len() != state.snapshots.len() {
            return Err(FetchError::parse(format!(
                "candidate table has {} entries, expected {}",
                candidate.len(),
                state.snapshots.len()
            )));
        }

        state.snapshots = candidate;
        state.last_updated = Some(Utc::now());
        state.generation += 1;
        tracing::debug!(generation = state.generation, "Committed price table");
        Ok(())
    }

    /// Snapshot for one coin
    pub async fn get(&self, index: usize) -> Option<PriceSnapshot> {
        self.state.read().await.snapshots.get(index).copied()
    }

    /// Copy of every snapshot, in coin-set order
    pub async fn get_all(&self) -> Vec<PriceSnapshot> {
        self.state.read().await.snapshots.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.snapshots.len()
    }

    /// When the last successful commit happened
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_updated
    }

    /// Number of successful commits so far
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// True once at least one fetch has been committed
    pub async fn has_prices(&self) -> bool {
        self.generation().await > 0
    }
}
