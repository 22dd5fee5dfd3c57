
use std::collections::HashMap;
use std::sync::Arc;
use async_stream::stream;
use futures::Stream;
use log::{debug, error, info, trace};
use tokio::sync::{broadcast, RwLock};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use crate::live_query::LiveQuery;
use crate::storage::io_trait::TableIo;
use crate::storage::{Record, StoreError};
use crate::user_id::UserId;

/// Records of one kind, cached in memory, persisted through `Io` and
/// observable per owner.
///
/// Every mutation holds the write lock while the medium is written, so
/// writes are serialized and a failed write never becomes visible.
pub struct Table<R: Record, Io: TableIo<R>> {
    name: &'static str,
    state: Arc<RwLock<State<R>>>,
    io: Io,
    changes: broadcast::Sender<UserId>,
}

struct State<R: Record> {
    records: HashMap<R::Key, R>,
}

impl<R: Record> State<R> {
    fn owned_by(&self, owner: &UserId) -> Vec<R> {
        let mut ret: Vec<R> = self.records
            .values()
            .filter(|r| r.owner() == owner)
            .cloned()
            .collect();
        ret.sort_by(R::recency_cmp);
        ret
    }

    fn to_rows(&self) -> Vec<R> {
        let mut rows: Vec<R> = self.records.values().cloned().collect();
        rows.sort_by(R::recency_cmp);
        rows
    }
}

impl<R: Record, Io: TableIo<R>> Table<R, Io> {
    pub async fn open(
        name: &'static str,
        io: Io,
        change_buffer_size: usize,
    ) -> Result<Self, StoreError> {
        debug!("opening table {name}");
        let rows = io.read_table().await?;
        let mut records = HashMap::with_capacity(rows.len());
        for row in rows {
            if let Some(previous) = records.insert(row.key(), row) {
                // the last row for a key wins, same as a replace
                debug!("table {name} has a duplicate row for {}", previous.key());
            }
        }
        info!("opened table {name} with {} records", records.len());
        let (changes, _) = broadcast::channel(change_buffer_size.max(1));
        Ok(
            Table {
                name,
                state: Arc::new(RwLock::new(State { records })),
                io,
                changes,
            }
        )
    }

    pub fn observe(&self, owner: &UserId) -> LiveQuery<R> {
        trace!("observing table {} for user \"{owner}\"", self.name);
        // subscribe before taking the first snapshot so no change falls
        // in between
        let changes = BroadcastStream::new(self.changes.subscribe());
        LiveQuery::new(
            Self::owned_by_stream(
                self.name,
                self.state.clone(),
                owner.clone(),
                changes,
            )
        )
    }

    fn owned_by_stream(
        name: &'static str,
        state: Arc<RwLock<State<R>>>,
        owner: UserId,
        mut changes: BroadcastStream<UserId>,
    ) -> impl Stream<Item=Vec<R>> + Send + 'static {
        stream! {
            let snapshot = state.read().await.owned_by(&owner);
            yield snapshot;
            while let Some(change) = changes.next().await {
                match change {
                    Ok(changed_owner) if changed_owner != owner => continue,
                    Ok(_) => {},
                    Err(BroadcastStreamRecvError::Lagged(n)) => debug!(
                        "observer of table {name} for user \"{owner}\" \
                            missed {n} changes, resyncing"
                    ),
                }
                let snapshot = state.read().await.owned_by(&owner);
                trace!(
                    "table {name} changed for user \"{owner}\", {} records",
                    snapshot.len(),
                );
                yield snapshot;
            }
            trace!("table {name} closed, observer for user \"{owner}\" finished");
        }
    }

    pub async fn get(&self, key: &R::Key) -> Option<R> {
        self.state.read().await.records.get(key).cloned()
    }

    pub async fn contains(&self, key: &R::Key) -> bool {
        self.state.read().await.records.contains_key(key)
    }

    /// Inserts or fully replaces the record with the same key, returning the
    /// replaced one.
    pub async fn upsert(&self, record: R) -> Result<Option<R>, StoreError> {
        let key = record.key();
        debug!("upserting {key} into table {}", self.name);
        trace!("new record: {record:?}");
        let new_owner = record.owner().clone();
        let mut state = self.state.write().await;
        let previous = state.records.insert(key.clone(), record);
        if let Err(e) = self.write_state(&state).await {
            match &previous {
                Some(previous) => state.records.insert(key, previous.clone()),
                None => state.records.remove(&key),
            };
            return Err(e)
        }
        drop(state);
        if let Some(previous) = &previous
            && *previous.owner() != new_owner
        {
            self.notify(previous.owner().clone());
        }
        self.notify(new_owner);
        Ok(previous)
    }

    /// Removes the record if it exists. Removing an absent key touches
    /// nothing.
    pub async fn delete(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        debug!("deleting {key} from table {}", self.name);
        let mut state = self.state.write().await;
        let Some(previous) = state.records.remove(key) else {
            trace!("{key} is not in table {}, nothing to delete", self.name);
            return Ok(None)
        };
        if let Err(e) = self.write_state(&state).await {
            state.records.insert(key.clone(), previous);
            return Err(e)
        }
        drop(state);
        self.notify(previous.owner().clone());
        Ok(Some(previous))
    }

    async fn write_state(&self, state: &State<R>) -> Result<(), StoreError> {
        self.io
            .write_table(&state.to_rows())
            .await
            .inspect_err(|e| error!("failed to persist table {}: {e}", self.name))
    }

    fn notify(&self, owner: UserId) {
        trace!("notifying observers of table {} for user \"{owner}\"", self.name);
        // fails only when nobody is observing
        let _ = self.changes.send(owner);
    }

    #[cfg(test)]
    pub(crate) fn io(&self) -> &Io {
        &self.io
    }
}
