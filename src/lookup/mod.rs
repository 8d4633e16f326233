//! Coordinator over the per-layer workers.

use crate::boundary::source::BoundarySource;
use crate::boundary::{BoundaryData, ReducedProperties};
use crate::config::LookupConfig;
use crate::document::Centroid;
use crate::error::{LookupError, ResolveError};
use crate::location::Coords;
use crate::placetype::Placetype;
use crate::resolver::{Candidate, LookupResult, Resolver};
use crate::worker::{Inbound, LayerWorker, Outbound, WorkerConfig, WorkerHandle};
use futures_util::future::{join_all, BoxFuture};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Option<ReducedProperties>>>>>;

pub struct AdminLookup {
    workers: BTreeMap<Placetype, WorkerHandle>,
    data: BTreeMap<Placetype, BoundaryData>,
    pending: Pending,
    next_id: AtomicU64,
    dispatcher: JoinHandle<()>,
}

impl AdminLookup {
    /// Spawns a worker per configured layer and waits until all are loaded.
    pub async fn start<S>(config: &LookupConfig, source: Arc<S>) -> Result<Self, LookupError>
    where
        S: BoundarySource + Send + Sync + ?Sized + 'static,
    {
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut workers = BTreeMap::new();
        for layer in &config.layers {
            let worker_config = WorkerConfig::for_layer(config, *layer);
            let handle = LayerWorker::spawn(worker_config, Arc::clone(&source), events_tx.clone());
            workers.insert(*layer, handle);
        }
        drop(events_tx);

        let mut data = BTreeMap::new();
        while data.len() < workers.len() {
            match events.recv().await {
                Some(Outbound::Loaded {
                    layer,
                    data: layer_data,
                    seconds,
                }) => {
                    info!(%layer, boundaries = layer_data.len(), seconds, "worker ready");
                    data.insert(layer, layer_data);
                }
                Some(Outbound::Failed { layer, reason }) => {
                    for (_, worker) in workers {
                        worker.shutdown().await;
                    }
                    return Err(LookupError::WorkerFailed { layer, reason });
                }
                Some(Outbound::Results { layer, id, .. }) => {
                    warn!(%layer, id, "results before all layers loaded")
                }
                None => return Err(LookupError::WorkersExited),
            }
        }

        let pending = Pending::default();
        let dispatcher = tokio::spawn(dispatch(events, Arc::clone(&pending)));
        Ok(AdminLookup {
            workers,
            data,
            pending,
            next_id: AtomicU64::new(0),
            dispatcher,
        })
    }

    pub fn layers(&self) -> impl Iterator<Item = Placetype> + '_ {
        self.workers.keys().copied()
    }

    /// Side mapping a layer announced when it became ready.
    pub fn layer_data(&self, layer: Placetype) -> Option<&BoundaryData> {
        self.data.get(&layer)
    }

    /// Asks one layer for the polygon containing `coords`.
    pub async fn search(
        &self,
        layer: Placetype,
        coords: Coords,
    ) -> Result<Option<ReducedProperties>, ResolveError> {
        let worker = self
            .workers
            .get(&layer)
            .ok_or(ResolveError::NoWorker(layer))?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply) = oneshot::channel();
        self.pending.lock().await.insert(id, reply_tx);
        if !worker.send(Inbound::Search { id, coords }) {
            self.pending.lock().await.remove(&id);
            return Err(ResolveError::WorkerGone(layer));
        }
        reply.await.map_err(|_| ResolveError::WorkerGone(layer))
    }

    /// Fans `coords` out to every layer. Direct hits come first; layers
    /// without a hit are filled from the most granular hit's hierarchy.
    #[instrument(skip(self))]
    pub async fn lookup(&self, coords: Coords) -> Result<LookupResult, ResolveError> {
        let layers: Vec<Placetype> = self.layers().collect();
        let replies = join_all(layers.iter().map(|layer| self.search(*layer, coords))).await;

        let mut result = LookupResult::new();
        let mut most_granular: Option<ReducedProperties> = None;
        for (layer, reply) in layers.into_iter().zip(replies) {
            let hit = match reply? {
                Some(hit) => hit,
                None => continue,
            };
            if let Some(candidate) = self.candidate(layer, hit.id) {
                result.push(layer, candidate);
            }
            most_granular = Some(hit);
        }

        let ancestors = most_granular
            .as_ref()
            .and_then(|hit| hit.hierarchy.primary());
        if let Some(ancestors) = ancestors {
            for (layer, id) in ancestors {
                if result.contains(*layer) {
                    continue;
                }
                if let Some(candidate) = self.candidate(*layer, *id) {
                    result.push(*layer, candidate);
                }
            }
        }
        Ok(result)
    }

    fn candidate(&self, layer: Placetype, id: i64) -> Option<Candidate> {
        let props = self.data.get(&layer)?.get(&id)?;
        Some(Candidate::new(id, &props.name))
    }

    /// Stops every worker and waits for them to log their stats.
    pub async fn shutdown(self) {
        for (layer, worker) in self.workers {
            if let Some(stats) = worker.shutdown().await {
                info!(%layer, calls = stats.calls, hits = stats.hits, misses = stats.misses, "worker stopped");
            }
        }
        let _ = self.dispatcher.await;
    }
}

impl Resolver for AdminLookup {
    fn resolve(&self, centroid: Centroid) -> BoxFuture<'_, Result<LookupResult, ResolveError>> {
        Box::pin(self.lookup(centroid.into()))
    }
}

/// Routes worker results to whoever is waiting on the request id.
async fn dispatch(mut events: mpsc::UnboundedReceiver<Outbound>, pending: Pending) {
    while let Some(event) = events.recv().await {
        match event {
            Outbound::Results { layer, id, results } => {
                match pending.lock().await.remove(&id) {
                    Some(reply) => {
                        let _ = reply.send(results);
                    }
                    None => warn!(%layer, id, "results for unknown request"),
                }
            }
            Outbound::Loaded { layer, .. } => warn!(%layer, "unexpected loaded message"),
            Outbound::Failed { layer, reason } => error!(%layer, reason = %reason, "worker failed"),
        }
    }
}
