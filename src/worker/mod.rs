//! One task per layer: load (or build) the layer's index, announce it, then
//! answer point searches until told to stop.

use crate::boundary::source::BoundarySource;
use crate::boundary::{BoundaryData, ReducedProperties};
use crate::config::LookupConfig;
use crate::error::{CacheError, SourceError};
use crate::index::{IndexCache, SpatialIndex};
use crate::location::Coords;
use crate::name::{NameDiagnostics, Naming};
use crate::placetype::Placetype;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{error, info, warn};

/// Coordinator -> worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    Search {
        id: u64,
        coords: Coords,
    },
    Shutdown,
    #[serde(other)]
    Unknown,
}

/// Worker -> coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    Loaded {
        layer: Placetype,
        data: BoundaryData,
        seconds: f64,
    },
    Results {
        layer: Placetype,
        id: u64,
        /// A miss is `{}` on the wire.
        #[serde(with = "miss_as_empty_object")]
        results: Option<ReducedProperties>,
    },
    Failed {
        layer: Placetype,
        reason: String,
    },
}

mod miss_as_empty_object {
    use crate::boundary::ReducedProperties;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Hit(ReducedProperties),
        Miss {},
    }

    pub fn serialize<S: Serializer>(
        results: &Option<ReducedProperties>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match results {
            Some(hit) => hit.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ReducedProperties>, D::Error> {
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Hit(hit) => Some(hit),
            Wire::Miss {} => None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub calls: u64,
    pub hits: u64,
    pub misses: u64,
}

impl WorkerStats {
    fn record(&mut self, hit: bool) {
        self.calls += 1;
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub layer: Placetype,
    pub data_path: PathBuf,
    pub localized_names: bool,
    pub diagnostics: Option<PathBuf>,
}

impl WorkerConfig {
    pub fn for_layer(config: &LookupConfig, layer: Placetype) -> Self {
        WorkerConfig {
            layer,
            data_path: config.data_path.clone(),
            localized_names: config.localized_names,
            diagnostics: config.diagnostics.clone(),
        }
    }
}

/// Builds the layer's index from its boundary source and names every record.
pub fn build_index<S>(config: &WorkerConfig, source: &S) -> Result<SpatialIndex, SourceError>
where
    S: BoundarySource + ?Sized,
{
    let records = source.read_layer(config.layer)?;
    let diagnostics = config.diagnostics.as_ref().and_then(|dir| {
        NameDiagnostics::create(dir, config.layer)
            .map_err(|e| warn!(dir = ?dir, error = %e, "name diagnostics disabled"))
            .ok()
    });
    let mut naming = Naming::new(config.localized_names, diagnostics);
    let index = SpatialIndex::build(config.layer, records, &mut naming);
    naming.finish();
    Ok(index)
}

/// Restores the layer's index from its cache, or builds and caches it.
pub fn load_index<S>(config: &WorkerConfig, source: &S) -> Result<SpatialIndex, SourceError>
where
    S: BoundarySource + ?Sized,
{
    let cache = IndexCache::new(&config.data_path, config.layer);
    match cache.load() {
        Ok(index) if index.localized_names() == config.localized_names => return Ok(index),
        Ok(_) => info!(
            layer = %config.layer,
            localized_names = config.localized_names,
            "serialized index was named differently, building from source"
        ),
        Err(CacheError::Missing(path)) => {
            info!(layer = %config.layer, ?path, "no serialized index, building from source")
        }
        Err(e) => warn!(
            layer = %config.layer,
            error = %e,
            "could not read serialized index, building from source"
        ),
    }
    let index = build_index(config, source)?;
    cache.store(&index);
    Ok(index)
}

pub struct WorkerHandle {
    layer: Placetype,
    inbox: mpsc::UnboundedSender<Inbound>,
    task: JoinHandle<WorkerStats>,
}

impl WorkerHandle {
    pub fn layer(&self) -> Placetype {
        self.layer
    }

    /// `false` once the worker has exited.
    pub fn send(&self, message: Inbound) -> bool {
        self.inbox.send(message).is_ok()
    }

    pub async fn shutdown(self) -> Option<WorkerStats> {
        self.send(Inbound::Shutdown);
        self.task.await.ok()
    }
}

pub struct LayerWorker<S: ?Sized> {
    config: WorkerConfig,
    source: Arc<S>,
    stats: WorkerStats,
    inbox: mpsc::UnboundedReceiver<Inbound>,
    outbox: mpsc::UnboundedSender<Outbound>,
}

impl<S> LayerWorker<S>
where
    S: BoundarySource + Send + Sync + ?Sized + 'static,
{
    pub fn spawn(
        config: WorkerConfig,
        source: Arc<S>,
        outbox: mpsc::UnboundedSender<Outbound>,
    ) -> WorkerHandle {
        let layer = config.layer;
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        let worker = LayerWorker {
            config,
            source,
            stats: WorkerStats::default(),
            inbox,
            outbox,
        };
        let task = tokio::spawn(worker.run());
        WorkerHandle {
            layer,
            inbox: inbox_tx,
            task,
        }
    }

    async fn run(mut self) -> WorkerStats {
        let layer = self.config.layer;
        let started = Instant::now();

        let config = self.config.clone();
        let source = Arc::clone(&self.source);
        let loaded = task::spawn_blocking(move || load_index(&config, &*source)).await;
        let index = match loaded {
            Ok(Ok(index)) => index,
            Ok(Err(e)) => return self.fail(e.to_string()),
            Err(e) => return self.fail(e.to_string()),
        };

        let seconds = started.elapsed().as_secs_f64();
        info!(%layer, boundaries = index.len(), seconds, "layer loaded");
        let _ = self.outbox.send(Outbound::Loaded {
            layer,
            data: index.data().clone(),
            seconds,
        });

        while let Some(message) = self.inbox.recv().await {
            match message {
                Inbound::Search { id, coords } => {
                    let results = self.search(&index, coords);
                    if self
                        .outbox
                        .send(Outbound::Results { layer, id, results })
                        .is_err()
                    {
                        break;
                    }
                }
                Inbound::Shutdown => break,
                Inbound::Unknown => error!(%layer, "unknown message"),
            }
        }

        let stats = self.stats;
        info!(%layer, calls = stats.calls, hits = stats.hits, misses = stats.misses, "worker exiting");
        stats
    }

    /// The smallest containing polygon wins.
    fn search(&mut self, index: &SpatialIndex, coords: Coords) -> Option<ReducedProperties> {
        let point: [f64; 2] = coords.into();
        let winner = index
            .search(&point)
            .first()
            .map(|boundary| boundary.properties.clone());
        self.stats.record(winner.is_some());
        winner
    }

    fn fail(self, reason: String) -> WorkerStats {
        let layer = self.config.layer;
        error!(%layer, reason = %reason, "could not load layer");
        let _ = self.outbox.send(Outbound::Failed { layer, reason });
        self.stats
    }
}
