use crate::placetype::Placetype;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown placetype \"{0}\"")]
pub struct UnknownPlacetype(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordsError {
    #[error("expected \"lng,lat\", got \"{0}\"")]
    Format(String),
    #[error("could not parse coordinate: {0}")]
    Parse(#[from] std::num::ParseFloatError),
    #[error("coordinates out of range: {0},{1}")]
    OutOfRange(f64, f64),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("could not read boundary file, {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse geojson, {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("{0:?} does not contain a feature collection")]
    NotACollection(PathBuf),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("no serialized index at {0:?}")]
    Missing(PathBuf),
    #[error("serialized index i/o, {0}")]
    Io(#[from] std::io::Error),
    #[error("serialized index has no format header")]
    BadMagic,
    #[error("serialized index format version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },
    #[error("serialized index holds layer {found}, expected {expected}")]
    LayerMismatch { found: Placetype, expected: Placetype },
    #[error("bincode error, {0}")]
    Bincode(#[from] bincode::Error),
}

/// Failure of a single point resolution. Fatal to an enrichment stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("no worker serves layer {0}")]
    NoWorker(Placetype),
    #[error("{0} worker stopped before replying")]
    WorkerGone(Placetype),
    #[error("{0}")]
    Failed(String),
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{layer} worker failed to load: {reason}")]
    WorkerFailed { layer: Placetype, reason: String },
    #[error("workers exited before all layers were loaded")]
    WorkersExited,
}
