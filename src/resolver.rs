use crate::document::Centroid;
use crate::error::ResolveError;
use crate::placetype::Placetype;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
}

impl Candidate {
    pub fn new(id: i64, name: &str) -> Self {
        Candidate {
            id,
            name: name.to_string(),
        }
    }
}

/// Candidates per admin level for one point. Overlapping polygons yield
/// several candidates; the first one is the primary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupResult(BTreeMap<Placetype, Vec<Candidate>>);

impl LookupResult {
    pub fn new() -> Self {
        LookupResult::default()
    }

    pub fn with(mut self, placetype: Placetype, candidates: Vec<Candidate>) -> Self {
        self.0.insert(placetype, candidates);
        self
    }

    pub fn push(&mut self, placetype: Placetype, candidate: Candidate) {
        self.0.entry(placetype).or_default().push(candidate);
    }

    pub fn get(&self, placetype: Placetype) -> Option<&[Candidate]> {
        self.0.get(&placetype).map(Vec::as_slice)
    }

    pub fn contains(&self, placetype: Placetype) -> bool {
        self.0.get(&placetype).map_or(false, |c| !c.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Resolves a centroid to its admin hierarchy.
pub trait Resolver {
    fn resolve(&self, centroid: Centroid) -> BoxFuture<'_, Result<LookupResult, ResolveError>>;
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn resolve(&self, centroid: Centroid) -> BoxFuture<'_, Result<LookupResult, ResolveError>> {
        (**self).resolve(centroid)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, centroid: Centroid) -> BoxFuture<'_, Result<LookupResult, ResolveError>> {
        (**self).resolve(centroid)
    }
}
