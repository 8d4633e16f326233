use crate::boundary::{
    BoundaryData, BoundaryProperties, BoundaryRecord, IndexedBoundary, Point2D, ReducedProperties,
};
use crate::name::Naming;
use crate::placetype::Placetype;
use geo_types::MultiPolygon;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod cache;

pub use cache::IndexCache;

/// Point-in-polygon index over one layer, plus the layer's full
/// properties keyed by boundary id.
#[derive(Serialize, Deserialize, Debug)]
pub struct SpatialIndex {
    layer: Placetype,
    /// Whether display names were picked by the localized rules.
    localized_names: bool,
    tree: RTree<IndexedBoundary>,
    data: BoundaryData,
}

impl SpatialIndex {
    pub fn build(layer: Placetype, records: Vec<BoundaryRecord>, naming: &mut Naming) -> Self {
        let mut data = BoundaryData::new();
        let mut boundaries = Vec::with_capacity(records.len());

        for mut record in records {
            let reduced = ReducedProperties {
                id: record.id,
                hierarchy: record.hierarchy.clone(),
            };
            let geometry = std::mem::replace(&mut record.geometry, MultiPolygon(vec![]));
            match IndexedBoundary::new(geometry, reduced) {
                Some(boundary) => boundaries.push(boundary),
                None => {
                    warn!(%layer, id = record.id, "boundary has an empty geometry, not indexed");
                    continue;
                }
            }
            let name = naming.display_name(&record);
            let BoundaryRecord {
                id,
                placetype,
                hierarchy,
                properties,
                ..
            } = record;
            data.insert(
                id,
                BoundaryProperties {
                    id,
                    placetype,
                    name,
                    hierarchy,
                    properties,
                },
            );
        }

        let tree = RTree::bulk_load(boundaries);
        info!(%layer, boundaries = tree.size(), "spatial index built");
        SpatialIndex {
            layer,
            localized_names: naming.is_localized(),
            tree,
            data,
        }
    }

    pub fn layer(&self) -> Placetype {
        self.layer
    }

    pub fn localized_names(&self) -> bool {
        self.localized_names
    }

    pub fn data(&self) -> &BoundaryData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All boundaries containing the point, smallest area first.
    pub fn search(&self, point: &Point2D) -> Vec<&IndexedBoundary> {
        let mut matches: Vec<&IndexedBoundary> = self
            .tree
            .locate_all_at_point(point)
            .filter(|boundary| boundary.contains(point))
            .collect();
        matches.sort_by(|a, b| {
            a.area
                .total_cmp(&b.area)
                .then_with(|| a.id().cmp(&b.id()))
        });
        matches
    }
}
