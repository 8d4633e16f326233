use std::time::Instant;
use structopt::StructOpt;
use tracing::{info, warn};
use wof_admin_lookup::boundary::source::GeoJsonSource;
use wof_admin_lookup::index::IndexCache;
use wof_admin_lookup::worker::{build_index, WorkerConfig};
use wof_admin_lookup::{init_logging, LookupConfig};

#[derive(Debug, StructOpt)]
#[structopt(name = "build-index", about = "build and serialize the spatial index of each layer")]
struct Opt {
    #[structopt(flatten)]
    lookup: LookupConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let opt = Opt::from_args();
    let source = GeoJsonSource::new(&opt.lookup.data_path);
    for layer in &opt.lookup.layers {
        let started = Instant::now();
        let config = WorkerConfig::for_layer(&opt.lookup, *layer);
        let index = build_index(&config, &source)?;
        let cache = IndexCache::new(&opt.lookup.data_path, *layer);
        if cache.store(&index) {
            info!(
                %layer,
                boundaries = index.len(),
                path = ?cache.path(),
                seconds = started.elapsed().as_secs_f64(),
                "index serialized"
            );
        } else {
            warn!(%layer, "index built but not serialized");
        }
    }
    Ok(())
}
