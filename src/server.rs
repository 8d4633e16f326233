use std::sync::Arc;
use structopt::StructOpt;
use tracing::info;
use wof_admin_lookup::boundary::source::GeoJsonSource;
use wof_admin_lookup::service::start;
use wof_admin_lookup::{init_logging, AdminLookup, LookupConfig};

#[derive(Debug, StructOpt)]
#[structopt(name = "admin-lookup", about = "admin hierarchy lookup service")]
pub struct Opt {
    #[structopt(flatten)]
    pub lookup: LookupConfig,
    /// http port
    #[structopt(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let opt = Opt::from_args();
    let source = Arc::new(GeoJsonSource::new(&opt.lookup.data_path));
    let lookup = AdminLookup::start(&opt.lookup, source).await?;
    info!(data = ?opt.lookup.data_path, "all layers loaded");
    start(Arc::new(lookup), opt.port).await?;
    Ok(())
}
