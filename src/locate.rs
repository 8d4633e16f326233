use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;
use wof_admin_lookup::boundary::source::GeoJsonSource;
use wof_admin_lookup::geojson::write_geojson;
use wof_admin_lookup::location::Coords;
use wof_admin_lookup::worker::{load_index, WorkerConfig};
use wof_admin_lookup::{init_logging_to, Placetype};

#[derive(Debug, StructOpt)]
#[structopt(name = "locate", about = "locate a point in one layer's boundaries")]
struct Opt {
    /// data directory holding <layer>.geojson files and the serialized/ cache
    #[structopt(short = "d", long = "data", env = "ADMIN_DATA")]
    data_path: PathBuf,
    /// layer to search
    #[structopt(short = "l", long = "layer", default_value = "locality")]
    layer: Placetype,
    /// pick localized display names instead of wof:name
    #[structopt(long = "localized-names")]
    localized_names: bool,
    /// create a geojson file with the location's features
    #[structopt(short = "g", long = "geojson")]
    geojson: Option<PathBuf>,
    #[structopt(allow_hyphen_values = true)]
    lng: f64,
    #[structopt(allow_hyphen_values = true)]
    lat: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging_to(std::io::stderr);
    let opt = Opt::from_args();
    let coords = Coords::new(opt.lng, opt.lat)?;
    let config = WorkerConfig {
        layer: opt.layer,
        data_path: opt.data_path.clone(),
        localized_names: opt.localized_names,
        diagnostics: None,
    };
    let source = GeoJsonSource::new(&opt.data_path);
    let index = load_index(&config, &source)?;
    let point: [f64; 2] = coords.into();
    let selected_boundaries = index.search(&point);

    for boundary in &selected_boundaries {
        let name = index
            .data()
            .get(&boundary.id())
            .map(|props| props.name.as_str())
            .unwrap_or_default();
        println!("{}: {} ({:.6} sq deg)", boundary.id(), name, boundary.area);
    }
    if let Some(path) = opt.geojson {
        write_geojson(&path, &selected_boundaries, index.data())?;
    }
    Ok(())
}
