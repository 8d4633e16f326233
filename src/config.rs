use crate::placetype::Placetype;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
pub struct LookupConfig {
    /// data directory holding <layer>.geojson files and the serialized/ cache
    #[structopt(short = "d", long = "data", env = "ADMIN_DATA")]
    pub data_path: PathBuf,
    /// layers to load, comma separated
    #[structopt(
        short = "l",
        long = "layers",
        env = "ADMIN_LAYERS",
        use_delimiter = true,
        default_value = "country,region,county,locality,localadmin,neighbourhood"
    )]
    pub layers: Vec<Placetype>,
    /// pick localized display names instead of wof:name
    #[structopt(long = "localized-names")]
    pub localized_names: bool,
    /// write per-layer name diagnostics csv files into this directory
    #[structopt(long = "diagnostics", env = "NAME_DIAGNOSTICS")]
    pub diagnostics: Option<PathBuf>,
}

impl LookupConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        LookupConfig {
            data_path: data_path.into(),
            layers: Placetype::all().to_vec(),
            localized_names: false,
            diagnostics: None,
        }
    }
}
