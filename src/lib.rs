use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub mod boundary;
pub mod config;
pub mod document;
pub mod error;
pub mod geojson;
pub mod index;
pub mod location;
pub mod lookup;
pub mod name;
pub mod placetype;
pub mod resolver;
pub mod service;
pub mod stream;
pub mod worker;

pub use config::LookupConfig;
pub use document::{Centroid, Document};
pub use lookup::AdminLookup;
pub use placetype::Placetype;
pub use resolver::{Candidate, LookupResult, Resolver};
pub use stream::create_lookup_stream;

/// Bunyan json lines on stdout, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    init_logging_to(std::io::stdout);
}

/// Same as [`init_logging`], for binaries whose stdout carries data.
pub fn init_logging_to<W>(writer: W)
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let app_name = env!("CARGO_PKG_NAME");
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), writer);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .init();
}
