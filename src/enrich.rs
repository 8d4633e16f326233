use futures_util::stream::{self, StreamExt};
use serde_json::Error as JsonError;
use std::io::{self, Write};
use std::sync::Arc;
use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use wof_admin_lookup::boundary::source::GeoJsonSource;
use wof_admin_lookup::{create_lookup_stream, init_logging_to, AdminLookup, Document, LookupConfig};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "enrich",
    about = "add admin hierarchies to ndjson documents read from stdin"
)]
struct Opt {
    #[structopt(flatten)]
    lookup: LookupConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the documents
    init_logging_to(io::stderr);
    let opt = Opt::from_args();
    let source = Arc::new(GeoJsonSource::new(&opt.lookup.data_path));
    let lookup = AdminLookup::start(&opt.lookup, source).await?;

    let mut bad_input: Option<JsonError> = None;
    let mut written = 0u64;
    let result = {
        let lines = BufReader::new(tokio::io::stdin()).lines();
        let documents = stream::unfold((lines, &mut bad_input), |(mut lines, bad_input)| async move {
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => return None,
                    Err(e) => {
                        error!(error = %e, "could not read stdin");
                        return None;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Document>(&line) {
                    Ok(document) => return Some((document, (lines, bad_input))),
                    Err(e) => {
                        *bad_input = Some(e);
                        return None;
                    }
                }
            }
        });

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut enriched = Box::pin(create_lookup_stream(&lookup, documents));
        let mut result: Result<(), Box<dyn std::error::Error>> = Ok(());
        while let Some(document) = enriched.next().await {
            match document {
                Ok(document) => {
                    writeln!(out, "{}", serde_json::to_string(&document)?)?;
                    written += 1;
                }
                Err(e) => {
                    result = Err(e.into());
                    break;
                }
            }
        }
        out.flush()?;
        result
    };

    info!(documents = written, "enrichment finished");
    lookup.shutdown().await;
    if let Some(e) = bad_input {
        return Err(e.into());
    }
    result
}
