use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::fs::{read_to_string, write};
use std::path::Path;
use std::sync::Arc;
use wof_admin_lookup::boundary::source::GeoJsonSource;
use wof_admin_lookup::index::IndexCache;
use wof_admin_lookup::location::Coords;
use wof_admin_lookup::{
    create_lookup_stream, AdminLookup, Candidate, Document, LookupConfig, LookupResult, Placetype,
};

fn square(min: f64, max: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[min, min], [min, max], [max, max], [max, min], [min, min]]]
    })
}

fn feature(properties: Value, geometry: Value) -> Value {
    json!({ "type": "Feature", "properties": properties, "geometry": geometry })
}

fn write_layer(dir: &Path, layer: Placetype, features: Vec<Value>) {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    write(dir.join(format!("{}.geojson", layer)), collection.to_string()).unwrap();
}

fn write_fixtures(dir: &Path) {
    write_layer(
        dir,
        Placetype::Country,
        vec![feature(
            json!({
                "wof:id": 85633111,
                "wof:placetype": "country",
                "wof:name": "Germany",
                "wof:country": "DE",
                "wof:lang_x_official": ["deu"],
                "name:deu_x_preferred": ["Deutschland"],
                "wof:hierarchy": [{ "country_id": 85633111 }],
            }),
            square(0.0, 10.0),
        )],
    );
    write_layer(
        dir,
        Placetype::Region,
        vec![feature(
            json!({
                "wof:id": 85682555,
                "wof:placetype": "region",
                "wof:name": "Bremen",
                "wof:country": "DE",
                "wof:hierarchy": [{ "country_id": 85633111, "region_id": 85682555 }],
            }),
            // far away, only reachable through the locality's hierarchy
            square(50.0, 60.0),
        )],
    );
    write_layer(
        dir,
        Placetype::Locality,
        vec![
            feature(
                json!({
                    "wof:id": 101748453,
                    "wof:placetype": "locality",
                    "wof:name": "Bremen",
                    "wof:country": "DE",
                    "name:deu_x_preferred": ["Bremen"],
                    "wof:hierarchy": [{
                        "country_id": 85633111,
                        "region_id": 85682555,
                        "locality_id": 101748453,
                    }],
                }),
                square(1.0, 2.0),
            ),
            // not a locality, skipped by the reader
            feature(
                json!({ "wof:id": 1, "wof:placetype": "venue", "wof:name": "Bürgerpark" }),
                square(1.0, 2.0),
            ),
        ],
    );
}

fn config(dir: &Path) -> LookupConfig {
    let mut config = LookupConfig::new(dir);
    config.layers = vec![Placetype::Country, Placetype::Region, Placetype::Locality];
    config.localized_names = true;
    config.diagnostics = Some(dir.join("diagnostics"));
    config
}

#[tokio::test]
async fn resolves_points_from_geojson_layers() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    std::fs::create_dir(dir.path().join("diagnostics")).unwrap();
    let source = Arc::new(GeoJsonSource::new(dir.path()));

    let lookup = AdminLookup::start(&config(dir.path()), source).await.unwrap();
    let result = lookup.lookup(Coords::new(1.5, 1.5).unwrap()).await.unwrap();
    assert_eq!(
        result,
        LookupResult::new()
            .with(Placetype::Country, vec![Candidate::new(85633111, "Deutschland")])
            .with(Placetype::Region, vec![Candidate::new(85682555, "Bremen")])
            .with(Placetype::Locality, vec![Candidate::new(101748453, "Bremen")])
    );

    let documents = vec![
        Document::new("whosonfirst", "venue", "1").with_centroid(1.5, 1.5),
        Document::new("whosonfirst", "venue", "2").with_centroid(5.0, 5.0),
    ];
    let out: Vec<Document> = create_lookup_stream(&lookup, stream::iter(documents))
        .map(|document| document.unwrap())
        .collect()
        .await;
    assert_eq!(out[0].admin(Placetype::Locality), Some("Bremen"));
    assert_eq!(out[0].admin(Placetype::Country), Some("Deutschland"));
    assert_eq!(out[1].admin(Placetype::Country), Some("Deutschland"));
    assert_eq!(out[1].admin(Placetype::Locality), None);
    lookup.shutdown().await;

    for layer in [Placetype::Country, Placetype::Region, Placetype::Locality] {
        assert!(IndexCache::new(dir.path(), layer).load().is_ok(), "{}", layer);
    }
    // the region has neither a spoken, official nor declared language
    let region_csv = read_to_string(dir.path().join("diagnostics/region.csv")).unwrap();
    assert_eq!(region_csv, "DE,85682555,true\n");
    let country_csv = read_to_string(dir.path().join("diagnostics/country.csv")).unwrap();
    assert_eq!(country_csv, "DE,85633111,false\n");
}

#[tokio::test]
async fn restarts_from_the_serialized_indexes() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let mut config = config(dir.path());
    config.diagnostics = None;

    let lookup = AdminLookup::start(&config, Arc::new(GeoJsonSource::new(dir.path())))
        .await
        .unwrap();
    lookup.shutdown().await;

    for layer in [Placetype::Country, Placetype::Region, Placetype::Locality] {
        std::fs::remove_file(dir.path().join(format!("{}.geojson", layer))).unwrap();
    }
    let lookup = AdminLookup::start(&config, Arc::new(GeoJsonSource::new(dir.path())))
        .await
        .unwrap();
    let result = lookup.lookup(Coords::new(1.5, 1.5).unwrap()).await.unwrap();
    assert_eq!(
        result.get(Placetype::Locality),
        Some(&[Candidate::new(101748453, "Bremen")][..])
    );
    lookup.shutdown().await;
}
