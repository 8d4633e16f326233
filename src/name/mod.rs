//! Display-name selection for boundary records.
//!
//! Localized names live in `name:<lang>_x_preferred` properties. Which
//! language to use is read, in order, from the spoken, official and declared
//! language properties, then from a country-code table. Records without a
//! localized name fall back to their label and plain name.

use crate::boundary::{BoundaryRecord, PropertyValue};
use crate::placetype::Placetype;
use tracing::{debug, warn};

mod diagnostics;
pub mod languages;

pub use diagnostics::NameDiagnostics;

const SPOKEN: &str = "wof:lang_x_spoken";
const OFFICIAL: &str = "wof:lang_x_official";
const DECLARED: &str = "wof:lang";
const COUNTRY: &str = "wof:country";
const ISO_COUNTRY: &str = "iso:country";
const COUNTY_ALT: &str = "qs:a2_alt";
const LABEL: &str = "wof:label";
const NAME: &str = "wof:name";

/// Which rule produced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    UsCounty,
    Spoken,
    Official,
    Declared,
    CountryCode,
    Label,
    Name,
}

impl NameSource {
    pub fn is_localized(&self) -> bool {
        matches!(
            self,
            NameSource::Spoken | NameSource::Official | NameSource::Declared | NameSource::CountryCode
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameSelection<'a> {
    pub name: &'a str,
    pub source: NameSource,
}

/// The name to display for `record`, or `None` when every rule fails.
pub fn select_name(record: &BoundaryRecord) -> Option<String> {
    resolve_name(record).map(|selection| selection.name.to_string())
}

pub fn resolve_name(record: &BoundaryRecord) -> Option<NameSelection<'_>> {
    if let Some(name) = us_county_name(record) {
        return Some(NameSelection {
            name,
            source: NameSource::UsCounty,
        });
    }
    localized_name(record).or_else(|| fallback_name(record))
}

/// `wof:name = Lancaster`, `qs:a2_alt = Lancaster County`: US counties
/// display the latter.
fn us_county_name(record: &BoundaryRecord) -> Option<&str> {
    let props = &record.properties;
    let country = props.text(ISO_COUNTRY).or_else(|| props.text(COUNTRY));
    if country != Some("US") || record.placetype != Placetype::County {
        return None;
    }
    props.text(COUNTY_ALT)
}

fn localized_name(record: &BoundaryRecord) -> Option<NameSelection<'_>> {
    let tiers = [
        (SPOKEN, NameSource::Spoken),
        (OFFICIAL, NameSource::Official),
        (DECLARED, NameSource::Declared),
    ];
    tiers
        .iter()
        .find_map(|(property, source)| {
            let name = name_by_language_property(record, property)?;
            Some(NameSelection {
                name,
                source: *source,
            })
        })
        .or_else(|| {
            let name = name_by_country_code(record)?;
            Some(NameSelection {
                name,
                source: NameSource::CountryCode,
            })
        })
}

fn fallback_name(record: &BoundaryRecord) -> Option<NameSelection<'_>> {
    let props = &record.properties;
    props
        .text(LABEL)
        .map(|name| NameSelection {
            name,
            source: NameSource::Label,
        })
        .or_else(|| {
            props.text(NAME).map(|name| NameSelection {
                name,
                source: NameSource::Name,
            })
        })
}

/// `["rus", "ukr"]` -> `name:rus_x_preferred`. Only the first language counts.
pub fn preferred_name_key(languages: &PropertyValue) -> Option<String> {
    if let PropertyValue::List(list) = languages {
        if list.len() > 1 {
            debug!(languages = ?list, "more than one language specified");
        }
    }
    languages
        .first()
        .map(|language| format!("name:{}_x_preferred", language))
}

fn name_by_language_property<'a>(record: &'a BoundaryRecord, property: &str) -> Option<&'a str> {
    let languages = record.properties.usable(property)?;
    let key = preferred_name_key(languages)?;
    let name = record.properties.text(&key);
    if name.is_none() {
        warn!(
            property,
            key = %key,
            name = record.properties.text(NAME),
            placetype = %record.placetype,
            id = record.id,
            "missing preferred name"
        );
    }
    name
}

fn name_by_country_code(record: &BoundaryRecord) -> Option<&str> {
    debug!(id = record.id, "looking up language by country code");
    let country = record.properties.usable(COUNTRY)?.first()?;
    let languages = match languages::official_languages(country) {
        Some(languages) => languages,
        None => {
            warn!(
                country,
                name = record.properties.text(NAME),
                placetype = %record.placetype,
                id = record.id,
                "country code missing from language table"
            );
            return None;
        }
    };
    let key = format!("name:{}_x_preferred", languages.first()?);
    let name = record.properties.text(&key);
    if name.is_none() {
        warn!(
            ?languages,
            key = %key,
            name = record.properties.text(NAME),
            placetype = %record.placetype,
            id = record.id,
            "missing preferred name for country languages"
        );
    }
    name
}

/// Build-time naming policy for one layer.
pub struct Naming {
    localized: bool,
    diagnostics: Option<NameDiagnostics>,
}

impl Naming {
    pub fn new(localized: bool, diagnostics: Option<NameDiagnostics>) -> Self {
        Naming {
            localized,
            diagnostics,
        }
    }

    pub fn is_localized(&self) -> bool {
        self.localized
    }

    /// Never empty-handed: falls back to the record id.
    pub fn display_name(&mut self, record: &BoundaryRecord) -> String {
        let name = if self.localized {
            let selection = resolve_name(record);
            self.observe(record, selection);
            selection.map(|selection| selection.name)
        } else {
            let props = &record.properties;
            props.text(NAME).or_else(|| props.text(LABEL))
        };
        match name {
            Some(name) => name.to_string(),
            None => {
                warn!(id = record.id, placetype = %record.placetype, "no name, using id");
                record.id.to_string()
            }
        }
    }

    fn observe(&mut self, record: &BoundaryRecord, selection: Option<NameSelection<'_>>) {
        let diagnostics = match self.diagnostics.as_mut() {
            Some(diagnostics) => diagnostics,
            None => return,
        };
        let source = selection.map(|selection| selection.source);
        if source == Some(NameSource::UsCounty) {
            return;
        }
        let missing = !source.map_or(false, |source| source.is_localized());
        diagnostics.record(record.properties.text(COUNTRY), record.id, missing);
    }

    pub fn finish(mut self) {
        if let Some(diagnostics) = self.diagnostics.as_mut() {
            diagnostics.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{Hierarchy, PropertyBag};
    use geo_types::MultiPolygon;

    fn record(placetype: Placetype, props: Vec<(&str, PropertyValue)>) -> BoundaryRecord {
        BoundaryRecord {
            id: 1,
            placetype,
            hierarchy: Hierarchy::default(),
            geometry: MultiPolygon(vec![]),
            properties: props.into_iter().collect::<PropertyBag>(),
        }
    }

    #[test]
    fn us_county_uses_alternate_label() {
        let lancaster = record(
            Placetype::County,
            vec![
                ("iso:country", "US".into()),
                ("qs:a2_alt", "Lancaster County".into()),
                ("wof:name", "Lancaster".into()),
            ],
        );
        assert_eq!(select_name(&lancaster).as_deref(), Some("Lancaster County"));
    }

    #[test]
    fn us_county_beats_language_names() {
        let county = record(
            Placetype::County,
            vec![
                ("iso:country", "US".into()),
                ("qs:a2_alt", "Lancaster County".into()),
                ("wof:lang_x_spoken", vec!["eng"].into()),
                ("wof:lang_x_official", vec!["eng"].into()),
                ("wof:lang", vec!["eng"].into()),
                ("name:eng_x_preferred", vec!["Lancaster"].into()),
            ],
        );
        let selection = resolve_name(&county).unwrap();
        assert_eq!(selection.name, "Lancaster County");
        assert_eq!(selection.source, NameSource::UsCounty);
    }

    #[test]
    fn county_exception_is_us_only() {
        let county = record(
            Placetype::County,
            vec![
                ("iso:country", "CA".into()),
                ("qs:a2_alt", "Alt".into()),
                ("wof:name", "Plain".into()),
            ],
        );
        assert_eq!(select_name(&county).as_deref(), Some("Plain"));

        let region = record(
            Placetype::Region,
            vec![
                ("iso:country", "US".into()),
                ("qs:a2_alt", "Alt".into()),
                ("wof:name", "Plain".into()),
            ],
        );
        assert_eq!(select_name(&region).as_deref(), Some("Plain"));
    }

    #[test]
    fn declared_language_name() {
        let moscow = record(
            Placetype::Locality,
            vec![
                ("wof:lang", vec!["rus"].into()),
                ("name:rus_x_preferred", "Москва".into()),
                ("wof:name", "Moscow".into()),
            ],
        );
        let selection = resolve_name(&moscow).unwrap();
        assert_eq!(selection.name, "Москва");
        assert_eq!(selection.source, NameSource::Declared);
    }

    #[test]
    fn falls_back_to_label_then_name() {
        let with_label = record(
            Placetype::Locality,
            vec![
                ("wof:lang", vec!["rus"].into()),
                ("wof:label", "Moscow Label".into()),
                ("wof:name", "Moscow".into()),
            ],
        );
        assert_eq!(select_name(&with_label).as_deref(), Some("Moscow Label"));

        let without_label = record(
            Placetype::Locality,
            vec![("wof:lang", vec!["rus"].into()), ("wof:name", "Moscow".into())],
        );
        assert_eq!(select_name(&without_label).as_deref(), Some("Moscow"));

        let nothing = record(Placetype::Locality, vec![("wof:lang", vec!["rus"].into())]);
        assert_eq!(select_name(&nothing), None);
    }

    #[test]
    fn label_without_languages() {
        let plain = record(Placetype::Region, vec![("wof:label", "Default Label".into())]);
        assert_eq!(select_name(&plain).as_deref(), Some("Default Label"));
    }

    #[test]
    fn spoken_before_official_before_declared() {
        let props = vec![
            ("wof:lang_x_spoken", PropertyValue::from(vec!["fra"])),
            ("wof:lang_x_official", vec!["deu"].into()),
            ("wof:lang", vec!["ita"].into()),
            ("name:fra_x_preferred", "Genève".into()),
            ("name:deu_x_preferred", "Genf".into()),
            ("name:ita_x_preferred", "Ginevra".into()),
        ];
        assert_eq!(
            select_name(&record(Placetype::Locality, props.clone())).as_deref(),
            Some("Genève")
        );

        let without_french: Vec<_> = props
            .into_iter()
            .filter(|(key, _)| *key != "name:fra_x_preferred")
            .collect();
        let without_french_record = record(Placetype::Locality, without_french);
        let selection = resolve_name(&without_french_record).unwrap();
        assert_eq!(selection.name, "Genf");
        assert_eq!(selection.source, NameSource::Official);
    }

    #[test]
    fn sentinels_are_skipped() {
        let unknown = record(
            Placetype::Locality,
            vec![
                ("wof:lang_x_spoken", "unk".into()),
                ("wof:lang_x_official", vec!["und"].into()),
                ("wof:lang", vec!["deu"].into()),
                ("name:unk_x_preferred", "wrong".into()),
                ("name:und_x_preferred", "wrong".into()),
                ("name:deu_x_preferred", "München".into()),
            ],
        );
        assert_eq!(select_name(&unknown).as_deref(), Some("München"));
    }

    #[test]
    fn first_of_several_languages_wins() {
        let kyiv = record(
            Placetype::Locality,
            vec![
                ("wof:lang_x_official", vec!["ukr", "rus"].into()),
                ("name:ukr_x_preferred", vec!["Київ"].into()),
                ("name:rus_x_preferred", vec!["Киев"].into()),
            ],
        );
        assert_eq!(select_name(&kyiv).as_deref(), Some("Київ"));

        let missing_first = record(
            Placetype::Locality,
            vec![
                ("wof:lang_x_official", vec!["ukr", "rus"].into()),
                ("name:rus_x_preferred", vec!["Киев"].into()),
                ("wof:name", "Kyiv".into()),
            ],
        );
        assert_eq!(select_name(&missing_first).as_deref(), Some("Kyiv"));
    }

    #[test]
    fn country_code_table_fallback() {
        let munich = record(
            Placetype::Locality,
            vec![
                ("wof:country", "DE".into()),
                ("name:deu_x_preferred", "München".into()),
                ("wof:name", "Munich".into()),
            ],
        );
        let selection = resolve_name(&munich).unwrap();
        assert_eq!(selection.name, "München");
        assert_eq!(selection.source, NameSource::CountryCode);

        let unmapped = record(
            Placetype::Locality,
            vec![
                ("wof:country", "XX".into()),
                ("name:deu_x_preferred", "München".into()),
                ("wof:name", "Munich".into()),
            ],
        );
        assert_eq!(select_name(&unmapped).as_deref(), Some("Munich"));

        let sentinel = record(
            Placetype::Locality,
            vec![("wof:country", "unk".into()), ("wof:name", "Nowhere".into())],
        );
        assert_eq!(select_name(&sentinel).as_deref(), Some("Nowhere"));
    }

    #[test]
    fn naming_writes_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let diagnostics = NameDiagnostics::create(dir.path(), Placetype::Locality).unwrap();
        let path = diagnostics.path().to_path_buf();
        let mut naming = Naming::new(true, Some(diagnostics));

        let localized = record(
            Placetype::Locality,
            vec![
                ("wof:country", "DE".into()),
                ("name:deu_x_preferred", "München".into()),
            ],
        );
        let unnamed = record(Placetype::Locality, vec![]);
        assert_eq!(naming.display_name(&localized), "München");
        assert_eq!(naming.display_name(&unnamed), "1");
        naming.finish();

        let csv = std::fs::read_to_string(path).unwrap();
        assert_eq!(csv, "DE,1,false\n??,1,true\n");
    }

    #[test]
    fn unlocalized_naming_uses_plain_name() {
        let mut naming = Naming::new(false, None);
        let moscow = record(
            Placetype::Locality,
            vec![
                ("wof:lang", vec!["rus"].into()),
                ("name:rus_x_preferred", "Москва".into()),
                ("wof:name", "Moscow".into()),
            ],
        );
        assert_eq!(naming.display_name(&moscow), "Moscow");
    }
}
