use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// ISO 3166-1 alpha-2 country code to official languages (ISO 639-3),
    /// most widely used first.
    static ref COUNTRY_LANGUAGES: HashMap<&'static str, &'static [&'static str]> = {
        let table: &[(&str, &[&str])] = &[
            ("AD", &["cat"]),
            ("AE", &["ara"]),
            ("AF", &["pus", "fas"]),
            ("AL", &["sqi"]),
            ("AM", &["hye"]),
            ("AO", &["por"]),
            ("AR", &["spa"]),
            ("AT", &["deu"]),
            ("AU", &["eng"]),
            ("AZ", &["aze"]),
            ("BA", &["bos", "hrv", "srp"]),
            ("BD", &["ben"]),
            ("BE", &["nld", "fra", "deu"]),
            ("BG", &["bul"]),
            ("BH", &["ara"]),
            ("BO", &["spa"]),
            ("BR", &["por"]),
            ("BY", &["bel", "rus"]),
            ("CA", &["eng", "fra"]),
            ("CD", &["fra"]),
            ("CH", &["deu", "fra", "ita", "roh"]),
            ("CL", &["spa"]),
            ("CN", &["zho"]),
            ("CO", &["spa"]),
            ("CR", &["spa"]),
            ("CU", &["spa"]),
            ("CY", &["ell", "tur"]),
            ("CZ", &["ces"]),
            ("DE", &["deu"]),
            ("DK", &["dan"]),
            ("DO", &["spa"]),
            ("DZ", &["ara"]),
            ("EC", &["spa"]),
            ("EE", &["est"]),
            ("EG", &["ara"]),
            ("ES", &["spa"]),
            ("ET", &["amh"]),
            ("FI", &["fin", "swe"]),
            ("FR", &["fra"]),
            ("GB", &["eng"]),
            ("GE", &["kat"]),
            ("GH", &["eng"]),
            ("GR", &["ell"]),
            ("GT", &["spa"]),
            ("HK", &["zho", "eng"]),
            ("HN", &["spa"]),
            ("HR", &["hrv"]),
            ("HU", &["hun"]),
            ("ID", &["ind"]),
            ("IE", &["eng", "gle"]),
            ("IL", &["heb"]),
            ("IN", &["hin", "eng"]),
            ("IQ", &["ara", "kur"]),
            ("IR", &["fas"]),
            ("IS", &["isl"]),
            ("IT", &["ita"]),
            ("JO", &["ara"]),
            ("JP", &["jpn"]),
            ("KE", &["swa", "eng"]),
            ("KG", &["kir", "rus"]),
            ("KH", &["khm"]),
            ("KR", &["kor"]),
            ("KW", &["ara"]),
            ("KZ", &["kaz", "rus"]),
            ("LB", &["ara"]),
            ("LI", &["deu"]),
            ("LK", &["sin", "tam"]),
            ("LT", &["lit"]),
            ("LU", &["ltz", "fra", "deu"]),
            ("LV", &["lav"]),
            ("LY", &["ara"]),
            ("MA", &["ara"]),
            ("MC", &["fra"]),
            ("MD", &["ron"]),
            ("ME", &["srp"]),
            ("MK", &["mkd"]),
            ("MN", &["mon"]),
            ("MT", &["mlt", "eng"]),
            ("MX", &["spa"]),
            ("MY", &["msa"]),
            ("NG", &["eng"]),
            ("NI", &["spa"]),
            ("NL", &["nld"]),
            ("NO", &["nor"]),
            ("NP", &["nep"]),
            ("NZ", &["eng", "mri"]),
            ("OM", &["ara"]),
            ("PA", &["spa"]),
            ("PE", &["spa"]),
            ("PH", &["fil", "eng"]),
            ("PK", &["urd", "eng"]),
            ("PL", &["pol"]),
            ("PT", &["por"]),
            ("PY", &["spa", "grn"]),
            ("QA", &["ara"]),
            ("RO", &["ron"]),
            ("RS", &["srp"]),
            ("RU", &["rus"]),
            ("SA", &["ara"]),
            ("SE", &["swe"]),
            ("SG", &["eng", "msa", "zho", "tam"]),
            ("SI", &["slv"]),
            ("SK", &["slk"]),
            ("SV", &["spa"]),
            ("SY", &["ara"]),
            ("TH", &["tha"]),
            ("TN", &["ara"]),
            ("TR", &["tur"]),
            ("TW", &["zho"]),
            ("TZ", &["swa", "eng"]),
            ("UA", &["ukr"]),
            ("UG", &["eng", "swa"]),
            ("US", &["eng"]),
            ("UY", &["spa"]),
            ("UZ", &["uzb"]),
            ("VE", &["spa"]),
            ("VN", &["vie"]),
            ("YE", &["ara"]),
            ("ZA", &["afr", "eng", "zul", "xho"]),
        ];
        table.iter().copied().collect()
    };
}

pub fn official_languages(country: &str) -> Option<&'static [&'static str]> {
    COUNTRY_LANGUAGES.get(country).copied()
}
