//! NTRIP catalog loading and caster lookup
//!
//! The catalog is a JSON document (`ntrip-catalog.json`) listing, per
//! physical caster, the URL aliases it answers on and the correction
//! streams it serves with their candidate CRSs. Decoding is structural
//! only; files are assumed to satisfy the published JSON schema.

mod types;

pub use types::{Catalog, Crs, Entry, RoverHint, Stream, StreamFilter};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog not found at: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Catalog {
    /// Loads a catalog from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader)
    }

    /// Loads a catalog from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        tracing::debug!(entries = catalog.entries.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Loads a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Finds the entry whose URL aliases contain `url` exactly.
    ///
    /// Callers are expected to normalize the URL first (scheme defaulting
    /// to `http`, explicit port, no trailing slash); the lookup itself is
    /// plain set membership.
    pub fn find_entry(&self, url: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|entry| entry.urls.contains(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::BBox;
    use std::io::Write;

    const CATALOG_JSON: &str = r#"{
        "entries": [
            {
                "name": "IGN ES",
                "urls": ["http://ergnss-tr.ign.es:2101", "http://ergnss-tr.ign.es:2102"],
                "streams": [
                    {
                        "crss": [
                            {
                                "id": "EPSG:7931",
                                "name": "ETRF2000",
                                "rover_bbox": [-10.0, 35.0, 5.0, 44.0]
                            },
                            {
                                "id": "EPSG:4080",
                                "name": "REGCAN95",
                                "rover_countries": ["ESP"],
                                "description": "Canary Islands"
                            }
                        ],
                        "filter": {"mountpoints": ["CERCANA3"]}
                    },
                    {
                        "crss": [{"id": "EPSG:4937", "name": "ETRS89"}],
                        "filter": {"countries": ["ESP"], "lat_lon_bboxes": [[-10.0, 35.0, 5.0, 44.0]]}
                    },
                    {
                        "crss": [{"id": "EPSG:9989", "name": "ITRF2020"}],
                        "filter": "all"
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_catalog_decodes_all_filter_kinds() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        assert_eq!(catalog.entries.len(), 1);

        let entry = &catalog.entries[0];
        assert_eq!(entry.name, "IGN ES");
        assert_eq!(entry.streams.len(), 3);

        match &entry.streams[0].filter {
            StreamFilter::Mountpoints(points) => assert!(points.contains("CERCANA3")),
            other => panic!("expected mountpoints filter, got {:?}", other),
        }
        match &entry.streams[1].filter {
            StreamFilter::Geo { countries, bboxes } => {
                assert!(countries.contains("ESP"));
                assert_eq!(bboxes, &[BBox::new(-10.0, 35.0, 5.0, 44.0)]);
            }
            other => panic!("expected geo filter, got {:?}", other),
        }
        assert!(matches!(entry.streams[2].filter, StreamFilter::All));
    }

    #[test]
    fn test_crs_rover_hints() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
        let crss = &catalog.entries[0].streams[0].crss;

        assert_eq!(crss[0].id, "EPSG:7931");
        assert!(matches!(crss[0].rover, Some(RoverHint::Bbox(_))));
        assert!(crss[0].description.is_none());

        match &crss[1].rover {
            Some(RoverHint::Countries(countries)) => assert!(countries.contains("ESP")),
            other => panic!("expected rover countries, got {:?}", other),
        }
        assert_eq!(crss[1].description.as_deref(), Some("Canary Islands"));

        let plain = &catalog.entries[0].streams[2].crss[0];
        assert!(plain.rover.is_none());
    }

    #[test]
    fn test_geo_filter_keys_are_optional() {
        let stream: Stream = serde_json::from_str(
            r#"{"crss": [{"id": "EPSG:4937", "name": "ETRS89"}], "filter": {"countries": ["DEU"]}}"#,
        )
        .unwrap();
        match stream.filter {
            StreamFilter::Geo { countries, bboxes } => {
                assert!(countries.contains("DEU"));
                assert!(bboxes.is_empty());
            }
            other => panic!("expected geo filter, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_filter_keyword_is_rejected() {
        let result: Result<Stream, _> = serde_json::from_str(
            r#"{"crss": [{"id": "EPSG:4937", "name": "ETRS89"}], "filter": "some"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rover_bbox_takes_precedence_over_countries() {
        let crs: Crs = serde_json::from_str(
            r#"{
                "id": "EPSG:7923",
                "name": "ETRF93",
                "rover_bbox": [5.0, 45.0, 11.0, 48.0],
                "rover_countries": ["CHE"]
            }"#,
        )
        .unwrap();
        assert!(matches!(crs.rover, Some(RoverHint::Bbox(_))));
    }

    #[test]
    fn test_find_entry_by_url() {
        let catalog = Catalog::from_json(CATALOG_JSON).unwrap();

        assert!(catalog.find_entry("http://ergnss-tr.ign.es:2101").is_some());
        assert!(catalog.find_entry("http://ergnss-tr.ign.es:2102").is_some());
        // Exact membership only, no normalization here
        assert!(catalog.find_entry("ergnss-tr.ign.es:2101").is_none());
        assert!(catalog.find_entry("http://unknown.example.com:2101").is_none());
    }

    #[test]
    fn test_from_path_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG_JSON.as_bytes()).unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.entries[0].name, "IGN ES");
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Catalog::from_path("/nonexistent/ntrip-catalog.json");
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }
}
