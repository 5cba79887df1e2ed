//! Catalog data model
//!
//! Mirrors the `ntrip-catalog.json` wire format. The filter and rover-hint
//! variants are closed sums: the catalog schema fixes the variant set, and
//! every decision point in the resolver matches on them exhaustively.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::coord::BBox;

/// The full catalog: one entry per physical caster.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub entries: Vec<Entry>,
}

/// One physical caster with all its known URL aliases.
///
/// Read-only after load; safe to share across concurrent resolutions.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub name: String,
    /// All known aliases/schemes/ports for this caster. URL sets are
    /// disjoint across entries (enforced by the catalog CI, not here).
    pub urls: BTreeSet<String>,
    /// Streams in priority order: most specific first.
    pub streams: Vec<Stream>,
}

/// One logical correction service, possibly spanning many mountpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    /// Candidate CRSs in priority order; the first one whose rover hint
    /// matches wins.
    pub crss: Vec<Crs>,
    pub filter: StreamFilter,
}

/// Scope policy deciding whether a stream's CRS list applies to a query.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawFilter")]
pub enum StreamFilter {
    /// Always admits.
    All,
    /// Admits iff the queried mountpoint is a member.
    Mountpoints(BTreeSet<String>),
    /// Admits iff the mountpoint's base station (looked up in the caster's
    /// sourcetable) is in one of the countries or inside one of the boxes.
    Geo {
        countries: BTreeSet<String>,
        bboxes: Vec<BBox>,
    },
}

/// Wire encodings: the literal string `"all"`, `{"mountpoints": [...]}`, or
/// `{"countries": [...], "lat_lon_bboxes": [[...]]}` with both keys optional.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFilter {
    Keyword(String),
    Mountpoints {
        mountpoints: BTreeSet<String>,
    },
    // Must stay the last variant: with both keys optional it matches any map.
    Geo {
        #[serde(default)]
        countries: BTreeSet<String>,
        #[serde(default)]
        lat_lon_bboxes: Vec<BBox>,
    },
}

impl TryFrom<RawFilter> for StreamFilter {
    type Error = String;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        match raw {
            RawFilter::Keyword(keyword) if keyword == "all" => Ok(StreamFilter::All),
            RawFilter::Keyword(keyword) => Err(format!("unknown filter keyword: {keyword:?}")),
            RawFilter::Mountpoints { mountpoints } => Ok(StreamFilter::Mountpoints(mountpoints)),
            RawFilter::Geo {
                countries,
                lat_lon_bboxes,
            } => Ok(StreamFilter::Geo {
                countries,
                bboxes: lat_lon_bboxes,
            }),
        }
    }
}

/// One candidate coordinate reference system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCrs")]
pub struct Crs {
    /// Authority:code identifier, e.g. `EPSG:7931`.
    pub id: String,
    pub name: String,
    /// Disambiguation by rover position or country; `None` matches
    /// unconditionally.
    pub rover: Option<RoverHint>,
    pub description: Option<String>,
}

/// Rover-side disambiguation tag on a CRS candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum RoverHint {
    /// Matches iff the rover position lies inside the box.
    Bbox(BBox),
    /// Matches iff the rover country is supplied and is a member.
    Countries(BTreeSet<String>),
}

#[derive(Debug, Deserialize)]
struct RawCrs {
    id: String,
    name: String,
    #[serde(default)]
    rover_bbox: Option<BBox>,
    #[serde(default)]
    rover_countries: Option<BTreeSet<String>>,
    #[serde(default)]
    description: Option<String>,
}

impl From<RawCrs> for Crs {
    fn from(raw: RawCrs) -> Self {
        // rover_bbox takes precedence when a catalog carries both keys
        let rover = match (raw.rover_bbox, raw.rover_countries) {
            (Some(bbox), _) => Some(RoverHint::Bbox(bbox)),
            (None, Some(countries)) => Some(RoverHint::Countries(countries)),
            (None, None) => None,
        };
        Self {
            id: raw.id,
            name: raw.name,
            rover,
            description: raw.description,
        }
    }
}
