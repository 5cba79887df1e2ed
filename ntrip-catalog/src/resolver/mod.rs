//! CRS resolution
//!
//! Walks a catalog entry's streams in order, decides per stream whether its
//! CRS list is in scope for the queried mountpoint, and picks one CRS from
//! the first admitting stream using the rover position/country.
//!
//! Stream order encodes priority, not breadth: catalog authors list the
//! most specific stream first, and the first admitting stream decides the
//! outcome. A rover tie-break miss on that stream ends the resolution with
//! no match; it does not fall through to later streams.

use tracing::{debug, trace};

use crate::catalog::{Crs, Entry, RoverHint, Stream, StreamFilter};
use crate::client::{ClientError, NtripClient};
use crate::coord::point_in_bbox;
use crate::sourcetable;

/// Error type for a resolution call.
///
/// Only a failed sourcetable fetch aborts a resolution. A mountpoint with
/// no usable sourcetable record, or a rover outside every candidate CRS,
/// is a normal `Ok(None)` outcome, never an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("sourcetable fetch failed: {0}")]
    Network(#[from] ClientError),
}

/// Rover position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoverPosition {
    pub lat: f64,
    pub lon: f64,
}

impl RoverPosition {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Call-scoped sourcetable cache.
///
/// Geo filters need server metadata; this cache makes sure one resolution
/// performs at most one fetch no matter how many streams ask for it, and
/// lets callers pre-supply sourcetable lines for fully offline evaluation.
/// It is never shared across resolution calls.
#[derive(Debug, Default)]
pub struct SourcetableCache {
    lines: Option<Vec<String>>,
}

impl SourcetableCache {
    /// An empty cache; the first geo filter triggers the fetch.
    pub fn empty() -> Self {
        Self { lines: None }
    }

    /// A cache pre-populated with caller-supplied sourcetable lines.
    /// No network access will happen for this resolution.
    pub fn presupplied(lines: Vec<String>) -> Self {
        Self { lines: Some(lines) }
    }

    /// Returns the cached lines, fetching them on first use.
    pub async fn get_or_fetch<C: NtripClient>(
        &mut self,
        client: &C,
        url: &str,
    ) -> Result<&[String], ClientError> {
        if self.lines.is_none() {
            debug!(url, "geo filter needs server metadata");
            let lines = client.fetch_sourcetable(url).await?;
            self.lines = Some(lines);
        }
        Ok(self.lines.as_deref().unwrap_or(&[]))
    }
}

/// Resolves the CRS a rover should use for one correction stream.
///
/// `presupplied_sourcetable`, when given, replaces the network fetch
/// entirely; the filters behave identically on either path.
///
/// Returns `Ok(None)` when no stream admits the mountpoint or the first
/// admitting stream has no CRS matching the rover. A fetch failure is the
/// only hard error; downstream geo filters cannot be evaluated without the
/// sourcetable, so it is surfaced instead of being treated as "no data".
pub async fn resolve_crs<C: NtripClient>(
    entry: &Entry,
    caster_url: &str,
    mountpoint: &str,
    rover: RoverPosition,
    rover_country: Option<&str>,
    presupplied_sourcetable: Option<Vec<String>>,
    client: &C,
) -> Result<Option<Crs>, ResolveError> {
    let mut cache = match presupplied_sourcetable {
        Some(lines) => SourcetableCache::presupplied(lines),
        None => SourcetableCache::empty(),
    };

    for stream in &entry.streams {
        let Some(crss) = admitted_crss(stream, mountpoint, caster_url, &mut cache, client).await?
        else {
            continue;
        };

        // First admitting stream decides the outcome, match or not.
        let picked = pick_for_rover(crss, rover, rover_country);
        match &picked {
            Some(crs) => debug!(mountpoint, crs = %crs.id, "resolved"),
            None => debug!(mountpoint, "admitting stream has no CRS for this rover"),
        }
        return Ok(picked.cloned());
    }

    debug!(mountpoint, "no stream admits this mountpoint");
    Ok(None)
}

/// Decides whether one stream's CRS list is in scope for the query.
async fn admitted_crss<'a, C: NtripClient>(
    stream: &'a Stream,
    mountpoint: &str,
    caster_url: &str,
    cache: &mut SourcetableCache,
    client: &C,
) -> Result<Option<&'a [Crs]>, ResolveError> {
    if stream.crss.is_empty() {
        return Ok(None);
    }

    match &stream.filter {
        StreamFilter::All => Ok(Some(&stream.crss)),
        StreamFilter::Mountpoints(points) => {
            Ok(points.contains(mountpoint).then_some(stream.crss.as_slice()))
        }
        StreamFilter::Geo { countries, bboxes } => {
            let lines = cache.get_or_fetch(client, caster_url).await?;

            let Some(record) = sourcetable::find_mountpoint_record(lines, mountpoint) else {
                // Missing or malformed record: this stream does not admit,
                // resolution continues with the next one.
                trace!(mountpoint, "no usable STR record");
                return Ok(None);
            };

            if countries.contains(&record.country) {
                return Ok(Some(&stream.crss));
            }

            let base_in_box = bboxes
                .iter()
                .any(|bbox| point_in_bbox(record.lat, record.lon, bbox));
            Ok(base_in_box.then_some(stream.crss.as_slice()))
        }
    }
}

/// Picks the first CRS whose rover hint matches, in list (priority) order.
fn pick_for_rover<'a>(
    crss: &'a [Crs],
    rover: RoverPosition,
    rover_country: Option<&str>,
) -> Option<&'a Crs> {
    crss.iter().find(|crs| match &crs.rover {
        Some(RoverHint::Bbox(bbox)) => point_in_bbox(rover.lat, rover.lon, bbox),
        Some(RoverHint::Countries(countries)) => {
            rover_country.is_some_and(|country| countries.contains(country))
        }
        None => true,
    })
}
