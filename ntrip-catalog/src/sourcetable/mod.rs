//! NTRIP sourcetable parsing
//!
//! A sourcetable is line-oriented text: `CAS;...`, `NET;...`, `STR;...`
//! records and a terminal `ENDSOURCETABLE` line. Only `STR` records are of
//! interest here; their `;`-delimited fields follow the NTRIP layout with
//! the mountpoint at index 1, the 3-letter country code at index 8, and the
//! base-station latitude/longitude as decimal strings at indexes 9 and 10.
//!
//! Decoding from bytes (including the Latin-1 fallback for legacy casters)
//! is the HTTP client's job; this module only ever sees text lines.

/// An `STR` record must carry fields through the longitude at index 10.
const MIN_STR_FIELDS: usize = 11;

/// Base-station metadata extracted from one `STR` record.
///
/// Built per query and never persisted. The longitude is kept as parsed;
/// consumers normalize it before any comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct StrRecord {
    pub mountpoint: String,
    /// 3-letter country code of the base station
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Finds the `STR` record for a mountpoint in a sourcetable.
///
/// A line is a candidate when its first field is the literal `STR` and its
/// second field equals `mountpoint` exactly (case-sensitive). The first
/// candidate line decides the outcome: later duplicates are ignored, and a
/// truncated (fewer than 11 fields) or non-numeric candidate yields `None`
/// rather than an error, so a broken caster degrades to "no data for this
/// mountpoint" instead of aborting the resolution.
pub fn find_mountpoint_record(lines: &[String], mountpoint: &str) -> Option<StrRecord> {
    lines
        .iter()
        .map(|line| line.split(';').collect::<Vec<_>>())
        .find(|fields| is_candidate(fields, mountpoint))
        .and_then(|fields| parse_record(&fields))
}

fn is_candidate(fields: &[&str], mountpoint: &str) -> bool {
    fields.len() > 2 && fields[0] == "STR" && fields[1] == mountpoint
}

fn parse_record(fields: &[&str]) -> Option<StrRecord> {
    if fields.len() < MIN_STR_FIELDS {
        tracing::debug!(
            mountpoint = fields[1],
            fields = fields.len(),
            "truncated STR record"
        );
        return None;
    }
    let lat = fields[9].trim().parse().ok()?;
    let lon = fields[10].trim().parse().ok()?;
    Some(StrRecord {
        mountpoint: fields[1].to_string(),
        country: fields[8].to_string(),
        lat,
        lon,
    })
}
