//! ntrip-catalog - CRS resolution for NTRIP correction streams
//!
//! GNSS correction streams carry coordinates in a specific coordinate
//! reference system (CRS), but NTRIP casters do not advertise which one.
//! This library resolves, for a caster URL and mountpoint, the CRS a rover
//! at a given position should use, by matching the query against a catalog
//! of known casters and their stream filter policies.
//!
//! # High-Level API
//!
//! ```no_run
//! use ntrip_catalog::{Catalog, ReqwestNtripClient, RoverPosition, resolve_crs};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::from_path("dist/ntrip-catalog.json")?;
//! let client = ReqwestNtripClient::new()?;
//!
//! let url = "http://ergnss-tr.ign.es:2101";
//! if let Some(entry) = catalog.find_entry(url) {
//!     let rover = RoverPosition::new(40.0, -1.5);
//!     if let Some(crs) = resolve_crs(entry, url, "CERCANA3", rover, None, None, &client).await? {
//!         println!("{} ({})", crs.id, crs.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The catalog is read-only after load and safe to share across concurrent
//! resolutions; each call carries its own sourcetable cache and performs at
//! most one network fetch.

pub mod catalog;
pub mod client;
pub mod coord;
pub mod logging;
pub mod resolver;
pub mod sourcetable;

pub use catalog::{Catalog, CatalogError, Crs, Entry, RoverHint, Stream, StreamFilter};
pub use client::{ClientError, NtripClient, ReqwestNtripClient};
pub use coord::{normalize_lon, point_in_bbox, BBox};
pub use resolver::{resolve_crs, ResolveError, RoverPosition, SourcetableCache};
pub use sourcetable::{find_mountpoint_record, StrRecord};

/// Version of the ntrip-catalog library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
