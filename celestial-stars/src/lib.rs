//! Binary star catalog with name indices and brightest-first downsampling.
//!
//! Decodes a fixed-layout catalog of stars (HIP id, cartesian position,
//! absolute magnitude, packed spectral class), attaches human-readable names
//! from a text name table, and derives reduced catalogs that keep the
//! brightest stars for consumers with a rendering or memory budget.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | [`Catalog`] facade: `read`, `read_names`, `downsample`, lookups |
//! | [`decode`] | Binary format: [`decode`](decode::decode), [`encode`](decode::encode) |
//! | [`names`] | Name table parsing: [`resolve_names`](names::resolve_names) |
//! | [`downsample`](mod@downsample) | Brightest-first selection |
//! | [`record`] | [`StarRecord`] and the packed [`SpectralDescriptor`] |
//! | [`fetch`] | [`CatalogLoader`], async download of catalog and names |
//! | [`config`] | [`LoaderConfig`] |
//! | [`error`] | [`CatalogError`] |
//!
//! # Quick Start
//!
//! ```no_run
//! use celestial_stars::Catalog;
//!
//! # fn main() -> Result<(), celestial_stars::CatalogError> {
//! let mut catalog = Catalog::open("data/stars.dat")?;
//! catalog.read_names(&std::fs::read_to_string("data/starnames.dat")?)?;
//!
//! if let Some(vega) = catalog.star_by_name("Vega") {
//!     println!("{}", vega);
//! }
//!
//! let bright = catalog.downsample(1000);
//! assert!(bright.num_stars() <= 1000);
//! # Ok(())
//! # }
//! ```
//!
//! # Binary Format
//!
//! A 14-byte header (`CELSTARS`, version bytes `0x00 0x01`, `u32` record
//! count) followed by 20-byte little-endian records: `hip_id` u32, `x` `y` `z`
//! f32 in light years, absolute magnitude i16 in 1/256 steps, spectral u16.
//! See [`record`] for the spectral bit layout.
//!
//! # Features
//!
//! - **`cli`**: builds the `starcat` binary for inspecting, downsampling and
//!   fetching catalogs from the command line.
//! - **`integration-tests`**: enables tests against the full catalog fixtures
//!   in `data/`.

pub mod catalog;
pub mod config;
pub mod decode;
pub mod downsample;
pub mod error;
pub mod fetch;
pub mod names;
pub mod record;

pub use catalog::Catalog;
pub use config::LoaderConfig;
pub use decode::DecodedStars;
pub use error::{CatalogError, CatalogResult};
pub use fetch::CatalogLoader;
pub use names::{NameIndex, ResolveStats};
pub use record::{SpectralDescriptor, StarRecord, StarType};
