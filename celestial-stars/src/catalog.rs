//! The star catalog facade.
//!
//! A [`Catalog`] owns three indices: stars by HIP id, HIP id by name, and
//! names by HIP id. It is populated from a binary buffer with
//! [`Catalog::read`], enriched from a name table with
//! [`Catalog::read_names`], and reduced with [`Catalog::downsample`]:
//!
//! ```no_run
//! # fn main() -> Result<(), celestial_stars::CatalogError> {
//! use celestial_stars::Catalog;
//!
//! let bytes = std::fs::read("data/stars.dat")?;
//! let names = std::fs::read_to_string("data/starnames.dat")?;
//!
//! let mut catalog = Catalog::new().read(&bytes)?;
//! catalog.read_names(&names)?;
//! let bright = catalog.downsample(1000);
//! println!("{}", bright);
//! # Ok(())
//! # }
//! ```
//!
//! Every name in the catalog refers to a star it holds, and the magnitude
//! bounds always cover exactly the current star set.

use memmap2::Mmap;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::decode::{decode, encode, magnitude_range};
use crate::downsample::{brightness_order, downsample};
use crate::error::{CatalogError, CatalogResult};
use crate::names::{format_names, resolve_into, ResolveStats};
use crate::record::StarRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    stars_by_hip: HashMap<u32, StarRecord>,
    hip_by_name: HashMap<String, u32>,
    names_by_hip: HashMap<u32, Vec<String>>,
    min_mag: Option<i16>,
    max_mag: Option<i16>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog directly from records and `(name, hip_id)` pairs.
    ///
    /// Later records replace earlier ones with the same id. Names for ids
    /// not among `stars` are dropped; a repeated name points at its last id.
    /// Names are kept verbatim, but [`write_names`](Self::write_names) only
    /// writes those the name table can represent.
    pub fn from_parts<S, N, K>(stars: S, names: N) -> Self
    where
        S: IntoIterator<Item = StarRecord>,
        N: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        let stars_by_hip: HashMap<u32, StarRecord> =
            stars.into_iter().map(|s| (s.hip_id, s)).collect();

        let mut hip_by_name = HashMap::new();
        let mut names_by_hip: HashMap<u32, Vec<String>> = HashMap::new();
        for (name, hip) in names {
            if !stars_by_hip.contains_key(&hip) {
                continue;
            }
            let name = name.into();
            let aliases = names_by_hip.entry(hip).or_default();
            if !aliases.contains(&name) {
                aliases.push(name.clone());
            }
            hip_by_name.insert(name, hip);
        }

        Self::from_indices(stars_by_hip, hip_by_name, names_by_hip)
    }

    /// Assemble a catalog from prebuilt indices, recomputing magnitude bounds.
    pub(crate) fn from_indices(
        stars_by_hip: HashMap<u32, StarRecord>,
        hip_by_name: HashMap<String, u32>,
        names_by_hip: HashMap<u32, Vec<String>>,
    ) -> Self {
        let range = magnitude_range(stars_by_hip.values());
        Self {
            stars_by_hip,
            hip_by_name,
            names_by_hip,
            min_mag: range.map(|(lo, _)| lo),
            max_mag: range.map(|(_, hi)| hi),
        }
    }

    /// Decode a binary catalog buffer into this catalog and return it.
    ///
    /// The star set is replaced. Names already attached are kept for ids
    /// that are still present. On error nothing is returned; the caller's
    /// catalog was moved in and is dropped with the error.
    ///
    /// # Errors
    /// [`CatalogError::Format`] for a bad header, [`CatalogError::Truncated`]
    /// for a short buffer.
    pub fn read(mut self, buffer: &[u8]) -> CatalogResult<Self> {
        let decoded = decode(buffer)?;
        self.stars_by_hip = decoded.stars_by_hip;
        self.min_mag = decoded.min_mag;
        self.max_mag = decoded.max_mag;
        self.retain_names();
        debug!(
            stars = self.num_stars(),
            duplicates = decoded.duplicates,
            "Read star catalog"
        );
        Ok(self)
    }

    /// Attach names from a name table to the loaded stars.
    ///
    /// Names merge into any already attached. Entries for unknown ids are
    /// skipped and counted in the returned stats.
    ///
    /// # Errors
    /// [`CatalogError::InvalidState`] if no stars have been read.
    pub fn read_names(&mut self, text: &str) -> CatalogResult<ResolveStats> {
        if self.stars_by_hip.is_empty() {
            return Err(CatalogError::invalid_state(
                "cannot attach names before stars are read",
            ));
        }
        Ok(resolve_into(
            text,
            &self.stars_by_hip,
            &mut self.hip_by_name,
            &mut self.names_by_hip,
        ))
    }

    /// The `n` brightest stars as a new catalog. See [`downsample`].
    pub fn downsample(&self, n: usize) -> Catalog {
        downsample(self, n)
    }

    /// Memory-map and decode a catalog file.
    ///
    /// # Errors
    /// [`CatalogError::Io`] if the file cannot be opened or mapped, otherwise
    /// the errors of [`Catalog::read`].
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), bytes = mmap.len(), "Mapped catalog file");
        Self::new().read(&mmap)
    }

    /// Encode the stars back into the binary catalog format.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(self.stars_by_hip.values())
    }

    /// Render the attached names as a name table.
    pub fn write_names(&self) -> String {
        format_names(&self.names_by_hip)
    }

    fn retain_names(&mut self) {
        let stars = &self.stars_by_hip;
        self.hip_by_name.retain(|_, hip| stars.contains_key(hip));
        self.names_by_hip.retain(|hip, _| stars.contains_key(hip));
    }

    pub fn num_stars(&self) -> usize {
        self.stars_by_hip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars_by_hip.is_empty()
    }

    /// Smallest (brightest) `abs_mag`, `None` when empty.
    pub fn min_mag(&self) -> Option<i16> {
        self.min_mag
    }

    /// Largest (faintest) `abs_mag`, `None` when empty.
    pub fn max_mag(&self) -> Option<i16> {
        self.max_mag
    }

    pub fn star(&self, hip_id: u32) -> Option<&StarRecord> {
        self.stars_by_hip.get(&hip_id)
    }

    pub fn star_by_name(&self, name: &str) -> Option<&StarRecord> {
        self.hip_by_name(name).and_then(|hip| self.star(hip))
    }

    pub fn hip_by_name(&self, name: &str) -> Option<u32> {
        self.hip_by_name.get(name).copied()
    }

    /// All names of a star in table order; empty if it has none.
    pub fn names(&self, hip_id: u32) -> &[String] {
        self.names_by_hip
            .get(&hip_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First listed name of a star.
    pub fn primary_name(&self, hip_id: u32) -> Option<&str> {
        self.names(hip_id).first().map(String::as_str)
    }

    /// Stars in unspecified order.
    pub fn stars(&self) -> impl Iterator<Item = &StarRecord> {
        self.stars_by_hip.values()
    }

    /// Up to `limit` stars, brightest first.
    pub fn brightest(&self, limit: usize) -> Vec<&StarRecord> {
        let mut ranked: Vec<&StarRecord> = self.stars().collect();
        ranked.sort_unstable_by(|a, b| brightness_order(a, b));
        ranked.truncate(limit);
        ranked
    }

    pub fn stars_by_hip(&self) -> &HashMap<u32, StarRecord> {
        &self.stars_by_hip
    }

    pub fn hip_by_name_map(&self) -> &HashMap<String, u32> {
        &self.hip_by_name
    }

    pub fn names_by_hip(&self) -> &HashMap<u32, Vec<String>> {
        &self.names_by_hip
    }

    /// Number of distinct names.
    pub fn name_count(&self) -> usize {
        self.hip_by_name.len()
    }

    /// Number of stars with at least one name.
    pub fn named_stars(&self) -> usize {
        self.names_by_hip.values().filter(|n| !n.is_empty()).count()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stars: {}", self.num_stars())?;
        writeln!(f, "Named stars: {}", self.named_stars())?;
        writeln!(f, "Names: {}", self.name_count())?;
        match (self.min_mag, self.max_mag) {
            (Some(lo), Some(hi)) => write!(
                f,
                "Absolute magnitude: {:.2} to {:.2}",
                f32::from(lo) / crate::record::MAG_SCALE,
                f32::from(hi) / crate::record::MAG_SCALE
            ),
            _ => write!(f, "Absolute magnitude: n/a"),
        }
    }
}
