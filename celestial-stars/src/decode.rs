//! Binary star catalog codec.
//!
//! Layout (all fields little-endian):
//!
//! 1. **Header** (14 bytes): ASCII `CELSTARS`, version bytes `0x00 0x01`,
//!    then the `u32` record count.
//! 2. **Records** (`count × 20` bytes): `hip_id` u32, `x` `y` `z` f32,
//!    `abs_mag` i16, packed spectral u16.
//!
//! [`decode`] validates the header byte by byte and refuses to produce a
//! partial catalog. [`encode`] writes the same layout.

use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::record::StarRecord;

/// `CELSTARS` followed by version 0x0100 stored little-endian.
pub const CATALOG_MAGIC: &[u8; 10] = b"CELSTARS\x00\x01";
pub const HEADER_SIZE: usize = 14;
pub const RECORD_SIZE: usize = 20;

/// Result of decoding a catalog buffer.
#[derive(Debug, Clone, Default)]
pub struct DecodedStars {
    /// Number of distinct ids, always `stars_by_hip.len()`.
    pub num_stars: usize,
    pub stars_by_hip: HashMap<u32, StarRecord>,
    pub min_mag: Option<i16>,
    pub max_mag: Option<i16>,
    /// Records whose `hip_id` had already been seen and which overwrote it.
    pub duplicates: usize,
}

/// Decode a catalog buffer.
///
/// Duplicate `hip_id`s are last-write-wins; the count of overwritten
/// records is returned in [`DecodedStars::duplicates`].
///
/// # Errors
/// [`CatalogError::Format`] on the first header byte that differs from
/// [`CATALOG_MAGIC`], [`CatalogError::Truncated`] if the buffer ends before
/// the header or the declared records.
pub fn decode(buffer: &[u8]) -> CatalogResult<DecodedStars> {
    check_magic(buffer)?;

    let declared = LittleEndian::read_u32(&buffer[10..HEADER_SIZE]) as usize;
    let expected = declared
        .checked_mul(RECORD_SIZE)
        .and_then(|n| n.checked_add(HEADER_SIZE))
        .unwrap_or(usize::MAX);
    if buffer.len() < expected {
        return Err(CatalogError::Truncated {
            expected,
            actual: buffer.len(),
        });
    }
    if buffer.len() > expected {
        debug!(
            trailing = buffer.len() - expected,
            "Ignoring trailing bytes after last star record"
        );
    }

    let mut stars_by_hip = HashMap::with_capacity(declared);
    let mut duplicates = 0;
    let mut mag_range: Option<(i16, i16)> = None;

    for chunk in buffer[HEADER_SIZE..expected].chunks_exact(RECORD_SIZE) {
        let star = decode_record(chunk);
        mag_range = Some(match mag_range {
            Some((lo, hi)) => (lo.min(star.abs_mag), hi.max(star.abs_mag)),
            None => (star.abs_mag, star.abs_mag),
        });
        if stars_by_hip.insert(star.hip_id, star).is_some() {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        warn!(
            duplicates,
            "Catalog contains duplicate HIP ids; later records replaced earlier ones"
        );
        // The overwritten records may have held the extremes.
        mag_range = magnitude_range(stars_by_hip.values());
    }

    debug!(
        declared,
        distinct = stars_by_hip.len(),
        "Decoded star catalog"
    );

    Ok(DecodedStars {
        num_stars: stars_by_hip.len(),
        stars_by_hip,
        min_mag: mag_range.map(|(lo, _)| lo),
        max_mag: mag_range.map(|(_, hi)| hi),
        duplicates,
    })
}

fn check_magic(buffer: &[u8]) -> CatalogResult<()> {
    for (offset, (&expected, &actual)) in CATALOG_MAGIC.iter().zip(buffer).enumerate() {
        if expected != actual {
            return Err(CatalogError::Format {
                offset,
                expected,
                actual,
            });
        }
    }
    if buffer.len() < HEADER_SIZE {
        return Err(CatalogError::Truncated {
            expected: HEADER_SIZE,
            actual: buffer.len(),
        });
    }
    Ok(())
}

fn decode_record(bytes: &[u8]) -> StarRecord {
    let hip_id = LittleEndian::read_u32(&bytes[0..4]);
    let x = LittleEndian::read_f32(&bytes[4..8]);
    let y = LittleEndian::read_f32(&bytes[8..12]);
    let z = LittleEndian::read_f32(&bytes[12..16]);
    let abs_mag = LittleEndian::read_i16(&bytes[16..18]);
    let spectral = LittleEndian::read_u16(&bytes[18..20]);
    StarRecord::new(hip_id, [x, y, z], abs_mag, spectral)
}

/// Encode stars in the catalog layout, ordered by ascending `hip_id`.
pub fn encode<'a, I>(stars: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a StarRecord>,
{
    let mut sorted: Vec<&StarRecord> = stars.into_iter().collect();
    sorted.sort_unstable_by_key(|s| s.hip_id);

    let mut buf = vec![0u8; HEADER_SIZE + sorted.len() * RECORD_SIZE];
    buf[0..10].copy_from_slice(CATALOG_MAGIC);
    LittleEndian::write_u32(&mut buf[10..HEADER_SIZE], sorted.len() as u32);

    for (star, chunk) in sorted
        .iter()
        .zip(buf[HEADER_SIZE..].chunks_exact_mut(RECORD_SIZE))
    {
        LittleEndian::write_u32(&mut chunk[0..4], star.hip_id);
        LittleEndian::write_f32(&mut chunk[4..8], star.x);
        LittleEndian::write_f32(&mut chunk[8..12], star.y);
        LittleEndian::write_f32(&mut chunk[12..16], star.z);
        LittleEndian::write_i16(&mut chunk[16..18], star.abs_mag);
        LittleEndian::write_u16(&mut chunk[18..20], star.spectral);
    }
    buf
}

/// Minimum and maximum `abs_mag`, or `None` for no stars.
pub fn magnitude_range<'a, I>(stars: I) -> Option<(i16, i16)>
where
    I: IntoIterator<Item = &'a StarRecord>,
{
    stars.into_iter().fold(None, |range, star| {
        Some(match range {
            Some((lo, hi)) => (star.abs_mag.min(lo), star.abs_mag.max(hi)),
            None => (star.abs_mag, star.abs_mag),
        })
    })
}
