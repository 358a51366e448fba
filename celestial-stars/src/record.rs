//! Star records and the packed spectral descriptor.
//!
//! The 16-bit spectral word stored with every record is split into four
//! nibbles, most significant first:
//!
//! | Bits | Field | Encoding |
//! |------|-------|----------|
//! | 15-12 | star type | 0 normal, 1 white dwarf, 2 neutron star, 3 black hole |
//! | 11-8 | class | index into [`NORMAL_CLASSES`] or [`WHITE_DWARF_CLASSES`] |
//! | 7-4 | subclass | 0-9, [`SUBCLASS_UNKNOWN`] otherwise |
//! | 3-0 | luminosity class | index into [`LUMINOSITY_CLASSES`], [`LUM_UNKNOWN`] otherwise |
//!
//! Neutron stars and black holes carry no class, subclass or luminosity.

use std::fmt;

/// Spectral classes of normal stars, indexed by the class nibble.
pub const NORMAL_CLASSES: [&str; 16] = [
    "O", "B", "A", "F", "G", "K", "M", "R", "S", "N", "WC", "WN", "?", "L", "T", "C",
];

/// White dwarf classes, indexed by the class nibble.
pub const WHITE_DWARF_CLASSES: [&str; 8] = ["DA", "DB", "DC", "DO", "DQ", "DZ", "D", "DX"];

/// Luminosity classes, indexed by the luminosity nibble.
pub const LUMINOSITY_CLASSES: [&str; 8] = ["Ia0", "Ia", "Ib", "II", "III", "IV", "V", "VI"];

/// Class nibble of a normal star whose class is unknown.
pub const CLASS_UNKNOWN: u8 = 12;
/// Subclass nibble meaning "no subtype digit".
pub const SUBCLASS_UNKNOWN: u8 = 10;
/// Luminosity nibble meaning "no luminosity class".
pub const LUM_UNKNOWN: u8 = 8;

/// Fixed-point scale of [`StarRecord::abs_mag`]: stored value = magnitude × 256.
pub const MAG_SCALE: f32 = 256.0;

/// Absolute visual magnitude of the Sun.
pub const SUN_ABS_MAG: f32 = 4.83;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarType {
    Normal,
    WhiteDwarf,
    NeutronStar,
    BlackHole,
    /// Star type nibble outside 0-3.
    Unknown(u8),
}

impl StarType {
    fn from_nibble(nibble: u8) -> Self {
        match nibble {
            0 => Self::Normal,
            1 => Self::WhiteDwarf,
            2 => Self::NeutronStar,
            3 => Self::BlackHole,
            other => Self::Unknown(other),
        }
    }

    fn nibble(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::WhiteDwarf => 1,
            Self::NeutronStar => 2,
            Self::BlackHole => 3,
            Self::Unknown(n) => n & 0xf,
        }
    }
}

/// Decoded form of the packed spectral word.
///
/// `class`, `subclass` and `lum_class` are the raw nibbles; interpretation
/// depends on `star_type`. [`SpectralDescriptor::pack`] restores the
/// original word exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpectralDescriptor {
    pub star_type: StarType,
    pub class: u8,
    pub subclass: u8,
    pub lum_class: u8,
}

impl SpectralDescriptor {
    pub fn unpack(packed: u16) -> Self {
        Self {
            star_type: StarType::from_nibble((packed >> 12) as u8),
            class: ((packed >> 8) & 0xf) as u8,
            subclass: ((packed >> 4) & 0xf) as u8,
            lum_class: (packed & 0xf) as u8,
        }
    }

    pub fn pack(&self) -> u16 {
        (u16::from(self.star_type.nibble()) << 12)
            | (u16::from(self.class & 0xf) << 8)
            | (u16::from(self.subclass & 0xf) << 4)
            | u16::from(self.lum_class & 0xf)
    }

    /// Normal main-sequence style descriptor, e.g. `normal(4, 2, 6)` for G2V.
    pub fn normal(class: u8, subclass: u8, lum_class: u8) -> Self {
        Self {
            star_type: StarType::Normal,
            class,
            subclass,
            lum_class,
        }
    }

    /// Class name (`"G"`, `"WC"`, `"DA"`), or `None` when the type has no class.
    pub fn class_name(&self) -> Option<&'static str> {
        match self.star_type {
            StarType::Normal => NORMAL_CLASSES.get(self.class as usize).copied(),
            StarType::WhiteDwarf => Some(
                WHITE_DWARF_CLASSES
                    .get(self.class as usize)
                    .copied()
                    .unwrap_or("D"),
            ),
            _ => None,
        }
    }

    /// Single-character spectral class.
    pub fn kind(&self) -> char {
        match self.star_type {
            StarType::Normal => self
                .class_name()
                .and_then(|name| name.chars().next())
                .unwrap_or('?'),
            StarType::WhiteDwarf => 'D',
            StarType::NeutronStar => 'Q',
            StarType::BlackHole => 'X',
            StarType::Unknown(_) => '?',
        }
    }

    /// Subtype digit `'0'..='9'`, or `'?'`.
    pub fn sub(&self) -> char {
        match self.star_type {
            StarType::Normal | StarType::WhiteDwarf if self.subclass <= 9 => {
                char::from(b'0' + self.subclass)
            }
            _ => '?',
        }
    }

    /// Luminosity class code; [`LUM_UNKNOWN`] for anything but a classified normal star.
    pub fn luminosity(&self) -> u8 {
        match self.star_type {
            StarType::Normal if (self.lum_class as usize) < LUMINOSITY_CLASSES.len() => {
                self.lum_class
            }
            _ => LUM_UNKNOWN,
        }
    }

    /// Full spectral type string such as `G2V`, `B8Ia`, `DA`, `Q` or `X`.
    pub fn spectral_type(&self) -> String {
        match self.star_type {
            StarType::Normal => {
                let Some(class) = self.class_name().filter(|c| *c != "?") else {
                    return "?".to_string();
                };
                let mut s = class.to_string();
                if self.subclass <= 9 {
                    s.push(self.sub());
                }
                if let Some(lum) = LUMINOSITY_CLASSES.get(self.luminosity() as usize) {
                    s.push_str(lum);
                }
                s
            }
            StarType::WhiteDwarf => {
                let mut s = self.class_name().unwrap_or("D").to_string();
                if self.subclass <= 9 {
                    s.push(self.sub());
                }
                s
            }
            StarType::NeutronStar => "Q".to_string(),
            StarType::BlackHole => "X".to_string(),
            StarType::Unknown(_) => "?".to_string(),
        }
    }
}

impl fmt::Display for SpectralDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spectral_type())
    }
}

/// One catalog star.
///
/// `kind`, `sub` and `lum_class` are decoded from `spectral`, which is kept
/// so the record re-encodes to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    pub hip_id: u32,
    /// Cartesian position in light years, origin at the Sun.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Absolute magnitude × 256.
    pub abs_mag: i16,
    pub kind: char,
    pub sub: char,
    pub lum_class: u8,
    pub spectral: u16,
    /// Luminosity relative to the Sun, derived from `abs_mag`.
    pub lum_rel_sun: f32,
    /// Display radius; set by renderers, never by the decoder.
    pub radius: Option<f32>,
}

impl StarRecord {
    pub fn new(hip_id: u32, position: [f32; 3], abs_mag: i16, spectral: u16) -> Self {
        let descriptor = SpectralDescriptor::unpack(spectral);
        let magnitude = f32::from(abs_mag) / MAG_SCALE;
        Self {
            hip_id,
            x: position[0],
            y: position[1],
            z: position[2],
            abs_mag,
            kind: descriptor.kind(),
            sub: descriptor.sub(),
            lum_class: descriptor.luminosity(),
            spectral,
            lum_rel_sun: 10f32.powf(0.4 * (SUN_ABS_MAG - magnitude)),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Absolute magnitude as a float.
    pub fn magnitude(&self) -> f32 {
        f32::from(self.abs_mag) / MAG_SCALE
    }

    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Distance from the origin in light years.
    pub fn distance(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn descriptor(&self) -> SpectralDescriptor {
        SpectralDescriptor::unpack(self.spectral)
    }

    pub fn spectral_type(&self) -> String {
        self.descriptor().spectral_type()
    }
}

impl fmt::Display for StarRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HIP {} {} M={:.2} at ({:.3}, {:.3}, {:.3}) ly",
            self.hip_id,
            self.spectral_type(),
            self.magnitude(),
            self.x,
            self.y,
            self.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G2V: u16 = 0x0426;

    #[test]
    fn test_unpack_g2v() {
        let d = SpectralDescriptor::unpack(G2V);
        assert_eq!(d.star_type, StarType::Normal);
        assert_eq!(d.class_name(), Some("G"));
        assert_eq!(d.kind(), 'G');
        assert_eq!(d.sub(), '2');
        assert_eq!(d.luminosity(), 6);
        assert_eq!(d.spectral_type(), "G2V");
        assert_eq!(d.pack(), G2V);
    }

    #[test]
    fn test_normal_constructor_packs_like_literal() {
        assert_eq!(SpectralDescriptor::normal(4, 2, 6).pack(), G2V);
    }

    #[test]
    fn test_wolf_rayet_kind_is_w() {
        let d = SpectralDescriptor::normal(10, 7, LUM_UNKNOWN);
        assert_eq!(d.kind(), 'W');
        assert_eq!(d.spectral_type(), "WC7");
    }

    #[test]
    fn test_unknown_subclass_and_luminosity() {
        let d = SpectralDescriptor::normal(1, SUBCLASS_UNKNOWN, LUM_UNKNOWN);
        assert_eq!(d.kind(), 'B');
        assert_eq!(d.sub(), '?');
        assert_eq!(d.luminosity(), LUM_UNKNOWN);
        assert_eq!(d.spectral_type(), "B");
    }

    #[test]
    fn test_unknown_class() {
        let d = SpectralDescriptor::normal(CLASS_UNKNOWN, 3, 4);
        assert_eq!(d.kind(), '?');
        assert_eq!(d.spectral_type(), "?");
    }

    #[test]
    fn test_white_dwarf() {
        let packed = 0x1000 | (u16::from(SUBCLASS_UNKNOWN) << 4) | u16::from(LUM_UNKNOWN);
        let d = SpectralDescriptor::unpack(packed);
        assert_eq!(d.star_type, StarType::WhiteDwarf);
        assert_eq!(d.kind(), 'D');
        assert_eq!(d.sub(), '?');
        assert_eq!(d.luminosity(), LUM_UNKNOWN);
        assert_eq!(d.spectral_type(), "DA");
        assert_eq!(d.pack(), packed);
    }

    #[test]
    fn test_compact_objects() {
        let neutron = SpectralDescriptor::unpack(0x2000);
        assert_eq!(neutron.kind(), 'Q');
        assert_eq!(neutron.spectral_type(), "Q");
        assert_eq!(neutron.luminosity(), LUM_UNKNOWN);

        let black_hole = SpectralDescriptor::unpack(0x3000);
        assert_eq!(black_hole.kind(), 'X');
        assert_eq!(black_hole.sub(), '?');
        assert_eq!(black_hole.spectral_type(), "X");
    }

    #[test]
    fn test_unknown_star_type_is_preserved() {
        let packed = 0x9426;
        let d = SpectralDescriptor::unpack(packed);
        assert_eq!(d.star_type, StarType::Unknown(9));
        assert_eq!(d.kind(), '?');
        assert_eq!(d.pack(), packed);
    }

    #[test]
    fn test_record_decodes_spectral_fields() {
        let star = StarRecord::new(0, [0.0, 0.0, 0.0], (4.83 * MAG_SCALE) as i16, G2V);
        assert_eq!(star.kind, 'G');
        assert_eq!(star.sub, '2');
        assert_eq!(star.lum_class, 6);
        assert_eq!(star.spectral_type(), "G2V");
        assert!(star.radius.is_none());
    }

    #[test]
    fn test_magnitude_scale() {
        let star = StarRecord::new(32349, [-1.6, 8.1, -2.5], 373, 0x0106);
        assert!((star.magnitude() - 1.457).abs() < 1e-3);
    }

    #[test]
    fn test_sun_luminosity_is_unity() {
        let star = StarRecord::new(0, [0.0; 3], (SUN_ABS_MAG * MAG_SCALE).round() as i16, G2V);
        assert!((star.lum_rel_sun - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_brighter_star_is_more_luminous() {
        let dim = StarRecord::new(1, [0.0; 3], 10 * 256, G2V);
        let bright = StarRecord::new(2, [0.0; 3], -5 * 256, G2V);
        assert!(bright.lum_rel_sun > dim.lum_rel_sun);
    }

    #[test]
    fn test_distance() {
        let star = StarRecord::new(7, [3.0, 4.0, 12.0], 0, G2V);
        assert_eq!(star.distance(), 13.0);
    }

    #[test]
    fn test_with_radius() {
        let star = StarRecord::new(7, [0.0; 3], 0, G2V).with_radius(2.5);
        assert_eq!(star.radius, Some(2.5));
    }

    #[test]
    fn test_display() {
        let star = StarRecord::new(0, [0.0; 3], 1237, G2V);
        let output = star.to_string();
        assert!(output.starts_with("HIP 0 G2V M=4.83"), "unexpected: {}", output);
    }
}
