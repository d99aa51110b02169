//! Test pattern catalog.
//!
//! Each pattern fills a register image so that board detection fails at a
//! known stage, or succeeds for the final entries. Builders are pure: the
//! same pattern always produces the same bytes, and later patterns are
//! composed from earlier ones plus the fields for their own stage.

use crate::error::{Hm2TestError, Hm2TestResult};
use crate::image::RegisterImage;
use crate::layout::{addr, BootBlock, Idrom, CONFIG_NAME, IDROM_TYPE_STANDARD, IOCOOKIE};

/// Selectable register image patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TestPattern {
    /// 0: Empty image, no cookie
    Blank = 0,
    /// 1: Cookie only
    CookieOnly = 1,
    /// 2: Cookie and config name, no IDROM pointer
    CookieAndName = 2,
    /// 3: IDROM present but with an unrecognized type
    BadIdromType = 3,
    /// 4: IDROM type valid, PortWidth left zero
    MissingPortWidth = 4,
    /// 5: Supported PortWidth, no port geometry
    GoodPortWidth = 5,
    /// 6: Unsupported PortWidth
    BogusPortWidth = 6,
    /// 7: IOWidth inconsistent with IOPortCount * PortWidth
    IoWidthMismatch = 7,
    /// 8: IOPortCount disagrees with the board's connector count
    IoPortsMismatch = 8,
    /// 9: Low clock implausible and high clock missing
    BadClocks = 9,
    /// 10: High clock missing
    HighClockMissing = 10,
    /// 11: Low clock implausibly slow
    LowClockImplausible = 11,
    /// 12: Passes every detection stage
    FullyValid = 12,
}

impl TryFrom<u8> for TestPattern {
    type Error = Hm2TestError;

    fn try_from(value: u8) -> Hm2TestResult<Self> {
        match value {
            0 => Ok(Self::Blank),
            1 => Ok(Self::CookieOnly),
            2 => Ok(Self::CookieAndName),
            3 => Ok(Self::BadIdromType),
            4 => Ok(Self::MissingPortWidth),
            5 => Ok(Self::GoodPortWidth),
            6 => Ok(Self::BogusPortWidth),
            7 => Ok(Self::IoWidthMismatch),
            8 => Ok(Self::IoPortsMismatch),
            9 => Ok(Self::BadClocks),
            10 => Ok(Self::HighClockMissing),
            11 => Ok(Self::LowClockImplausible),
            12 => Ok(Self::FullyValid),
            _ => Err(Hm2TestError::UnknownPattern(value)),
        }
    }
}

impl TestPattern {
    /// All patterns in catalog order.
    pub const ALL: [TestPattern; 13] = [
        Self::Blank,
        Self::CookieOnly,
        Self::CookieAndName,
        Self::BadIdromType,
        Self::MissingPortWidth,
        Self::GoodPortWidth,
        Self::BogusPortWidth,
        Self::IoWidthMismatch,
        Self::IoPortsMismatch,
        Self::BadClocks,
        Self::HighClockMissing,
        Self::LowClockImplausible,
        Self::FullyValid,
    ];

    /// One-line description for catalog listings.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Blank => "empty image, no cookie",
            Self::CookieOnly => "cookie only, no config name",
            Self::CookieAndName => "cookie and config name, no IDROM pointer",
            Self::BadIdromType => "IDROM type 0x1234 (unrecognized)",
            Self::MissingPortWidth => "IDROM type 2, PortWidth 0",
            Self::GoodPortWidth => "PortWidth 24, no port geometry",
            Self::BogusPortWidth => "PortWidth 29 (unsupported)",
            Self::IoWidthMismatch => "IOWidth 99 with 1 port of width 24",
            Self::IoPortsMismatch => "IOPortCount 2, board reports 1 connector",
            Self::BadClocks => "ClockLow 12345, ClockHigh 0",
            Self::HighClockMissing => "ClockHigh 0",
            Self::LowClockImplausible => "ClockLow 12345 (too slow)",
            Self::FullyValid => "passes every detection stage",
        }
    }
}

type PatternBuilder = fn(&mut RegisterImage);

/// Builder for each pattern, indexed by ordinal.
const BUILDERS: [PatternBuilder; 13] = [
    build_blank,
    build_cookie_only,
    build_cookie_and_name,
    build_bad_idrom_type,
    build_missing_port_width,
    build_good_port_width,
    build_bogus_port_width,
    build_io_width_mismatch,
    build_io_ports_mismatch,
    build_bad_clocks,
    build_high_clock_missing,
    build_low_clock_implausible,
    build_fully_valid,
];

/// Build the register image for a pattern.
///
/// # Examples
/// ```
/// use hm2test_core::layout::{addr, IOCOOKIE};
/// use hm2test_core::pattern::{build, TestPattern};
///
/// let image = build(TestPattern::CookieOnly);
/// assert_eq!(image.read_u32(addr::COOKIE).unwrap(), IOCOOKIE);
/// ```
pub fn build(pattern: TestPattern) -> RegisterImage {
    let mut image = RegisterImage::new();
    BUILDERS[pattern as usize](&mut image);
    tracing::debug!(pattern = pattern as u8, "built register image");
    image
}

fn build_blank(_image: &mut RegisterImage) {}

fn build_cookie_only(image: &mut RegisterImage) {
    BootBlock::new(image).set_cookie(IOCOOKIE);
}

fn build_cookie_and_name(image: &mut RegisterImage) {
    build_cookie_only(image);
    BootBlock::new(image).set_config_name(&CONFIG_NAME);
}

fn build_bad_idrom_type(image: &mut RegisterImage) {
    build_cookie_and_name(image);
    BootBlock::new(image).set_idrom_offset(addr::IDROM);
    Idrom::new(image, addr::IDROM).set_idrom_type(0x1234);
}

fn build_missing_port_width(image: &mut RegisterImage) {
    build_cookie_and_name(image);
    BootBlock::new(image).set_idrom_offset(addr::IDROM);
    Idrom::new(image, addr::IDROM).set_idrom_type(IDROM_TYPE_STANDARD);
}

fn build_good_port_width(image: &mut RegisterImage) {
    build_missing_port_width(image);
    Idrom::new(image, addr::IDROM).set_port_width(24);
}

fn build_bogus_port_width(image: &mut RegisterImage) {
    build_good_port_width(image);
    Idrom::new(image, addr::IDROM).set_port_width(29);
}

fn build_io_width_mismatch(image: &mut RegisterImage) {
    build_good_port_width(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_io_ports(1);
    idrom.set_io_width(99);
}

fn build_io_ports_mismatch(image: &mut RegisterImage) {
    build_good_port_width(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_io_ports(2);
    idrom.set_io_width(48);
}

/// Valid geometry for a one-connector board: 1 port, 24 pins.
fn build_good_geometry(image: &mut RegisterImage) {
    build_good_port_width(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_io_ports(1);
    idrom.set_io_width(24);
}

fn build_bad_clocks(image: &mut RegisterImage) {
    build_good_geometry(image);
    Idrom::new(image, addr::IDROM).set_clock_low(12345);
}

fn build_high_clock_missing(image: &mut RegisterImage) {
    build_good_geometry(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_clock_low(2_000_000);
    idrom.set_clock_high(0);
}

fn build_low_clock_implausible(image: &mut RegisterImage) {
    build_good_geometry(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_clock_low(12345);
    idrom.set_clock_high(100_000_000);
}

fn build_fully_valid(image: &mut RegisterImage) {
    build_good_geometry(image);
    let mut idrom = Idrom::new(image, addr::IDROM);
    idrom.set_clock_low(33_333_333);
    idrom.set_clock_high(100_000_000);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_bounds() {
        assert_eq!(TestPattern::try_from(0).unwrap(), TestPattern::Blank);
        assert_eq!(TestPattern::try_from(12).unwrap(), TestPattern::FullyValid);
        assert!(matches!(
            TestPattern::try_from(13),
            Err(Hm2TestError::UnknownPattern(13))
        ));
        assert!(matches!(
            TestPattern::try_from(255),
            Err(Hm2TestError::UnknownPattern(255))
        ));
    }

    #[test]
    fn test_ordinals_match_catalog_order() {
        for (i, pattern) in TestPattern::ALL.iter().enumerate() {
            assert_eq!(*pattern as usize, i);
            assert_eq!(TestPattern::try_from(i as u8).unwrap(), *pattern);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        for pattern in TestPattern::ALL {
            let a = build(pattern);
            let b = build(pattern);
            assert_eq!(a.as_bytes(), b.as_bytes(), "pattern {:?}", pattern);
        }
    }

    #[test]
    fn test_blank_stays_zeroed() {
        let image = build(TestPattern::Blank);
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_cookie_present_from_first_stage_on() {
        for pattern in &TestPattern::ALL[1..] {
            let image = build(*pattern);
            assert_eq!(image.read_u32(addr::COOKIE).unwrap(), IOCOOKIE);
        }
    }

    #[test]
    fn test_bogus_width_differs_only_at_port_width() {
        let good = build(TestPattern::GoodPortWidth);
        let bogus = build(TestPattern::BogusPortWidth);
        let diff: Vec<usize> = good
            .as_bytes()
            .iter()
            .zip(bogus.as_bytes())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(diff, vec![0x0424]);
        assert_eq!(good.read_u32(0x0424).unwrap(), 24);
        assert_eq!(bogus.read_u32(0x0424).unwrap(), 29);
    }

    #[test]
    fn test_fully_valid_geometry_consistent() {
        let image = build(TestPattern::FullyValid);
        let io_ports = image.read_u32(0x041C).unwrap();
        let io_width = image.read_u32(0x0420).unwrap();
        let port_width = image.read_u32(0x0424).unwrap();
        assert_eq!(io_width, io_ports * port_width);
        assert!(image.read_u32(0x0428).unwrap() >= 1_000_000);
        assert!(image.read_u32(0x042C).unwrap() >= 1_000_000);
    }
}
