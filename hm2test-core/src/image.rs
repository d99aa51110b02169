//! Register image backing a synthetic board.

use crate::error::{Hm2TestError, Hm2TestResult};

/// Size of the register space in bytes (64KB).
pub const IMAGE_SIZE: usize = 65536;

/// Byte-addressable register space for one synthetic board.
///
/// An image starts out zeroed, gets populated once by a pattern builder,
/// and is never written again after a board takes ownership of it.
pub struct RegisterImage {
    bytes: [u8; IMAGE_SIZE],
}

impl Default for RegisterImage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterImage {
    /// Create a zeroed image.
    pub fn new() -> Self {
        Self {
            bytes: [0; IMAGE_SIZE],
        }
    }

    /// Copy `buf.len()` bytes starting at `addr` into `buf`.
    pub fn read(&self, addr: u32, buf: &mut [u8]) -> Hm2TestResult<()> {
        let range = self.check_range(addr, buf.len())?;
        buf.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    /// Read a 32-bit register field (little-endian).
    pub fn read_u32(&self, addr: u32) -> Hm2TestResult<u32> {
        let mut buf = [0u8; 4];
        self.read(addr, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Full image contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable view for pattern builders.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Validate that `addr..addr + len` lies inside the image.
    pub(crate) fn check_range(
        &self,
        addr: u32,
        len: usize,
    ) -> Hm2TestResult<std::ops::Range<usize>> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= IMAGE_SIZE => Ok(start..end),
            _ => Err(Hm2TestError::OutOfRange { addr, len }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_zeroed() {
        let image = RegisterImage::new();
        assert!(image.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(image.read_u32(0x0100).unwrap(), 0);
    }

    #[test]
    fn test_read_u32_little_endian() {
        let mut image = RegisterImage::new();
        image.bytes_mut()[0x0100..0x0104].copy_from_slice(&[0xFE, 0xCA, 0xAA, 0x55]);
        assert_eq!(image.read_u32(0x0100).unwrap(), 0x55AA_CAFE);
    }

    #[test]
    fn test_read_at_image_end() {
        let image = RegisterImage::new();
        let mut buf = [0u8; 4];
        assert!(image.read(IMAGE_SIZE as u32 - 4, &mut buf).is_ok());
        assert!(matches!(
            image.read(IMAGE_SIZE as u32 - 3, &mut buf),
            Err(Hm2TestError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_read_far_out_of_range() {
        let image = RegisterImage::new();
        let err = image.read_u32(u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            Hm2TestError::OutOfRange {
                addr: u32::MAX,
                len: 4
            }
        ));
    }

    #[test]
    fn test_empty_read_in_bounds() {
        let image = RegisterImage::new();
        let mut buf = [0u8; 0];
        assert!(image.read(IMAGE_SIZE as u32, &mut buf).is_ok());
        assert!(image.read(0, &mut buf).is_ok());
    }
}
