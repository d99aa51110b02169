//! Register layout probed during board detection.
//!
//! The consumer driver walks the image in a fixed order:
//! - 0x0100: 32-bit cookie, must read 0x55AACAFE
//! - 0x0104: 8 ASCII bytes, must read "HOSTMOT2" (not null-terminated)
//! - 0x010C: 32-bit pointer to the IDROM (0x0400 in valid images)
//! - IDROM + 0x00: 32-bit IDROM type, only type 2 is recognized
//! - IDROM + 0x1C: IOPortCount, must match the board's connector count
//! - IDROM + 0x20: IOWidth, must equal IOPortCount * PortWidth
//! - IDROM + 0x24: PortWidth, must be one of 8, 16, 24, 32
//! - IDROM + 0x28/0x2C: ClockLow/ClockHigh, both nonzero and plausible
//!
//! All 32-bit fields are little-endian.

use crate::image::{RegisterImage, IMAGE_SIZE};

/// Value the cookie register must hold.
pub const IOCOOKIE: u32 = 0x55AA_CAFE;

/// Required configuration name.
pub const CONFIG_NAME: [u8; 8] = *b"HOSTMOT2";

/// The only IDROM type the consumer driver recognizes.
pub const IDROM_TYPE_STANDARD: u32 = 2;

/// Port widths real firmware ships with.
pub const VALID_PORT_WIDTHS: [u32; 4] = [8, 16, 24, 32];

/// Fixed register addresses.
pub mod addr {
    /// Cookie register
    pub const COOKIE: u32 = 0x0100;
    /// Configuration name (8 ASCII bytes)
    pub const CONFIG_NAME: u32 = 0x0104;
    /// Pointer to the IDROM
    pub const IDROM_OFFSET: u32 = 0x010C;
    /// Where valid images place the IDROM
    pub const IDROM: u32 = 0x0400;
}

/// Field offsets within the IDROM.
pub mod field {
    /// IDROM type
    pub const IDROM_TYPE: u32 = 0x00;
    /// Number of I/O ports
    pub const IO_PORTS: u32 = 0x1C;
    /// Total I/O pin count
    pub const IO_WIDTH: u32 = 0x20;
    /// Pins per I/O port
    pub const PORT_WIDTH: u32 = 0x24;
    /// Low clock rate in Hz
    pub const CLOCK_LOW: u32 = 0x28;
    /// High clock rate in Hz
    pub const CLOCK_HIGH: u32 = 0x2C;
}

fn get_u32(mem: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([mem[at], mem[at + 1], mem[at + 2], mem[at + 3]])
}

fn put_u32(mem: &mut [u8], at: usize, value: u32) {
    mem[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Boot block - view into a register image for the fixed detection fields.
pub struct BootBlock<'a> {
    mem: &'a mut [u8],
}

impl<'a> BootBlock<'a> {
    /// Create a view over a full register image.
    pub fn new(image: &'a mut RegisterImage) -> Self {
        Self {
            mem: image.bytes_mut(),
        }
    }

    /// Cookie register value.
    pub fn cookie(&self) -> u32 {
        get_u32(self.mem, addr::COOKIE as usize)
    }

    /// Set the cookie register.
    pub fn set_cookie(&mut self, v: u32) {
        put_u32(self.mem, addr::COOKIE as usize, v);
    }

    /// Raw configuration name bytes.
    pub fn config_name(&self) -> &[u8] {
        let at = addr::CONFIG_NAME as usize;
        &self.mem[at..at + 8]
    }

    /// Set the configuration name (exactly 8 bytes, no terminator).
    pub fn set_config_name(&mut self, name: &[u8; 8]) {
        let at = addr::CONFIG_NAME as usize;
        self.mem[at..at + 8].copy_from_slice(name);
    }

    /// Pointer to the IDROM.
    pub fn idrom_offset(&self) -> u32 {
        get_u32(self.mem, addr::IDROM_OFFSET as usize)
    }

    /// Set the IDROM pointer.
    pub fn set_idrom_offset(&mut self, v: u32) {
        put_u32(self.mem, addr::IDROM_OFFSET as usize, v);
    }
}

/// IDROM - view into a register image for the descriptor table fields.
pub struct Idrom<'a> {
    mem: &'a mut [u8],
    base: u32,
}

impl<'a> Idrom<'a> {
    /// Create a view over a register image with the table at `base`
    /// (all fields must fit inside the image).
    pub fn new(image: &'a mut RegisterImage, base: u32) -> Self {
        debug_assert!(base as usize + field::CLOCK_HIGH as usize + 4 <= IMAGE_SIZE);
        Self {
            mem: image.bytes_mut(),
            base,
        }
    }

    fn at(&self, offset: u32) -> usize {
        (self.base + offset) as usize
    }

    /// IDROM type.
    pub fn idrom_type(&self) -> u32 {
        get_u32(self.mem, self.at(field::IDROM_TYPE))
    }

    /// Set the IDROM type.
    pub fn set_idrom_type(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::IDROM_TYPE), v);
    }

    /// Number of I/O ports.
    pub fn io_ports(&self) -> u32 {
        get_u32(self.mem, self.at(field::IO_PORTS))
    }

    /// Set the I/O port count.
    pub fn set_io_ports(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::IO_PORTS), v);
    }

    /// Total I/O pin count.
    pub fn io_width(&self) -> u32 {
        get_u32(self.mem, self.at(field::IO_WIDTH))
    }

    /// Set the total I/O pin count.
    pub fn set_io_width(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::IO_WIDTH), v);
    }

    /// Pins per I/O port.
    pub fn port_width(&self) -> u32 {
        get_u32(self.mem, self.at(field::PORT_WIDTH))
    }

    /// Set the pins-per-port count.
    pub fn set_port_width(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::PORT_WIDTH), v);
    }

    /// Low clock rate in Hz.
    pub fn clock_low(&self) -> u32 {
        get_u32(self.mem, self.at(field::CLOCK_LOW))
    }

    /// Set the low clock rate.
    pub fn set_clock_low(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::CLOCK_LOW), v);
    }

    /// High clock rate in Hz.
    pub fn clock_high(&self) -> u32 {
        get_u32(self.mem, self.at(field::CLOCK_HIGH))
    }

    /// Set the high clock rate.
    pub fn set_clock_high(&mut self, v: u32) {
        put_u32(self.mem, self.at(field::CLOCK_HIGH), v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_byte_placement() {
        let mut image = RegisterImage::new();
        let mut boot = BootBlock::new(&mut image);
        boot.set_cookie(IOCOOKIE);
        assert_eq!(boot.cookie(), IOCOOKIE);
        assert_eq!(
            &image.as_bytes()[0x0100..0x0104],
            &[0xFE, 0xCA, 0xAA, 0x55]
        );
    }

    #[test]
    fn test_config_name_bytes() {
        let mut image = RegisterImage::new();
        let mut boot = BootBlock::new(&mut image);
        boot.set_config_name(&CONFIG_NAME);
        assert_eq!(boot.config_name(), b"HOSTMOT2");
        assert_eq!(&image.as_bytes()[0x0104..0x010C], b"HOSTMOT2");
        // No terminator: the byte after the name stays zero.
        assert_eq!(image.as_bytes()[0x010C], 0);
    }

    #[test]
    fn test_idrom_field_offsets() {
        let mut image = RegisterImage::new();
        let mut idrom = Idrom::new(&mut image, addr::IDROM);
        idrom.set_idrom_type(IDROM_TYPE_STANDARD);
        idrom.set_io_ports(1);
        idrom.set_io_width(24);
        idrom.set_port_width(24);
        idrom.set_clock_low(33_333_333);
        idrom.set_clock_high(100_000_000);

        assert_eq!(image.read_u32(0x0400).unwrap(), 2);
        assert_eq!(image.read_u32(0x041C).unwrap(), 1);
        assert_eq!(image.read_u32(0x0420).unwrap(), 24);
        assert_eq!(image.read_u32(0x0424).unwrap(), 24);
        assert_eq!(image.read_u32(0x0428).unwrap(), 33_333_333);
        assert_eq!(image.read_u32(0x042C).unwrap(), 100_000_000);
    }

    #[test]
    fn test_idrom_view_follows_base() {
        let mut image = RegisterImage::new();
        let mut idrom = Idrom::new(&mut image, 0x0800);
        idrom.set_port_width(16);
        assert_eq!(idrom.port_width(), 16);
        assert_eq!(image.read_u32(0x0824).unwrap(), 16);
        assert_eq!(image.read_u32(0x0424).unwrap(), 0);
    }
}
