//! Low-level I/O contract between boards and the consumer driver.
//!
//! `LowLevelIo` is the surface a real board driver would expose: register
//! access plus firmware and reset hooks. `TestBoard` implements it over a
//! pattern-built register image, serving reads from the image and quietly
//! discarding everything else.

use crate::error::{Hm2TestError, Hm2TestResult};
use crate::image::RegisterImage;

/// Component name shared by all synthetic boards.
pub const COMPONENT_NAME: &str = "hm2_test";

/// Identity a board presents when registering.
#[derive(Debug, Clone)]
pub struct BoardDescriptor {
    /// Device name, e.g. "hm2_test.0"
    pub name: String,
    /// I/O connector names
    pub connector_names: Vec<String>,
    /// FPGA part number ("none" for synthetic boards)
    pub fpga_part_number: String,
    /// Whether the contract may be called from concurrent threads
    pub threadsafe: bool,
}

impl BoardDescriptor {
    /// Descriptor for the synthetic board in the given slot.
    pub fn for_slot(slot: usize) -> Self {
        Self {
            name: format!("{}.{}", COMPONENT_NAME, slot),
            connector_names: vec!["P99".to_string()],
            fpga_part_number: "none".to_string(),
            threadsafe: true,
        }
    }

    /// Number of I/O connectors this board claims to have.
    pub fn connector_count(&self) -> usize {
        self.connector_names.len()
    }
}

/// Operations a board exposes to the consumer driver.
///
/// Every method takes `&self`: once a board is published it holds no
/// mutable state, so the contract is safe under concurrent callers.
pub trait LowLevelIo: Send + Sync {
    /// Board identity and capabilities.
    fn descriptor(&self) -> &BoardDescriptor;

    /// Read `buf.len()` bytes of register space starting at `addr`.
    fn read(&self, addr: u32, buf: &mut [u8]) -> Hm2TestResult<()>;

    /// Write bytes to register space starting at `addr`.
    fn write(&self, addr: u32, data: &[u8]) -> Hm2TestResult<()>;

    /// Load a firmware bitstream.
    fn program_fpga(&self, bitfile: &[u8]) -> Hm2TestResult<()>;

    /// Reset the board.
    fn reset(&self) -> Hm2TestResult<()>;
}

/// Synthetic board backed by a pattern-built register image.
///
/// The image is fixed at construction. Reads are served from it; writes
/// are bounds-checked, reported as successful, and discarded.
pub struct TestBoard {
    descriptor: BoardDescriptor,
    image: RegisterImage,
}

impl TestBoard {
    /// Create a board for `slot` over a finished image.
    pub fn new(slot: usize, image: RegisterImage) -> Self {
        Self {
            descriptor: BoardDescriptor::for_slot(slot),
            image,
        }
    }
}

impl LowLevelIo for TestBoard {
    fn descriptor(&self) -> &BoardDescriptor {
        &self.descriptor
    }

    fn read(&self, addr: u32, buf: &mut [u8]) -> Hm2TestResult<()> {
        self.image.read(addr, buf)
    }

    fn write(&self, addr: u32, data: &[u8]) -> Hm2TestResult<()> {
        self.image.check_range(addr, data.len())?;
        tracing::trace!(addr, len = data.len(), "discarding write to synthetic board");
        Ok(())
    }

    fn program_fpga(&self, _bitfile: &[u8]) -> Hm2TestResult<()> {
        Err(Hm2TestError::Unsupported("program_fpga"))
    }

    fn reset(&self) -> Hm2TestResult<()> {
        Err(Hm2TestError::Unsupported("reset"))
    }
}
