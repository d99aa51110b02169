//! Board slots and registration lifecycle.
//!
//! A `TestRig` owns up to [`MAX_BOARDS`] synthetic boards and walks each
//! one through install -> register -> unregister. The free functions
//! [`start`] and [`stop`] mirror module load and unload: `start` brings up
//! a single board and cleans up after a failed registration, `stop` always
//! attempts unregistration for every installed board.

use std::sync::Arc;

use crate::error::{Hm2TestError, Hm2TestResult};
use crate::llio::{LowLevelIo, TestBoard};
use crate::manifest::RigManifest;
use crate::pattern::{self, TestPattern};
use crate::registry::BoardRegistry;

/// Maximum number of synthetic boards a rig can hold.
pub const MAX_BOARDS: usize = 8;

/// One occupied board slot.
struct BoardSlot {
    board: Arc<dyn LowLevelIo>,
    config: String,
    registered: bool,
}

impl std::fmt::Debug for BoardSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSlot")
            .field("board", &self.board.descriptor().name)
            .field("config", &self.config)
            .field("registered", &self.registered)
            .finish()
    }
}

/// Caller-owned collection of synthetic boards.
#[derive(Debug)]
pub struct TestRig {
    slots: [Option<BoardSlot>; MAX_BOARDS],
}

impl Default for TestRig {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRig {
    /// Create a rig with all slots empty.
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
        }
    }

    /// Build a pattern image and install a board in the given slot.
    pub fn install(
        &mut self,
        slot: usize,
        test_pattern: TestPattern,
        config: &str,
    ) -> Hm2TestResult<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(Hm2TestError::InvalidSlot(slot))?;
        if entry.is_some() {
            return Err(Hm2TestError::SlotOccupied(slot));
        }

        let image = pattern::build(test_pattern);
        tracing::info!(slot, pattern = test_pattern as u8, "installed synthetic board");
        *entry = Some(BoardSlot {
            board: Arc::new(TestBoard::new(slot, image)),
            config: config.to_string(),
            registered: false,
        });
        Ok(())
    }

    /// Install one board per manifest entry.
    pub fn from_manifest(manifest: &RigManifest) -> Hm2TestResult<TestRig> {
        let mut rig = TestRig::new();
        for entry in &manifest.boards {
            let slot = match entry.slot {
                Some(slot) => slot,
                None => rig.first_free_slot()?,
            };
            let test_pattern = TestPattern::try_from(entry.pattern)?;
            rig.install(slot, test_pattern, entry.config.as_deref().unwrap_or(""))?;
        }
        Ok(rig)
    }

    /// Contract for the board in a slot.
    pub fn board(&self, slot: usize) -> Hm2TestResult<Arc<dyn LowLevelIo>> {
        Ok(self.occupied(slot)?.board.clone())
    }

    /// Whether the board in a slot is currently registered.
    pub fn is_registered(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(entry)) if entry.registered)
    }

    /// Slots that currently hold a board, in order.
    pub fn occupied_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_ref().map(|_| i))
            .collect()
    }

    /// Register the board in a slot with the consumer registry.
    ///
    /// Registering an already registered board fails; the existing
    /// registration is left untouched.
    pub fn register(&mut self, slot: usize, registry: &mut dyn BoardRegistry) -> Hm2TestResult<()> {
        let entry = self.occupied_mut(slot)?;
        if entry.registered {
            return Err(Hm2TestError::Registration(format!(
                "board in slot {} is already registered",
                slot
            )));
        }

        let board = entry.board.clone();
        let config = entry.config.clone();
        match registry.register(board, &config) {
            Ok(()) => {
                entry.registered = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!(slot, error = %e, "board registration failed");
                Err(e)
            }
        }
    }

    /// Unregister the board in a slot. Safe to call in any state.
    pub fn unregister(&mut self, slot: usize, registry: &mut dyn BoardRegistry) {
        if let Some(Some(entry)) = self.slots.get_mut(slot) {
            registry.unregister(&entry.board.descriptor().name);
            entry.registered = false;
        }
    }

    /// Register every installed board, failing on the first rejection.
    pub fn register_all(&mut self, registry: &mut dyn BoardRegistry) -> Hm2TestResult<()> {
        for slot in self.occupied_slots() {
            if !self.is_registered(slot) {
                self.register(slot, registry)?;
            }
        }
        Ok(())
    }

    /// Unregister every installed board and empty the rig.
    pub fn shutdown(&mut self, registry: &mut dyn BoardRegistry) {
        for slot in 0..MAX_BOARDS {
            self.unregister(slot, registry);
            self.slots[slot] = None;
        }
        tracing::info!("rig shut down");
    }

    fn occupied(&self, slot: usize) -> Hm2TestResult<&BoardSlot> {
        self.slots
            .get(slot)
            .ok_or(Hm2TestError::InvalidSlot(slot))?
            .as_ref()
            .ok_or(Hm2TestError::EmptySlot(slot))
    }

    fn occupied_mut(&mut self, slot: usize) -> Hm2TestResult<&mut BoardSlot> {
        self.slots
            .get_mut(slot)
            .ok_or(Hm2TestError::InvalidSlot(slot))?
            .as_mut()
            .ok_or(Hm2TestError::EmptySlot(slot))
    }

    fn first_free_slot(&self) -> Hm2TestResult<usize> {
        self.slots
            .iter()
            .position(|entry| entry.is_none())
            .ok_or(Hm2TestError::InvalidSlot(MAX_BOARDS))
    }
}

/// Bring up a single-board rig, mirroring module load.
///
/// On registry rejection the board's unregistration is still attempted
/// before the error is surfaced, so a failed start never leaves a
/// half-attached board behind.
pub fn start(
    test_pattern: TestPattern,
    config: &str,
    registry: &mut dyn BoardRegistry,
) -> Hm2TestResult<TestRig> {
    let mut rig = TestRig::new();
    rig.install(0, test_pattern, config)?;
    if let Err(e) = rig.register(0, registry) {
        rig.unregister(0, registry);
        return Err(e);
    }
    tracing::info!(pattern = test_pattern as u8, "synthetic board online");
    Ok(rig)
}

/// Tear down a rig, mirroring module unload.
pub fn stop(mut rig: TestRig, registry: &mut dyn BoardRegistry) {
    rig.shutdown(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HeadlessRegistry;

    #[test]
    fn test_install_and_slot_validation() {
        let mut rig = TestRig::new();
        rig.install(0, TestPattern::Blank, "").unwrap();
        assert_eq!(rig.occupied_slots(), vec![0]);

        assert!(matches!(
            rig.install(0, TestPattern::Blank, ""),
            Err(Hm2TestError::SlotOccupied(0))
        ));
        assert!(matches!(
            rig.install(MAX_BOARDS, TestPattern::Blank, ""),
            Err(Hm2TestError::InvalidSlot(8))
        ));
        assert!(matches!(rig.board(1), Err(Hm2TestError::EmptySlot(1))));
    }

    #[test]
    fn test_register_unregister_cycle() {
        let mut rig = TestRig::new();
        let mut registry = HeadlessRegistry::new();
        rig.install(2, TestPattern::FullyValid, "").unwrap();

        assert!(!rig.is_registered(2));
        rig.register(2, &mut registry).unwrap();
        assert!(rig.is_registered(2));
        assert!(registry.is_registered("hm2_test.2"));

        rig.unregister(2, &mut registry);
        assert!(!rig.is_registered(2));
        assert!(!registry.is_registered("hm2_test.2"));
    }

    #[test]
    fn test_double_register_fails_closed() {
        let mut rig = TestRig::new();
        let mut registry = HeadlessRegistry::new();
        rig.install(0, TestPattern::FullyValid, "").unwrap();

        rig.register(0, &mut registry).unwrap();
        let err = rig.register(0, &mut registry).unwrap_err();
        assert!(matches!(err, Hm2TestError::Registration(_)));

        // The first registration survives the failed second attempt.
        assert!(rig.is_registered(0));
        assert!(registry.is_registered("hm2_test.0"));
    }

    #[test]
    fn test_start_cleans_up_after_rejection() {
        let mut registry = HeadlessRegistry::new();
        registry.reject_next("probe failed");

        let err = start(TestPattern::FullyValid, "", &mut registry).unwrap_err();
        assert!(matches!(err, Hm2TestError::Registration(_)));
        assert!(!registry.is_registered("hm2_test.0"));
    }

    #[test]
    fn test_shutdown_empties_every_slot() {
        let mut rig = TestRig::new();
        let mut registry = HeadlessRegistry::new();
        rig.install(0, TestPattern::FullyValid, "").unwrap();
        rig.install(5, TestPattern::BadClocks, "").unwrap();
        rig.register_all(&mut registry).unwrap();

        rig.shutdown(&mut registry);
        assert!(rig.occupied_slots().is_empty());
        assert!(registry.registered_names().is_empty());
    }
}
