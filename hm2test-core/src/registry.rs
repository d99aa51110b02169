//! Board registry abstraction.
//!
//! In production the register call hands a board to the hostmot2 driver,
//! which probes it immediately. `HeadlessRegistry` stands in for that
//! consumer: it records registrations and lifecycle events so tests and
//! the CLI can run the full bring-up/teardown sequence headlessly.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{Hm2TestError, Hm2TestResult};
use crate::llio::LowLevelIo;

/// Consumer-side registry that synthetic boards attach to.
pub trait BoardRegistry {
    /// Hand a board contract to the consumer under a configuration string.
    fn register(&mut self, board: Arc<dyn LowLevelIo>, config: &str) -> Hm2TestResult<()>;

    /// Detach a board by device name. Unknown names are ignored.
    fn unregister(&mut self, name: &str);
}

/// Registry lifecycle event recorded by `HeadlessRegistry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered { name: String, config: String },
    Rejected { name: String, reason: String },
    /// Recorded for every unregister call, whether or not the name was known.
    Unregistered { name: String },
}

/// Headless registry for testing - records registrations, provides scripted rejections.
#[derive(Default)]
pub struct HeadlessRegistry {
    boards: Vec<(String, Arc<dyn LowLevelIo>)>,
    rejections: VecDeque<String>,
    events: Vec<RegistryEvent>,
}

impl HeadlessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rejection for the next register call.
    pub fn reject_next(&mut self, reason: &str) {
        self.rejections.push_back(reason.to_string());
    }

    /// Whether a board is currently registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.boards.iter().any(|(n, _)| n == name)
    }

    /// Look up a registered board contract by device name.
    pub fn board(&self, name: &str) -> Option<Arc<dyn LowLevelIo>> {
        self.boards
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, board)| board.clone())
    }

    /// Names of registered boards, in registration order.
    pub fn registered_names(&self) -> Vec<String> {
        self.boards.iter().map(|(n, _)| n.clone()).collect()
    }

    /// All recorded lifecycle events.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}

impl BoardRegistry for HeadlessRegistry {
    fn register(&mut self, board: Arc<dyn LowLevelIo>, config: &str) -> Hm2TestResult<()> {
        let name = board.descriptor().name.clone();

        if let Some(reason) = self.rejections.pop_front() {
            tracing::warn!(%name, %reason, "registry rejected board");
            self.events.push(RegistryEvent::Rejected {
                name,
                reason: reason.clone(),
            });
            return Err(Hm2TestError::Registration(reason));
        }

        if self.is_registered(&name) {
            let reason = format!("device name {} already registered", name);
            tracing::warn!(%name, "registry rejected board: duplicate name");
            self.events.push(RegistryEvent::Rejected {
                name,
                reason: reason.clone(),
            });
            return Err(Hm2TestError::Registration(reason));
        }

        tracing::info!(%name, config, "board registered");
        self.events.push(RegistryEvent::Registered {
            name: name.clone(),
            config: config.to_string(),
        });
        self.boards.push((name, board));
        Ok(())
    }

    fn unregister(&mut self, name: &str) {
        if let Some(pos) = self.boards.iter().position(|(n, _)| n == name) {
            self.boards.remove(pos);
            tracing::info!(name, "board unregistered");
        }
        self.events.push(RegistryEvent::Unregistered {
            name: name.to_string(),
        });
    }
}
