//! Synthetic HostMot2 Board Emulator Core
//!
//! This crate emulates a Mesa AnyIO board just far enough to exercise the
//! hostmot2 driver's board-detection and configuration-parsing logic:
//! - Register images built from a catalog of test patterns
//! - The low-level I/O contract the consumer driver talks to
//! - Board slots with register/unregister lifecycle management
//!
//! # Architecture
//!
//! The emulator uses a layered design:
//! - `RegisterImage`: fixed 64KB register space, populated once
//! - `TestPattern`: pure image builders, one per detection stage
//! - `LowLevelIo` trait: the contract handed to the consumer driver
//! - `BoardRegistry` trait: the consumer boundary, with a headless double
//! - `TestRig`: board slots plus the bring-up/teardown lifecycle

pub mod error;
pub mod image;
pub mod layout;
pub mod llio;
pub mod manifest;
pub mod pattern;
pub mod registry;
pub mod rig;

pub use error::{Hm2TestError, Hm2TestResult};
pub use image::{RegisterImage, IMAGE_SIZE};
pub use llio::{BoardDescriptor, LowLevelIo, TestBoard, COMPONENT_NAME};
pub use manifest::{load_manifest, parse_manifest, BoardEntry, RigManifest};
pub use pattern::{build, TestPattern};
pub use registry::{BoardRegistry, HeadlessRegistry, RegistryEvent};
pub use rig::{start, stop, TestRig, MAX_BOARDS};
