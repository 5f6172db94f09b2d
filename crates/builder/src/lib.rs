#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Builder selection and the stage pipeline for mak
//!
//! This crate holds the adapters for concrete build tools, the registry that
//! picks one per stage, the CMake preset catalog and the driver that runs the
//! chain of adapters from the first required stage to completion.

pub mod build_systems;
pub mod builder;
pub mod events;
pub mod pipeline;
pub mod presets;
pub mod spec;

pub use build_systems::{BuildSystem, BuildSystemRegistry, RegistryEntry};
pub use builder::{Builder, NO_BUILDER};
pub use events::{EventEmitter, EventReceiver, EventSender, PipelineEvent};
pub use pipeline::{Pipeline, PipelineReport, PipelineRequest, StageOutcome};
pub use presets::{PresetCatalog, PresetCategory};
pub use spec::{BuilderSpec, SpecStage};
