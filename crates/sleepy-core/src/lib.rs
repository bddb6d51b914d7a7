//! Core types for bringing up a sleepy Thread end device.
//!
//! This crate holds the pieces of bring-up that are pure data: decoding the
//! statically provisioned operational dataset, the fixed link mode of a
//! sleepy end device, and the pinned power policy. It has no I/O and builds
//! without `std`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod dataset;
pub mod error;
pub mod hex;
pub mod link_mode;
pub mod power;

pub use constants::{EVENT_DESCRIPTOR_COUNT, OPERATIONAL_DATASET_MAX_LENGTH};
pub use dataset::{DatasetSummary, OperationalDataset};
pub use error::{DatasetError, DecodeError};
pub use link_mode::LinkModeConfig;
pub use power::PowerPolicy;
