//! Protocol and platform constants.

/// Maximum size of an operational dataset TLV blob in bytes.
pub const OPERATIONAL_DATASET_MAX_LENGTH: usize = 254;

/// Number of event descriptors the worker multiplexes: the network
/// interface, the stack task queue and the radio driver.
pub const EVENT_DESCRIPTOR_COUNT: usize = 3;

/// Default interval between data polls of a sleepy end device, in milliseconds.
pub const DEFAULT_POLL_PERIOD_MS: u32 = 3000;

/// Dataset provisioned on the node when no other is configured.
///
/// Network name `OpenThread-af16`, PAN ID `0xaf16`, channel 11.
pub const DEFAULT_NETWORK_DATASET: &str = "0e080000000000010000000300000b35060004001fffe002084c14b4d26855fcd00708fdf7e918eb62e2a905107ca0e75a6ead4b960cfe073386943605030f4f70656e5468726561642d616631360102af1604102b9084b26c9a7d10a1a729bfc2e84ea00c0402a0f7f8";

// Dataset TLV types the summary reads (Thread 1.x MeshCoP)
pub const TLV_CHANNEL: u8 = 0;
pub const TLV_PAN_ID: u8 = 1;
pub const TLV_NETWORK_NAME: u8 = 3;

/// Maximum length of a Thread network name in bytes.
pub const NETWORK_NAME_MAX_LENGTH: usize = 16;
