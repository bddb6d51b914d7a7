//! Conformance assertions for [`MeshStack`] implementations.
//!
//! These check the stack behaviour the bring-up sequence relies on,
//! whatever the backing stack is.
//!
//! ```rust,ignore
//! use sleepy_platform::testing;
//!
//! let mut stack = platform.init_stack(&config, &mut pool).unwrap();
//! testing::assert_thread_requires_ip6(&mut stack);
//! testing::assert_bring_up_sequence_accepted(&mut stack, &dataset);
//! ```

use sleepy_core::{LinkModeConfig, OperationalDataset};

use crate::error::StackError;
use crate::traits::MeshStack;

/// Assert that enabling Thread on a stack without IPv6 is refused.
pub fn assert_thread_requires_ip6(stack: &mut impl MeshStack) {
    let result = stack.set_thread_enabled(true);
    assert_eq!(
        result,
        Err(StackError::InvalidState),
        "enabling Thread before IPv6 should be refused"
    );
}

/// Assert that the sleepy link mode is accepted, and accepted again.
pub fn assert_link_mode_accepted(stack: &mut impl MeshStack) {
    for _ in 0..2 {
        let result = stack.set_link_mode(LinkModeConfig::SLEEPY_END_DEVICE);
        assert!(result.is_ok(), "set_link_mode should succeed: {result:?}");
    }
}

/// Assert that the full bring-up sequence succeeds in order:
/// poll period, link mode, dataset, IPv6, Thread.
///
/// Must run inside a tokio runtime if the stack starts timers.
pub fn assert_bring_up_sequence_accepted(stack: &mut impl MeshStack, dataset: &OperationalDataset) {
    assert!(stack.set_poll_period(3000).is_ok(), "poll period rejected");
    assert_link_mode_accepted(stack);
    assert!(stack.set_active_dataset(dataset).is_ok(), "dataset rejected");
    assert!(stack.set_ip6_enabled(true).is_ok(), "IPv6 enable rejected");
    let result = stack.set_thread_enabled(true);
    assert!(result.is_ok(), "Thread enable rejected: {result:?}");
}
