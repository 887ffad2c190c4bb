#![allow(dead_code, unused_imports)]

use confcheck::audit::run_all_checks;
use confcheck::{MemorySource, ValidationError};

pub use confcheck_test_utils::builders::ServiceConfigBuilder;
pub use confcheck_test_utils::init_tracing;

/// Run the full audit and return the violation it stopped at.
pub fn first_violation(src: &MemorySource) -> ValidationError {
    match run_all_checks(src) {
        Err(err) => err,
        Ok(()) => panic!("expected a violation, audit passed for {src:?}"),
    }
}

pub fn valid() -> ServiceConfigBuilder {
    ServiceConfigBuilder::valid()
}
