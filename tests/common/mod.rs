#![allow(dead_code)]

pub use gorun_test_utils::builders;
pub use gorun_test_utils::fake_backend;
pub use gorun_test_utils::{init_tracing, with_timeout};
