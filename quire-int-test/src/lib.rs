//! Shared harness for the Quire integration tests.

pub mod test_util;

// Setup only one time per test binary.
#[ctor::ctor]
fn init() {
    colog::init();
}
