mod test_utils;

pub use test_utils::{TestContextExt, TestDirs, TEST_INDEX_HTML};
