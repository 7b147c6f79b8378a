//! Placeholder credentials used by every test.
//!
//! None of these values are real; the LINE API is always the mockito server.

/// Channel secret used to sign webhook bodies in tests.
pub static TEST_CHANNEL_SECRET: &str = "test_channel_secret";

/// Channel access token the LINE client sends as its bearer token.
pub static TEST_CHANNEL_ACCESS_TOKEN: &str = "test_channel_access_token";

/// Admin password accepted by the login endpoint in tests.
pub static TEST_ADMIN_PASSWORD: &str = "test_admin_password";

/// LIFF app ID returned by the LIFF config endpoint in tests.
pub static TEST_LIFF_ID: &str = "1234567890-abcdefgh";
