//! Constant values shared by tests.

/// HS256 secret used to sign test bearer tokens and to configure the test application state.
pub static TEST_JWT_SECRET: &str = "topsteel-test-secret-0123456789abcdef";

/// Code of the societe inserted by `SocieteFixtures::insert_active_societe`.
pub static TEST_SOCIETE_CODE: &str = "ACME";
