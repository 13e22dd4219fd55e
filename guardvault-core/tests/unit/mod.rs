//! Domain unit tests that need the shared fixtures.
