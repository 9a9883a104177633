//! Tests for catalog status handling and job coordination

mod status_tests;
mod coordinator_tests;
