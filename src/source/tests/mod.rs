//! Tests for image sources

mod memory_tests;
mod stack_tests;
