//! Tests for window planning and pixel indexing

mod indexer_tests;
