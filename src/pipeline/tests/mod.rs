//! Tests for the extraction worker
