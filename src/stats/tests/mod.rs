//! Tests for the aggregation kernels

mod aggregator_tests;
