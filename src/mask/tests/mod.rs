//! Tests for the parcel mask format

mod test_utils;
