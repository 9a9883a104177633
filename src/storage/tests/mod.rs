//! Tests for parcel paging and the result sink
