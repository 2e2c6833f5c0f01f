//! Tests for shared types: address layout, configuration, and errors.
