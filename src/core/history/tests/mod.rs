//! Tests for timeline assembly, concurrent fetching and the history service.

mod fetch;
