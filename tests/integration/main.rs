//! Integration tests for hzk-compact.

mod helpers;

mod cli_test;
mod compact_test;
