//! Tests for the ordered-strategy date parser
//!
//! Strategy-level cases live next to the strategies; these tests exercise
//! the parser facade and the ordering guarantees between strategies.

mod parser_tests;
