//! Integration tests for the forum scraper
//!
//! These tests use wiremock to stand in for the forum and exercise the real
//! HTTP fetcher end-to-end.

mod common;
mod profile_tests;
mod watch_tests;
