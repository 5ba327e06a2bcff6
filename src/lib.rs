// Library target for criterion benchmarks and the integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `patternbook::catalog::*` and friends.
// Some code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod content;
pub mod engine;
pub mod event;
pub mod session;
pub mod source;
pub mod store;
pub mod ui;
