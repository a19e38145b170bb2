//! Shared fixtures for unit tests.

mod factories;

pub(crate) use factories::*;
