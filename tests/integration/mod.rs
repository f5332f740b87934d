//! Integration tests for mono-release

mod helpers;
mod test_cli;
mod test_failures;
