//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with extracted arguments, the way the router would
//! after extraction.

mod auth;
mod checkin;
mod file;
mod member;

use lionsclub_test_utils::prelude::*;

use crate::util::{TestContextExt, TestDirs};
