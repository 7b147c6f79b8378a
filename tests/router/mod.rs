//! Tests for the assembled application router.
//!
//! Requests go through the full middleware stack with `tower::ServiceExt::oneshot`.

mod frontend;
mod system;
mod webhook;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
};
use lionsclub_test_utils::prelude::*;
use tower::ServiceExt;

use crate::util::{TestContextExt, TestDirs};

/// Sends a single request to a freshly built app
async fn send(test: &TestContext, dirs: &TestDirs, request: Request<Body>) -> Response<Body> {
    test.into_app(dirs)
        .oneshot(request)
        .await
        .expect("Router is infallible")
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}
