//! Mocked LINE Messaging API endpoints and webhook signing.

use base64::{prelude::BASE64_STANDARD, Engine};
use mockito::{Matcher, Mock};
use openssl::{hash::MessageDigest, pkey::PKey, sign::Signer};
use serde_json::json;

use crate::{
    constant::{TEST_CHANNEL_ACCESS_TOKEN, TEST_CHANNEL_SECRET},
    TestContext,
};

impl TestContext {
    pub fn line<'a>(&'a mut self) -> LineFixtures<'a> {
        LineFixtures { setup: self }
    }
}

pub struct LineFixtures<'a> {
    setup: &'a mut TestContext,
}

/// Compute the `x-line-signature` header value for a webhook body using the test channel secret.
pub fn sign_body(body: &[u8]) -> String {
    let key = PKey::hmac(TEST_CHANNEL_SECRET.as_bytes()).unwrap();
    let mut signer = Signer::new(MessageDigest::sha256(), &key).unwrap();
    signer.update(body).unwrap();

    BASE64_STANDARD.encode(signer.sign_to_vec().unwrap())
}

fn bearer() -> String {
    format!("Bearer {}", TEST_CHANNEL_ACCESS_TOKEN)
}

impl<'a> LineFixtures<'a> {
    /// Mock `POST /v2/bot/message/reply`.
    ///
    /// # Arguments
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn create_reply_endpoint(&mut self, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/v2/bot/message/reply")
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .expect(expected_requests)
            .create()
    }

    /// Mock `POST /v2/bot/message/multicast` answering with `status`.
    ///
    /// # Arguments
    /// - `status` - HTTP status returned by the mock, 200 for success
    /// - `expected_requests` - Number of times the endpoint should be called
    pub fn create_multicast_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        let body = if status == 200 {
            "{}".to_string()
        } else {
            json!({ "message": "The request was rejected" }).to_string()
        };

        self.setup
            .server
            .mock("POST", "/v2/bot/message/multicast")
            .match_header("authorization", bearer().as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /v2/bot/profile/{user_id}` returning the given display name.
    pub fn create_profile_endpoint(
        &mut self,
        user_id: &str,
        display_name: &str,
        expected_requests: usize,
    ) -> Mock {
        let body = json!({
            "userId": user_id,
            "displayName": display_name,
            "pictureUrl": "https://profile.line-scdn.net/test",
            "statusMessage": "We serve",
            "language": "zh-TW"
        });

        self.setup
            .server
            .mock("GET", format!("/v2/bot/profile/{}", user_id).as_str())
            .match_header("authorization", bearer().as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /v2/bot/info`, used by the diagnostics token check.
    pub fn create_bot_info_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        let body = json!({
            "userId": "Ubot0000000000000000000000000000",
            "basicId": "@123abcde",
            "displayName": "Lions Club Bot",
            "chatMode": "bot",
            "markAsReadMode": "auto"
        });

        self.setup
            .server
            .mock("GET", "/v2/bot/info")
            .match_header("authorization", Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }
}
