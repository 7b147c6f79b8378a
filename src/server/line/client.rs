use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::server::{
    error::line::LineError,
    line::{
        model::{BotInfo, Message, MulticastRequest, Profile, ReplyRequest},
        signature,
    },
};

/// Client for the LINE Messaging API.
///
/// Cloning is cheap, the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone, Debug)]
pub struct LineClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
    channel_secret: String,
}

impl LineClient {
    /// Maximum number of recipients accepted by a single multicast request
    pub const MULTICAST_LIMIT: usize = 500;

    const USER_AGENT: &'static str = concat!("lionsclub/", env!("CARGO_PKG_VERSION"));
    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new [`LineClient`].
    ///
    /// # Arguments
    /// - `api_url` - Messaging API base URL, `https://api.line.me` outside of tests
    /// - `access_token` - Channel access token sent as bearer token
    /// - `channel_secret` - Channel secret used to verify webhook signatures
    pub fn new(api_url: &str, access_token: &str, channel_secret: &str) -> Result<Self, LineError> {
        let http = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(Self::TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            channel_secret: channel_secret.to_string(),
        })
    }

    /// Verifies a webhook body against its `x-line-signature` header.
    pub fn verify_signature(&self, body: &[u8], signature: Option<&str>) -> Result<(), LineError> {
        signature::verify_signature(&self.channel_secret, body, signature)
    }

    /// Replies to a webhook event using its reply token.
    pub async fn reply(&self, reply_token: &str, messages: &[Message]) -> Result<(), LineError> {
        self.post(
            "/v2/bot/message/reply",
            &ReplyRequest {
                reply_token,
                messages,
            },
        )
        .await
    }

    /// Sends the same messages to up to [`Self::MULTICAST_LIMIT`] users.
    ///
    /// Callers are responsible for chunking larger recipient lists.
    pub async fn multicast(&self, to: &[String], messages: &[Message]) -> Result<(), LineError> {
        self.post("/v2/bot/message/multicast", &MulticastRequest { to, messages })
            .await
    }

    /// Fetches the profile of a user who has added the bot as a friend.
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, LineError> {
        self.get(&format!("/v2/bot/profile/{}", user_id)).await
    }

    /// Fetches the bot's own info, used to check that the access token is accepted.
    pub async fn get_bot_info(&self) -> Result<BotInfo, LineError> {
        self.get("/v2/bot/info").await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), LineError> {
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        Self::check_status(response).await?;

        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, LineError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        Err(LineError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
