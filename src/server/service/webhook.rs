//! LINE bot: webhook event handling and text commands.

use chrono::Utc;
use entity::sea_orm_active_enums::{MessageDirection, RegistrationStatus};
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        checkin::CheckinRepository,
        event::EventRepository,
        member::MemberRepository,
        message_log::{MessageLogRepository, NewMessageLog},
        registration::{RegistrationFilter, RegistrationRepository},
    },
    error::{
        checkin::CheckinError, event::EventError, member::MemberError,
        registration::RegistrationError, Error,
    },
    line::{
        model::{EventMessage, Message, WebhookEvent, WebhookRequest},
        LineClient,
    },
    model::db::MemberModel,
    service::{checkin::CheckinService, member::MemberRef, registration::RegistrationService},
};

const UPCOMING_EVENT_LIMIT: u64 = 5;
const BOT_DEVICE_INFO: &str = "LINE bot";
const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const HELP_TEXT: &str = "Available commands:\n\
    help / 說明 - show this message\n\
    events / 活動 - upcoming events\n\
    me / 我的資料 - your membership\n\
    checkin <event id> / 報到 <event id> - check in to an event\n\
    register <event id> / 報名 <event id> - register for an event";
const CHECKIN_USAGE: &str = "Usage: checkin <event id>";
const REGISTER_USAGE: &str = "Usage: register <event id>";
const NOT_LINKED: &str = "Your LINE account is not linked to a member yet.";
const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// A command sent to the bot as text or postback
#[derive(Debug, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Events,
    Me,
    Checkin(i32),
    Register(i32),
    /// A known command with missing or invalid arguments
    Usage(&'static str),
}

impl BotCommand {
    /// Parses a text message, unknown text is treated as a request for help
    pub fn parse(text: &str) -> Self {
        let text = text.trim().to_lowercase();

        match text.as_str() {
            "help" | "說明" => return Self::Help,
            "events" | "活動" => return Self::Events,
            "me" | "我的資料" => return Self::Me,
            _ => {}
        }

        let commands: [(&[&str], fn(i32) -> Self, &'static str); 2] = [
            (&["checkin", "報到"], Self::Checkin, CHECKIN_USAGE),
            (&["register", "報名"], Self::Register, REGISTER_USAGE),
        ];

        for (aliases, command, usage) in commands {
            for alias in aliases {
                if let Some(argument) = text.strip_prefix(alias) {
                    return match argument.trim().trim_start_matches('#').parse::<i32>() {
                        Ok(event_id) => command(event_id),
                        Err(_) => Self::Usage(usage),
                    };
                }
            }
        }

        Self::Help
    }

    /// Parses postback data such as `action=checkin&event_id=3`
    pub fn from_postback(data: &str) -> Option<Self> {
        let mut action = None;
        let mut event_id = None;

        for (key, value) in url::form_urlencoded::parse(data.as_bytes()) {
            match key.as_ref() {
                "action" => action = Some(value.into_owned()),
                "event_id" => event_id = value.parse::<i32>().ok(),
                _ => {}
            }
        }

        match (action.as_deref(), event_id) {
            (Some("checkin"), Some(event_id)) => Some(Self::Checkin(event_id)),
            (Some("register"), Some(event_id)) => Some(Self::Register(event_id)),
            _ => None,
        }
    }
}

fn label<T: std::fmt::Debug>(value: &T) -> String {
    format!("{:?}", value).to_lowercase()
}

/// Reply text for a failed check-in or registration
fn error_reply(err: Error) -> String {
    match err {
        Error::MemberError(MemberError::NotFound(_)) => NOT_LINKED.to_string(),
        Error::MemberError(MemberError::NotActive(_)) => {
            "Your membership is not active.".to_string()
        }
        Error::EventError(EventError::NotFound(id)) => format!("Event #{} was not found.", id),
        Error::CheckinError(CheckinError::AlreadyCheckedIn { .. }) => {
            "You have already checked in to this event.".to_string()
        }
        Error::CheckinError(CheckinError::EventNotOpen(_)) => {
            "This event is not open for check-in.".to_string()
        }
        Error::CheckinError(CheckinError::EventFull(_))
        | Error::RegistrationError(RegistrationError::EventFull(_)) => {
            "This event is at capacity.".to_string()
        }
        Error::RegistrationError(RegistrationError::AlreadyRegistered { .. }) => {
            "You are already registered for this event.".to_string()
        }
        Error::RegistrationError(RegistrationError::EventNotOpen(_)) => {
            "This event is not open for registration.".to_string()
        }
        err => {
            tracing::error!("Bot command failed: {}", err);
            GENERIC_FAILURE.to_string()
        }
    }
}

pub struct WebhookService<'a> {
    db: &'a DatabaseConnection,
    line: &'a LineClient,
    liff_id: Option<&'a str>,
}

impl<'a> WebhookService<'a> {
    /// Creates a new instance of [`WebhookService`]
    ///
    /// # Arguments
    /// - `liff_id` - LIFF app used for self registration, linked from welcome messages
    pub fn new(db: &'a DatabaseConnection, line: &'a LineClient, liff_id: Option<&'a str>) -> Self {
        Self { db, line, liff_id }
    }

    /// Handles every event of a verified webhook request
    ///
    /// Failures are logged per event and never abort the remaining events.
    pub async fn handle(&self, request: WebhookRequest) {
        tracing::debug!(
            destination = ?request.destination,
            "Received webhook with {} events",
            request.events.len()
        );

        for event in &request.events {
            if let Err(e) = self.handle_event(event).await {
                tracing::error!("Failed to handle {} event: {}", event.kind(), e);
            }
        }
    }

    async fn handle_event(&self, event: &WebhookEvent) -> Result<(), Error> {
        let user_id = event.user_id();
        let member = match user_id {
            Some(user_id) => {
                MemberRepository::new(self.db)
                    .find_by_line_user_id(user_id)
                    .await?
            }
            None => None,
        };

        MessageLogRepository::new(self.db)
            .create(NewMessageLog {
                direction: MessageDirection::Inbound,
                line_user_id: user_id.map(str::to_string),
                member_id: member.as_ref().map(|member| member.id),
                message_type: event.kind().to_string(),
                content: event.log_content(),
            })
            .await?;

        let reply = match event {
            WebhookEvent::Follow { .. } => Some(self.on_follow(user_id, member.as_ref()).await?),
            WebhookEvent::Unfollow { .. } => {
                tracing::info!(line_user_id = ?user_id, "Bot was unfollowed");
                None
            }
            WebhookEvent::Message {
                message: EventMessage::Text { text, .. },
                ..
            } => Some(
                self.run(BotCommand::parse(text), user_id, member.as_ref())
                    .await?,
            ),
            WebhookEvent::Message { .. } => None,
            WebhookEvent::Postback { postback, .. } => {
                match BotCommand::from_postback(&postback.data) {
                    Some(command) => Some(self.run(command, user_id, member.as_ref()).await?),
                    None => {
                        tracing::debug!("Ignoring postback {:?}", postback.data);
                        None
                    }
                }
            }
            WebhookEvent::Other => {
                tracing::debug!("Ignoring unsupported webhook event");
                None
            }
        };

        if let (Some(text), Some(reply_token)) = (reply, event.reply_token()) {
            self.reply(reply_token, user_id, member.as_ref(), text)
                .await?;
        }

        Ok(())
    }

    fn link_instructions(&self) -> String {
        match self.liff_id {
            Some(liff_id) => format!(
                "Register as a member here: https://liff.line.me/{}",
                liff_id
            ),
            None => "Ask a club officer to link your LINE account to your membership.".to_string(),
        }
    }

    async fn on_follow(
        &self,
        user_id: Option<&str>,
        member: Option<&MemberModel>,
    ) -> Result<String, Error> {
        let profile = match user_id {
            Some(user_id) => match self.line.get_profile(user_id).await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Failed to fetch LINE profile of {}: {}", user_id, e);
                    None
                }
            },
            None => None,
        };

        if let Some(member) = member {
            if let Some(profile) = &profile {
                MemberRepository::new(self.db)
                    .set_line_display_name(member.clone(), &profile.display_name)
                    .await?;
            }

            return Ok(format!(
                "Welcome back, {}! Send \"help\" to see what I can do.",
                member.name
            ));
        }

        let greeting = profile
            .map(|profile| format!("Hi {}! ", profile.display_name))
            .unwrap_or_default();

        Ok(format!(
            "{}Welcome to the Lions Club bot. {}",
            greeting,
            self.link_instructions()
        ))
    }

    async fn run(
        &self,
        command: BotCommand,
        user_id: Option<&str>,
        member: Option<&MemberModel>,
    ) -> Result<String, Error> {
        tracing::debug!(line_user_id = ?user_id, "Running bot command {:?}", command);

        let reply = match command {
            BotCommand::Help => HELP_TEXT.to_string(),
            BotCommand::Usage(usage) => usage.to_string(),
            BotCommand::Events => self.upcoming_events().await?,
            BotCommand::Me => match member {
                Some(member) => self.describe_member(member).await?,
                None => format!("{} {}", NOT_LINKED, self.link_instructions()),
            },
            BotCommand::Checkin(event_id) => {
                let Some(user_id) = user_id else {
                    return Ok(NOT_LINKED.to_string());
                };

                match CheckinService::new(self.db)
                    .check_in(
                        MemberRef::LineUserId(user_id.to_string()),
                        event_id,
                        Some(BOT_DEVICE_INFO.to_string()),
                    )
                    .await
                {
                    Ok(checkin) => format!(
                        "Checked in to {} at {} UTC.",
                        checkin.event.title,
                        checkin.checked_in_at.format("%H:%M")
                    ),
                    Err(e) => error_reply(e),
                }
            }
            BotCommand::Register(event_id) => {
                let Some(user_id) = user_id else {
                    return Ok(NOT_LINKED.to_string());
                };

                let result = RegistrationService::new(self.db)
                    .register(MemberRef::LineUserId(user_id.to_string()), event_id, None)
                    .await;

                match result {
                    Ok(registration) => {
                        let title = EventRepository::new(self.db)
                            .get(registration.event_id)
                            .await?
                            .map(|event| event.title)
                            .unwrap_or_else(|| format!("event #{}", event_id));

                        if registration.status == RegistrationStatus::Waitlist {
                            format!("{} is full, you have been added to the waitlist.", title)
                        } else {
                            format!("You are registered for {}.", title)
                        }
                    }
                    Err(e) => error_reply(e),
                }
            }
        };

        Ok(reply)
    }

    async fn upcoming_events(&self) -> Result<String, Error> {
        let events = EventRepository::new(self.db)
            .list_upcoming(Utc::now().naive_utc(), UPCOMING_EVENT_LIMIT)
            .await?;

        if events.is_empty() {
            return Ok("There are no upcoming events.".to_string());
        }

        let lines: Vec<String> = events
            .iter()
            .map(|event| {
                let mut line = format!(
                    "#{} {} | {}",
                    event.id,
                    event.title,
                    event.starts_at.format(EVENT_DATE_FORMAT)
                );
                if let Some(location) = &event.location {
                    line.push_str(&format!(" | {}", location));
                }
                line
            })
            .collect();

        Ok(format!("Upcoming events:\n{}", lines.join("\n")))
    }

    async fn describe_member(&self, member: &MemberModel) -> Result<String, Error> {
        let registrations = RegistrationRepository::new(self.db)
            .list(&RegistrationFilter {
                member_id: Some(member.id),
                ..Default::default()
            })
            .await?
            .into_iter()
            .filter(|registration| registration.status != RegistrationStatus::Cancelled)
            .count();
        let checkins = CheckinRepository::new(self.db)
            .list(None, Some(member.id))
            .await?
            .len();

        Ok(format!(
            "Name: {}\nRole: {}\nStatus: {}\nRegistrations: {}\nCheck-ins: {}",
            member.name,
            label(&member.role),
            label(&member.status),
            registrations,
            checkins
        ))
    }

    async fn reply(
        &self,
        reply_token: &str,
        user_id: Option<&str>,
        member: Option<&MemberModel>,
        text: String,
    ) -> Result<(), Error> {
        if let Err(e) = self
            .line
            .reply(reply_token, &[Message::text(text.as_str())])
            .await
        {
            tracing::warn!("Failed to send LINE reply: {}", e);
            return Ok(());
        }

        MessageLogRepository::new(self.db)
            .create(NewMessageLog {
                direction: MessageDirection::Outbound,
                line_user_id: user_id.map(str::to_string),
                member_id: member.map(|member| member.id),
                message_type: "text".to_string(),
                content: text,
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    mod parse {
        use crate::server::service::webhook::{BotCommand, CHECKIN_USAGE, REGISTER_USAGE};

        #[test]
        fn parses_simple_commands() {
            assert_eq!(BotCommand::parse("Help"), BotCommand::Help);
            assert_eq!(BotCommand::parse(" 活動 "), BotCommand::Events);
            assert_eq!(BotCommand::parse("我的資料"), BotCommand::Me);
        }

        #[test]
        fn parses_event_commands() {
            assert_eq!(BotCommand::parse("checkin 3"), BotCommand::Checkin(3));
            assert_eq!(BotCommand::parse("CHECKIN #12"), BotCommand::Checkin(12));
            assert_eq!(BotCommand::parse("報到 7"), BotCommand::Checkin(7));
            assert_eq!(BotCommand::parse("報名5"), BotCommand::Register(5));
            assert_eq!(BotCommand::parse("register 4"), BotCommand::Register(4));
        }

        #[test]
        fn reports_usage_for_bad_arguments() {
            assert_eq!(
                BotCommand::parse("checkin"),
                BotCommand::Usage(CHECKIN_USAGE)
            );
            assert_eq!(
                BotCommand::parse("register abc"),
                BotCommand::Usage(REGISTER_USAGE)
            );
        }

        #[test]
        fn treats_unknown_text_as_help() {
            assert_eq!(BotCommand::parse("hello there"), BotCommand::Help);
        }

        #[test]
        fn parses_postback_data() {
            assert_eq!(
                BotCommand::from_postback("action=checkin&event_id=3"),
                Some(BotCommand::Checkin(3))
            );
            assert_eq!(
                BotCommand::from_postback("event_id=9&action=register"),
                Some(BotCommand::Register(9))
            );
            assert_eq!(BotCommand::from_postback("action=checkin"), None);
            assert_eq!(BotCommand::from_postback("action=dance&event_id=1"), None);
        }
    }

    mod handle {
        use entity::sea_orm_active_enums::MessageDirection;
        use lionsclub_test_utils::prelude::*;
        use serde_json::json;

        use crate::server::{
            data::{
                checkin::CheckinRepository, member::MemberRepository,
                message_log::MessageLogRepository,
            },
            line::{model::WebhookRequest, LineClient},
            service::webhook::WebhookService,
        };

        async fn setup(builder: TestBuilder) -> Result<(TestContext, LineClient), TestError> {
            let test = builder
                .with_core_tables()
                .with_table(entity::prelude::MessageLog)
                .build()
                .await?;
            let line = LineClient::new(
                &test.line_api_url(),
                TEST_CHANNEL_ACCESS_TOKEN,
                TEST_CHANNEL_SECRET,
            )
            .unwrap();

            Ok((test, line))
        }

        fn text_event(user_id: &str, text: &str) -> serde_json::Value {
            json!({
                "type": "message",
                "replyToken": "reply-token",
                "source": { "type": "user", "userId": user_id },
                "message": { "type": "text", "id": "1", "text": text }
            })
        }

        fn request(events: Vec<serde_json::Value>) -> WebhookRequest {
            serde_json::from_value(json!({ "destination": "Ubot", "events": events })).unwrap()
        }

        /// Expect a help reply logged inbound and outbound
        #[tokio::test]
        async fn replies_to_help() -> Result<(), TestError> {
            let (test, line) = setup(TestBuilder::new().with_reply_endpoint(1)).await?;

            WebhookService::new(&test.db, &line, None)
                .handle(request(vec![text_event("U1", "help")]))
                .await;

            test.assert_mocks();
            let logs = MessageLogRepository::new(&test.db)
                .list(Some("U1"), None, 10)
                .await?;
            assert_eq!(logs.len(), 2);
            assert!(logs
                .iter()
                .any(|log| log.direction == MessageDirection::Outbound
                    && log.content.starts_with("Available commands")));

            Ok(())
        }

        /// Expect a second check-in command to be answered as a duplicate
        #[tokio::test]
        async fn checks_in_once_via_command() -> Result<(), TestError> {
            let (mut test, line) = setup(TestBuilder::new().with_reply_endpoint(2)).await?;
            test.member().insert_member("Alice", Some("U1")).await?;
            let event = test.event().insert_event("Workshop", None).await?;
            let command = format!("checkin {}", event.id);

            WebhookService::new(&test.db, &line, None)
                .handle(request(vec![
                    text_event("U1", &command),
                    text_event("U1", &command),
                ]))
                .await;

            test.assert_mocks();
            let count = CheckinRepository::new(&test.db)
                .count_by_event(event.id)
                .await?;
            assert_eq!(count, 1);
            let outbound = MessageLogRepository::new(&test.db)
                .list(Some("U1"), Some(MessageDirection::Outbound), 10)
                .await?;
            assert!(outbound
                .iter()
                .any(|log| log.content == "You have already checked in to this event."));

            Ok(())
        }

        /// Expect an unlinked user to be told to link their account
        #[tokio::test]
        async fn answers_unlinked_checkin() -> Result<(), TestError> {
            let (mut test, line) = setup(TestBuilder::new().with_reply_endpoint(1)).await?;
            let event = test.event().insert_event("Workshop", None).await?;

            WebhookService::new(&test.db, &line, None)
                .handle(request(vec![text_event(
                    "U404",
                    &format!("checkin {}", event.id),
                )]))
                .await;

            test.assert_mocks();
            let outbound = MessageLogRepository::new(&test.db)
                .list(Some("U404"), Some(MessageDirection::Outbound), 10)
                .await?;
            assert_eq!(
                outbound[0].content,
                "Your LINE account is not linked to a member yet."
            );

            Ok(())
        }

        /// Expect follow to store the display name of a linked member
        #[tokio::test]
        async fn stores_display_name_on_follow() -> Result<(), TestError> {
            let (mut test, line) = setup(
                TestBuilder::new()
                    .with_profile_endpoint("U1", "Alice Lin", 1)
                    .with_reply_endpoint(1),
            )
            .await?;
            let member = test.member().insert_member("Alice", Some("U1")).await?;

            WebhookService::new(&test.db, &line, Some("1234-abcd"))
                .handle(request(vec![json!({
                    "type": "follow",
                    "replyToken": "reply-token",
                    "source": { "type": "user", "userId": "U1" }
                })]))
                .await;

            test.assert_mocks();
            let member = MemberRepository::new(&test.db)
                .get(member.id)
                .await?
                .unwrap();
            assert_eq!(member.line_display_name.as_deref(), Some("Alice Lin"));

            Ok(())
        }

        /// Expect unsupported events to be logged without a reply
        #[tokio::test]
        async fn logs_unsupported_events() -> Result<(), TestError> {
            let (test, line) = setup(TestBuilder::new().with_reply_endpoint(0)).await?;

            WebhookService::new(&test.db, &line, None)
                .handle(request(vec![json!({
                    "type": "beacon",
                    "replyToken": "reply-token",
                    "source": { "type": "user", "userId": "U1" },
                    "beacon": { "hwid": "d41d8cd98f", "type": "enter" }
                })]))
                .await;

            test.assert_mocks();
            let logs = MessageLogRepository::new(&test.db)
                .list(None, None, 10)
                .await?;
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].direction, MessageDirection::Inbound);

            Ok(())
        }
    }
}
