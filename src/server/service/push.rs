//! Push notifications to LINE-linked members.

use std::collections::BTreeMap;

use entity::sea_orm_active_enums::{MessageDirection, PushStatus, RegistrationStatus};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::push::{
        CreatePushTemplateDto, MessageLogDto, PushRecordDto, PushTargetDto, PushTemplateDto,
        SendPushDto, UpdatePushTemplateDto,
    },
    server::{
        data::{
            member::MemberRepository,
            message_log::{MessageLogRepository, NewMessageLog},
            push_record::{NewPushRecord, PushRecordRepository},
            push_template::PushTemplateRepository,
            registration::{RegistrationFilter, RegistrationRepository},
        },
        error::Error,
        line::{model::Message, LineClient},
        model::db::{EventModel, MemberModel},
        service::{event::resolve_event, retry::RetryContext},
    },
};

const RECORD_LIST_LIMIT: u64 = 100;
const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders template placeholders for a single recipient
///
/// Supported placeholders are `{{name}}`, `{{event_title}}`, `{{event_date}}` and
/// `{{event_location}}`. Event placeholders render empty without an event.
pub fn render_template(content: &str, member: &MemberModel, event: Option<&EventModel>) -> String {
    let (title, date, location) = match event {
        Some(event) => (
            event.title.clone(),
            event.starts_at.format(EVENT_DATE_FORMAT).to_string(),
            event.location.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    content
        .replace("{{name}}", &member.name)
        .replace("{{event_title}}", &title)
        .replace("{{event_date}}", &date)
        .replace("{{event_location}}", &location)
}

/// Final message text, the title on its own line above the body
fn compose(title: Option<&str>, body: &str) -> String {
    match title {
        Some(title) if !title.trim().is_empty() => format!("{}\n{}", title, body),
        _ => body.to_string(),
    }
}

fn push_status(success_count: i32, failure_count: i32) -> PushStatus {
    match (success_count, failure_count) {
        (_, 0) => PushStatus::Sent,
        (0, _) => PushStatus::Failed,
        _ => PushStatus::Partial,
    }
}

fn describe_target(target: &PushTargetDto) -> String {
    match target {
        PushTargetDto::All => "all members".to_string(),
        PushTargetDto::Role { role } => format!("role {:?} and above", role).to_lowercase(),
        PushTargetDto::Event { event_id } => format!("confirmed registrants of event {}", event_id),
        PushTargetDto::Members { member_ids } => format!(
            "members {}",
            member_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn map_name_conflict(err: DbErr) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            Error::Conflict("A push template with this name already exists".to_string())
        }
        _ => err.into(),
    }
}

pub struct PushService<'a> {
    db: &'a DatabaseConnection,
    line: &'a LineClient,
    retry: RetryContext,
}

impl<'a> PushService<'a> {
    /// Creates a new instance of [`PushService`]
    pub fn new(db: &'a DatabaseConnection, line: &'a LineClient) -> Self {
        Self {
            db,
            line,
            retry: RetryContext::new(),
        }
    }

    /// Replace the retry context used for LINE API calls
    pub fn with_retry(mut self, retry: RetryContext) -> Self {
        self.retry = retry;
        self
    }

    /// Sends a push message to the requested target
    ///
    /// Recipients whose rendered text is identical are grouped and sent with multicast in
    /// chunks of [`LineClient::MULTICAST_LIMIT`]. A failed chunk counts all of its recipients
    /// as failures; the request as a whole only fails on database errors.
    ///
    /// # Returns
    /// - `Ok(PushRecordDto)` - The stored push record with delivery counters
    /// - `Err(Error::Validation)` - No content, or no recipients matched the target
    /// - `Err(Error::NotFound)` - Unknown template
    /// - `Err(Error::EventError(EventError::NotFound))` - Unknown event
    pub async fn send(&self, request: SendPushDto) -> Result<PushRecordDto, Error> {
        let template = match request.template_id {
            Some(template_id) => Some(
                PushTemplateRepository::new(self.db)
                    .get(template_id)
                    .await?
                    .ok_or_else(|| Error::NotFound("Push template".to_string()))?,
            ),
            None => None,
        };

        let content = match (&request.message, &template) {
            (Some(message), _) if !message.trim().is_empty() => message.clone(),
            (_, Some(template)) => template.content.clone(),
            _ => {
                return Err(Error::Validation(
                    "Either message or template_id is required".to_string(),
                ))
            }
        };
        let title = request
            .title
            .clone()
            .or_else(|| template.as_ref().map(|template| template.title.clone()));

        let event_id = match (&request.event_id, &request.target) {
            (Some(event_id), _) => Some(*event_id),
            (None, PushTargetDto::Event { event_id }) => Some(*event_id),
            _ => None,
        };
        let event = match event_id {
            Some(event_id) => Some(resolve_event(self.db, event_id).await?),
            None => None,
        };

        let recipients = self.recipients(&request.target).await?;
        if recipients.is_empty() {
            return Err(Error::Validation(
                "No recipients matched the push target".to_string(),
            ));
        }

        let mut groups: BTreeMap<String, Vec<&MemberModel>> = BTreeMap::new();
        for member in &recipients {
            let body = render_template(&content, member, event.as_ref());
            groups
                .entry(compose(title.as_deref(), &body))
                .or_default()
                .push(member);
        }

        let line = self.line;
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut logs = Vec::new();

        for (text, members) in &groups {
            let messages = [Message::text(text.as_str())];
            let messages = &messages;

            for chunk in members.chunks(LineClient::MULTICAST_LIMIT) {
                let to: Vec<String> = chunk
                    .iter()
                    .filter_map(|member| member.line_user_id.clone())
                    .collect();
                let description = format!("multicast to {} recipients", to.len());
                let to = &to;

                let result = self
                    .retry
                    .execute_with_retry(&description, || async move {
                        Ok(line.multicast(to, messages).await?)
                    })
                    .await;

                match result {
                    Ok(()) => {
                        success_count += chunk.len() as i32;
                        logs.extend(chunk.iter().map(|member| NewMessageLog {
                            direction: MessageDirection::Outbound,
                            line_user_id: member.line_user_id.clone(),
                            member_id: Some(member.id),
                            message_type: "push".to_string(),
                            content: text.clone(),
                        }));
                    }
                    Err(e) => {
                        failure_count += chunk.len() as i32;
                        tracing::warn!("Push to {} recipients failed: {}", chunk.len(), e);
                    }
                }
            }
        }

        MessageLogRepository::new(self.db).create_many(logs).await?;

        let record = PushRecordRepository::new(self.db)
            .create(NewPushRecord {
                template_id: template.as_ref().map(|template| template.id),
                event_id,
                title,
                content,
                target: describe_target(&request.target),
                recipient_count: recipients.len() as i32,
                success_count,
                failure_count,
                status: push_status(success_count, failure_count),
            })
            .await?;

        tracing::info!(
            push_record_id = %record.id,
            "Push to {} finished: {} sent, {} failed",
            record.target,
            success_count,
            failure_count
        );

        Ok(record.into())
    }

    /// Members linked to LINE that a target resolves to
    async fn recipients(&self, target: &PushTargetDto) -> Result<Vec<MemberModel>, Error> {
        let members = MemberRepository::new(self.db);

        let recipients = match target {
            PushTargetDto::All => members.find_line_recipients(None).await?,
            PushTargetDto::Role { role } => {
                members
                    .find_line_recipients(Some(&role.and_above()))
                    .await?
            }
            PushTargetDto::Event { event_id } => {
                let registrations = RegistrationRepository::new(self.db)
                    .list(&RegistrationFilter {
                        event_id: Some(*event_id),
                        status: Some(RegistrationStatus::Confirmed),
                        ..Default::default()
                    })
                    .await?;
                let member_ids: Vec<i32> = registrations
                    .iter()
                    .map(|registration| registration.member_id)
                    .collect();

                members.find_by_ids(&member_ids).await?
            }
            PushTargetDto::Members { member_ids } => members.find_by_ids(member_ids).await?,
        };

        Ok(recipients
            .into_iter()
            .filter(|member| member.line_user_id.is_some())
            .collect())
    }

    pub async fn list_records(&self) -> Result<Vec<PushRecordDto>, Error> {
        let records = PushRecordRepository::new(self.db)
            .list(RECORD_LIST_LIMIT)
            .await?;

        Ok(records.into_iter().map(PushRecordDto::from).collect())
    }

    pub async fn get_record(&self, record_id: i32) -> Result<PushRecordDto, Error> {
        let record = PushRecordRepository::new(self.db)
            .get(record_id)
            .await?
            .ok_or_else(|| Error::NotFound("Push record".to_string()))?;

        Ok(record.into())
    }

    /// Message log, newest first
    pub async fn list_messages(
        &self,
        line_user_id: Option<&str>,
        direction: Option<MessageDirection>,
        limit: u64,
    ) -> Result<Vec<MessageLogDto>, Error> {
        let logs = MessageLogRepository::new(self.db)
            .list(line_user_id, direction, limit)
            .await?;

        Ok(logs.into_iter().map(MessageLogDto::from).collect())
    }

    pub async fn list_templates(&self) -> Result<Vec<PushTemplateDto>, Error> {
        let templates = PushTemplateRepository::new(self.db).list().await?;

        Ok(templates.into_iter().map(PushTemplateDto::from).collect())
    }

    pub async fn get_template(&self, template_id: i32) -> Result<PushTemplateDto, Error> {
        let template = PushTemplateRepository::new(self.db)
            .get(template_id)
            .await?
            .ok_or_else(|| Error::NotFound("Push template".to_string()))?;

        Ok(template.into())
    }

    /// Creates a template, a duplicate name is a conflict
    pub async fn create_template(
        &self,
        template: CreatePushTemplateDto,
    ) -> Result<PushTemplateDto, Error> {
        if template.name.trim().is_empty() || template.content.trim().is_empty() {
            return Err(Error::Validation(
                "name and content must not be empty".to_string(),
            ));
        }

        let template = PushTemplateRepository::new(self.db)
            .create(template)
            .await
            .map_err(map_name_conflict)?;

        Ok(template.into())
    }

    pub async fn update_template(
        &self,
        template_id: i32,
        changes: UpdatePushTemplateDto,
    ) -> Result<PushTemplateDto, Error> {
        let template = PushTemplateRepository::new(self.db)
            .update(template_id, changes)
            .await
            .map_err(map_name_conflict)?
            .ok_or_else(|| Error::NotFound("Push template".to_string()))?;

        Ok(template.into())
    }

    pub async fn delete_template(&self, template_id: i32) -> Result<(), Error> {
        let result = PushTemplateRepository::new(self.db)
            .delete(template_id)
            .await?;

        if result.rows_affected == 0 {
            return Err(Error::NotFound("Push template".to_string()));
        }

        Ok(())
    }
}
