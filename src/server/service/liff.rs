//! Self registration and profile lookup for the LIFF mini app.

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        checkin::CheckinDto,
        liff::{LiffProfileDto, LiffRegisterDto},
        member::{CreateMemberDto, MemberDto, UpdateMemberDto},
        registration::RegistrationDto,
    },
    server::{
        data::{
            checkin::CheckinRepository,
            member::MemberRepository,
            registration::{RegistrationFilter, RegistrationRepository},
        },
        error::Error,
        service::member::{resolve_member, MemberRef, MemberService},
    },
};

pub struct LiffService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LiffService<'a> {
    /// Creates a new instance of [`LiffService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the member linked to a LINE account, or updates its contact details
    ///
    /// # Returns
    /// - `Ok((MemberDto, true))` - A new member was created
    /// - `Ok((MemberDto, false))` - The linked member was updated
    /// - `Err(Error::Validation)` - Empty name or LINE user ID
    pub async fn register(&self, request: LiffRegisterDto) -> Result<(MemberDto, bool), Error> {
        let line_user_id = request.line_user_id.trim();
        if line_user_id.is_empty() {
            return Err(Error::Validation(
                "line_user_id must not be empty".to_string(),
            ));
        }

        let members = MemberService::new(self.db);
        let existing = MemberRepository::new(self.db)
            .find_by_line_user_id(line_user_id)
            .await?;

        match existing {
            Some(member) => {
                let member = members
                    .update(
                        member.id,
                        UpdateMemberDto {
                            name: Some(request.name),
                            email: request.email,
                            phone: request.phone,
                            ..Default::default()
                        },
                    )
                    .await?;

                tracing::debug!(member_id = %member.id, "Updated member via LIFF");

                Ok((member, false))
            }
            None => {
                let member = members
                    .create(CreateMemberDto {
                        name: request.name,
                        email: request.email,
                        phone: request.phone,
                        line_user_id: Some(line_user_id.to_string()),
                        role: None,
                        joined_on: None,
                    })
                    .await?;

                Ok((member, true))
            }
        }
    }

    /// Member profile with registrations and check-ins
    pub async fn profile(&self, line_user_id: &str) -> Result<LiffProfileDto, Error> {
        let member =
            resolve_member(self.db, &MemberRef::LineUserId(line_user_id.to_string())).await?;

        let registrations = RegistrationRepository::new(self.db)
            .list(&RegistrationFilter {
                member_id: Some(member.id),
                ..Default::default()
            })
            .await?;
        let checkins = CheckinRepository::new(self.db)
            .list(None, Some(member.id))
            .await?;

        Ok(LiffProfileDto {
            member: member.into(),
            registrations: registrations.into_iter().map(RegistrationDto::from).collect(),
            checkins: checkins.into_iter().map(CheckinDto::from).collect(),
        })
    }
}
