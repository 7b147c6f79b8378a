use std::fmt;

use entity::sea_orm_active_enums::MemberStatus;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, SqlErr};

use crate::{
    model::{
        api::PageDto,
        member::{CreateMemberDto, MemberDto, UpdateMemberDto},
    },
    server::{
        data::member::{MemberFilter, MemberRepository},
        error::{member::MemberError, Error},
        model::db::MemberModel,
    },
};

const MAX_PER_PAGE: u64 = 100;
/// Pages beyond this are always empty; keeps the row offset far from overflowing
const MAX_PAGE: u64 = 1_000_000;

/// How a request identifies a member: by database ID or by linked LINE account
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberRef {
    Id(i32),
    LineUserId(String),
}

impl MemberRef {
    /// Builds a reference from request fields, exactly one of them must be present
    pub fn from_parts(member_id: Option<i32>, line_user_id: Option<String>) -> Result<Self, Error> {
        let line_user_id = line_user_id.filter(|id| !id.trim().is_empty());

        match (member_id, line_user_id) {
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(line_user_id)) => Ok(Self::LineUserId(line_user_id)),
            _ => Err(Error::Validation(
                "Provide exactly one of member_id or line_user_id".to_string(),
            )),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "member ID {}", id),
            Self::LineUserId(line_user_id) => write!(f, "LINE user ID {}", line_user_id),
        }
    }
}

/// Resolves a member reference, failing with [`MemberError::NotFound`]
pub async fn resolve_member<C: ConnectionTrait>(
    db: &C,
    member_ref: &MemberRef,
) -> Result<MemberModel, Error> {
    let repo = MemberRepository::new(db);

    let member = match member_ref {
        MemberRef::Id(id) => repo.get(*id).await?,
        MemberRef::LineUserId(line_user_id) => repo.find_by_line_user_id(line_user_id).await?,
    };

    member.ok_or_else(|| MemberError::NotFound(member_ref.to_string()).into())
}

/// Resolves a member reference to an active member
///
/// # Returns
/// - `Ok(MemberModel)` - The active member
/// - `Err(Error::MemberError(MemberError::NotFound))` - No member matches the reference
/// - `Err(Error::MemberError(MemberError::NotActive))` - The member is inactive or suspended
pub async fn resolve_active_member<C: ConnectionTrait>(
    db: &C,
    member_ref: &MemberRef,
) -> Result<MemberModel, Error> {
    let member = resolve_member(db, member_ref).await?;

    if member.status != MemberStatus::Active {
        return Err(MemberError::NotActive(member.id).into());
    }

    Ok(member)
}

/// Maps a unique violation on `line_user_id` to [`MemberError::LineUserIdTaken`]
fn map_line_conflict(err: DbErr, line_user_id: Option<&str>) -> Error {
    match (err.sql_err(), line_user_id) {
        (Some(SqlErr::UniqueConstraintViolation(_)), Some(line_user_id)) => {
            MemberError::LineUserIdTaken(line_user_id.to_string()).into()
        }
        _ => err.into(),
    }
}

fn require_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }

    Ok(())
}

pub struct MemberService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MemberService<'a> {
    /// Creates a new instance of [`MemberService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists members matching `filter`
    ///
    /// `page` is 1-based, `per_page` is clamped to 1..=100.
    pub async fn list(
        &self,
        filter: MemberFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PageDto<MemberDto>, Error> {
        let page = page.clamp(1, MAX_PAGE);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let (members, total) = MemberRepository::new(self.db)
            .list(&filter, page, per_page)
            .await?;

        Ok(PageDto {
            items: members.into_iter().map(MemberDto::from).collect(),
            page,
            per_page,
            total,
        })
    }

    pub async fn get(&self, id: i32) -> Result<MemberDto, Error> {
        let member = resolve_member(self.db, &MemberRef::Id(id)).await?;

        Ok(member.into())
    }

    pub async fn get_by_line_user_id(&self, line_user_id: &str) -> Result<MemberDto, Error> {
        let member =
            resolve_member(self.db, &MemberRef::LineUserId(line_user_id.to_string())).await?;

        Ok(member.into())
    }

    /// Creates a member
    ///
    /// # Returns
    /// - `Ok(MemberDto)` - The created member
    /// - `Err(Error::Validation)` - Empty name
    /// - `Err(Error::MemberError(MemberError::LineUserIdTaken))` - LINE account already linked
    pub async fn create(&self, member: CreateMemberDto) -> Result<MemberDto, Error> {
        require_name(&member.name)?;

        let line_user_id = member.line_user_id.clone();
        let member = MemberRepository::new(self.db)
            .create(member)
            .await
            .map_err(|e| map_line_conflict(e, line_user_id.as_deref()))?;

        tracing::info!(member_id = %member.id, "Created member {}", member.name);

        Ok(member.into())
    }

    /// Applies a partial update to a member
    pub async fn update(&self, id: i32, changes: UpdateMemberDto) -> Result<MemberDto, Error> {
        if let Some(name) = &changes.name {
            require_name(name)?;
        }

        let line_user_id = changes.line_user_id.clone();
        let member = MemberRepository::new(self.db)
            .update(id, changes)
            .await
            .map_err(|e| map_line_conflict(e, line_user_id.as_deref()))?
            .ok_or_else(|| MemberError::NotFound(MemberRef::Id(id).to_string()))?;

        Ok(member.into())
    }

    /// Soft deletes a member by marking it inactive
    pub async fn deactivate(&self, id: i32) -> Result<MemberDto, Error> {
        let member = MemberRepository::new(self.db)
            .set_status(id, MemberStatus::Inactive)
            .await?
            .ok_or_else(|| MemberError::NotFound(MemberRef::Id(id).to_string()))?;

        tracing::info!(member_id = %member.id, "Deactivated member");

        Ok(member.into())
    }
}

#[cfg(test)]
mod tests {
    mod member_ref {
        use crate::server::{error::Error, service::member::MemberRef};

        /// Expect a reference by ID when only member_id is given
        #[test]
        fn accepts_member_id() {
            let member_ref = MemberRef::from_parts(Some(3), None).unwrap();

            assert_eq!(member_ref, MemberRef::Id(3));
        }

        /// Expect a blank LINE ID to count as absent
        #[test]
        fn ignores_blank_line_user_id() {
            let member_ref = MemberRef::from_parts(Some(3), Some("  ".to_string())).unwrap();

            assert_eq!(member_ref, MemberRef::Id(3));
        }

        /// Expect Validation when both or neither identifiers are given
        #[test]
        fn rejects_ambiguous_reference() {
            let both = MemberRef::from_parts(Some(3), Some("U1".to_string()));
            let neither = MemberRef::from_parts(None, None);

            assert!(matches!(both, Err(Error::Validation(_))));
            assert!(matches!(neither, Err(Error::Validation(_))));
        }
    }

    mod resolve_active_member {
        use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
        use lionsclub_test_utils::prelude::*;

        use crate::server::{
            error::{member::MemberError, Error},
            service::member::{resolve_active_member, MemberRef},
        };

        /// Expect the member when resolved by LINE ID
        #[tokio::test]
        async fn resolves_by_line_user_id() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            let member = test.member().insert_member("Alice", Some("U1")).await?;

            let resolved =
                resolve_active_member(&test.db, &MemberRef::LineUserId("U1".to_string())).await;

            assert_eq!(resolved.unwrap().id, member.id);

            Ok(())
        }

        /// Expect NotFound for an unknown member ID
        #[tokio::test]
        async fn fails_for_unknown_member() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;

            let result = resolve_active_member(&test.db, &MemberRef::Id(42)).await;

            assert!(matches!(
                result,
                Err(Error::MemberError(MemberError::NotFound(_)))
            ));

            Ok(())
        }

        /// Expect NotActive for a suspended member
        #[tokio::test]
        async fn fails_for_suspended_member() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            let member = test
                .member()
                .insert(
                    MemberFixture::new("Bob", None)
                        .role(MemberRole::Officer)
                        .status(MemberStatus::Suspended),
                )
                .await?;

            let result = resolve_active_member(&test.db, &MemberRef::Id(member.id)).await;

            assert!(matches!(
                result,
                Err(Error::MemberError(MemberError::NotActive(id))) if id == member.id
            ));

            Ok(())
        }
    }

    mod create {
        use lionsclub_test_utils::prelude::*;

        use crate::{
            model::member::CreateMemberDto,
            server::{
                error::{member::MemberError, Error},
                service::member::MemberService,
            },
        };

        fn new_member(name: &str, line_user_id: Option<&str>) -> CreateMemberDto {
            CreateMemberDto {
                name: name.to_string(),
                email: None,
                phone: None,
                line_user_id: line_user_id.map(str::to_string),
                role: None,
                joined_on: None,
            }
        }

        /// Expect the created member to be returned
        #[tokio::test]
        async fn creates_member() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;

            let member = MemberService::new(&test.db)
                .create(new_member("Carol", Some("U3")))
                .await
                .unwrap();

            assert_eq!(member.name, "Carol");
            assert_eq!(member.line_user_id.as_deref(), Some("U3"));

            Ok(())
        }

        /// Expect Validation for a blank name
        #[tokio::test]
        async fn rejects_blank_name() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;

            let result = MemberService::new(&test.db)
                .create(new_member(" ", None))
                .await;

            assert!(matches!(result, Err(Error::Validation(_))));

            Ok(())
        }

        /// Expect LineUserIdTaken when the LINE ID is already linked
        #[tokio::test]
        async fn rejects_taken_line_user_id() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            test.member().insert_member("Alice", Some("U1")).await?;

            let result = MemberService::new(&test.db)
                .create(new_member("Mallory", Some("U1")))
                .await;

            assert!(matches!(
                result,
                Err(Error::MemberError(MemberError::LineUserIdTaken(_)))
            ));

            Ok(())
        }
    }

    mod list {
        use lionsclub_test_utils::prelude::*;

        use crate::server::service::member::{MemberService, MAX_PAGE};

        /// Expect an out-of-range page number to return an empty last page
        #[tokio::test]
        async fn clamps_huge_page_number() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            test.member().insert_member("Alice", None).await?;

            let page = MemberService::new(&test.db)
                .list(Default::default(), u64::MAX, 100)
                .await
                .unwrap();

            assert_eq!(page.page, MAX_PAGE);
            assert_eq!(page.total, 1);
            assert!(page.items.is_empty());

            Ok(())
        }

        /// Expect page 0 to be treated as the first page
        #[tokio::test]
        async fn treats_page_zero_as_first() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            test.member().insert_member("Alice", None).await?;

            let page = MemberService::new(&test.db)
                .list(Default::default(), 0, 20)
                .await
                .unwrap();

            assert_eq!(page.page, 1);
            assert_eq!(page.items.len(), 1);

            Ok(())
        }
    }

    mod deactivate {
        use entity::sea_orm_active_enums::MemberStatus;
        use lionsclub_test_utils::prelude::*;

        use crate::server::{
            error::{member::MemberError, Error},
            service::member::MemberService,
        };

        /// Expect the member to become inactive
        #[tokio::test]
        async fn marks_member_inactive() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            let member = test.member().insert_member("Alice", None).await?;

            let member = MemberService::new(&test.db)
                .deactivate(member.id)
                .await
                .unwrap();

            assert_eq!(member.status, MemberStatus::Inactive);

            Ok(())
        }

        /// Expect NotFound for an unknown member
        #[tokio::test]
        async fn fails_for_unknown_member() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;

            let result = MemberService::new(&test.db).deactivate(7).await;

            assert!(matches!(
                result,
                Err(Error::MemberError(MemberError::NotFound(_)))
            ));

            Ok(())
        }
    }
}
