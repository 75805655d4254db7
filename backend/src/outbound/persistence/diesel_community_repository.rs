//! PostgreSQL-backed `CommunityRepository` implementation using Diesel ORM.
//!
//! Every mutation runs inside one transaction. Joins rely on the
//! `(community_id, user_id)` primary key with `ON CONFLICT DO NOTHING`, and
//! edits filter on the creator in the same `UPDATE` statement.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    CommunityPersistenceError, CommunityRepository, JoinOutcome, PostOutcome, UpdateOutcome,
};
use crate::domain::{
    Community, CommunityChanges, CommunityDetail, CommunityId, CommunitySummary, ContentEntry,
    ContentItem, UserId,
};

use super::error_mapping::{map_community_diesel_error, map_community_pool_error};
use super::models::{
    CommunityRow, CommunityUpdate, ContentRow, NewCommunityRow, NewContentRow, NewMemberRow,
    UserRow,
};
use super::pool::DbPool;
use super::schema::{communities, community_contents, community_members, users};

/// Diesel-backed implementation of the `CommunityRepository` port.
#[derive(Clone)]
pub struct DieselCommunityRepository {
    pool: DbPool,
}

impl DieselCommunityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        CommunityPersistenceError,
    > {
        self.pool.get().await.map_err(map_community_pool_error)
    }
}

/// Outcome of the guarded update before row conversion.
enum GuardedUpdate {
    Updated(CommunityRow),
    NotCreator,
    Missing,
}

fn summary_from_rows(
    (community, creator): (CommunityRow, UserRow),
) -> Result<CommunitySummary, CommunityPersistenceError> {
    let community = community
        .into_domain()
        .map_err(CommunityPersistenceError::query)?;
    let creator = creator
        .into_domain()
        .map_err(CommunityPersistenceError::query)?;
    Ok(CommunitySummary {
        id: community.id,
        title: community.title,
        description: community.description,
        location: community.location,
        image: community.image,
        creator,
    })
}

fn entry_from_rows(
    (item, author): (ContentRow, UserRow),
) -> Result<ContentEntry, CommunityPersistenceError> {
    Ok(ContentEntry {
        item: item.into_domain().map_err(CommunityPersistenceError::query)?,
        author: author
            .into_domain()
            .map_err(CommunityPersistenceError::query)?,
    })
}

async fn community_exists(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<bool, diesel::result::Error> {
    communities::table
        .find(id)
        .select(communities::id)
        .first::<Uuid>(conn)
        .await
        .optional()
        .map(|found| found.is_some())
}

#[async_trait]
impl CommunityRepository for DieselCommunityRepository {
    async fn list_summaries(&self) -> Result<Vec<CommunitySummary>, CommunityPersistenceError> {
        let mut conn = self.connection().await?;

        let rows: Vec<(CommunityRow, UserRow)> = communities::table
            .inner_join(users::table)
            .order((communities::created_at.asc(), communities::id.asc()))
            .select((CommunityRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_community_diesel_error)?;

        rows.into_iter().map(summary_from_rows).collect()
    }

    async fn list_for_member(
        &self,
        user: &UserId,
    ) -> Result<Vec<CommunitySummary>, CommunityPersistenceError> {
        let mut conn = self.connection().await?;

        let rows: Vec<(CommunityRow, UserRow)> = community_members::table
            .inner_join(communities::table.on(communities::id.eq(community_members::community_id)))
            .inner_join(users::table.on(users::id.eq(communities::creator_id)))
            .filter(community_members::user_id.eq(*user.as_uuid()))
            .order((community_members::joined_at.asc(), communities::id.asc()))
            .select((CommunityRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_community_diesel_error)?;

        rows.into_iter().map(summary_from_rows).collect()
    }

    async fn find(&self, id: &CommunityId) -> Result<Option<Community>, CommunityPersistenceError> {
        let mut conn = self.connection().await?;

        let row = communities::table
            .find(*id.as_uuid())
            .select(CommunityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_community_diesel_error)?;

        row.map(CommunityRow::into_domain)
            .transpose()
            .map_err(CommunityPersistenceError::query)
    }

    async fn find_detail(
        &self,
        id: &CommunityId,
    ) -> Result<Option<CommunityDetail>, CommunityPersistenceError> {
        let mut conn = self.connection().await?;
        let community_id = *id.as_uuid();

        let head: Option<(CommunityRow, UserRow)> = communities::table
            .inner_join(users::table)
            .filter(communities::id.eq(community_id))
            .select((CommunityRow::as_select(), UserRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_community_diesel_error)?;
        let Some((community_row, creator_row)) = head else {
            return Ok(None);
        };

        let member_rows: Vec<UserRow> = community_members::table
            .inner_join(users::table)
            .filter(community_members::community_id.eq(community_id))
            .order((community_members::joined_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_community_diesel_error)?;

        let content_rows: Vec<(ContentRow, UserRow)> = community_contents::table
            .inner_join(users::table)
            .filter(community_contents::community_id.eq(community_id))
            .order((
                community_contents::created_at.asc(),
                community_contents::id.asc(),
            ))
            .select((ContentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_community_diesel_error)?;

        let members = member_rows
            .into_iter()
            .map(UserRow::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(CommunityPersistenceError::query)?;
        let contents = content_rows
            .into_iter()
            .map(entry_from_rows)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(CommunityDetail {
            community: community_row
                .into_domain()
                .map_err(CommunityPersistenceError::query)?,
            creator: creator_row
                .into_domain()
                .map_err(CommunityPersistenceError::query)?,
            members,
            contents,
        }))
    }

    async fn create_with_creator(
        &self,
        community: &Community,
    ) -> Result<(), CommunityPersistenceError> {
        let mut conn = self.connection().await?;
        let community_row = NewCommunityRow::from_domain(community);
        let member_row = NewMemberRow {
            community_id: *community.id.as_uuid(),
            user_id: *community.creator.as_uuid(),
            joined_at: community.created_at,
        };

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(communities::table)
                    .values(&community_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(community_members::table)
                    .values(&member_row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_community_diesel_error)?;

        debug!(community_id = %community.id, "community row and creator membership inserted");
        Ok(())
    }

    async fn add_member(
        &self,
        id: &CommunityId,
        user: &UserId,
    ) -> Result<JoinOutcome, CommunityPersistenceError> {
        let mut conn = self.connection().await?;
        let row = NewMemberRow {
            community_id: *id.as_uuid(),
            user_id: *user.as_uuid(),
            joined_at: Utc::now(),
        };

        conn.transaction(|conn| {
            async move {
                if !community_exists(conn, row.community_id).await? {
                    return Ok(JoinOutcome::CommunityMissing);
                }
                let inserted = diesel::insert_into(community_members::table)
                    .values(&row)
                    .on_conflict((community_members::community_id, community_members::user_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;
                Ok(if inserted == 0 {
                    JoinOutcome::AlreadyMember
                } else {
                    JoinOutcome::Joined
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_community_diesel_error)
    }

    async fn update_as_creator(
        &self,
        id: &CommunityId,
        actor: &UserId,
        changes: &CommunityChanges,
    ) -> Result<UpdateOutcome, CommunityPersistenceError> {
        let mut conn = self.connection().await?;
        let community_id = *id.as_uuid();
        let actor_id = *actor.as_uuid();
        let update = CommunityUpdate::from_changes(changes);

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(
                        communities::table
                            .filter(communities::id.eq(community_id))
                            .filter(communities::creator_id.eq(actor_id)),
                    )
                    .set(&update)
                    .returning(CommunityRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    if let Some(row) = updated {
                        return Ok(GuardedUpdate::Updated(row));
                    }
                    Ok(if community_exists(conn, community_id).await? {
                        GuardedUpdate::NotCreator
                    } else {
                        GuardedUpdate::Missing
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_community_diesel_error)?;

        match outcome {
            GuardedUpdate::Updated(row) => row
                .into_domain()
                .map(UpdateOutcome::Updated)
                .map_err(CommunityPersistenceError::query),
            GuardedUpdate::NotCreator => Ok(UpdateOutcome::NotCreator),
            GuardedUpdate::Missing => Ok(UpdateOutcome::CommunityMissing),
        }
    }

    async fn add_content(&self, item: &ContentItem) -> Result<PostOutcome, CommunityPersistenceError> {
        let mut conn = self.connection().await?;
        let row = NewContentRow::from_domain(item);

        conn.transaction(|conn| {
            async move {
                if !community_exists(conn, row.community_id).await? {
                    return Ok(PostOutcome::CommunityMissing);
                }
                let membership = community_members::table
                    .find((row.community_id, row.author_id))
                    .select(community_members::user_id)
                    .first::<Uuid>(conn)
                    .await
                    .optional()?;
                if membership.is_none() {
                    return Ok(PostOutcome::NotMember);
                }
                diesel::insert_into(community_contents::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(PostOutcome::Posted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_community_diesel_error)
    }
}
