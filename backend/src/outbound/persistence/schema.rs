//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        location -> Nullable<Varchar>,
        avatar -> Nullable<Varchar>,
        /// Argon2 PHC string; never selected outside credential lookups.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Communities with their geocoded point geometry.
    communities (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        location -> Varchar,
        longitude -> Float8,
        latitude -> Float8,
        image -> Nullable<Varchar>,
        creator_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership relation; the primary key makes joins idempotent.
    community_members (community_id, user_id) {
        community_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts and incident reports published into a community.
    community_contents (id) {
        id -> Uuid,
        community_id -> Uuid,
        author_id -> Uuid,
        title -> Varchar,
        /// `post` or `incident`.
        category -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(communities -> users (creator_id));
diesel::joinable!(community_members -> communities (community_id));
diesel::joinable!(community_members -> users (user_id));
diesel::joinable!(community_contents -> communities (community_id));
diesel::joinable!(community_contents -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    communities,
    community_members,
    community_contents,
);
