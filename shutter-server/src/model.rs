//! The application schema: document kinds and the collection registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shutter::collection::{Collection, Entity};
use shutter::errors::ShutterResult;
use shutter::Shutter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub profile_photo: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub profile_photo: String,
    pub username: String,
    pub password_hash: String,
}

/// Partial update for a user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl Entity for User {
    const KIND: &'static str = "users";
    type Draft = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewUser) -> Self {
        User {
            id,
            name: draft.name,
            profile_photo: draft.profile_photo,
            username: draft.username,
            password_hash: draft.password_hash,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(profile_photo) = patch.profile_photo {
            self.profile_photo = profile_photo;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
    }
}

/// A login session. The session id doubles as the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub user: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Session {
    const KIND: &'static str = "sessions";
    type Draft = NewSession;
    // sessions are only ever created and deleted
    type Patch = ();

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewSession) -> Self {
        Session {
            id,
            user: draft.user,
            created_at: draft.created_at,
        }
    }

    fn apply(&mut self, _patch: ()) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub photo: String,
    pub caption: String,
    pub liked_by: Vec<String>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub photo: String,
    pub caption: String,
    pub liked_by: Vec<String>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a post; only the membership lists ever change.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub liked_by: Option<Vec<String>>,
    pub comments: Option<Vec<String>>,
}

impl Entity for Post {
    const KIND: &'static str = "posts";
    type Draft = NewPost;
    type Patch = PostPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewPost) -> Self {
        Post {
            id,
            author: draft.author,
            photo: draft.photo,
            caption: draft.caption,
            liked_by: draft.liked_by,
            comments: draft.comments,
            created_at: draft.created_at,
        }
    }

    fn apply(&mut self, patch: PostPatch) {
        if let Some(liked_by) = patch.liked_by {
            self.liked_by = liked_by;
        }
        if let Some(comments) = patch.comments {
            self.comments = comments;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    const KIND: &'static str = "comments";
    type Draft = NewComment;
    type Patch = ();

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewComment) -> Self {
        Comment {
            id,
            post: draft.post,
            author: draft.author,
            text: draft.text,
            created_at: draft.created_at,
        }
    }

    fn apply(&mut self, _patch: ()) {}
}

/// The declared schema: one collection per document kind, opened once at
/// startup and handed to the HTTP layer by injection.
#[derive(Clone)]
pub struct Database {
    pub users: Collection<User>,
    pub sessions: Collection<Session>,
    pub posts: Collection<Post>,
    pub comments: Collection<Comment>,
}

impl Database {
    pub async fn open(db: &Shutter) -> ShutterResult<Self> {
        Ok(Database {
            users: db.collection().await?,
            sessions: db.collection().await?,
            posts: db.collection().await?,
            comments: db.collection().await?,
        })
    }
}
