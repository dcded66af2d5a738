//! JSON API handlers.
//!
//! Queries (post count, post list, post detail, users, me) and mutations
//! (login/logout, user creation and update, post creation/deletion, likes,
//! comments). Handlers call the store, translate "not found" values into
//! domain errors, and assemble nested views (author expansion, like and
//! comment counts).

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::app::AppState;
use crate::auth::{authenticate, current_user, hash_password, session_for, verify_password};
use crate::error::ApiError;
use crate::model::{NewComment, NewPost, NewSession, NewUser, Post, PostPatch, User, UserPatch};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W").expect("valid pattern"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub profile_photo: String,
    pub username: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            name: user.name,
            profile_photo: user.profile_photo,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct PostListItem {
    pub id: String,
    pub author: UserView,
    pub photo: String,
    pub caption: String,
    pub is_liked_by_viewer: bool,
    pub like_count: usize,
    pub comment_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: String,
    pub author: UserView,
    pub photo: String,
    pub caption: String,
    pub is_liked_by_viewer: bool,
    pub like_count: usize,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: String,
    pub author: UserView,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

fn author_view(state: &AppState, user_id: &str, at: String) -> Result<UserView, ApiError> {
    state
        .db
        .users
        .get_by_id(user_id)
        .map(UserView::from)
        .ok_or(ApiError::BrokenReference(at))
}

fn is_liked_by(viewer: Option<&User>, post: &Post) -> bool {
    viewer
        .map(|user| post.liked_by.contains(&user.id))
        .unwrap_or(false)
}

fn post_list_item(
    state: &AppState,
    viewer: Option<&User>,
    post: Post,
) -> Result<PostListItem, ApiError> {
    let author = author_view(state, &post.author, format!("post({}).author", post.id))?;
    Ok(PostListItem {
        is_liked_by_viewer: is_liked_by(viewer, &post),
        like_count: post.liked_by.len(),
        comment_count: post.comments.len(),
        id: post.id,
        author,
        photo: post.photo,
        caption: post.caption,
        created_at: post.created_at,
    })
}

fn post_detail(state: &AppState, viewer: Option<&User>, post: Post) -> Result<PostDetail, ApiError> {
    let author = author_view(state, &post.author, format!("post({}).author", post.id))?;
    let mut comments = Vec::new();
    for comment_id in &post.comments {
        // a comment id with no backing document is skipped, not an error
        let Some(comment) = state.db.comments.get_by_id(comment_id) else {
            continue;
        };
        let comment_author = author_view(
            state,
            &comment.author,
            format!("comment({}).author", comment.id),
        )?;
        comments.push(CommentView {
            id: comment.id,
            author: comment_author,
            text: comment.text,
            created_at: comment.created_at,
        });
    }
    Ok(PostDetail {
        is_liked_by_viewer: is_liked_by(viewer, &post),
        like_count: post.liked_by.len(),
        id: post.id,
        author,
        photo: post.photo,
        caption: post.caption,
        comments,
        created_at: post.created_at,
    })
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() || NON_WORD.is_match(username) {
        return Err(ApiError::InvalidUsername);
    }
    Ok(())
}

// ---- queries ----

#[derive(Debug, Serialize)]
pub struct PostCount {
    pub count: usize,
}

pub async fn post_count(State(state): State<AppState>) -> Json<PostCount> {
    Json(PostCount {
        count: state.db.posts.len(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub posted_by: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<PostListItem>>, ApiError> {
    let mut posts = match query.posted_by {
        None => state.db.posts.get_all(),
        Some(user_id) => state.db.posts.find_where(|post| post.author == user_id),
    };
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let viewer = current_user(&state.db, &headers);
    let mut items = Vec::with_capacity(posts.len());
    for post in posts {
        items.push(post_list_item(&state, viewer.as_ref(), post)?);
    }
    Ok(Json(items))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PostDetail>, ApiError> {
    let post = state.db.posts.get_by_id(&id).ok_or(ApiError::InvalidPostId)?;
    let viewer = current_user(&state.db, &headers);
    Ok(Json(post_detail(&state, viewer.as_ref(), post)?))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserView>> {
    Json(state.db.users.get_all().into_iter().map(UserView::from).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, ApiError> {
    state
        .db
        .users
        .get_by_id(&id)
        .map(UserView::from)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<Option<UserView>> {
    Json(current_user(&state.db, &headers).map(UserView::from))
}

// ---- mutations ----

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<SessionView>, ApiError> {
    let candidates = state
        .db
        .users
        .find_where(|user| user.username.eq_ignore_ascii_case(&input.username));
    let user = candidates
        .into_iter()
        .find(|user| verify_password(&input.password, &user.password_hash))
        .ok_or(ApiError::InvalidCredentials)?;

    let session = state
        .db
        .sessions
        .insert(NewSession {
            user: user.id.clone(),
            created_at: Utc::now(),
        })
        .await?;
    Ok(Json(SessionView {
        token: session.id,
        user: UserView::from(user),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<bool>, ApiError> {
    match session_for(&state.db, &headers) {
        Some(session) => {
            state.db.sessions.delete(&session.id).await?;
            Ok(Json(true))
        }
        None => Ok(Json(false)),
    }
}

#[derive(Debug, Deserialize)]
pub struct UserCreateInput {
    pub name: String,
    pub profile_photo: String,
    pub username: String,
    pub password: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserCreateInput>,
) -> Result<Json<UserView>, ApiError> {
    validate_username(&input.username)?;
    let existing = state
        .db
        .users
        .find_where(|user| user.username.eq_ignore_ascii_case(&input.username));
    if !existing.is_empty() {
        return Err(ApiError::UsernameTaken);
    }
    let user = state
        .db
        .users
        .insert(NewUser {
            name: input.name,
            profile_photo: input.profile_photo,
            username: input.username,
            password_hash: hash_password(&input.password)?,
        })
        .await?;
    Ok(Json(UserView::from(user)))
}

/// Null and omitted fields both mean "leave unchanged".
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateInput {
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<UserUpdateInput>,
) -> Result<Json<UserView>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    if let Some(username) = &input.username {
        validate_username(username)?;
        let taken = state.db.users.find_where(|other| {
            other.id != user.id && other.username.eq_ignore_ascii_case(username)
        });
        if !taken.is_empty() {
            return Err(ApiError::UsernameTaken);
        }
    }
    let password_hash = match input.password {
        Some(password) => Some(hash_password(&password)?),
        None => None,
    };
    let updated = state
        .db
        .users
        .update(
            &user.id,
            UserPatch {
                name: input.name,
                profile_photo: input.profile_photo,
                username: input.username,
                password_hash,
            },
        )
        .await?;
    Ok(Json(UserView::from(updated.unwrap_or(user))))
}

#[derive(Debug, Deserialize)]
pub struct PostCreateInput {
    pub photo: String,
    pub caption: String,
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PostCreateInput>,
) -> Result<Json<PostDetail>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    let post = state
        .db
        .posts
        .insert(NewPost {
            author: user.id.clone(),
            photo: input.photo,
            caption: input.caption,
            liked_by: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        })
        .await?;
    Ok(Json(post_detail(&state, Some(&user), post)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<bool>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    let post = state.db.posts.get_by_id(&id).ok_or(ApiError::InvalidPostId)?;
    if post.author != user.id {
        return Err(ApiError::PermissionDenied);
    }
    state.db.posts.delete(&post.id).await?;
    Ok(Json(true))
}

/// Toggles the viewer's membership in the post's `liked_by` list and returns
/// the new liked state.
pub async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<bool>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    let post = state.db.posts.get_by_id(&id).ok_or(ApiError::InvalidPostId)?;

    let mut liked_by: Vec<String> = post
        .liked_by
        .iter()
        .filter(|liker| *liker != &user.id)
        .cloned()
        .collect();
    let was_removed = liked_by.len() != post.liked_by.len();
    if !was_removed {
        liked_by.push(user.id.clone());
    }
    state
        .db
        .posts
        .update(
            &id,
            PostPatch {
                liked_by: Some(liked_by),
                comments: None,
            },
        )
        .await?;
    Ok(Json(!was_removed))
}

#[derive(Debug, Deserialize)]
pub struct CommentCreateInput {
    pub post_id: String,
    pub text: String,
}

pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CommentCreateInput>,
) -> Result<Json<CommentView>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    let post = state
        .db
        .posts
        .get_by_id(&input.post_id)
        .ok_or(ApiError::InvalidPostId)?;

    let comment = state
        .db
        .comments
        .insert(NewComment {
            post: post.id.clone(),
            author: user.id.clone(),
            text: input.text,
            created_at: Utc::now(),
        })
        .await?;

    let mut comment_ids = post.comments.clone();
    comment_ids.push(comment.id.clone());
    state
        .db
        .posts
        .update(
            &post.id,
            PostPatch {
                liked_by: None,
                comments: Some(comment_ids),
            },
        )
        .await?;

    Ok(Json(CommentView {
        author: UserView::from(user),
        id: comment.id,
        text: comment.text,
        created_at: comment.created_at,
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<bool>, ApiError> {
    let user = authenticate(&state.db, &headers)?;
    let comment = state
        .db
        .comments
        .get_by_id(&id)
        .ok_or(ApiError::InvalidCommentId)?;
    let post = state
        .db
        .posts
        .get_by_id(&comment.post)
        .ok_or(ApiError::OrphanComment)?;
    if comment.author != user.id && post.author != user.id {
        return Err(ApiError::PermissionDenied);
    }

    let comment_ids: Vec<String> = post
        .comments
        .iter()
        .filter(|existing| *existing != &comment.id)
        .cloned()
        .collect();
    state
        .db
        .posts
        .update(
            &post.id,
            PostPatch {
                liked_by: None,
                comments: Some(comment_ids),
            },
        )
        .await?;
    state.db.comments.delete(&comment.id).await?;
    Ok(Json(true))
}
