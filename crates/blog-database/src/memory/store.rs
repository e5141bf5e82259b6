//! In-memory implementation of every repository trait.
//!
//! Rows live in insertion-ordered vectors behind a single tokio `RwLock`.
//! Uniqueness and cascade rules mirror the PostgreSQL schema.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::{PageRequest, PageResponse};
use blog_entity::comment::{Comment, CreateComment};
use blog_entity::like::Like;
use blog_entity::post::{CreatePost, Post, UpdatePost};
use blog_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::repositories::{CommentRepository, LikeRepository, PostRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
}

/// Process-local store. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest-first page over insertion-ordered rows.
fn newest_first<T: Clone>(
    rows: impl DoubleEndedIterator<Item = T>,
    page: PageRequest,
) -> PageResponse<T> {
    let all: Vec<T> = rows.rev().collect();
    let total = all.len() as u64;
    let items = all
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();
    PageResponse::new(items, page.page, page.page_size, total)
}

fn same_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| same_ci(&u.username, username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| same_ci(&u.email, email))
            .cloned())
    }

    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.users.iter().cloned(), page))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| same_ci(&u.username, &data.username))
        {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if tables.users.iter().any(|u| same_ci(&u.email, &data.email)) {
            return Err(AppError::conflict("Email already in use"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            picture: None,
            phone: None,
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &data.email {
            if tables
                .users
                .iter()
                .any(|u| u.id != id && same_ci(&u.email, email))
            {
                return Err(AppError::conflict("Email already in use"));
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        if let Some(email) = &data.email {
            user.email = email.clone();
        }
        if let Some(first_name) = &data.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &data.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(picture) = &data.picture {
            user.picture = Some(picture.clone());
        }
        if let Some(phone) = &data.phone {
            user.phone = Some(phone.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.is_active = is_active;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(AppError::not_found(format!("User {} not found", data.user_id)));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            name: data.name.clone(),
            title: data.title.clone(),
            text: data.text.clone(),
            is_active: data.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_active(&self, page: PageRequest) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        let active: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        Ok(newest_first(active.into_iter(), page))
    }

    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<Post>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.posts.iter().cloned(), page))
    }

    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Post> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))?;
        if let Some(name) = &data.name {
            post.name = name.clone();
        }
        if let Some(title) = &data.title {
            post.title = title.clone();
        }
        if let Some(text) = &data.text {
            post.text = text.clone();
        }
        if let Some(is_active) = data.is_active {
            post.is_active = is_active;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|c| c.post_id != id);
        tables.likes.retain(|l| l.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == data.post_id) {
            return Err(AppError::not_found(format!("Post {} not found", data.post_id)));
        }
        if let Some(parent) = data.parent_id {
            if !tables.comments.iter().any(|c| c.id == parent) {
                return Err(AppError::not_found(format!("Comment {parent} not found")));
            }
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            post_id: data.post_id,
            parent_id: data.parent_id,
            text: data.text.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn update_text(&self, id: Uuid, text: &str) -> AppResult<Comment> {
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))?;
        comment.text = text.to_string();
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.comments.iter().any(|c| c.id == id) {
            return Ok(false);
        }

        let mut doomed = HashSet::from([id]);
        loop {
            let before = doomed.len();
            for comment in &tables.comments {
                if comment.parent_id.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(comment.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        tables.comments.retain(|c| !doomed.contains(&c.id));
        Ok(true)
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> AppResult<Option<Like>> {
        let tables = self.tables.read().await;
        Ok(tables
            .likes
            .iter()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, post_id: Uuid, is_like: bool) -> AppResult<Like> {
        let mut tables = self.tables.write().await;
        if tables
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.post_id == post_id)
        {
            return Err(AppError::conflict("Reaction already recorded"));
        }
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        let now = Utc::now();
        let like = Like {
            id: Uuid::new_v4(),
            user_id,
            post_id,
            is_like,
            created_at: now,
            updated_at: now,
        };
        tables.likes.push(like.clone());
        Ok(like)
    }

    async fn set_reaction(&self, id: Uuid, is_like: bool) -> AppResult<Like> {
        let mut tables = self.tables.write().await;
        let like = tables
            .likes
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found(format!("Reaction {id} not found")))?;
        like.is_like = is_like;
        like.updated_at = Utc::now();
        Ok(like.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|l| l.id != id);
        Ok(tables.likes.len() != before)
    }

    async fn counts(&self, post_id: Uuid) -> AppResult<(i64, i64)> {
        let tables = self.tables.read().await;
        let (likes, dislikes) = tables
            .likes
            .iter()
            .filter(|l| l.post_id == post_id)
            .fold((0, 0), |(up, down), l| {
                if l.is_like { (up + 1, down) } else { (up, down + 1) }
            });
        Ok((likes, dislikes))
    }
}
