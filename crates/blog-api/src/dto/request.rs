//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use blog_entity::post::UpdatePost;
use blog_entity::user::{UpdateUser, UserRole};
use blog_service::{NewPost, Registration};

/// Usernames are ASCII letters, digits and underscores.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(
            "Username may only contain letters, digits and underscores".into(),
        ))
    }
}

fn default_true() -> bool {
    true
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password; strength is checked by the password policy.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Given name.
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Login request, as JSON or form fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body. The token may come from the transport instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1))]
    pub new_password: String,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Given name.
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    /// Family name.
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    /// Profile picture URL.
    #[validate(url, length(max = 255))]
    pub picture: Option<String>,
    /// Phone number.
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            picture: req.picture,
            phone: req.phone,
        }
    }
}

/// Role assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role.
    pub role: UserRole,
}

/// Account activation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    /// Whether the account may log in.
    pub is_active: bool,
}

/// Create post request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Short name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1))]
    pub text: String,
    /// Published immediately (default: true).
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            name: req.name,
            title: req.title,
            text: req.text,
            is_active: req.is_active,
        }
    }
}

/// Update post request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// Short name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Body text.
    #[validate(length(min = 1))]
    pub text: Option<String>,
    /// Visibility.
    pub is_active: Option<bool>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            name: req.name,
            title: req.title,
            text: req.text,
            is_active: req.is_active,
        }
    }
}

/// Create comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment text.
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    /// Comment being replied to, on the same post.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Update comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    /// New text.
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
}

/// `?is_like=` for the toggle endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLikeQuery {
    /// `true` for a like, `false` for a dislike.
    pub is_like: bool,
}
