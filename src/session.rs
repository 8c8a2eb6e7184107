use serde::{Deserialize, Serialize};

pub const USER_ID: &str = "user_id";
pub const USER_EMAIL: &str = "user_email";
pub const RETURN_URL: &str = "return_url";
pub const PENDING_LINKS: &str = "pending_links";

/// A link the user has added on the compose page but not yet published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLink {
    pub url: String,
    pub note: Option<String>,
}
