//! Announcement channel port
//!
//! Defines the interface for posting short public announcements to an
//! external social platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnnouncementError;

/// Default length limit for a post, in characters
pub const DEFAULT_MAX_POST_LEN: usize = 280;

/// What the channel returned for a successful post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    /// Platform id of the created post, when the platform reports one
    pub id: Option<String>,
}

/// Port trait for the social announcement channel
#[async_trait]
pub trait AnnouncementChannel: Send + Sync {
    /// Maximum post length in characters
    fn max_len(&self) -> usize {
        DEFAULT_MAX_POST_LEN
    }

    /// Publish a post
    async fn post(&self, text: &str) -> Result<PostReceipt, AnnouncementError>;
}
