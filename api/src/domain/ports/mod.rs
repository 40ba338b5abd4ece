//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod announcement;
pub mod repositories;
pub mod transport;

pub use announcement::{AnnouncementChannel, PostReceipt, DEFAULT_MAX_POST_LEN};
pub use repositories::{
    AccountRepository, ArticleRepository, DeliveryLedger, PublisherRepository,
    SubscriptionRepository,
};
pub use transport::{MessageTransport, OutboundMessage};
