//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod announcement_publisher;
pub mod approval_trigger;
pub mod article_context;
pub mod article_service;
pub mod notification_dispatcher;
pub mod orchestrator;
pub mod subscription_index;
pub mod subscription_service;

pub use announcement_publisher::{AnnouncementPublisher, PublishReport};
pub use approval_trigger::{ApprovalHandler, ApprovalTrigger};
pub use article_context::ArticleContext;
pub use article_service::{ApprovalResult, ArticleService};
pub use notification_dispatcher::{DeliveryReport, NotificationDispatcher};
pub use orchestrator::{ApprovalOrchestrator, ApprovalOutcome, NotificationOutcome};
pub use subscription_index::{RecipientSet, SubscriptionIndex};
pub use subscription_service::SubscriptionService;
