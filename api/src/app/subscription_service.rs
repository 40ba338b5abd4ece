//! Subscription service
//!
//! Readers follow publishers or journalists. Only readers hold subscriptions;
//! the target must exist and a journalist target must carry the journalist
//! role.

use std::sync::Arc;

use crate::domain::entities::{
    AccountId, NewSubscription, Subscription, SubscriptionId, SubscriptionTarget,
};
use crate::domain::ports::{AccountRepository, PublisherRepository, SubscriptionRepository};
use crate::error::{AppError, DomainError};

pub struct SubscriptionService<SR, AR, PR>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
    PR: PublisherRepository,
{
    subscriptions: Arc<SR>,
    accounts: Arc<AR>,
    publishers: Arc<PR>,
}

impl<SR, AR, PR> SubscriptionService<SR, AR, PR>
where
    SR: SubscriptionRepository,
    AR: AccountRepository,
    PR: PublisherRepository,
{
    pub fn new(subscriptions: Arc<SR>, accounts: Arc<AR>, publishers: Arc<PR>) -> Self {
        Self {
            subscriptions,
            accounts,
            publishers,
        }
    }

    pub async fn subscribe(
        &self,
        reader_id: &AccountId,
        target: SubscriptionTarget,
    ) -> Result<Subscription, AppError> {
        let reader = self
            .accounts
            .find_by_id(reader_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Account {} not found", reader_id)))?;
        if !reader.is_reader() {
            return Err(
                DomainError::Forbidden("Only readers can hold subscriptions".to_string()).into(),
            );
        }

        match target {
            SubscriptionTarget::Publisher(publisher_id) => {
                if self.publishers.find_by_id(&publisher_id).await?.is_none() {
                    return Err(DomainError::NotFound(format!(
                        "Publisher {} not found",
                        publisher_id
                    ))
                    .into());
                }
            }
            SubscriptionTarget::Journalist(journalist_id) => {
                let journalist = self
                    .accounts
                    .find_by_id(&journalist_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::NotFound(format!("Account {} not found", journalist_id))
                    })?;
                if !journalist.is_journalist() {
                    return Err(DomainError::Validation(format!(
                        "Account {} is not a journalist",
                        journalist_id
                    ))
                    .into());
                }
            }
        }

        let subscription = self
            .subscriptions
            .create(&NewSubscription {
                reader_id: *reader_id,
                target,
            })
            .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            reader_id = %reader_id,
            "Reader subscribed"
        );

        Ok(subscription)
    }

    pub async fn unsubscribe(
        &self,
        reader_id: &AccountId,
        subscription_id: &SubscriptionId,
    ) -> Result<(), AppError> {
        if self.subscriptions.delete(subscription_id, reader_id).await? {
            tracing::info!(subscription_id = %subscription_id, "Reader unsubscribed");
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Subscription {} not found",
                subscription_id
            )))
        }
    }

    pub async fn list_for_reader(
        &self,
        reader_id: &AccountId,
    ) -> Result<Vec<Subscription>, AppError> {
        Ok(self.subscriptions.find_by_reader(reader_id).await?)
    }
}
