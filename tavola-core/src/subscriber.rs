use serde::Serialize;
use std::sync::Arc;
use tavola_shared::{Masked, NewSubscriber, SubscribeRequest, Subscriber};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::repository::{Store, StoreError};
use crate::validation;
use crate::{CoreError, CoreResult};

pub const MESSAGE_SUBSCRIBED: &str = "Successfully subscribed to the newsletter";
pub const MESSAGE_SIMULATED: &str =
    "Subscription received. The subscriber store is not configured, so it was not saved.";

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionConfirmation {
    pub success: bool,
    pub message: String,
    pub subscriber: Subscriber,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub simulated: bool,
}

/// Newsletter registration, idempotent on email.
pub struct SubscriberService {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl SubscriberService {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn subscribe(&self, req: &SubscribeRequest) -> CoreResult<SubscriptionConfirmation> {
        let email = validation::validate_email(req.email.as_deref())?;
        let candidate = NewSubscriber { email, name: validation::optional(&req.name) };

        match self.store.upsert_subscriber(&candidate).await {
            Ok(subscriber) => {
                info!(email = %Masked(&subscriber.email), "Newsletter subscriber upserted");
                Ok(SubscriptionConfirmation {
                    success: true,
                    message: MESSAGE_SUBSCRIBED.to_string(),
                    subscriber,
                    simulated: false,
                })
            }
            Err(StoreError::NotConfigured) => {
                warn!("Store not configured, subscription accepted without persisting");
                Ok(SubscriptionConfirmation {
                    success: true,
                    message: MESSAGE_SIMULATED.to_string(),
                    subscriber: Subscriber {
                        id: Uuid::new_v4(),
                        email: candidate.email,
                        name: candidate.name,
                        active: true,
                        created_at: self.clock.now(),
                    },
                    simulated: true,
                })
            }
            Err(StoreError::Backend(msg)) => {
                error!(error = %msg, "Failed to upsert newsletter subscriber");
                Err(CoreError::Persistence(msg))
            }
        }
    }
}
