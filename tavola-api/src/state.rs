use std::sync::Arc;
use tavola_core::{
    BusinessRules, Clock, ContentService, ReservationService, Store, SubscriberService, SystemClock,
};
use tavola_store::app_config::RateLimitConfig;
use tavola_store::RedisClient;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub reservations: Arc<ReservationService>,
    pub subscribers: Arc<SubscriberService>,
    pub content: Arc<ContentService>,
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
    pub environment: String,
}

impl AppState {
    /// Wire every service to the same collaborator.
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        business_rules: BusinessRules,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            reservations: Arc::new(ReservationService::new(store.clone(), clock.clone(), business_rules)),
            subscribers: Arc::new(SubscriberService::new(store.clone(), clock)),
            content: Arc::new(ContentService::new(store.clone())),
            store,
            redis: None,
            rate_limit: RateLimitConfig::default(),
            environment: environment.into(),
        }
    }

    pub fn with_system_clock(store: Arc<dyn Store>, business_rules: BusinessRules, environment: impl Into<String>) -> Self {
        Self::new(store, Arc::new(SystemClock), business_rules, environment)
    }

    pub fn with_rate_limit(mut self, redis: RedisClient, config: RateLimitConfig) -> Self {
        self.redis = Some(Arc::new(redis));
        self.rate_limit = config;
        self
    }
}
