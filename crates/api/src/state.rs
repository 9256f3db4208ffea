use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService};
use crate::realtime::EventBus;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub events: Arc<EventBus>,
    auth_config: AuthConfig,
    jwt_service: JwtService,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let jwt_service = JwtService::new(&auth_config);

        Ok(Self {
            db,
            events: Arc::new(EventBus::new()),
            auth_config,
            jwt_service,
        })
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
