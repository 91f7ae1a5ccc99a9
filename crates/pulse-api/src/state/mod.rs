//! Shared handler state: the service context plus loaded configuration

use std::fmt;
use std::sync::Arc;

use pulse_common::{AppConfig, JwtService};
use pulse_service::ServiceContext;

#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
        }
    }

    /// Dependency container handed to every service
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Bearer token verifier used by the auth extractors
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("env", &self.config.app.env)
            .finish()
    }
}
