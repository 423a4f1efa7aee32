use std::fmt;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use ranque_config::CorsConfig;

use crate::modules::auth::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("cors_config", &self.cors_config)
            .field("metrics_enabled", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    pub fn new(auth: AuthService, cors_config: CorsConfig) -> Self {
        Self {
            auth: Arc::new(auth),
            cors_config,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

#[cfg(test)]
mod tests {
    use ranque_config::JwtConfig;
    use ranque_db::MemoryStore;

    use super::*;

    const SECRET: &str = "state-test-secret-key-at-least-32-bytes";

    #[test]
    fn test_debug_hides_secret_and_metrics_handle() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), store, JwtConfig::new(SECRET).unwrap()).unwrap();
        let state = AppState::new(auth, CorsConfig::default());

        let debug = format!("{:?}", state);
        assert!(debug.contains("metrics_enabled: false"));
        assert!(!debug.contains(SECRET));
    }
}
