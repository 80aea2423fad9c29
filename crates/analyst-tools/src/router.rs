//! Vendor routing: capability name → backend implementation
//!
//! Data capabilities never call a vendor directly. They hand the capability
//! name and the original arguments to a [`VendorRouter`], which is built once
//! at start-up and passed in explicitly, so tests can register doubles.

use analyst_core::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A concrete backend serving one capability
#[async_trait]
pub trait VendorBackend: Send + Sync {
    /// Serve a call with the model-supplied arguments
    async fn call(&self, args: &Value) -> Result<String>;
}

#[derive(Clone)]
struct Route {
    vendor: String,
    backend: Arc<dyn VendorBackend>,
}

/// Registry of backends per capability, tried in registration order
///
/// Only retriable failures ([`Error::is_retriable`]) move on to the next
/// vendor; input and schema errors are returned as-is.
#[derive(Clone, Default)]
pub struct VendorRouter {
    routes: HashMap<String, Vec<Route>>,
}

impl fmt::Debug for VendorRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (capability, routes) in &self.routes {
            let vendors: Vec<&str> = routes.iter().map(|r| r.vendor.as_str()).collect();
            map.entry(capability, &vendors);
        }
        map.finish()
    }
}

impl VendorRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend for `capability`, after any already registered
    pub fn register(
        &mut self,
        capability: impl Into<String>,
        vendor: impl Into<String>,
        backend: Arc<dyn VendorBackend>,
    ) -> &mut Self {
        let capability = capability.into();
        let vendor = vendor.into();
        debug!(capability = %capability, vendor = %vendor, "Registering vendor backend");
        self.routes
            .entry(capability)
            .or_default()
            .push(Route { vendor, backend });
        self
    }

    /// Vendors serving `capability`, in the order they are tried
    pub fn vendors(&self, capability: &str) -> Vec<&str> {
        self.routes
            .get(capability)
            .map(|routes| routes.iter().map(|r| r.vendor.as_str()).collect())
            .unwrap_or_default()
    }

    /// Whether any backend serves `capability`
    pub fn supports(&self, capability: &str) -> bool {
        self.routes.get(capability).is_some_and(|r| !r.is_empty())
    }

    /// Serve `capability` with `args`
    pub async fn route(&self, capability: &str, args: &Value) -> Result<String> {
        let routes = self
            .routes
            .get(capability)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::UnknownCapability(capability.to_string()))?;

        let mut last_error = None;
        for route in routes {
            info!(capability = %capability, vendor = %route.vendor, "Routing capability call");
            match route.backend.call(args).await {
                Ok(output) => return Ok(output),
                Err(e) if e.is_retriable() => {
                    warn!(
                        capability = %capability,
                        vendor = %route.vendor,
                        error = %e,
                        "Vendor failed, trying next"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::UnknownCapability(capability.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use serde_json::json;

    mock! {
        Backend {}
        #[async_trait]
        impl VendorBackend for Backend {
            async fn call(&self, args: &Value) -> Result<String>;
        }
    }

    fn backend(result: Result<String>, times: usize) -> Arc<dyn VendorBackend> {
        let mut mock = MockBackend::new();
        mock.expect_call()
            .times(times)
            .returning(move |_| result.clone());
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_unknown_capability() {
        let router = VendorRouter::new();
        let err = router.route("get_macro_ind", &json!({})).await.unwrap_err();
        assert_eq!(err, Error::UnknownCapability("get_macro_ind".to_string()));
        assert!(!router.supports("get_macro_ind"));
    }

    #[tokio::test]
    async fn test_primary_vendor_serves() {
        let mut router = VendorRouter::new();
        router
            .register("get_news", "finnhub", backend(Ok("headlines".to_string()), 1))
            .register("get_news", "local", backend(Ok("unused".to_string()), 0));

        assert_eq!(router.vendors("get_news"), vec!["finnhub", "local"]);
        let out = router.route("get_news", &json!({"ticker": "AAPL"})).await.unwrap();
        assert_eq!(out, "headlines");
    }

    #[tokio::test]
    async fn test_falls_back_on_transient_failure() {
        let mut router = VendorRouter::new();
        router
            .register("get_news", "finnhub", backend(Err(Error::transient("finnhub", "429")), 1))
            .register("get_news", "local", backend(Ok("snapshot".to_string()), 1));

        let out = router.route("get_news", &json!({})).await.unwrap();
        assert_eq!(out, "snapshot");
    }

    #[tokio::test]
    async fn test_input_errors_do_not_fall_back() {
        let mut router = VendorRouter::new();
        router
            .register(
                "get_macro_ind",
                "local",
                backend(Err(Error::MalformedInput("bad date".to_string())), 1),
            )
            .register("get_macro_ind", "other", backend(Ok("unused".to_string()), 0));

        let err = router.route("get_macro_ind", &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_last_transient_error_surfaces() {
        let mut router = VendorRouter::new();
        router.register("get_global_news", "finnhub", backend(Err(Error::transient("finnhub", "timeout")), 1));

        let err = router.route("get_global_news", &json!({})).await.unwrap_err();
        assert!(err.is_retriable());
    }
}
