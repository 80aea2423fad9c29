//! Router wiring for the configured vendors

use analyst_core::Result;
use analyst_tools::VendorRouter;
use std::sync::Arc;
use tracing::info;

use crate::capabilities::{GET_GLOBAL_NEWS, GET_MACRO_IND, GET_NEWS};
use crate::config::{DataflowConfig, NewsVendor};
use crate::finnhub::{self, FinnhubClient};
use crate::macro_indicators::LocalMacroBackend;
use crate::news::{CompanyNews, GlobalNews, LocalNewsStore};

const LOCAL: &str = "local";

/// Build the router serving every data capability
///
/// Macro indicators always come from the local dataset. News goes to the
/// configured vendor; with Finnhub selected and `fallback_to_local` set, the
/// local snapshots are registered second and serve transient Finnhub failures.
pub fn build_router(config: &DataflowConfig) -> Result<VendorRouter> {
    config.validate()?;

    let mut router = VendorRouter::new();
    router.register(
        GET_MACRO_IND,
        LOCAL,
        Arc::new(LocalMacroBackend::new(config.macro_dataset_path())),
    );

    let local = Arc::new(LocalNewsStore::new(config.news_dir()));

    if config.news_vendor == NewsVendor::Finnhub {
        let api_key = config.finnhub_api_key.clone().unwrap_or_default();
        let client = Arc::new(FinnhubClient::new(
            api_key,
            config.finnhub_rate_limit,
            config.request_timeout,
        )?);
        router
            .register(GET_NEWS, finnhub::VENDOR, Arc::new(CompanyNews::new(client.clone())))
            .register(GET_GLOBAL_NEWS, finnhub::VENDOR, Arc::new(GlobalNews::new(client)));
    }

    if config.news_vendor == NewsVendor::Local || config.fallback_to_local {
        router
            .register(GET_NEWS, LOCAL, Arc::new(CompanyNews::new(local.clone())))
            .register(GET_GLOBAL_NEWS, LOCAL, Arc::new(GlobalNews::new(local)));
    }

    info!(
        news_vendor = %config.news_vendor,
        data_dir = %config.data_dir.display(),
        news_vendors = ?router.vendors(GET_NEWS),
        "Vendor router ready"
    );
    Ok(router)
}
