pub mod crm;
pub mod donations;

use crate::config::Config;
use crm::{CrmGateway, HttpCrmGateway, MockCrmGateway};
use std::sync::Arc;
use tracing::info;

pub use crm::CrmOutcome;
pub use donations::DonationService;

/// The HTTP gateway when `crm_endpoint` is configured, otherwise the mock.
/// A configured endpoint whose client cannot be built is an error.
pub fn crm_gateway(cfg: &Config) -> Result<Arc<dyn CrmGateway>, reqwest::Error> {
    let Some(endpoint) = cfg.crm_endpoint.clone() else {
        info!("no CRM endpoint configured; using mock CRM gateway");
        return Ok(Arc::new(MockCrmGateway));
    };
    let gateway = HttpCrmGateway::new(endpoint.clone(), cfg.crm_timeout())?;
    info!(endpoint = %endpoint, "using HTTP CRM gateway");
    Ok(Arc::new(gateway))
}
