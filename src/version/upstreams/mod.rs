//! Upstream implementations for looking up the latest source releases

pub mod hmdb;
pub mod lipidmaps;
mod page;

use std::sync::Arc;
use std::time::Duration;

pub use hmdb::HmdbUpstream;
pub use lipidmaps::LipidMapsUpstream;

use crate::config::UpstreamsConfig;
use crate::version::upstream::Upstream;

/// Build the enabled upstreams, in report order
pub fn from_config(config: &UpstreamsConfig, timeout: Duration) -> Vec<Arc<dyn Upstream>> {
    let mut upstreams: Vec<Arc<dyn Upstream>> = Vec::new();

    if config.hmdb.enabled {
        upstreams.push(Arc::new(
            HmdbUpstream::new(config.hmdb.url_or(hmdb::DEFAULT_HMDB_URL)).with_timeout(timeout),
        ));
    }

    if config.lipid_maps.enabled {
        upstreams.push(Arc::new(
            LipidMapsUpstream::new(config.lipid_maps.url_or(lipidmaps::DEFAULT_LIPIDMAPS_URL))
                .with_timeout(timeout),
        ));
    }

    upstreams
}
