//! Decides whether the overlay attaches to a page

use tracing::debug;
use url::Url;

use crate::config::OverlayConfig;
use crate::constants::gate::{LOCAL_HOSTS, TRUTHY_VALUES};

pub fn is_truthy(value: &str) -> bool {
    TRUTHY_VALUES.iter().any(|t| value.eq_ignore_ascii_case(t))
}

pub fn is_local_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| LOCAL_HOSTS.contains(&host))
}

/// Enable when forced on, when on a local host, or when the query parameter
/// is present with a truthy first value.
pub fn should_enable(config: &OverlayConfig, url: &Url) -> bool {
    if config.enabled_by_default {
        return true;
    }
    if config.enabled_on_localhost && is_local_host(url) {
        return true;
    }
    if config.enabled_on_param
        && let Some((_, value)) = url.query_pairs().find(|(name, _)| *name == config.query_param)
    {
        return is_truthy(&value);
    }
    false
}

/// [`should_enable`] for a raw page URL; unparsable URLs never enable
pub fn should_enable_for(config: &OverlayConfig, page_url: &str) -> bool {
    match Url::parse(page_url) {
        Ok(url) => should_enable(config, &url),
        Err(e) => {
            debug!(url = %page_url, error = %e, "Unparsable page URL, overlay disabled");
            false
        }
    }
}
