use iamcred_core::{Error, Result};
use log::debug;
use std::net::IpAddr;
use url::{Host, Url};

/// Check that every address `uri`'s host resolves to is a loopback address.
///
/// IP literals are checked directly, domains are resolved through the
/// system resolver. Returns an error when the uri has no host or the host
/// cannot be resolved.
pub async fn is_loopback(uri: &str) -> Result<bool> {
    let url = Url::parse(uri).map_err(|e| {
        Error::config_invalid("failed to parse uri")
            .with_source(e)
            .with_context(format!("uri: {uri}"))
    })?;

    let host = match url.host() {
        Some(Host::Ipv4(ip)) => return Ok(is_loopback_ip(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => return Ok(is_loopback_ip(IpAddr::V6(ip))),
        Some(Host::Domain(d)) if !d.is_empty() => d,
        _ => {
            return Err(Error::config_invalid("uri has no host").with_context(format!("uri: {uri}")))
        }
    };

    let port = url.port_or_known_default().unwrap_or(80);
    let addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        Error::config_invalid("failed to resolve uri host")
            .with_source(e)
            .with_context(format!("host: {host}"))
    })?;

    let mut resolved = false;
    for addr in addrs {
        resolved = true;
        if !is_loopback_ip(addr.ip()) {
            debug!("host {host} resolves to non-loopback address {}", addr.ip());
            return Ok(false);
        }
    }
    if !resolved {
        return Err(
            Error::config_invalid("uri host resolves to no address").with_context(format!("host: {host}"))
        );
    }

    Ok(true)
}

fn is_loopback_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => ip.is_loopback(),
        IpAddr::V6(ip) => ip.is_loopback() || ip.to_ipv4_mapped().is_some_and(|v| v.is_loopback()),
    }
}
