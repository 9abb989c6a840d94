//! Host-list parsing and address resolution.

use std::collections::BTreeSet;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};

use crate::error::LoaderError;

/// Name-service lookup seam.
///
/// Production code uses [`DnsResolver`]; tests inject a deterministic
/// implementation so they never perform a real lookup.
pub trait HostResolver {
    fn resolve(&self, name: &str) -> io::Result<IpAddr>;
}

/// Resolver backed by the operating system name service.
pub struct DnsResolver;

impl HostResolver for DnsResolver {
    fn resolve(&self, name: &str) -> io::Result<IpAddr> {
        // IP literals skip the name-service round trip.
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(ip);
        }
        (name, 0u16)
            .to_socket_addrs()?
            .next()
            .map(|addr| addr.ip())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no address for {name}"))
            })
    }
}

/// Split a comma-separated host list, trim each token and resolve it.
///
/// Fail-fast: the first unresolvable token aborts the whole call with the
/// offending token named; no partial set is returned. Empty tokens are
/// discarded, so a caller passing only separators gets an empty set back.
pub fn resolve_list(
    list: &str,
    resolver: &dyn HostResolver,
) -> Result<BTreeSet<IpAddr>, LoaderError> {
    let mut addrs = BTreeSet::new();
    for token in list.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let addr = resolver
            .resolve(token)
            .map_err(|_| LoaderError::AddressResolution(token.to_string()))?;
        addrs.insert(addr);
    }
    Ok(addrs)
}
