//! Resolved-plan report printed after the options value is sealed.

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::options::LoaderOptions;

pub fn print_plan(options: &LoaderOptions) {
    println!("Data directory: {}", options.directory.display());
    println!("Initial hosts: {}", join_hosts(&options.hosts));
    if !options.ignores.is_empty() {
        println!("Ignored hosts: {}", join_hosts(&options.ignores));
    }
    println!("Native port: {}", options.native_port);
    println!("Storage port: {}", options.storage_port);
    println!("SSL storage port: {}", options.ssl_storage_port);
    if options.throttle_mbits == 0 {
        println!("Throttle: unlimited");
    } else {
        println!("Throttle: {} Mbit/s", options.throttle_mbits);
    }
    println!("Connections per host: {}", options.connections_per_host);
    if let Some(username) = &options.username {
        println!("Authenticating as: {}", username);
    }

    let client = &options.client_encryption;
    let state = if client.enabled { "enabled" } else { "disabled" };
    if client.require_client_auth {
        println!("Client encryption: {state}, client auth required");
    } else {
        println!("Client encryption: {state}");
    }
}

fn join_hosts(hosts: &BTreeSet<IpAddr>) -> String {
    hosts.iter().map(IpAddr::to_string).collect::<Vec<_>>().join(", ")
}
