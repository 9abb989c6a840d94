//! Option resolution: built-in defaults, config-file pass, CLI pass, seal.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::path::PathBuf;

use tracing::debug;

use crate::cli::LoaderArgs;
use crate::config::{self, ClientEncryption, Config, ServerEncryption};
use crate::error::LoaderError;
use crate::hosts::{resolve_list, HostResolver};
use crate::validate;

/// Default port for native-protocol client connections.
pub const DEFAULT_NATIVE_PORT: u16 = 9042;

/// Immutable, fully-validated options for one bulk-load run.
///
/// Produced once by [`resolve`]; the streaming engine trusts every field
/// without re-validating. On the sealed value the host set is non-empty,
/// the directory exists and is a directory, all ports are positive and
/// `connections_per_host` is at least 1.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub directory: PathBuf,
    pub debug: bool,
    pub verbose: bool,
    pub no_progress: bool,
    pub native_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Outbound cap in Mbit/s; 0 means unlimited.
    pub throttle_mbits: u32,
    pub storage_port: u16,
    pub ssl_storage_port: u16,
    pub client_encryption: ClientEncryption,
    pub server_encryption: ServerEncryption,
    pub connections_per_host: u32,
    pub hosts: BTreeSet<IpAddr>,
    pub ignores: BTreeSet<IpAddr>,
}

/// Run the whole resolution pipeline.
///
/// Stages run strictly in order — arity and directory checks, host and
/// ignore-list resolution, config-file load, the two merge passes, then
/// sealing — and each stage is terminal on failure: no partial options
/// value is ever produced.
pub fn resolve(
    args: &LoaderArgs,
    resolver: &dyn HostResolver,
) -> Result<LoaderOptions, LoaderError> {
    let directory = validate::target_directory(&args.dir)?;
    debug!(directory = %directory.display(), "validated data directory");

    let hosts = match args.nodes.as_deref() {
        Some(list) => resolve_list(list, resolver)?,
        None => BTreeSet::new(),
    };
    if hosts.is_empty() {
        return Err(LoaderError::Usage("Initial hosts must be specified (-d)".to_string()));
    }
    let ignores = match args.ignore.as_deref() {
        Some(list) => resolve_list(list, resolver)?,
        None => BTreeSet::new(),
    };
    debug!(hosts = hosts.len(), ignores = ignores.len(), "resolved host lists");

    let config = config::load_config(args.conf_path.as_deref())?;

    OptionsBuilder::new(directory, hosts, ignores)
        .apply_config(config)
        .apply_cli(args)
        .build()
}

/// Mutable accumulator for the merge passes.
///
/// Created once per invocation, threaded through `apply_config` and
/// `apply_cli`, sealed by [`OptionsBuilder::build`] and discarded.
struct OptionsBuilder {
    directory: PathBuf,
    debug: bool,
    verbose: bool,
    no_progress: bool,
    native_port: u16,
    username: Option<String>,
    password: Option<String>,
    throttle_mbits: u32,
    storage_port: u16,
    ssl_storage_port: u16,
    client_encryption: ClientEncryption,
    server_encryption: ServerEncryption,
    connections_per_host: u32,
    hosts: BTreeSet<IpAddr>,
    ignores: BTreeSet<IpAddr>,
}

impl OptionsBuilder {
    fn new(directory: PathBuf, hosts: BTreeSet<IpAddr>, ignores: BTreeSet<IpAddr>) -> Self {
        Self {
            directory,
            debug: false,
            verbose: false,
            no_progress: false,
            native_port: DEFAULT_NATIVE_PORT,
            username: None,
            password: None,
            throttle_mbits: 0,
            storage_port: 0,
            ssl_storage_port: 0,
            client_encryption: ClientEncryption::default(),
            server_encryption: ServerEncryption::default(),
            connections_per_host: 1,
            hosts,
            ignores,
        }
    }

    /// Apply the config-file layer. Runs unconditionally: with no config
    /// file the record is `Config::default()`, so storage ports and
    /// throttle always come from this pass.
    fn apply_config(mut self, config: Config) -> Self {
        self.storage_port = config.storage_port;
        self.ssl_storage_port = config.ssl_storage_port;
        self.throttle_mbits = config.stream_throughput_outbound_megabits_per_sec;
        self.client_encryption = config.client_encryption_options;
        self.server_encryption = config.server_encryption_options;
        self
    }

    /// Apply explicit command-line flags over the config layer.
    ///
    /// Each flag is applied only if present, in a fixed order — port,
    /// user, password, throttle, then the SSL sub-fields — not argv
    /// order. Providing a keystore also turns on client authentication.
    fn apply_cli(mut self, args: &LoaderArgs) -> Self {
        self.debug = args.debug;
        self.verbose = args.verbose;
        self.no_progress = args.no_progress;
        if let Some(cph) = args.connections_per_host {
            self.connections_per_host = cph;
        }

        if let Some(port) = args.port {
            self.native_port = port;
        }
        if let Some(user) = &args.username {
            self.username = Some(user.clone());
        }
        if let Some(password) = &args.password {
            self.password = Some(password.clone());
        }
        if let Some(throttle) = args.throttle {
            self.throttle_mbits = throttle;
        }
        if let Some(path) = &args.truststore {
            self.client_encryption.truststore = Some(path.clone());
        }
        if let Some(password) = &args.truststore_password {
            self.client_encryption.truststore_password = Some(password.clone());
        }
        if let Some(path) = &args.keystore {
            self.client_encryption.keystore = Some(path.clone());
            // A keystore means the loader will authenticate itself.
            self.client_encryption.require_client_auth = true;
        }
        if let Some(password) = &args.keystore_password {
            self.client_encryption.keystore_password = Some(password.clone());
        }
        if let Some(protocol) = &args.ssl_protocol {
            self.client_encryption.protocol = protocol.clone();
        }
        if let Some(algorithm) = &args.ssl_alg {
            self.client_encryption.algorithm = algorithm.clone();
        }
        if let Some(store_type) = &args.store_type {
            self.client_encryption.store_type = store_type.clone();
        }
        if let Some(ciphers) = &args.ssl_ciphers {
            // Cipher lists split verbatim; only host lists trim.
            self.client_encryption.cipher_suites =
                ciphers.split(',').map(str::to_string).collect();
        }
        self
    }

    /// Seal the accumulator. The invariants on [`LoaderOptions`] are
    /// enforced here and nowhere else; the error class follows the
    /// offending field's provenance.
    fn build(self) -> Result<LoaderOptions, LoaderError> {
        if self.hosts.is_empty() {
            return Err(LoaderError::Usage("Initial hosts must be specified (-d)".to_string()));
        }
        if self.native_port == 0 {
            return Err(LoaderError::Usage("Native port must be positive".to_string()));
        }
        if self.connections_per_host < 1 {
            return Err(LoaderError::Usage(
                "connections-per-host must be at least 1".to_string(),
            ));
        }
        // Storage ports have no CLI flag; a zero here came from the config layer.
        if self.storage_port == 0 || self.ssl_storage_port == 0 {
            return Err(LoaderError::Configuration(
                "Storage ports must be positive".to_string(),
            ));
        }

        Ok(LoaderOptions {
            directory: self.directory,
            debug: self.debug,
            verbose: self.verbose,
            no_progress: self.no_progress,
            native_port: self.native_port,
            username: self.username,
            password: self.password,
            throttle_mbits: self.throttle_mbits,
            storage_port: self.storage_port,
            ssl_storage_port: self.ssl_storage_port,
            client_encryption: self.client_encryption,
            server_encryption: self.server_encryption,
            connections_per_host: self.connections_per_host,
            hosts: self.hosts,
            ignores: self.ignores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Resolves IP literals only; any other token fails. Keeps every test
    /// away from the real name service.
    struct LiteralResolver;

    impl HostResolver for LiteralResolver {
        fn resolve(&self, name: &str) -> io::Result<IpAddr> {
            name.parse()
                .map_err(|_| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    fn parse(args: &[&str]) -> LoaderArgs {
        let mut argv = vec!["bulkloader"];
        argv.extend_from_slice(args);
        LoaderArgs::try_parse_from(argv).expect("test argv must parse")
    }

    fn resolve_in(dir: &TempDir, args: &[&str]) -> Result<LoaderOptions, LoaderError> {
        let dir_path = dir.path().to_str().expect("utf8 path").to_string();
        let mut argv: Vec<&str> = args.to_vec();
        argv.push(&dir_path);
        resolve(&parse(&argv), &LiteralResolver)
    }

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = TempDir::new().expect("tmp");
        let options = resolve_in(&tmp, &["-d", "10.0.0.1"]).expect("options");

        assert_eq!(options.native_port, 9042);
        assert_eq!(options.storage_port, 7000);
        assert_eq!(options.ssl_storage_port, 7001);
        assert_eq!(options.throttle_mbits, 0);
        assert_eq!(options.connections_per_host, 1);
        assert!(options.username.is_none());
        assert!(options.ignores.is_empty());
        assert!(!options.client_encryption.enabled);
        assert!(!options.client_encryption.require_client_auth);
    }

    #[test]
    fn test_throttle_and_hosts_example() {
        let tmp = TempDir::new().expect("tmp");
        let options =
            resolve_in(&tmp, &["-d", "10.0.0.1, 10.0.0.2", "-t", "50"]).expect("options");

        assert_eq!(options.throttle_mbits, 50);
        assert_eq!(options.storage_port, 7000);
        let hosts: Vec<String> = options.hosts.iter().map(|h| h.to_string()).collect();
        assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.2"]);
        assert_eq!(options.directory, tmp.path());
    }

    #[test]
    fn test_missing_nodes_flag_is_usage_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = resolve_in(&tmp, &[]).expect_err("must fail");
        assert!(matches!(err, LoaderError::Usage(msg) if msg.contains("Initial hosts")));
    }

    #[test]
    fn test_nodes_flag_with_only_separators_is_usage_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = resolve_in(&tmp, &["-d", " , "]).expect_err("must fail");
        assert!(matches!(err, LoaderError::Usage(msg) if msg.contains("Initial hosts")));
    }

    #[test]
    fn test_unresolvable_host_aborts_in_either_list() {
        let tmp = TempDir::new().expect("tmp");

        let err = resolve_in(&tmp, &["-d", "10.0.0.1,badhost"]).expect_err("must fail");
        assert!(matches!(err, LoaderError::AddressResolution(token) if token == "badhost"));

        let err = resolve_in(&tmp, &["-d", "10.0.0.1", "-i", "badhost,10.0.0.9"])
            .expect_err("must fail");
        assert!(matches!(err, LoaderError::AddressResolution(token) if token == "badhost"));
    }

    #[test]
    fn test_config_file_values_apply() {
        let tmp = TempDir::new().expect("tmp");
        let conf = tmp.path().join("cluster.yaml");
        fs::write(
            &conf,
            concat!(
                "storage_port: 7100\n",
                "ssl_storage_port: 7111\n",
                "stream_throughput_outbound_megabits_per_sec: 200\n",
            ),
        )
        .expect("write");
        let conf_path = conf.to_str().expect("utf8 path");

        let options =
            resolve_in(&tmp, &["-d", "10.0.0.1", "-f", conf_path]).expect("options");
        assert_eq!(options.storage_port, 7100);
        assert_eq!(options.ssl_storage_port, 7111);
        assert_eq!(options.throttle_mbits, 200);
    }

    #[test]
    fn test_cli_throttle_beats_config_in_both_argv_orders() {
        let tmp = TempDir::new().expect("tmp");
        let conf = tmp.path().join("cluster.yaml");
        fs::write(&conf, "stream_throughput_outbound_megabits_per_sec: 200\n").expect("write");
        let conf_path = conf.to_str().expect("utf8 path");

        let first = resolve_in(&tmp, &["-t", "50", "-f", conf_path, "-d", "10.0.0.1"])
            .expect("options");
        assert_eq!(first.throttle_mbits, 50);

        let second = resolve_in(&tmp, &["-f", conf_path, "-d", "10.0.0.1", "-t", "50"])
            .expect("options");
        assert_eq!(second.throttle_mbits, 50);
    }

    #[test]
    fn test_keystore_implies_client_auth() {
        let tmp = TempDir::new().expect("tmp");
        let options =
            resolve_in(&tmp, &["--keystore", "/etc/keystore", "-d", "10.0.0.1"])
                .expect("options");

        assert_eq!(options.client_encryption.keystore.as_deref(), Some("/etc/keystore"));
        assert!(options.client_encryption.require_client_auth);
    }

    #[test]
    fn test_keystore_alias_implies_client_auth() {
        let tmp = TempDir::new().expect("tmp");
        let options =
            resolve_in(&tmp, &["--ks", "/etc/keystore", "-d", "10.0.0.1"]).expect("options");
        assert!(options.client_encryption.require_client_auth);
    }

    #[test]
    fn test_cli_ssl_fields_override_config() {
        let tmp = TempDir::new().expect("tmp");
        let conf = tmp.path().join("cluster.yaml");
        fs::write(
            &conf,
            concat!(
                "client_encryption_options:\n",
                "  enabled: true\n",
                "  truststore: /from/config\n",
                "  protocol: TLSv1.1\n",
            ),
        )
        .expect("write");
        let conf_path = conf.to_str().expect("utf8 path");

        let options = resolve_in(
            &tmp,
            &[
                "-d",
                "10.0.0.1",
                "-f",
                conf_path,
                "--truststore",
                "/from/cli",
                "--ssl-protocol",
                "TLSv1.2",
            ],
        )
        .expect("options");

        let client = &options.client_encryption;
        // The config layer still supplies what the CLI left alone.
        assert!(client.enabled);
        assert_eq!(client.truststore.as_deref(), Some("/from/cli"));
        assert_eq!(client.protocol, "TLSv1.2");
    }

    #[test]
    fn test_cipher_suites_split_without_trimming() {
        let tmp = TempDir::new().expect("tmp");
        let options = resolve_in(
            &tmp,
            &["-d", "10.0.0.1", "--ssl-ciphers", "SUITE_A, SUITE_B"],
        )
        .expect("options");

        assert_eq!(options.client_encryption.cipher_suites, vec!["SUITE_A", " SUITE_B"]);
    }

    #[test]
    fn test_username_password_and_port() {
        let tmp = TempDir::new().expect("tmp");
        let options = resolve_in(
            &tmp,
            &["-d", "10.0.0.1", "-u", "loader", "--pw", "secret", "-p", "9142"],
        )
        .expect("options");

        assert_eq!(options.username.as_deref(), Some("loader"));
        assert_eq!(options.password.as_deref(), Some("secret"));
        assert_eq!(options.native_port, 9142);
    }

    #[test]
    fn test_connections_per_host_zero_is_usage_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = resolve_in(&tmp, &["-d", "10.0.0.1", "--cph", "0"]).expect_err("must fail");
        assert!(matches!(err, LoaderError::Usage(msg) if msg.contains("connections-per-host")));
    }

    #[test]
    fn test_native_port_zero_is_usage_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = resolve_in(&tmp, &["-d", "10.0.0.1", "-p", "0"]).expect_err("must fail");
        assert!(matches!(err, LoaderError::Usage(msg) if msg.contains("Native port")));
    }

    #[test]
    fn test_zero_storage_port_from_config_is_configuration_error() {
        let tmp = TempDir::new().expect("tmp");
        let conf = tmp.path().join("cluster.yaml");
        fs::write(&conf, "storage_port: 0\n").expect("write");
        let conf_path = conf.to_str().expect("utf8 path");

        let err = resolve_in(&tmp, &["-d", "10.0.0.1", "-f", conf_path]).expect_err("must fail");
        assert!(matches!(err, LoaderError::Configuration(msg) if msg.contains("Storage ports")));
    }

    #[test]
    fn test_directory_validation_precedes_host_resolution() {
        let tmp = TempDir::new().expect("tmp");
        let absent = tmp.path().join("absent");
        let absent_path = absent.to_str().expect("utf8 path");

        // "badhost" would abort resolution, but the directory check runs first.
        let args = parse(&["-d", "badhost", absent_path]);
        let err = resolve(&args, &LiteralResolver).expect_err("must fail");
        assert!(matches!(err, LoaderError::Validation(msg) if msg.contains("Unknown directory")));
    }

    #[test]
    fn test_ignore_list_resolves_into_separate_set() {
        let tmp = TempDir::new().expect("tmp");
        let options = resolve_in(&tmp, &["-d", "10.0.0.1,10.0.0.2", "-i", "10.0.0.2"])
            .expect("options");

        assert_eq!(options.hosts.len(), 2);
        assert_eq!(options.ignores.len(), 1);
        assert!(options.ignores.contains(&"10.0.0.2".parse::<IpAddr>().expect("ip")));
    }
}
