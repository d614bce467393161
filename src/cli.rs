//! CLI definition using clap

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::version::VersionSpec;

#[derive(Parser)]
#[command(name = "fastly")]
#[command(version)]
#[command(about = "Manage Fastly services from the command line")]
#[command(long_about = r#"
fastly - command line client for the Fastly API

Resources:
  service           Create, update, delete and inspect services
  service-version   Clone, activate, lock and stage service versions
  acl / acl-entry   Access control lists and their entries
  backend           Origin servers
  domain            Domains served by a service
  healthcheck       Backend health checks
  dictionary        Edge dictionaries and their entries
  kv-store          KV stores and their entries
  purge             Invalidate cached content

Setup:
  Set FASTLY_API_TOKEN (or pass --token). A .env file in the project
  directory is loaded automatically.
"#)]
#[command(after_help = r#"
Examples:

  Clone the active version and add a backend to the clone:
    fastly backend create -s SU1Z0isxPaozGVKXdv0eY --version active --autoclone \
      --name origin --address origin.example.com --port 443 --use-ssl

  List domains on the latest version as JSON:
    fastly domain list -s SU1Z0isxPaozGVKXdv0eY --version latest --json

  Purge everything:
    fastly purge --all -s SU1Z0isxPaozGVKXdv0eY
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub globals: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Render output as JSON
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Show extra information (service ID source, auto-clone notices)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fastly API token (default: FASTLY_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Fastly API endpoint (default: FASTLY_API_ENDPOINT or https://api.fastly.com)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// HTTP timeout in seconds (default: FASTLY_API_TIMEOUT or 60)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and inspect services
    Service(ServiceCommand),

    /// Manage service versions
    ServiceVersion(ServiceVersionCommand),

    /// Manage access control lists
    Acl(AclCommand),

    /// Manage ACL entries
    AclEntry(AclEntryCommand),

    /// Manage backends (origins)
    Backend(BackendCommand),

    /// Manage domains
    Domain(DomainCommand),

    /// Manage healthchecks
    Healthcheck(HealthcheckCommand),

    /// Manage edge dictionaries
    Dictionary(DictionaryCommand),

    /// Manage edge dictionary entries
    DictionaryEntry(DictionaryEntryCommand),

    /// Manage KV stores
    KvStore(KvStoreCommand),

    /// Manage KV store entries
    KvStoreEntry(KvStoreEntryCommand),

    /// Invalidate cached content
    Purge(PurgeArgs),
}

// ============ Shared arguments ============

/// Which service to operate on.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Service ID (default: FASTLY_SERVICE_ID, then service_id in fastly.toml)
    #[arg(short = 's', long = "service-id")]
    pub service_id: Option<String>,

    /// Service name, looked up through the API
    #[arg(long = "service-name")]
    pub service_name: Option<String>,
}

/// Service and version for commands that only read.
#[derive(Args, Debug, Clone)]
pub struct ReadTarget {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// 'latest', 'active', or the number of a specific version
    #[arg(long)]
    pub version: Option<VersionSpec>,
}

/// Service and version for commands that modify a version.
#[derive(Args, Debug, Clone)]
pub struct EditTarget {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// 'latest', 'active', or the number of a specific version
    #[arg(long)]
    pub version: Option<VersionSpec>,

    /// If the selected service version is not editable, clone it and use the clone
    #[arg(long)]
    pub autoclone: bool,
}

// ============ Service Commands ============

#[derive(Args)]
pub struct ServiceCommand {
    #[command(subcommand)]
    pub action: ServiceAction,
}

#[derive(Subcommand)]
pub enum ServiceAction {
    /// List services
    #[command(after_help = "Examples:
  fastly service list
  fastly service list --json")]
    List,

    /// Show service details and its versions
    #[command(after_help = "Examples:
  fastly service describe -s SU1Z0isxPaozGVKXdv0eY
  fastly service describe --service-name www.example.com")]
    Describe {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Find a service by name
    #[command(after_help = "Examples:
  fastly service search --name www.example.com")]
    Search {
        /// Service name
        #[arg(short, long)]
        name: String,
    },

    /// Create a service
    #[command(after_help = "Examples:
  fastly service create --name www.example.com
  fastly service create -n edge-app --type wasm --comment 'Compute app'")]
    Create {
        /// Service name
        #[arg(short, long)]
        name: String,

        /// Service type
        #[arg(long = "type", default_value = "vcl", value_parser = ["vcl", "wasm"])]
        service_type: String,

        /// Human-readable comment
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete a service
    #[command(after_help = "Examples:
  fastly service delete -s SU1Z0isxPaozGVKXdv0eY")]
    Delete {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Rename a service or change its comment
    #[command(after_help = "Examples:
  fastly service update -s SU1Z0isxPaozGVKXdv0eY --name www.example.org
  fastly service update -s SU1Z0isxPaozGVKXdv0eY --comment 'Production'")]
    Update {
        #[command(flatten)]
        service: ServiceArgs,

        /// New service name
        #[arg(short, long)]
        name: Option<String>,

        /// New comment
        #[arg(long)]
        comment: Option<String>,
    },
}

// ============ Service Version Commands ============

#[derive(Args)]
pub struct ServiceVersionCommand {
    #[command(subcommand)]
    pub action: ServiceVersionAction,
}

#[derive(Subcommand)]
pub enum ServiceVersionAction {
    /// List versions of a service
    List {
        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Clone a version
    #[command(after_help = "Examples:
  fastly service-version clone -s SU1Z0isxPaozGVKXdv0eY --version active")]
    Clone {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Activate a version
    #[command(after_help = "Examples:
  fastly service-version activate -s SU1Z0isxPaozGVKXdv0eY --version latest")]
    Activate {
        #[command(flatten)]
        target: EditTarget,
    },

    /// Deactivate the active version
    Deactivate {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Lock a version so it can no longer be edited
    Lock {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Update a version's comment
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Human-readable comment
        #[arg(long)]
        comment: String,
    },

    /// Deploy a version to the staging environment
    Stage {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Remove a version from the staging environment
    Unstage {
        #[command(flatten)]
        target: ReadTarget,
    },
}

// ============ ACL Commands ============

#[derive(Args)]
pub struct AclCommand {
    #[command(subcommand)]
    pub action: AclAction,
}

#[derive(Subcommand)]
pub enum AclAction {
    /// Create an ACL on a service version
    #[command(after_help = "Examples:
  fastly acl create -s SU1Z0isxPaozGVKXdv0eY --version latest --autoclone --name blocklist")]
    Create {
        #[command(flatten)]
        target: EditTarget,

        /// ACL name
        #[arg(short, long)]
        name: String,
    },

    /// Delete an ACL from a service version
    Delete {
        #[command(flatten)]
        target: EditTarget,

        /// ACL name
        #[arg(short, long)]
        name: String,
    },

    /// Show an ACL
    Describe {
        #[command(flatten)]
        target: ReadTarget,

        /// ACL name
        #[arg(short, long)]
        name: String,
    },

    /// List ACLs on a service version
    List {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Rename an ACL
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Current ACL name
        #[arg(short, long)]
        name: String,

        /// New ACL name
        #[arg(long)]
        new_name: String,
    },
}

// ============ ACL Entry Commands ============

#[derive(Args)]
pub struct AclEntryCommand {
    #[command(subcommand)]
    pub action: AclEntryAction,
}

/// Fields shared by `acl-entry create` and `acl-entry update`.
#[derive(Args, Debug, Clone)]
pub struct AclEntryFields {
    /// Prefix length (CIDR) of the entry
    #[arg(long)]
    pub subnet: Option<u8>,

    /// Match everything except this entry
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub negated: Option<bool>,

    /// Descriptive note
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Subcommand)]
pub enum AclEntryAction {
    /// Add an entry to an ACL
    #[command(after_help = "Examples:
  fastly acl-entry create -s SU1Z0isxPaozGVKXdv0eY --acl-id 6bYsh5Xe --ip 192.0.2.0 --subnet 24")]
    Create {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// IP address
        #[arg(long)]
        ip: String,

        #[command(flatten)]
        fields: AclEntryFields,
    },

    /// Remove an entry from an ACL
    Delete {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// Entry ID
        #[arg(long)]
        id: String,
    },

    /// Show an ACL entry
    Describe {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// Entry ID
        #[arg(long)]
        id: String,
    },

    /// List the entries of an ACL
    List {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,
    },

    /// Update an ACL entry
    Update {
        #[command(flatten)]
        service: ServiceArgs,

        /// ACL ID
        #[arg(long)]
        acl_id: String,

        /// Entry ID
        #[arg(long)]
        id: String,

        /// IP address
        #[arg(long)]
        ip: Option<String>,

        #[command(flatten)]
        fields: AclEntryFields,
    },
}

// ============ Backend Commands ============

#[derive(Args)]
pub struct BackendCommand {
    #[command(subcommand)]
    pub action: BackendAction,
}

/// Backend settings shared by create and update.
#[derive(Args, Debug, Clone)]
pub struct BackendFields {
    /// Port number of the address
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Descriptive note
    #[arg(long)]
    pub comment: Option<String>,

    /// Hostname to override the Host header
    #[arg(long)]
    pub override_host: Option<String>,

    /// Milliseconds to wait for a connection
    #[arg(long)]
    pub connect_timeout: Option<u32>,

    /// Milliseconds to wait for the first byte
    #[arg(long)]
    pub first_byte_timeout: Option<u32>,

    /// Milliseconds to wait between bytes
    #[arg(long)]
    pub between_bytes_timeout: Option<u32>,

    /// Maximum number of connections
    #[arg(long)]
    pub max_conn: Option<u32>,

    /// Connect to the backend over TLS
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub use_ssl: Option<bool>,

    /// Hostname to validate the certificate against
    #[arg(long)]
    pub ssl_cert_hostname: Option<String>,

    /// Hostname for SNI
    #[arg(long)]
    pub ssl_sni_hostname: Option<String>,

    /// Name of the healthcheck to use
    #[arg(long)]
    pub healthcheck: Option<String>,

    /// POP to use as a shield
    #[arg(long)]
    pub shield: Option<String>,

    /// Load balancing weight
    #[arg(long)]
    pub weight: Option<u32>,

    /// Include in automatic load balancing
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub auto_loadbalance: Option<bool>,

    /// Condition that selects this backend
    #[arg(long)]
    pub request_condition: Option<String>,
}

#[derive(Subcommand)]
pub enum BackendAction {
    /// Create a backend on a service version
    #[command(after_help = "Examples:
  fastly backend create -s SU1Z0isxPaozGVKXdv0eY --version 3 --name origin --address origin.example.com --port 443 --use-ssl")]
    Create {
        #[command(flatten)]
        target: EditTarget,

        /// Backend name
        #[arg(short, long)]
        name: String,

        /// Hostname or IP address
        #[arg(long)]
        address: String,

        #[command(flatten)]
        fields: BackendFields,
    },

    /// Delete a backend
    Delete {
        #[command(flatten)]
        target: EditTarget,

        /// Backend name
        #[arg(short, long)]
        name: String,
    },

    /// Show a backend
    Describe {
        #[command(flatten)]
        target: ReadTarget,

        /// Backend name
        #[arg(short, long)]
        name: String,
    },

    /// List backends on a service version
    List {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Update a backend
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Backend name
        #[arg(short, long)]
        name: String,

        /// New backend name
        #[arg(long)]
        new_name: Option<String>,

        /// Hostname or IP address
        #[arg(long)]
        address: Option<String>,

        #[command(flatten)]
        fields: BackendFields,
    },
}

// ============ Domain Commands ============

#[derive(Args)]
pub struct DomainCommand {
    #[command(subcommand)]
    pub action: DomainAction,
}

#[derive(Subcommand)]
pub enum DomainAction {
    /// Add a domain to a service version
    #[command(after_help = "Examples:
  fastly domain create -s SU1Z0isxPaozGVKXdv0eY --version latest --autoclone --name www.example.com")]
    Create {
        #[command(flatten)]
        target: EditTarget,

        /// Domain name
        #[arg(short, long)]
        name: String,

        /// Descriptive note
        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove a domain
    Delete {
        #[command(flatten)]
        target: EditTarget,

        /// Domain name
        #[arg(short, long)]
        name: String,
    },

    /// Show a domain
    Describe {
        #[command(flatten)]
        target: ReadTarget,

        /// Domain name
        #[arg(short, long)]
        name: String,
    },

    /// List domains on a service version
    List {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Update a domain
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Domain name
        #[arg(short, long)]
        name: String,

        /// New domain name
        #[arg(long)]
        new_name: Option<String>,

        /// Descriptive note
        #[arg(long)]
        comment: Option<String>,
    },
}

// ============ Healthcheck Commands ============

#[derive(Args)]
pub struct HealthcheckCommand {
    #[command(subcommand)]
    pub action: HealthcheckAction,
}

/// Healthcheck settings shared by create and update.
#[derive(Args, Debug, Clone)]
pub struct HealthcheckFields {
    /// Descriptive note
    #[arg(long)]
    pub comment: Option<String>,

    /// Which HTTP method to use
    #[arg(long)]
    pub method: Option<String>,

    /// Which host to check
    #[arg(long)]
    pub host: Option<String>,

    /// The path to check
    #[arg(long)]
    pub path: Option<String>,

    /// Whether to use version 1.0 or 1.1 HTTP
    #[arg(long)]
    pub http_version: Option<String>,

    /// Timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u32>,

    /// How often to run the healthcheck in milliseconds
    #[arg(long)]
    pub check_interval: Option<u32>,

    /// The status code expected from the host
    #[arg(long)]
    pub expected_response: Option<u32>,

    /// Number of most recent healthcheck queries to keep
    #[arg(long)]
    pub window: Option<u32>,

    /// How many healthchecks must succeed to be considered healthy
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Initial number of probes to be seen as OK when loading a config
    #[arg(long)]
    pub initial: Option<u32>,
}

#[derive(Subcommand)]
pub enum HealthcheckAction {
    /// Create a healthcheck on a service version
    #[command(after_help = "Examples:
  fastly healthcheck create -s SU1Z0isxPaozGVKXdv0eY --version 3 --name root --host www.example.com --path /status")]
    Create {
        #[command(flatten)]
        target: EditTarget,

        /// Healthcheck name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        fields: HealthcheckFields,
    },

    /// Delete a healthcheck
    Delete {
        #[command(flatten)]
        target: EditTarget,

        /// Healthcheck name
        #[arg(short, long)]
        name: String,
    },

    /// Show a healthcheck
    Describe {
        #[command(flatten)]
        target: ReadTarget,

        /// Healthcheck name
        #[arg(short, long)]
        name: String,
    },

    /// List healthchecks on a service version
    List {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Update a healthcheck
    #[command(after_help = "Examples:
  fastly healthcheck update -s SU1Z0isxPaozGVKXdv0eY --version active --autoclone --name root --threshold 2")]
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Healthcheck name
        #[arg(short, long)]
        name: String,

        /// New healthcheck name
        #[arg(long)]
        new_name: Option<String>,

        #[command(flatten)]
        fields: HealthcheckFields,
    },
}

// ============ Dictionary Commands ============

#[derive(Args)]
pub struct DictionaryCommand {
    #[command(subcommand)]
    pub action: DictionaryAction,
}

#[derive(Subcommand)]
pub enum DictionaryAction {
    /// Create a dictionary on a service version
    Create {
        #[command(flatten)]
        target: EditTarget,

        /// Dictionary name
        #[arg(short, long)]
        name: String,

        /// Hide item values from the API and UI
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        write_only: Option<bool>,
    },

    /// Delete a dictionary
    Delete {
        #[command(flatten)]
        target: EditTarget,

        /// Dictionary name
        #[arg(short, long)]
        name: String,
    },

    /// Show a dictionary
    Describe {
        #[command(flatten)]
        target: ReadTarget,

        /// Dictionary name
        #[arg(short, long)]
        name: String,
    },

    /// List dictionaries on a service version
    List {
        #[command(flatten)]
        target: ReadTarget,
    },

    /// Update a dictionary
    Update {
        #[command(flatten)]
        target: EditTarget,

        /// Dictionary name
        #[arg(short, long)]
        name: String,

        /// New dictionary name
        #[arg(long)]
        new_name: Option<String>,

        /// Hide item values from the API and UI
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        write_only: Option<bool>,
    },
}

// ============ Dictionary Entry Commands ============

#[derive(Args)]
pub struct DictionaryEntryCommand {
    #[command(subcommand)]
    pub action: DictionaryEntryAction,
}

#[derive(Subcommand)]
pub enum DictionaryEntryAction {
    /// Add an item to a dictionary
    #[command(after_help = "Examples:
  fastly dictionary-entry create -s SU1Z0isxPaozGVKXdv0eY --dictionary-id 5clCytcTJrnvPi --key region --value eu-west")]
    Create {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Item key
        #[arg(long)]
        key: String,

        /// Item value
        #[arg(long)]
        value: String,
    },

    /// Remove an item from a dictionary
    Delete {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Item key
        #[arg(long)]
        key: String,
    },

    /// Show a dictionary item
    Describe {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Item key
        #[arg(long)]
        key: String,
    },

    /// List the items of a dictionary
    List {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,
    },

    /// Change a dictionary item's value
    Update {
        #[command(flatten)]
        service: ServiceArgs,

        /// Dictionary ID
        #[arg(long)]
        dictionary_id: String,

        /// Item key
        #[arg(long)]
        key: String,

        /// New item value
        #[arg(long)]
        value: String,
    },
}

// ============ KV Store Commands ============

#[derive(Args)]
pub struct KvStoreCommand {
    #[command(subcommand)]
    pub action: KvStoreAction,
}

#[derive(Subcommand)]
pub enum KvStoreAction {
    /// Create a KV store
    #[command(after_help = "Examples:
  fastly kv-store create --name assets")]
    Create {
        /// Store name
        #[arg(short, long)]
        name: String,
    },

    /// Delete a KV store
    Delete {
        /// Store ID
        #[arg(long)]
        store_id: String,
    },

    /// Show a KV store
    Describe {
        /// Store ID
        #[arg(long)]
        store_id: String,
    },

    /// List KV stores
    List,
}

// ============ KV Store Entry Commands ============

#[derive(Args)]
pub struct KvStoreEntryCommand {
    #[command(subcommand)]
    pub action: KvStoreEntryAction,
}

#[derive(Subcommand)]
pub enum KvStoreEntryAction {
    /// Insert or replace a key
    #[command(after_help = "Examples:
  fastly kv-store-entry create --store-id 7hHoqcnTwTCQhoA --key greeting --value 'hello world'")]
    Create {
        /// Store ID
        #[arg(long)]
        store_id: String,

        /// Key
        #[arg(short, long)]
        key: String,

        /// Value
        #[arg(long)]
        value: String,
    },

    /// Delete a key
    Delete {
        /// Store ID
        #[arg(long)]
        store_id: String,

        /// Key
        #[arg(short, long)]
        key: String,
    },

    /// Print the value of a key
    Describe {
        /// Store ID
        #[arg(long)]
        store_id: String,

        /// Key
        #[arg(short, long)]
        key: String,
    },

    /// List keys in a store
    List {
        /// Store ID
        #[arg(long)]
        store_id: String,
    },
}

// ============ Purge ============

#[derive(Args)]
#[command(group(ArgGroup::new("purge_target").required(true).args(["all", "file", "key", "url"])))]
#[command(after_help = "Examples:
  fastly purge --all -s SU1Z0isxPaozGVKXdv0eY
  fastly purge --key product-1234 --soft -s SU1Z0isxPaozGVKXdv0eY
  fastly purge --file ./keys.txt -s SU1Z0isxPaozGVKXdv0eY
  fastly purge --url https://www.example.com/images/logo.png")]
pub struct PurgeArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Purge everything cached for the service (cannot be combined with --soft)
    #[arg(long)]
    pub all: bool,

    /// Purge the surrogate keys listed in a file, one per line
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Purge by surrogate key
    #[arg(long)]
    pub key: Option<String>,

    /// Purge a single URL
    #[arg(long)]
    pub url: Option<String>,

    /// Mark content as stale instead of removing it
    #[arg(long)]
    pub soft: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_version_and_autoclone() {
        let cli = Cli::try_parse_from([
            "fastly", "acl", "create", "-s", "abc", "--version", "active", "--autoclone", "--name", "blocklist",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Acl(AclCommand {
                action: AclAction::Create { target, name },
            })) => {
                assert_eq!(target.service.service_id.as_deref(), Some("abc"));
                assert_eq!(target.version, Some(VersionSpec::Active));
                assert!(target.autoclone);
                assert_eq!(name, "blocklist");
            }
            _ => panic!("expected acl create"),
        }
    }

    #[test]
    fn version_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["fastly", "backend", "list", "-s", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Backend(BackendCommand {
                action: BackendAction::List { target },
            })) => assert_eq!(target.version, None),
            _ => panic!("expected backend list"),
        }
    }

    #[test]
    fn rejects_bad_version() {
        assert!(Cli::try_parse_from(["fastly", "domain", "list", "--version", "0"]).is_err());
    }

    #[test]
    fn bare_bool_flag_means_true() {
        let cli = Cli::try_parse_from([
            "fastly", "backend", "update", "--version", "2", "--name", "origin", "--use-ssl", "--port", "443",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Backend(BackendCommand {
                action: BackendAction::Update { fields, .. },
            })) => {
                assert_eq!(fields.use_ssl, Some(true));
                assert_eq!(fields.port, Some(443));
                assert_eq!(fields.auto_loadbalance, None);
            }
            _ => panic!("expected backend update"),
        }
    }

    #[test]
    fn purge_needs_exactly_one_target() {
        assert!(Cli::try_parse_from(["fastly", "purge"]).is_err());
        assert!(Cli::try_parse_from(["fastly", "purge", "--all", "--key", "k"]).is_err());
        assert!(Cli::try_parse_from(["fastly", "purge", "--key", "k", "--soft"]).is_ok());
        assert!(Cli::try_parse_from(["fastly", "purge", "--file", "keys.txt", "--key", "k"]).is_err());
    }

    #[test]
    fn service_create_defaults_to_vcl() {
        let cli = Cli::try_parse_from(["fastly", "service", "create", "-n", "Foo"]).unwrap();
        match cli.command {
            Some(Commands::Service(ServiceCommand {
                action: ServiceAction::Create { name, service_type, comment },
            })) => {
                assert_eq!(name, "Foo");
                assert_eq!(service_type, "vcl");
                assert_eq!(comment, None);
            }
            _ => panic!("expected service create"),
        }
        assert!(Cli::try_parse_from(["fastly", "service", "create"]).is_err());
        assert!(Cli::try_parse_from(["fastly", "service", "create", "-n", "Foo", "--type", "edge"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fastly", "kv-store", "list", "--json", "-v"]).unwrap();
        assert!(cli.globals.json);
        assert!(cli.globals.verbose);
    }
}
