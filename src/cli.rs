use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use fauna::{ClientConfig, Scheme};
use reconcile::ResourceKind;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fauna-sync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative schema sync for FaunaDB", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the changes needed to match the manifest
    Diff(DiffArgs),

    /// Apply the manifest to the database
    Apply(ApplyArgs),

    /// Show or save the live schema
    Schema(SchemaArgs),

    /// Check a manifest offline and print fingerprints
    Validate {
        /// Manifest file (TOML or JSON)
        manifest: PathBuf,
    },

    /// Show the effective connection settings
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Connection
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Database secret
    #[arg(long, env = "FAUNA_SECRET", global = true, hide_env_values = true)]
    pub secret: Option<String>,

    /// Database domain, e.g. db.fauna.com
    #[arg(long, env = "FAUNA_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// Database port
    #[arg(long, env = "FAUNA_PORT", global = true)]
    pub port: Option<u16>,

    /// URL scheme
    #[arg(long, env = "FAUNA_SCHEME", global = true, value_enum)]
    pub scheme: Option<SchemeArg>,

    /// Request timeout in seconds
    #[arg(long, env = "FAUNA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Page size for schema listings
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Reuse connections between requests
    #[arg(long, global = true)]
    pub keep_alive: bool,
}

impl ConnectionArgs {
    /// Client configuration from flags, falling back to defaults. Not validated.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(
            self.secret.clone().unwrap_or_default(),
            self.domain.clone().unwrap_or_default(),
        )
        .keep_alive(self.keep_alive);

        if let Some(port) = self.port {
            config = config.port(port);
        }
        if let Some(scheme) = self.scheme {
            config = config.scheme(scheme.into());
        }
        if let Some(secs) = self.timeout {
            config = config.timeout(Duration::from_secs(secs));
        }
        if let Some(page_size) = self.page_size {
            config = config.page_size(page_size);
        }
        config
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SchemeArg {
    Http,
    Https,
}

impl From<SchemeArg> for Scheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Http => Self::Http,
            SchemeArg::Https => Self::Https,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Args)]
pub struct DiffArgs {
    /// Manifest file (TOML or JSON)
    pub manifest: PathBuf,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show actions for one kind (role, collection, function, index)
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<ResourceKind>,

    /// Diff against a saved schema dump instead of the live database (`--from-cache=FILE`)
    #[arg(long, value_name = "FILE", require_equals = true)]
    pub from_cache: Option<Option<PathBuf>>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Manifest file (TOML or JSON)
    pub manifest: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the plan without applying it
    #[arg(long)]
    pub dry_run: bool,

    /// Only apply actions for one kind
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<ResourceKind>,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Print the schema as JSON
    #[arg(long)]
    pub json: bool,

    /// Save the schema to a file, `--save=FILE` (default: the user cache directory)
    #[arg(long, value_name = "FILE", require_equals = true)]
    pub save: Option<Option<PathBuf>>,
}

fn parse_kind(s: &str) -> Result<ResourceKind, reconcile::Error> {
    s.parse()
}
