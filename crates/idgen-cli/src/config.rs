use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use idgen::{IdConfig, MAX_NODE_ID, NodeIdSource};

/// Mint, encode, decode and inspect identifiers.
///
/// Generated values are written to stdout, one per line. Logs go to stderr
/// and follow `RUST_LOG` (default `info`).
#[derive(Parser, Debug, Clone)]
#[command(name = "idgen", version, about = "Snowflake and UUID v7 identifiers")]
pub struct CliArgs {
    /// Where the Snowflake node ID comes from.
    ///
    /// `network` derives it from the first non-loopback IPv4 address and falls
    /// back to `random`. `fixed` takes it from `NODE_ID`.
    ///
    /// Environment variable: `NODE_ID_SOURCE`
    #[arg(long, env = "NODE_ID_SOURCE", value_enum, default_value_t = NodeSourceKind::Network, global = true)]
    pub node_id_source: NodeSourceKind,

    /// Node ID used when `NODE_ID_SOURCE` is `fixed`, in `0..=511`.
    ///
    /// Environment variable: `NODE_ID`
    #[arg(long, env = "NODE_ID", global = true)]
    pub node_id: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSourceKind {
    Network,
    Random,
    Fixed,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate Snowflake IDs.
    Snowflake {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Print Base62 instead of decimal.
        #[arg(long)]
        base62: bool,
    },
    /// Generate UUID v7 values.
    Uuid {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Print 32 hex characters without hyphens.
        #[arg(long, conflicts_with = "base62")]
        dashless: bool,
        /// Print Base62 instead of hex.
        #[arg(long)]
        base62: bool,
    },
    /// Base62-encode a positive decimal ID.
    Encode { value: i64 },
    /// Decode a Base62 string into a decimal ID.
    Decode { encoded: String },
    /// Base62-encode a UUID.
    EncodeUuid { uuid: String },
    /// Decode a Base62 string into a hyphenated UUID.
    DecodeUuid { encoded: String },
    /// Print the shard label of an identifier.
    Shard {
        id: String,
        /// Print `<label>/<id>` instead of the bare label.
        #[arg(long)]
        path: bool,
    },
    /// Print the fields of a Snowflake ID given in decimal or Base62.
    Inspect { id: String },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub id: IdConfig,
    pub command: Command,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let node = match (args.node_id_source, args.node_id) {
            (NodeSourceKind::Fixed, None) => {
                bail!("NODE_ID must be set when NODE_ID_SOURCE is `fixed`")
            }
            (NodeSourceKind::Fixed, Some(id)) if id > MAX_NODE_ID => {
                bail!(
                    "NODE_ID ({}) exceeds the Snowflake node ID space (max = {})",
                    id,
                    MAX_NODE_ID
                );
            }
            (NodeSourceKind::Fixed, Some(id)) => NodeIdSource::Fixed(id),
            (kind, Some(_)) => {
                bail!("NODE_ID is only used when NODE_ID_SOURCE is `fixed`, got `{kind:?}`")
            }
            (NodeSourceKind::Network, None) => NodeIdSource::Network,
            (NodeSourceKind::Random, None) => NodeIdSource::Random,
        };

        Ok(Self {
            id: IdConfig::new(node),
            command: args.command,
        })
    }
}
