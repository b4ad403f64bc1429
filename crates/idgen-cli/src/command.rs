use std::io::Write;

use anyhow::Context;
use idgen::{
    Base62Ext, EPOCH, IdConfig, IdService, SnowflakeId, base62,
    shard::{shard_label, shard_path},
};

use crate::config::{CliConfig, Command};

/// Runs the configured command, writing its output to `out`.
///
/// The [`IdService`] is only built for commands that mint IDs, so the codec
/// commands never resolve a node ID.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Snowflake {
            count,
            base62: short,
        } => {
            let service = service(config.id)?;
            for _ in 0..*count {
                let id = service
                    .next_snowflake_id()
                    .context("failed to generate snowflake id")?;
                if *short {
                    writeln!(out, "{}", base62::encode_i64(id)?)?;
                } else {
                    writeln!(out, "{id}")?;
                }
            }
        }
        Command::Uuid {
            count,
            dashless,
            base62: short,
        } => {
            let service = service(config.id)?;
            for _ in 0..*count {
                let uuid = service.next_uuid_v7();
                if *short {
                    writeln!(out, "{}", uuid.encode_base62())?;
                } else if *dashless {
                    writeln!(out, "{}", uuid.simple())?;
                } else {
                    writeln!(out, "{uuid}")?;
                }
            }
        }
        Command::Encode { value } => {
            let encoded = base62::encode_i64(*value)
                .with_context(|| format!("cannot encode `{value}`"))?;
            writeln!(out, "{encoded}")?;
        }
        Command::Decode { encoded } => {
            let value = base62::decode_i64(encoded)
                .with_context(|| format!("cannot decode `{encoded}`"))?;
            writeln!(out, "{value}")?;
        }
        Command::EncodeUuid { uuid } => {
            let encoded = base62::encode_uuid_str(uuid)
                .with_context(|| format!("cannot encode `{uuid}`"))?;
            writeln!(out, "{encoded}")?;
        }
        Command::DecodeUuid { encoded } => {
            let uuid = base62::decode_uuid_str(encoded)
                .with_context(|| format!("cannot decode `{encoded}`"))?;
            writeln!(out, "{uuid}")?;
        }
        Command::Shard { id, path } => {
            if *path {
                writeln!(out, "{}", shard_path(id))?;
            } else {
                writeln!(out, "{}", shard_label(id))?;
            }
        }
        Command::Inspect { id } => inspect(id, out)?,
    }
    Ok(())
}

fn service(config: IdConfig) -> anyhow::Result<IdService> {
    tracing::debug!(node = %config.node, "building id service");
    IdService::new(config).with_context(|| format!("invalid node id source `{}`", config.node))
}

/// Decimal input is read as decimal; anything else as Base62.
fn parse_snowflake(input: &str) -> anyhow::Result<SnowflakeId> {
    let id = if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        input.parse()
    } else {
        SnowflakeId::decode_base62(input)
    };
    id.with_context(|| format!("`{input}` is not a snowflake id"))
}

fn inspect(input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = parse_snowflake(input)?;
    let encoded = id.encode_base62();

    writeln!(out, "id:          {id}")?;
    writeln!(out, "base62:      {encoded}")?;
    writeln!(out, "timestamp:   {}", id.timestamp())?;
    writeln!(out, "epoch_ms:    {}", EPOCH.as_millis())?;
    writeln!(out, "unix_ms:     {}", id.unix_millis())?;
    writeln!(out, "node_id:     {}", id.node_id())?;
    writeln!(out, "sequence:    {}", id.sequence())?;
    writeln!(out, "shard:       {}", shard_label(&encoded))?;
    Ok(())
}
