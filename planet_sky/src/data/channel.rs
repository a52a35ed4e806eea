use std::path::Path;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::info;

use crate::data::evm::EvmFetcher;
use crate::data::model::Block;
use crate::data::{ChainFetcher, FetcherConfig};
use crate::error::RenderError;

/// Pause between replayed fixture blocks.
const REPLAY_INTERVAL: Duration = Duration::from_secs(3);

/// Bevy resource holding the channel from the fetcher thread.
/// The viewer drains this in its ingest system.
#[derive(bevy::prelude::Resource)]
pub struct BlockChannel(pub Receiver<Block>);

/// Create a block channel and spawn the EVM fetcher on a dedicated thread.
pub fn init_block_channel(config: FetcherConfig) -> BlockChannel {
    BlockChannel(EvmFetcher::spawn(config))
}

/// Reads a JSON fixture holding either one block or an array of blocks.
pub fn load_fixture(path: &Path) -> Result<Vec<Block>, RenderError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| RenderError::Fixture(format!("failed to read {}: {e}", path.display())))?;
    parse_fixture(&json)
        .map_err(|e| RenderError::Fixture(format!("failed to parse {}: {e}", path.display())))
}

fn parse_fixture(json: &str) -> Result<Vec<Block>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|block| vec![block])
    }
}

/// Create a block channel that replays fixture blocks, one every few
/// seconds so each sky stays on screen for a moment.
pub fn init_fixture_channel(path: &Path) -> Result<BlockChannel, RenderError> {
    let blocks = load_fixture(path)?;
    info!(count = blocks.len(), path = %path.display(), "replaying fixture");

    let (tx, rx) = crossbeam_channel::bounded(16);

    std::thread::spawn(move || {
        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 {
                std::thread::sleep(REPLAY_INTERVAL);
            }
            if tx.send(block).is_err() {
                return;
            }
        }
    });

    Ok(BlockChannel(rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_fixture_is_wrapped() {
        let blocks = parse_fixture(r#"{ "hash": "0x1", "gasLimit": 10, "gasUsed": 5 }"#).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].transactions.is_empty());
    }

    #[test]
    fn missing_fixture_is_a_fixture_error() {
        let err = load_fixture(Path::new("/nonexistent/blocks.json")).unwrap_err();
        assert!(matches!(err, RenderError::Fixture(_)));
    }

    #[test]
    fn fixture_channel_replays_in_order() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/blocks.json"));
        let expected = load_fixture(path).unwrap();
        let channel = init_fixture_channel(path).unwrap();
        let first = channel.0.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(first, expected[0]);
    }
}
