mod channel;
pub mod evm;
mod features;
mod model;
mod signatures;

use alloy_chains::Chain;
use crossbeam_channel::Receiver;
use url::Url;

pub use channel::{init_block_channel, init_fixture_channel, load_fixture, BlockChannel};
pub use features::{BlockFeatures, RingDescriptor, RingKind};
pub use model::{Block, Transaction};
pub use signatures::{is_erc20, is_nft};

/// Configuration for spawning a chain fetcher.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
    pub chain: Chain,
    pub rpc_url: Url,
    /// First block to render; the chain tip when unset.
    pub start_block: Option<u64>,
}

/// Interface for chain-specific block fetchers.
pub trait ChainFetcher: Send + 'static {
    fn spawn(config: FetcherConfig) -> Receiver<Block>;
}
