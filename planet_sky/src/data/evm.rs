//! EVM block fetcher: dedicated thread + alloy → Block.

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::hex;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::BlockTransactions;
use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::data::model::{Block, Transaction};
use crate::data::{ChainFetcher, FetcherConfig};

const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// `0x` plus a 4-byte selector.
const SIGNATURE_BYTES: usize = 4;

/// EVM-compatible block fetcher using Alloy.
pub struct EvmFetcher;

impl ChainFetcher for EvmFetcher {
    fn spawn(config: FetcherConfig) -> Receiver<Block> {
        let (tx, rx) = crossbeam_channel::bounded(16);
        thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(err) => {
                    warn!(%err, "failed to build tokio runtime");
                    return;
                }
            };
            rt.block_on(fetcher_loop(config, tx));
        });
        rx
    }
}

async fn fetcher_loop(config: FetcherConfig, tx: Sender<Block>) {
    let chain = config.chain;
    let provider = ProviderBuilder::new().connect_http(config.rpc_url);

    let start = match config.start_block {
        Some(n) => n,
        None => match provider.get_block_number().await {
            Ok(n) => n,
            Err(err) => {
                warn!(%chain, %err, "failed to get latest block number");
                return;
            }
        },
    };

    info!(%chain, start, "fetching starting block");
    // A start block past the tip is waited for rather than skipped.
    let first = loop {
        if let Some(block) = fetch_block(&provider, start).await {
            break block;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    };
    if tx.send(first).is_err() {
        return;
    }

    let tip = match provider.get_block_number().await {
        Ok(n) => Some(n),
        Err(err) => {
            warn!(%chain, %err, "failed to get latest block number");
            None
        }
    };
    let mut last_seen = poll_cursor(start, tip);
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;

        let tip = match provider.get_block_number().await {
            Ok(n) => n,
            Err(err) => {
                warn!(%chain, %err, "poll error");
                continue;
            }
        };

        for n in (last_seen + 1)..=tip {
            if let Some(block) = fetch_block(&provider, n).await {
                if tx.send(block).is_err() {
                    return;
                }
            }
        }
        last_seen = last_seen.max(tip);
    }
}

/// Last block treated as seen once the start block is out. Polling only
/// picks up heads produced after that, never the history between an old
/// start block and the tip.
fn poll_cursor(start: u64, tip: Option<u64>) -> u64 {
    tip.map_or(start, |tip| tip.max(start))
}

/// Fetch a single block with full transactions. Missing blocks and RPC
/// errors are logged and yield `None`.
async fn fetch_block(provider: &impl Provider, number: u64) -> Option<Block> {
    let block = match provider
        .get_block_by_number(BlockNumberOrTag::Number(number))
        .full()
        .await
    {
        Ok(Some(block)) => block,
        Ok(None) => {
            warn!(number, "block not found");
            return None;
        }
        Err(err) => {
            warn!(number, %err, "failed to fetch block");
            return None;
        }
    };

    let block = block_from_rpc(&block);
    info!(
        number,
        txs = block.transactions.len(),
        gas_used = block.gas_used,
        gas_limit = block.gas_limit,
        "fetched block"
    );
    Some(block)
}

/// Keeps only what the scene reads: hash, gas, and per-transaction
/// value, call signature and recipient.
pub fn block_from_rpc(block: &alloy::rpc::types::Block) -> Block {
    let header = &block.header;

    let transactions = match &block.transactions {
        BlockTransactions::Full(txs) => txs.iter().map(tx_from_rpc).collect(),
        _ => Vec::new(),
    };

    Block {
        number: Some(header.number),
        hash: hex::encode_prefixed(header.hash),
        gas_limit: header.gas_limit,
        gas_used: header.gas_used,
        transactions,
    }
}

fn tx_from_rpc(tx: &alloy::rpc::types::Transaction) -> Transaction {
    use alloy::consensus::Transaction as TxConsensus;

    let input = TxConsensus::input(tx);
    let data_prefix = (!input.is_empty())
        .then(|| hex::encode_prefixed(&input[..input.len().min(SIGNATURE_BYTES)]));

    Transaction {
        value: saturating_u128(TxConsensus::value(tx)),
        data_prefix,
        to: TxConsensus::to(tx).map(|address| hex::encode_prefixed(address)),
    }
}

fn saturating_u128(wei: alloy::primitives::U256) -> u128 {
    wei.try_into().unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    #[test]
    fn one_ether_fits_u128() {
        let wei = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(saturating_u128(wei), 1_000_000_000_000_000_000);
    }

    #[test]
    fn polling_resumes_at_tip_not_start() {
        assert_eq!(poll_cursor(12_965_000, Some(20_000_000)), 20_000_000);
        assert_eq!(poll_cursor(7, Some(3)), 7);
        assert_eq!(poll_cursor(7, None), 7);
    }

    #[test]
    fn oversized_values_saturate() {
        assert_eq!(saturating_u128(U256::MAX), u128::MAX);
        assert_eq!(saturating_u128(U256::ZERO), 0);
    }
}
