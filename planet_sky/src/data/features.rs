//! Block feature extraction: the rings, the largest value and the gas ratio.

use serde::Serialize;

use crate::data::model::Block;
use crate::data::signatures::{is_erc20, is_nft};
use crate::error::RenderError;

/// How a ring's transaction classifies by signature and recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RingKind {
    Nft,
    Erc20,
    Transfer,
}

/// One positive-value transaction, in block order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingDescriptor {
    pub value: u128,
    pub data_prefix: String,
    pub to: String,
}

impl RingDescriptor {
    pub fn kind(&self) -> RingKind {
        if is_nft(&self.data_prefix, &self.to) {
            RingKind::Nft
        } else if is_erc20(&self.data_prefix) {
            RingKind::Erc20
        } else {
            RingKind::Transfer
        }
    }
}

/// Everything the composer needs from a block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockFeatures {
    pub rings: Vec<RingDescriptor>,
    /// Zero when no transaction carries value.
    pub max_value: u128,
    /// `gas_used / gas_limit`, clamped to `[0, 1]`.
    pub gas_ratio: f64,
}

impl BlockFeatures {
    /// Walks the transactions in block order. Fails only on a zero gas limit.
    pub fn extract(block: &Block) -> Result<Self, RenderError> {
        if block.gas_limit == 0 {
            return Err(RenderError::InvalidBlockData("gas limit is zero".to_string()));
        }

        let mut rings = Vec::new();
        let mut max_value = 0u128;
        for tx in &block.transactions {
            if tx.value > 0 {
                rings.push(RingDescriptor {
                    value: tx.value,
                    data_prefix: tx.signature(),
                    to: tx.recipient(),
                });
            }
            max_value = max_value.max(tx.value);
        }

        let gas_ratio = (block.gas_used as f64 / block.gas_limit as f64).clamp(0.0, 1.0);

        Ok(Self {
            rings,
            max_value,
            gas_ratio,
        })
    }

    pub fn count_of(&self, kind: RingKind) -> usize {
        self.rings.iter().filter(|ring| ring.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Transaction;

    fn block(gas_used: u64, gas_limit: u64, transactions: Vec<Transaction>) -> Block {
        Block {
            number: Some(1),
            hash: "0x00".into(),
            gas_limit,
            gas_used,
            transactions,
        }
    }

    #[test]
    fn rings_keep_block_order_and_skip_zero_values() {
        let txs = [5, 0, 20, 3].into_iter().map(Transaction::new).collect();
        let features = BlockFeatures::extract(&block(1, 2, txs)).unwrap();

        let values: Vec<u128> = features.rings.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![5, 20, 3]);
        assert_eq!(features.max_value, 20);
        assert_eq!(features.gas_ratio, 0.5);
    }

    #[test]
    fn empty_block_has_no_rings() {
        let features = BlockFeatures::extract(&block(0, 30_000_000, vec![])).unwrap();
        assert!(features.rings.is_empty());
        assert_eq!(features.max_value, 0);
        assert_eq!(features.gas_ratio, 0.0);
    }

    #[test]
    fn full_block_has_unit_ratio() {
        let features = BlockFeatures::extract(&block(15, 15, vec![])).unwrap();
        assert_eq!(features.gas_ratio, 1.0);
    }

    #[test]
    fn zero_gas_limit_is_invalid() {
        let err = BlockFeatures::extract(&block(0, 0, vec![])).unwrap_err();
        assert!(matches!(err, RenderError::InvalidBlockData(_)));
    }

    #[test]
    fn rings_are_classified() {
        let txs = vec![
            Transaction::new(1).with_data("0xa9059cbb000000"),
            Transaction::new(2).with_to("0xBC4CA0EDA7647A8AB7C2061C2E118A18A936F13D"),
            Transaction::new(3),
        ];
        let features = BlockFeatures::extract(&block(1, 1, txs)).unwrap();

        let kinds: Vec<RingKind> = features.rings.iter().map(RingDescriptor::kind).collect();
        assert_eq!(kinds, vec![RingKind::Erc20, RingKind::Nft, RingKind::Transfer]);
        assert_eq!(features.count_of(RingKind::Nft), 1);
    }
}
