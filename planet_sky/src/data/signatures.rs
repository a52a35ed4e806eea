//! Well-known call signatures and NFT contract addresses.

/// ERC-20 `transfer`, `transferFrom`, `totalSupply`, `balanceOf`, `allowance`, `approve`.
const ERC20_SIGNATURES: &[&str] = &[
    "0xa9059cbb",
    "0x23b872dd",
    "0x18160ddd",
    "0x70a08231",
    "0xdd62ed3e",
    "0x095ea7b3",
];

/// Common mint entry points.
const NFT_SIGNATURES: &[&str] = &[
    "0x1249c58b",
    "0x672a9400",
    "0x40c10f19",
    "0x449a52f8",
    "0xa140ae23",
];

/// NFT marketplaces and collections, lowercased.
const NFT_MARKET_ADDRESSES: &[&str] = &[
    "0xaa84f7c9164db5c11b9fa65ad0118977c12a4729",
    "0xb80fbf6cdb49c33dc6ae4ca11af8ac47b0b4c0f3",
    "0x495f947276749ce646f68ac8c248420045cb7b5e",
    "0x60f80121c31a0d46b5279700f9df786054aa5ee5",
    "0x3b3ee1931dc30c1957379fac9aba94d1c48a5405",
    "0x2a46f2ffd99e19a89476e2f62270e0a35bbf0756",
    "0xfbeef911dc5821886e1dda71586d90ed28174b7d",
    "0xa7d8d9ef8d8ce8992df33d8b8cf4aebabd5bd270",
    "0xb932a70a57673d89f4acffbe830e8ed7f75fb9e0",
    "0xb47e3cd837ddf8e4c57f05d70ab865de6e193bbb",
    "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d",
    "0x06012c8cf97bead5deae237070f9587f8e7a266d",
    "0xf5b0a3efb8e8e4c201e2a935f110eaaf3ffecb8d",
];

/// True when the 4-byte signature is one of the common ERC-20 calls.
pub fn is_erc20(signature: &str) -> bool {
    ERC20_SIGNATURES.contains(&signature)
}

/// True for a known mint signature or a transaction sent to a known NFT contract.
pub fn is_nft(signature: &str, to: &str) -> bool {
    NFT_SIGNATURES.contains(&signature) || NFT_MARKET_ADDRESSES.contains(&to)
}
