//! Byte layouts shared with the on-chain swap programs
//!
//! Account-state layouts describe what the programs persist; payload layouts
//! describe instruction data. Every payload starts with the instruction tag.

use super::schema::{Field, FieldKind::*, Schema};

// ---------------------------------------------------------------------------
// Account state
// ---------------------------------------------------------------------------

pub const SPL_PROGRAM_STATE: Schema = Schema::new(
    "spl-program-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("dev_lamports", U64),
        Field::new("dev_treasury", Key),
        Field::new("swap_vault_pda", Key),
        Field::new("swap_vault_bump", U8),
    ],
);

/// Program state for the Core, NFT, pNFT and cNFT programs
pub const FEE_PROGRAM_STATE: Schema = Schema::new(
    "program-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("fee_lamports", U64),
        Field::new("dev_treasury", Key),
    ],
);

pub const SPL_SWAP_STATE: Schema = Schema::new(
    "spl-swap-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("utime", U64),
        Field::new("initializer", Key),
        Field::new("token1_mint", Key),
        Field::new("token1_amount", U64),
        Field::new("temp_token1_account", Key),
        Field::new("token2_mint", Key),
        Field::new("token2_amount", U64),
        Field::new("temp_token2_account", Key),
        Field::new("taker", Key),
        Field::new("token3_mint", Key),
        Field::new("token3_amount", U64),
        Field::new("token4_mint", Key),
        Field::new("token4_amount", U64),
        Field::new("physical", U8),
    ],
);

pub const CORE_SWAP_STATE: Schema = Schema::new(
    "core-swap-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("utime", U64),
        Field::new("is_swap", U8),
        Field::new("initializer", Key),
        Field::new("initializer_asset", Key),
        Field::new("taker", Key),
        Field::new("swap_asset", Key),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("physical", U8),
    ],
);

pub const NFT_SWAP_STATE: Schema = Schema::new(
    "nft-swap-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("utime", U64),
        Field::new("is_swap", U8),
        Field::new("initializer", Key),
        Field::new("initializer_mint", Key),
        Field::new("temp_mint_account", Key),
        Field::new("taker", Key),
        Field::new("swap_mint", Key),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("physical", U8),
    ],
);

pub const PNFT_SWAP_STATE: Schema = Schema::new(
    "pnft-swap-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("utime", U64),
        Field::new("is_swap", U8),
        Field::new("initializer", Key),
        Field::new("initializer_mint", Key),
        Field::new("taker", Key),
        Field::new("swap_mint", Key),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("physical", U8),
    ],
);

pub const CNFT_SWAP_STATE: Schema = Schema::new(
    "cnft-swap-state",
    &[
        Field::new("is_initialized", U8),
        Field::new("utime", U64),
        Field::new("is_swap", U8),
        Field::new("initializer", Key),
        Field::new("delegate", Key),
        Field::new("asset_id", Key),
        Field::new("merkle_tree", Key),
        Field::new("root", Key),
        Field::new("data_hash", Key),
        Field::new("creator_hash", Key),
        Field::new("nonce", U64),
        Field::new("swap_asset_id", Key),
        Field::new("swap_merkle_tree", Key),
        Field::new("swap_root", Key),
        Field::new("swap_data_hash", Key),
        Field::new("swap_creator_hash", Key),
        Field::new("swap_nonce", U64),
        Field::new("swap_leaf_owner", Key),
        Field::new("swap_delegate", Key),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("physical", U8),
    ],
);

// ---------------------------------------------------------------------------
// Instruction payloads
// ---------------------------------------------------------------------------

pub const SPL_CREATE: Schema = Schema::new(
    "spl-create",
    &[
        Field::new("instruction", U8),
        Field::new("taker", Key),
        Field::new("token1_amount", U64),
        Field::new("token2_amount", U64),
        Field::new("token3_mint", Key),
        Field::new("token3_amount", U64),
        Field::new("token4_mint", Key),
        Field::new("token4_amount", U64),
        Field::new("affiliate_fee", U64),
        Field::new("physical", U8),
    ],
);

/// Create payload for the Core, NFT and pNFT programs
pub const ASSET_CREATE: Schema = Schema::new(
    "asset-create",
    &[
        Field::new("instruction", U8),
        Field::new("is_swap", Flag),
        Field::new("taker", Key),
        Field::new("swap_asset", Key),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("affiliate_fee", U64),
        Field::new("physical", U8),
    ],
);

/// Compressed NFT create. Proof accounts travel as trailing instruction
/// accounts, the payload only carries their count.
pub const CNFT_CREATE: Schema = Schema::new(
    "cnft-create",
    &[
        Field::new("instruction", U8),
        Field::new("is_swap", Flag),
        Field::new("asset_id", Key),
        Field::new("root", Key),
        Field::new("data_hash", Key),
        Field::new("creator_hash", Key),
        Field::new("nonce", U64),
        Field::new("swap_asset_id", Key),
        Field::new("swap_merkle_tree", Key),
        Field::new("swap_root", Key),
        Field::new("swap_data_hash", Key),
        Field::new("swap_creator_hash", Key),
        Field::new("swap_leaf_owner", Key),
        Field::new("swap_delegate", Key),
        Field::new("swap_nonce", U64),
        Field::new("proof_count", U8),
        Field::new("swap_lamports", U64),
        Field::new("swap_token_mint", Key),
        Field::new("swap_tokens", U64),
        Field::new("affiliate_fee", U64),
        Field::new("physical", U8),
    ],
);

/// Execute payload for the SPL, Core, NFT and pNFT programs
pub const EXECUTE: Schema = Schema::new(
    "execute",
    &[Field::new("instruction", U8), Field::new("affiliate_fee", U64)],
);

pub const CNFT_EXECUTE: Schema = Schema::new(
    "cnft-execute",
    &[
        Field::new("instruction", U8),
        Field::new("asset_id", Key),
        Field::new("swap_asset_id", Key),
        Field::new("proof_count", U8),
        Field::new("swap_proof_count", U8),
        Field::new("affiliate_fee", U64),
    ],
);

/// Cancel payload carrying one key (SPL, Core and pNFT programs)
pub const KEYED_CANCEL: Schema = Schema::new(
    "keyed-cancel",
    &[Field::new("instruction", U8), Field::new("key", Key)],
);

pub const NFT_CANCEL: Schema = Schema::new("nft-cancel", &[Field::new("instruction", U8)]);

pub const CNFT_CANCEL: Schema = Schema::new(
    "cnft-cancel",
    &[
        Field::new("instruction", U8),
        Field::new("asset_id", Key),
        Field::new("swap_asset_id", Key),
        Field::new("proof_count", U8),
    ],
);
