//! Liquidity position records, boundary normalization, and snapshot loading

mod data;
pub mod loader;
pub mod normalize;

pub use data::LiquidityPosition;
pub use loader::{
    load_positions_csv, load_positions_json, positions_from_csv_reader, positions_from_json_str,
    LoadError,
};
