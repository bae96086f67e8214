//! engine-protocol
//!
//! Text encoding/decoding for the matching engine.
//!
//! This crate turns order lines into `engine_core::NewOrder` requests
//! and engine output (trades, resting orders, cycle reports) into
//! lines for the console or a replay log.
//!
//! - [`csv_codec`]  : CSV order input and report lines
//! - [`json_codec`] : one JSON document per cycle

pub mod csv_codec;
pub mod json_codec;

pub use csv_codec::{
    ParseError,
    Record,
    format_accepted,
    format_cycle,
    format_order,
    format_rejected,
    format_trade,
    parse_order_line,
};
pub use json_codec::format_cycle_json;
