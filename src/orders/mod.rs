//! Order lifecycle

pub mod lifecycle;

pub use lifecycle::{cancel_order, confirm_order, place_order, PlaceOrderRequest};
