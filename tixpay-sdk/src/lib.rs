//! Shared objects for Tixpay.
//!
//! Everything in here is plain data: the currency enumeration understood by
//! the payment widget, the widget's property object, the event catalog shapes
//! and the cart line items exchanged between the core and the HTTP surface.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod objects;
