//! Core business logic module
//!
//! This module contains the ledger's core components:
//! - `luhn` - Luhn checksum validation and check digit search
//! - `generator` - Card number and PIN generation
//! - `traits` - The `LedgerStore` contract shared by every backend
//! - `bank` - Account opening and authenticated operations over a store

pub mod bank;
pub mod generator;
pub mod luhn;
pub mod traits;

pub use bank::Bank;
pub use generator::CardGenerator;
pub use traits::{check_transfer_request, LedgerStore};
