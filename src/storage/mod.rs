// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! - [`cache`]: in-process two-tier TTL cache for chain reads
//! - [`ledger`]: durable last-observation-wins balance ledger (redb)
//!
//! ## Storage Layout
//!
//! ```text
//! $LEDGER_PATH (default data/ledger.redb)
//!   balances: address -> BalanceRecord (JSON)
//! ```

pub mod cache;
pub mod ledger;

pub use cache::{SnapshotKey, TieredCache, TtlCache};
pub use ledger::{BalanceLedger, LedgerError, LedgerResult, RedbLedger};
