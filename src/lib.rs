// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! # Points Ledger
//!
//! This library tracks reward points per user. Points are granted by payers
//! and spent oldest-grant-first, and no payer's balance ever goes negative.
//!
//! ## Core Components
//!
//! - [`Ledger`]: Store of user wallets, entry point for grants, spends and balances
//! - [`Wallet`]: One user's lots in arrival order
//! - [`Grant`] / [`Spend`]: Requests accepted by the ledger
//! - [`SpendItem`] / [`BalanceItem`]: Per-payer results returned to callers
//! - [`LedgerError`]: Errors building identifiers and requests
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use points_ledger_rs::{Grant, Ledger, PayerId, Spend, UserId};
//!
//! let ledger = Ledger::new();
//! let user = UserId::new("alice").unwrap();
//! let dannon = PayerId::new("DANNON").unwrap();
//! let unilever = PayerId::new("UNILEVER").unwrap();
//!
//! ledger.record_grant(Grant::new(user.clone(), dannon.clone(), 5, Utc::now()));
//! ledger.record_grant(Grant::new(user.clone(), unilever.clone(), 3, Utc::now()));
//!
//! // Oldest lot first: all of DANNON, then one point of UNILEVER.
//! let spent = ledger.spend(Spend::new(user.clone(), 6));
//! assert_eq!(spent[0].points, -5);
//! assert_eq!(spent[1].points, -1);
//!
//! let balance = ledger.balance(&user);
//! assert_eq!(balance[0].points, 0);
//! assert_eq!(balance[1].points, 2);
//! ```
//!
//! ## Thread Safety
//!
//! Each user's wallet has its own lock, so requests for different users are
//! processed in parallel while requests for one user are serialized.

mod base;
pub mod error;
mod ledger;
mod report;
mod request;
pub mod wallet;

pub use base::{PayerId, Points, UserId};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use report::{BalanceItem, SpendItem};
pub use request::{Grant, Operation, Spend};
pub use wallet::{Lot, Wallet};
