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

//! Per-user lot management.
//!
//! A wallet is an append-only sequence of lots in arrival order. Lots are
//! never removed or reordered, and a lot's remaining points only go down.
//!
//! ```text
//!  grant(+n) ──► push Lot { remaining: n }
//!  grant(-n) ──► drain lots of that payer, oldest first, clamped at 0
//!  spend(n)  ──► drain lots of any payer, oldest first, clamped at 0
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use points_ledger_rs::{PayerId, UserId, Wallet};
//!
//! let wallet = Wallet::new(UserId::new("alice").unwrap());
//! wallet.record_grant(&PayerId::new("DANNON").unwrap(), 300, Utc::now());
//! assert_eq!(wallet.total(), 300);
//! ```

use crate::base::{PayerId, Points, UserId};
use crate::report::{BalanceItem, PayerTally, SpendItem};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace};

/// One grant of points, possibly partially consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    pub payer: PayerId,
    pub remaining: Points,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct LotLog {
    user: UserId,
    /// Arrival order is consumption order.
    lots: Vec<Lot>,
}

impl LotLog {
    fn new(user: UserId) -> Self {
        Self {
            user,
            lots: Vec::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.lots.iter().all(|lot| lot.remaining >= 0),
            "Invariant violated: lot went negative for user {}",
            self.user
        );
    }

    /// Appends a new lot.
    fn earn(&mut self, payer: &PayerId, points: Points, at: DateTime<Utc>) {
        debug_assert!(points > 0);
        self.lots.push(Lot {
            payer: payer.clone(),
            remaining: points,
            created_at: at,
        });
        debug!(user = %self.user, payer = %payer, points, "recorded grant");
    }

    /// Removes up to `owed` points from `payer`'s lots, oldest first.
    ///
    /// Returns how much was actually removed; any excess is dropped.
    fn retract(&mut self, payer: &PayerId, owed: Points) -> Points {
        let mut outstanding = owed;
        for lot in self
            .lots
            .iter_mut()
            .filter(|lot| lot.payer == *payer && lot.remaining > 0)
        {
            if outstanding == 0 {
                break;
            }
            let take = lot.remaining.min(outstanding);
            lot.remaining -= take;
            outstanding -= take;
            trace!(user = %self.user, payer = %payer, take, left = lot.remaining, "retracted from lot");
        }
        self.assert_invariants();

        let removed = owed - outstanding;
        debug!(user = %self.user, payer = %payer, owed, removed, "retracted grant");
        removed
    }

    /// Removes up to `amount` points across all payers, oldest lot first.
    fn consume(&mut self, amount: Points) -> PayerTally {
        let mut tally = PayerTally::new();
        let mut outstanding = amount;
        for lot in self.lots.iter_mut().filter(|lot| lot.remaining > 0) {
            if outstanding == 0 {
                break;
            }
            let take = lot.remaining.min(outstanding);
            lot.remaining -= take;
            outstanding -= take;
            tally.add(&lot.payer, take);
            trace!(user = %self.user, payer = %lot.payer, take, left = lot.remaining, "consumed from lot");
        }
        self.assert_invariants();

        debug!(
            user = %self.user,
            requested = amount,
            spent = amount - outstanding,
            "spent points"
        );
        tally
    }

    fn tally(&self) -> PayerTally {
        let mut tally = PayerTally::new();
        for lot in &self.lots {
            tally.add(&lot.payer, lot.remaining);
        }
        tally
    }
}

/// A user's lots behind a mutex, so every operation on one user is exclusive.
#[derive(Debug)]
pub struct Wallet {
    inner: Mutex<LotLog>,
}

impl Wallet {
    pub fn new(user: UserId) -> Self {
        Self {
            inner: Mutex::new(LotLog::new(user)),
        }
    }

    pub fn user(&self) -> UserId {
        self.inner.lock().user.clone()
    }

    /// Applies a grant delta for `payer`.
    ///
    /// Positive deltas append a lot dated `at`. Negative deltas retract from
    /// that payer's lots only, oldest first, never below zero. Zero does nothing.
    pub fn record_grant(&self, payer: &PayerId, points: Points, at: DateTime<Utc>) {
        if points == 0 {
            return;
        }
        let mut data = self.inner.lock();
        if points > 0 {
            data.earn(payer, points, at);
        } else {
            data.retract(payer, points.saturating_neg());
        }
    }

    /// Spends up to `amount` points, oldest lot first across all payers.
    ///
    /// Returns one item per payer touched, in first-touched order, each
    /// reported as a negative deduction dated `now`. Asking for more than is
    /// available spends only what there is.
    pub fn spend(&self, amount: Points, now: DateTime<Utc>) -> Vec<SpendItem> {
        if amount <= 0 {
            return Vec::new();
        }
        self.inner.lock().consume(amount).into_spend(now)
    }

    /// Remaining points per payer, in first-seen order.
    ///
    /// Payers whose lots are fully consumed stay in the list with zero.
    pub fn balance(&self) -> Vec<BalanceItem> {
        self.inner.lock().tally().into_balance()
    }

    /// Sum of remaining points across every lot.
    pub fn total(&self) -> Points {
        self.inner
            .lock()
            .lots
            .iter()
            .fold(0, |sum: Points, lot| sum.saturating_add(lot.remaining))
    }

    /// Copies the current lots, oldest first.
    pub fn lots(&self) -> Vec<Lot> {
        self.inner.lock().lots.clone()
    }
}
