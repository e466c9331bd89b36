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

//! Points ledger.
//!
//! The [`Ledger`] maps users to their [`Wallet`]s and is the entry point for
//! the three operations callers need:
//!
//! - **Grants**: Credit points from a payer, or retract them with a negative delta.
//! - **Spends**: Consume points oldest-lot-first across all payers.
//! - **Balances**: Report remaining points per payer.
//!
//! None of these fail. Over-spends and over-retractions take what is there.
//!
//! # Thread Safety
//!
//! Wallets live in a [`DashMap`] and each one guards its lots with its own
//! mutex, so operations on different users run in parallel while operations
//! on the same user are serialized.

use crate::base::{Points, UserId};
use crate::report::{BalanceItem, SpendItem};
use crate::request::{Grant, Operation, Spend};
use crate::wallet::{Lot, Wallet};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// In-memory reward points ledger.
///
/// Construct one and share it by reference (or `Arc`) with whatever serves
/// requests.
///
/// # Invariants
///
/// - A user's lots are only ever appended, never removed or reordered.
/// - No lot's remaining points ever drop below zero.
/// - A negative grant only touches lots of the named payer.
pub struct Ledger {
    /// Wallets indexed by user, created on the first non-zero grant.
    wallets: DashMap<UserId, Wallet>,
}

impl Ledger {
    /// Creates a ledger with no users.
    pub fn new() -> Self {
        Ledger {
            wallets: DashMap::new(),
        }
    }

    /// Applies a grant to the user's wallet.
    ///
    /// | Delta | Behavior |
    /// |-------|----------|
    /// | `> 0` | Appends a lot for the payer, dated `grant.date` |
    /// | `< 0` | Retracts from that payer's lots, oldest first, clamped at zero |
    /// | `0`   | Nothing |
    pub fn record_grant(&self, grant: Grant) {
        let Grant {
            user,
            payer,
            points,
            date,
        } = grant;
        if points == 0 {
            return;
        }

        // Insert under the shard write lock, then drop to a read lock so other
        // users in the same shard are not blocked while this wallet is updated.
        let wallet = self
            .wallets
            .entry(user.clone())
            .or_insert_with(|| Wallet::new(user))
            .downgrade();
        wallet.record_grant(&payer, points, date);
    }

    /// Applies grants one after another in iteration order.
    ///
    /// Order matters: a negative grant only sees lots from earlier grants.
    pub fn record_grants<I>(&self, grants: I)
    where
        I: IntoIterator<Item = Grant>,
    {
        for grant in grants {
            self.record_grant(grant);
        }
    }

    /// Spends points now. See [`Ledger::spend_at`].
    pub fn spend(&self, spend: Spend) -> Vec<SpendItem> {
        self.spend_at(spend, Utc::now())
    }

    /// Spends points oldest-lot-first, stamping each result item with `now`.
    ///
    /// Returns one negative item per payer touched. If the user holds fewer
    /// points than requested, everything available is spent. An unknown user
    /// gets an empty result.
    pub fn spend_at(&self, spend: Spend, now: DateTime<Utc>) -> Vec<SpendItem> {
        let amount = spend.amount();
        self.wallets
            .get(&spend.user)
            .map(|wallet| wallet.spend(amount, now))
            .unwrap_or_default()
    }

    /// Applies either kind of request, returning spend items for spends and
    /// nothing for grants.
    pub fn apply(&self, operation: Operation) -> Vec<SpendItem> {
        match operation {
            Operation::Grant(grant) => {
                self.record_grant(grant);
                Vec::new()
            }
            Operation::Spend(spend) => self.spend(spend),
        }
    }

    /// Remaining points per payer for `user`, in first-seen order.
    ///
    /// Unknown users yield an empty list.
    pub fn balance(&self, user: &UserId) -> Vec<BalanceItem> {
        self.wallets
            .get(user)
            .map(|wallet| wallet.balance())
            .unwrap_or_default()
    }

    /// Sum of remaining points across all of `user`'s payers.
    pub fn total(&self, user: &UserId) -> Points {
        self.wallets.get(user).map_or(0, |wallet| wallet.total())
    }

    /// Snapshot of `user`'s lots, oldest first.
    pub fn lots(&self, user: &UserId) -> Vec<Lot> {
        self.wallets
            .get(user)
            .map(|wallet| wallet.lots())
            .unwrap_or_default()
    }

    /// Returns an iterator over all wallets.
    ///
    /// Useful for generating reports across users.
    pub fn wallets(
        &self,
    ) -> impl Iterator<Item = dashmap::mapref::multiple::RefMulti<'_, UserId, Wallet>> {
        self.wallets.iter()
    }

    /// Retrieves a wallet by user.
    ///
    /// Returns `None` if the user has never received a non-zero grant.
    pub fn get_wallet(
        &self,
        user: &UserId,
    ) -> Option<dashmap::mapref::one::Ref<'_, UserId, Wallet>> {
        self.wallets.get(user)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
