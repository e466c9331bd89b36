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

//! Values returned to callers by spend and balance queries.

use crate::base::{PayerId, Points};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points deducted from one payer by a single spend.
///
/// `points` is negative. Every item of one spend shares the same `date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendItem {
    pub payer: PayerId,
    pub points: Points,
    pub date: DateTime<Utc>,
}

/// Remaining points a user holds from one payer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceItem {
    pub payer: PayerId,
    pub points: Points,
}

/// Per-payer running totals in first-seen order.
///
/// The index keeps lookups constant time while `slots` preserves output order.
#[derive(Debug, Default)]
pub(crate) struct PayerTally {
    index: HashMap<PayerId, usize>,
    slots: Vec<(PayerId, Points)>,
}

impl PayerTally {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, payer: &PayerId, points: Points) {
        match self.index.get(payer) {
            Some(&slot) => {
                let total = &mut self.slots[slot].1;
                *total = total.saturating_add(points);
            }
            None => {
                self.index.insert(payer.clone(), self.slots.len());
                self.slots.push((payer.clone(), points));
            }
        }
    }

    pub(crate) fn into_balance(self) -> Vec<BalanceItem> {
        self.slots
            .into_iter()
            .map(|(payer, points)| BalanceItem { payer, points })
            .collect()
    }

    /// Reports each total as a deduction stamped with `date`.
    pub(crate) fn into_spend(self, date: DateTime<Utc>) -> Vec<SpendItem> {
        self.slots
            .into_iter()
            .map(|(payer, points)| SpendItem {
                payer,
                points: -points,
                date,
            })
            .collect()
    }
}
