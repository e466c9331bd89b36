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

//! Ledger requests.
//!
//! - [`Grant`]: points earned from a payer, or a retroactive correction when negative.
//! - [`Spend`]: points consumed across payers, oldest lot first.

use crate::LedgerError;
use crate::base::{PayerId, Points, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grant of points to a user from a payer.
///
/// A positive `points` appends a new lot, a negative one retracts points from
/// that payer's existing lots, and zero is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grant {
    pub user: UserId,
    pub payer: PayerId,
    pub points: Points,
    /// Defaults to the time the grant is deserialized when absent.
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}

impl Grant {
    pub fn new(user: UserId, payer: PayerId, points: Points, date: DateTime<Utc>) -> Self {
        Self {
            user,
            payer,
            points,
            date,
        }
    }
}

/// A request to spend points from a user's balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spend {
    pub user: UserId,
    pub points: u64,
}

impl Spend {
    pub fn new(user: UserId, points: u64) -> Self {
        Self { user, points }
    }

    /// Builds a spend from a signed amount, as read from loosely typed input.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NegativeSpend`] if `points` is below zero.
    pub fn from_signed(user: UserId, points: i64) -> Result<Self, LedgerError> {
        let points = u64::try_from(points).map_err(|_| LedgerError::NegativeSpend(points))?;
        Ok(Self { user, points })
    }

    /// Amount to spend as a signed quantity, clamped to [`Points::MAX`].
    pub(crate) fn amount(&self) -> Points {
        Points::try_from(self.points).unwrap_or(Points::MAX)
    }
}

/// Either kind of ledger request, for replaying a mixed stream in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    Grant(Grant),
    Spend(Spend),
}

impl Operation {
    pub fn user(&self) -> &UserId {
        match self {
            Self::Grant(grant) => &grant.user,
            Self::Spend(spend) => &spend.user,
        }
    }
}

impl From<Grant> for Operation {
    fn from(grant: Grant) -> Self {
        Self::Grant(grant)
    }
}

impl From<Spend> for Operation {
    fn from(spend: Spend) -> Self {
        Self::Spend(spend)
    }
}
