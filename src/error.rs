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

//! Error types for building ledger requests.
//!
//! Ledger operations themselves never fail: over-spends and over-retractions
//! clamp at zero. Errors only arise when raw input is turned into identifiers
//! or requests.

use thiserror::Error;

/// Request construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// User identifier is an empty string
    #[error("user identifier must not be empty")]
    EmptyUser,

    /// Payer identifier is an empty string
    #[error("payer identifier must not be empty")]
    EmptyPayer,

    /// Spend amount is below zero
    #[error("cannot spend a negative amount ({0})")]
    NegativeSpend(i64),
}

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            LedgerError::EmptyUser.to_string(),
            "user identifier must not be empty"
        );
        assert_eq!(
            LedgerError::EmptyPayer.to_string(),
            "payer identifier must not be empty"
        );
        assert_eq!(
            LedgerError::NegativeSpend(-5).to_string(),
            "cannot spend a negative amount (-5)"
        );
    }

    #[test]
    fn errors_are_cloneable() {
        let error = LedgerError::NegativeSpend(-1);
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
