// SPDX-License-Identifier: Apache-2.0

//! The two commission policies.
//!
//! `ContractCommissionPolicy` fixes the percentage split written into a
//! commission contract (platform 50/50/0, external 20/50/30).
//! `DealCommissionPolicy` is the independent 10/40/50 monetary split used
//! when a deal closes. They are distinct business policies and must stay
//! separately named; see DESIGN.md.
//!
//! Both are pure, total functions over their declared domains. Monetary
//! cuts are computed in integer cents, rounded half-up at basis-point
//! precision, and the final party's cut is always the residual so the
//! cuts sum exactly to the total.

use atria_model::{ContractType, Money};

/// Platform cut of a closed deal: 10%.
pub const DEAL_PLATFORM_RATE_BP: u32 = 1_000;
/// Captor cut of a closed deal, when one exists: 40%.
pub const DEAL_CAPTOR_RATE_BP: u32 = 4_000;

/// Percentage split written into a contract. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionSplit {
    pub captador: u8,
    pub partner: u8,
    pub platform: u8,
}

impl CommissionSplit {
    #[must_use]
    pub const fn total(self) -> u16 {
        self.captador as u16 + self.partner as u16 + self.platform as u16
    }
}

pub struct ContractCommissionPolicy;

impl ContractCommissionPolicy {
    /// No captador was involved in a platform-sourced listing, so the
    /// platform absorbs the captador's share; an external captador is
    /// compensated out of the platform's share while the partner's stays
    /// fixed at 50.
    #[must_use]
    pub const fn split(contract_type: ContractType) -> CommissionSplit {
        match contract_type {
            ContractType::Platform => CommissionSplit {
                captador: 0,
                partner: 50,
                platform: 50,
            },
            ContractType::External => CommissionSplit {
                captador: 30,
                partner: 50,
                platform: 20,
            },
        }
    }
}

/// Monetary split of a closed deal's value. Sums exactly to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealSplit {
    pub platform: Money,
    pub captor: Money,
    pub seller: Money,
}

impl DealSplit {
    #[must_use]
    pub fn total(self) -> Money {
        Money::from_cents(self.platform.cents() + self.captor.cents() + self.seller.cents())
    }
}

pub struct DealCommissionPolicy;

impl DealCommissionPolicy {
    /// The seller's cut is the residual and absorbs all rounding error.
    #[must_use]
    pub fn split(total: Money, has_captor: bool) -> DealSplit {
        let platform = total.percent_bp_half_up(DEAL_PLATFORM_RATE_BP);
        let captor = if has_captor {
            total.percent_bp_half_up(DEAL_CAPTOR_RATE_BP)
        } else {
            Money::ZERO
        };
        let seller = total.saturating_sub(platform).saturating_sub(captor);
        DealSplit {
            platform,
            captor,
            seller,
        }
    }
}
