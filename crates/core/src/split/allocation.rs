//! Unit allocation for bill splits.
//!
//! Decides how many units of each line item every participant pays for.
//! Works purely on unit counts; money is derived from the result afterwards.
//!
//! For each line item:
//! 1. Sum the units claimed by all participants
//! 2. If the sum exceeds the item quantity, scale each claim down with
//!    floor division and hand the remainder to the first claimant
//! 3. Units nobody claimed go to participant 0 (the fallback owner)

use std::collections::BTreeMap;

use super::validation::ResolvedClaim;

/// Units of each line item allocated to one participant, keyed by line index.
pub type ParticipantUnits = BTreeMap<usize, u64>;

/// Allocation utility for distributing line item units.
///
/// Guarantees for every line item:
/// - the allocated units never exceed the item quantity
/// - the allocated units always sum to exactly the item quantity
pub struct ClaimAllocator;

impl ClaimAllocator {
    /// Scales claims down so they fit into `available` units.
    ///
    /// Each claim becomes `floor(claim * available / sum)`. Any units lost
    /// to flooring go to the first claim. Claims that already fit are
    /// returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use platter_core::split::ClaimAllocator;
    ///
    /// // Two diners both claim the single dessert: [0 + 1, 0]
    /// assert_eq!(ClaimAllocator::scale_claims(1, &[1, 1]), vec![1, 0]);
    /// ```
    #[must_use]
    pub fn scale_claims(available: u64, claims: &[u64]) -> Vec<u64> {
        let sum: u128 = claims.iter().map(|c| u128::from(*c)).sum();
        if sum <= u128::from(available) {
            return claims.to_vec();
        }

        let mut scaled: Vec<u64> = claims
            .iter()
            .map(|claim| {
                let share = u128::from(*claim) * u128::from(available) / sum;
                // share <= available because claim <= sum
                u64::try_from(share).unwrap_or(available)
            })
            .collect();

        let allocated: u64 = scaled.iter().sum();
        if let Some(first) = scaled.first_mut() {
            *first += available - allocated;
        }
        scaled
    }

    /// Allocates every line item of an order across participants.
    ///
    /// `quantities[k]` is the quantity of line `k`; `claims[p]` holds the
    /// resolved claims of participant `p`. Repeated claims by the same
    /// participant on one line accumulate. The returned vector has one entry
    /// per participant; a participant only has keys for lines they claimed
    /// or received as fallback owner.
    #[must_use]
    pub fn allocate(quantities: &[u64], claims: &[Vec<ResolvedClaim>]) -> Vec<ParticipantUnits> {
        let mut units = vec![ParticipantUnits::new(); claims.len()];
        if claims.is_empty() {
            return units;
        }

        for (item_index, &available) in quantities.iter().enumerate() {
            // Claimants in claim-list order, one slot per participant.
            let mut claimants: Vec<usize> = Vec::new();
            let mut claimed: Vec<u64> = Vec::new();
            for (participant, participant_claims) in claims.iter().enumerate() {
                for claim in participant_claims.iter().filter(|c| c.item_index == item_index) {
                    match claimants.iter().position(|p| *p == participant) {
                        Some(slot) => claimed[slot] = claimed[slot].saturating_add(claim.quantity),
                        None => {
                            claimants.push(participant);
                            claimed.push(claim.quantity);
                        }
                    }
                }
            }

            let scaled = Self::scale_claims(available, &claimed);
            let allocated: u64 = scaled.iter().sum();
            for (participant, quantity) in claimants.iter().zip(scaled) {
                units[*participant].insert(item_index, quantity);
            }

            let unclaimed = available - allocated;
            if unclaimed > 0 || claimants.is_empty() {
                *units[0].entry(item_index).or_insert(0) += unclaimed;
            }
        }

        units
    }
}
