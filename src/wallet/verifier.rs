//! Signature bundle verification
//!
//! Checks a concatenated bundle of 65-byte recoverable signature records
//! against the owner registry and counts distinct valid approvals.

use crate::crypto::{recover_signer, Address, SIGNATURE_RECORD_LEN};

use super::registry::OwnerRegistry;

/// Count the distinct registered owners with a valid signature in the bundle
///
/// The bundle is read as whole 65-byte records; trailing bytes that do not
/// fill a record are ignored. A record that fails to recover,
/// recovers to a non-owner, or repeats an already-counted owner is discarded
/// and the scan continues, so a partially malformed bundle can still succeed
/// on the strength of its remaining records.
pub fn distinct_approvals(digest: &[u8; 32], bundle: &[u8], registry: &OwnerRegistry) -> usize {
    let mut seen: Vec<Address> = Vec::new();

    for record in bundle.chunks_exact(SIGNATURE_RECORD_LEN) {
        let signer = match recover_signer(digest, record) {
            Ok(signer) => signer,
            Err(_) => continue,
        };

        if !registry.is_owner(&signer) {
            continue;
        }

        // First occurrence wins; later records from the same owner are
        // discarded. Linear scan: bundles are bounded by realistic
        // owner-set sizes.
        if seen.contains(&signer) {
            continue;
        }
        seen.push(signer);
    }

    seen.len()
}

/// Check whether the bundle meets the registry's approval threshold
pub fn meets_threshold(digest: &[u8; 32], bundle: &[u8], registry: &OwnerRegistry) -> bool {
    distinct_approvals(digest, bundle, registry) >= registry.threshold()
}
