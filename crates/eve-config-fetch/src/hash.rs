// SPDX-License-Identifier: BUSL-1.1

//! Config hashing (spec §9 open question: "the controller's hash algorithm
//! for ConfigHash is not declared in-line"). Resolved as SHA-256, hex
//! encoded, matching the image-hash convention used by `eve-verifier`.

use sha2::{Digest, Sha256};

pub fn config_hash(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
