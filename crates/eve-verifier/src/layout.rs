// SPDX-License-Identifier: BUSL-1.1

//! Per-object-type staged directory layout (spec §4.F):
//! `<download-root>/<objType>/{pending,verifier,verified}/...`

use std::path::PathBuf;

pub struct ImageLayout<'a> {
    pub download_root: &'a std::path::Path,
    pub object_type: &'a str,
}

impl<'a> ImageLayout<'a> {
    pub fn new(download_root: &'a std::path::Path, object_type: &'a str) -> Self {
        Self { download_root, object_type }
    }

    pub fn pending_path(&self, image_id: &str, filename: &str) -> PathBuf {
        self.download_root.join(self.object_type).join("pending").join(image_id).join(filename)
    }

    pub fn verifier_path(&self, image_id: &str, filename: &str) -> PathBuf {
        self.download_root.join(self.object_type).join("verifier").join(image_id).join(filename)
    }

    pub fn verified_path(&self, sha256_lower: &str, filename: &str) -> PathBuf {
        self.download_root.join(self.object_type).join("verified").join(sha256_lower).join(filename)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
