// SPDX-License-Identifier: BUSL-1.1

use std::path::Path;

use super::*;

#[test]
fn paths_follow_the_staged_layout() {
    let root = Path::new("/persist/downloads");
    let layout = ImageLayout::new(root, "baseimage");

    assert_eq!(
        layout.pending_path("img-1", "rootfs.img"),
        Path::new("/persist/downloads/baseimage/pending/img-1/rootfs.img")
    );
    assert_eq!(
        layout.verifier_path("img-1", "rootfs.img"),
        Path::new("/persist/downloads/baseimage/verifier/img-1/rootfs.img")
    );
    assert_eq!(
        layout.verified_path("deadbeef", "rootfs.img"),
        Path::new("/persist/downloads/baseimage/verified/deadbeef/rootfs.img")
    );
}

#[test]
fn different_object_types_stay_isolated() {
    let root = Path::new("/persist/downloads");
    let apps = ImageLayout::new(root, "appimage");
    let base = ImageLayout::new(root, "baseimage");

    assert_ne!(apps.pending_path("img-1", "f"), base.pending_path("img-1", "f"));
}
