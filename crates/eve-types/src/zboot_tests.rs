// SPDX-License-Identifier: BUSL-1.1

use super::*;

fn zb(label: &str, current: bool, state: PartitionState) -> ZbootStatus {
    ZbootStatus { partition_label: label.into(), current_partition: current, partition_state: state }
}

#[test]
fn exactly_one_current_holds_for_normal_pair() {
    let statuses =
        vec![zb("IMGA", true, PartitionState::Active), zb("IMGB", false, PartitionState::Unused)];
    assert!(exactly_one_current(&statuses));
}

#[test]
fn exactly_one_current_violated_when_zero() {
    let statuses =
        vec![zb("IMGA", false, PartitionState::Unused), zb("IMGB", false, PartitionState::Unused)];
    assert!(!exactly_one_current(&statuses));
}

#[test]
fn exactly_one_current_violated_when_two() {
    let statuses =
        vec![zb("IMGA", true, PartitionState::Active), zb("IMGB", true, PartitionState::Inprogress)];
    assert!(!exactly_one_current(&statuses));
}
