// SPDX-License-Identifier: BUSL-1.1

use super::*;

#[test]
fn default_matches_spec_table() {
    let cfg = GlobalConfig::default();
    assert_eq!(cfg.timer_config_interval_s, 60);
    assert_eq!(cfg.timer_send_timeout_s, 120);
    assert_eq!(cfg.timer_reboot_no_network_s, 604_800);
    assert_eq!(cfg.timer_update_fallback_no_network_s, 300);
    assert_eq!(cfg.timer_test_baseimage_update_s, 600);
    assert_eq!(cfg.timer_use_config_checkpoint_s, 600);
    assert_eq!(cfg.timer_port_testinterval_s, 300);
    assert_eq!(cfg.timer_port_testbetterinterval_s, 600);
    assert_eq!(cfg.timer_port_timeout_s, 15);
    assert_eq!(cfg.network_fallback_any_eth, FallbackAnyEth::Enabled);
    assert_eq!(cfg.debug_default_loglevel, LogLevel::Info);
    assert_eq!(cfg.debug_default_remote_loglevel, LogLevel::Warning);
}

#[test]
fn zero_config_interval_is_clamped_up() {
    let cfg = GlobalConfig { timer_config_interval_s: 0, ..GlobalConfig::default() }.clamped();
    assert!(cfg.timer_config_interval_s >= 10);
}

#[test]
fn agent_override_falls_back_when_absent() {
    let cfg = GlobalConfig::default();
    assert_eq!(cfg.agent_override("zedagent", "timer.config.interval"), None);
}

#[test]
fn agent_override_found_when_present() {
    let mut cfg = GlobalConfig::default();
    cfg.agent_overrides.insert("agent.zedagent.timer.config.interval".into(), 30);
    assert_eq!(cfg.agent_override("zedagent", "timer.config.interval"), Some(30));
    assert_eq!(cfg.agent_override("nodeagent", "timer.config.interval"), None);
}

#[test]
fn key_is_literal_global() {
    assert_eq!(GlobalConfig::default().key(), "global");
    assert_eq!(GlobalConfig::topic_name(), "GlobalConfig");
}

#[test]
fn roundtrips_through_json() {
    let cfg = GlobalConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    let back: GlobalConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, back);
}
