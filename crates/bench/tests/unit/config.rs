//! # Configuration Tests
//!
//! Defaults, JSON loading and cross-field validation.

use std::io::Write;

use framebench_core::BenchError;
use framebench_core::common::SimTime;
use framebench_core::config::*;
use framebench_core::uart::FaultPlan;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.general.watchdog(), SimTime::from_us(10_000));
    assert_eq!(config.general.seed, None);
    assert_eq!(config.frame, FrameConfig::new(115_200, 8));
    assert_eq!(config.uart.payloads, vec![0x55]);
    assert_eq!(config.uart.fault, FaultPlan::RandomData);
    assert!(config.validate().is_ok());
}

#[test]
fn test_bus_timing_defaults() {
    let bus = BusTiming::default();
    assert_eq!(bus.setup(), SimTime::from_ns(1));
    assert_eq!(bus.access(), SimTime::from_ns(10));
    assert_eq!(bus.recovery(), SimTime::from_ns(10));
}

#[test]
fn test_scenario_defaults() {
    let counter = CounterConfig::default();
    assert_eq!(counter.clock_period_ps, 1_000);
    assert_eq!(counter.cycles, 256);
    assert!((counter.clear_probability - 0.03).abs() < f64::EPSILON);

    let pwm = PwmConfig::default();
    assert_eq!(pwm.duty, 0x40);
    assert_eq!(pwm.period, 0x80);
    assert_eq!(pwm.second_period, Some(0x40));
    assert_eq!(pwm.observe_cycles, 100);

    let memory = MemorySumConfig::default();
    assert_eq!(memory.write_clock_ns, 10);
    assert_eq!(memory.sum_clock_ns, 20);
    assert_eq!(memory.depth, 256);
    assert_eq!(memory.tail_cycles, 10);
}

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.frame, FrameConfig::default());
    assert_eq!(config.bus, BusTiming::default());
    assert_eq!(config.uart.payloads, UartConfig::default().payloads);
}

#[test]
fn test_partial_override() {
    let json = r#"{
        "general": { "seed": 99 },
        "frame": { "samples_per_bit": 5, "noisy_bit": 3, "noisy_sample": 4 },
        "uart": { "payloads": [1, 2, 255], "fault": "fixed", "idle_samples": 4 },
        "pwm": { "second_period": null }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.general.seed, Some(99));
    assert_eq!(config.frame.baud_rate, 115_200);
    assert_eq!(config.frame, FrameConfig::new(115_200, 5).with_noise(3, 4));
    assert_eq!(config.uart.payloads, vec![1, 2, 255]);
    assert_eq!(config.uart.fault, FaultPlan::Fixed);
    assert_eq!(config.uart.idle_samples, 4);
    assert_eq!(config.pwm.second_period, None);
    assert_eq!(config.pwm.duty, 0x40);
}

#[test]
fn test_fault_plan_names() {
    for (name, plan) in [
        ("clean", FaultPlan::Clean),
        ("fixed", FaultPlan::Fixed),
        ("random_data", FaultPlan::RandomData),
        ("random_any", FaultPlan::RandomAny),
    ] {
        let json = format!(r#"{{ "uart": {{ "fault": "{name}" }} }}"#);
        assert_eq!(Config::from_json_str(&json).unwrap().uart.fault, plan);
    }
}

#[test]
fn test_noisy_sample_requires_noisy_bit() {
    let err = Config::from_json_str(r#"{ "frame": { "noisy_sample": 2 } }"#).unwrap_err();
    assert!(matches!(err, BenchError::InvalidConfig(_)), "{err}");
}

#[test]
fn test_noise_location_ranges() {
    assert!(FrameConfig::new(115_200, 8).with_noise(10, 0).validate().is_err());
    assert!(FrameConfig::new(115_200, 8).with_noise(9, 8).validate().is_err());
    assert!(FrameConfig::new(115_200, 8).with_noise(9, 7).validate().is_ok());
    assert!(FrameConfig::new(115_200, 8).with_noise(0, 0).validate().is_ok());
}

#[test]
fn test_degenerate_frame_rates() {
    assert!(FrameConfig::new(0, 8).validate().is_err());
    assert!(FrameConfig::new(115_200, 0).validate().is_err());
    assert_eq!(
        FrameConfig::new(115_200, 8).sample_period().unwrap(),
        SimTime::from_ps(8_680_555 / 8)
    );
}

#[test]
fn test_strobe_must_fit_a_sample_slot() {
    let frame = FrameConfig::new(115_200, 1_000);
    let err = UartConfig::default().validate(&frame).unwrap_err();
    assert!(matches!(err, BenchError::InvalidConfig(_)));
    assert!(UartConfig::default().validate(&FrameConfig::default()).is_ok());
}

#[test]
fn test_probability_range() {
    let err = Config::from_json_str(r#"{ "counter": { "clear_probability": 1.5 } }"#).unwrap_err();
    assert!(matches!(err, BenchError::InvalidConfig(_)));
}

#[rstest]
#[case(r#"{ "general": { "watchdog_us": 18446744073709551615 } }"#)]
#[case(r#"{ "general": { "watchdog_us": 3600000001 } }"#)]
#[case(r#"{ "bus": { "recovery_ns": 18446744073709551615 } }"#)]
#[case(r#"{ "counter": { "clock_period_ps": 18446744073709551615 } }"#)]
#[case(r#"{ "pwm": { "settle_ns": 18446744073709551615 } }"#)]
#[case(r#"{ "uart": { "tail_us": 18446744073709551615 } }"#)]
#[case(r#"{ "uart": { "valid_timeout_ns": 18446744073709551615 } }"#)]
#[case(r#"{ "memory_sum": { "reset_ns": 18446744073709551615 } }"#)]
fn test_time_fields_beyond_the_horizon(#[case] json: &str) {
    let err = Config::from_json_str(json).unwrap_err();
    assert!(matches!(err, BenchError::InvalidConfig(_)), "{err}");
}

#[test]
fn test_time_field_at_the_horizon() {
    let config = Config::from_json_str(r#"{ "general": { "watchdog_us": 3600000000 } }"#).unwrap();
    assert_eq!(config.general.watchdog(), SimTime::from_us(3_600_000_000));
}

#[test]
fn test_malformed_json() {
    let err = Config::from_json_str(r#"{ "frame": { "baud_rate": "fast" } }"#).unwrap_err();
    assert!(matches!(err, BenchError::ConfigParse(_)));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "memory_sum": {{ "depth": 16, "tail_cycles": 0 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.memory_sum.depth, 16);
    assert_eq!(config.memory_sum.tail_cycles, 0);
    assert_eq!(config.memory_sum.sum_clock_ns, 20);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BenchError::Io(_)));
}
