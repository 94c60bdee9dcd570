//! # Memory Summing Scenario Tests

use framebench_core::BenchError;
use framebench_core::config::MemorySumConfig;
use framebench_core::scenarios::memory_sum::{self, expected_sum};

use crate::common::harness::bench;
use crate::common::models::MemorySumModel;

#[test]
fn full_memory_sums_to_32640() {
    let mut sim = bench(MemorySumModel::new());
    let report = memory_sum::run(&mut sim, &MemorySumConfig::default()).unwrap();
    assert_eq!(report.sum, 32_640);
    assert_eq!(report.words_written, 256);
    assert_eq!(report.cycles_to_done, 256);
    assert_eq!(sim.dut().word(255), 255);
}

#[test]
fn partial_fill_sums_only_written_words() {
    let config = MemorySumConfig {
        depth: 16,
        ..MemorySumConfig::default()
    };
    let mut sim = bench(MemorySumModel::new());
    let report = memory_sum::run(&mut sim, &config).unwrap();
    assert_eq!(report.sum, 120);
}

#[test]
fn done_must_arrive_within_its_budget() {
    let config = MemorySumConfig {
        done_timeout_cycles: 100,
        ..MemorySumConfig::default()
    };
    let mut sim = bench(MemorySumModel::new());
    let err = memory_sum::run(&mut sim, &config).unwrap_err();
    assert!(err.is_hang());
    assert!(matches!(err, BenchError::Timeout { ref waiting_for, .. } if waiting_for == "io_sum_done"));
}

#[test]
fn expected_sums() {
    assert_eq!(expected_sum(256, 8), 32_640);
    assert_eq!(expected_sum(16, 8), 120);
    assert_eq!(expected_sum(4, 1), 2);
}
