//! Integration tests for energy capture sessions.

mod common;

use common::SyntheticEngine;
use soc_pmu::pmu::CaptureSession;

/// Tests that a completed window produces a record.
#[test]
fn test_start_stop_produces_record() {
    let (mut engine, log) = SyntheticEngine::new(0.25, 0.05);
    let mut session = CaptureSession::new();

    session.start(&mut engine, 100);
    assert!(session.is_active());
    let record = session.stop(&mut engine, 600);

    assert!(!session.is_active());
    assert_eq!(record.started_at, Some(100));
    assert_eq!(record.timestamp, 600);
    assert_eq!(record.dynamic_power, 0.25);
    assert_eq!(record.static_power, 0.05);
    assert_eq!(record.average_power, 0.25 + 0.05);
    assert_eq!(session.last_average_power(), 0.25 + 0.05);
    assert_eq!(log.borrow().starts, vec![100]);
    assert_eq!(log.borrow().stops, vec![600]);
}

/// Tests that the stored value is 0.0 before any window completes.
#[test]
fn test_value_before_first_window_is_zero() {
    let (mut engine, _) = SyntheticEngine::new(1.0, 1.0);
    let mut session = CaptureSession::new();
    session.start(&mut engine, 0);
    assert_eq!(session.last_average_power(), 0.0);
}

/// Tests that a stop without a start still queries the engine and records.
#[test]
fn test_stop_without_start_still_records() {
    let (mut engine, log) = SyntheticEngine::new(1.0, 0.5);
    let mut session = CaptureSession::new();

    let record = session.stop(&mut engine, 10);
    assert_eq!(record.started_at, None);
    assert_eq!(record.timestamp, 10);
    assert_eq!(record.average_power, 1.5);
    assert_eq!(session.last_average_power(), 1.5);
    assert_eq!(session.records().len(), 1);
    assert_eq!(log.borrow().stops, vec![10]);
    assert!(log.borrow().starts.is_empty());
}

/// Tests that starting an active session restarts its window.
#[test]
fn test_restart_moves_window_start() {
    let (mut engine, log) = SyntheticEngine::new(1.0, 0.0);
    let mut session = CaptureSession::new();

    session.start(&mut engine, 10);
    session.start(&mut engine, 40);
    let record = session.stop(&mut engine, 90);

    assert_eq!(record.started_at, Some(40));
    assert_eq!(log.borrow().starts, vec![10, 40]);
}

/// Tests that records accumulate and can be drained.
#[test]
fn test_records_accumulate_and_drain() {
    let (mut engine, _) = SyntheticEngine::new(1.0, 0.0);
    let mut session = CaptureSession::new();
    for t in [0, 100, 200] {
        session.start(&mut engine, t);
        session.stop(&mut engine, t + 50);
    }

    assert_eq!(session.records().len(), 3);
    let drained = session.take_records();
    assert_eq!(drained[2].timestamp, 250);
    assert!(session.records().is_empty());
    assert_eq!(session.last_average_power(), 1.0);
}

/// Tests the JSON form of a record.
#[test]
fn test_record_serializes_to_json() {
    let (mut engine, _) = SyntheticEngine::new(1.5, 0.5);
    let mut session = CaptureSession::new();
    session.start(&mut engine, 0);
    let record = session.stop(&mut engine, 1000);

    let value = serde_json::to_value(record).unwrap();
    assert_eq!(value["timestamp"], 1000);
    assert_eq!(value["average_power"], 2.0);
}
