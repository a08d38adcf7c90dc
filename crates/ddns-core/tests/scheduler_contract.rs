//! Contract Test: Fixed-Interval Scheduling and Shutdown
//!
//! Constraints verified:
//! - The first cycle runs immediately
//! - One further cycle runs per elapsed interval, no more
//! - Per-cycle failures never stop the loop
//! - The engine terminates on the shutdown signal
//!
//! The clock is paused, so the interval elapses instantly.

mod common;

use common::*;
use ddns_core::DdnsEngine;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn first_cycle_runs_immediately() {
    let log = call_log();
    let ip_source = ScriptedIpSource::returning("203.0.113.9", &log);

    let engine = DdnsEngine::new(
        Box::new(ip_source.clone()),
        Box::new(MockDnsProvider::publishing("203.0.113.9", &log)),
        minimal_config("home"),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(Duration::from_secs(1)).await;
    shutdown_tx.send(()).unwrap();
    engine_handle.await.unwrap().unwrap();

    assert_eq!(ip_source.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn one_cycle_per_interval() {
    let log = call_log();
    let ip_source = ScriptedIpSource::returning("203.0.113.9", &log);
    let provider = MockDnsProvider::publishing("203.0.113.9", &log);

    let engine = DdnsEngine::new(
        Box::new(ip_source.clone()),
        Box::new(provider.clone()),
        minimal_config("home"),
    )
    .expect("engine construction succeeds");
    assert_eq!(engine.interval(), Duration::from_secs(360));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Cycles at t=0, t=360 and t=720
    tokio::time::sleep(Duration::from_secs(2 * 360 + 1)).await;
    shutdown_tx.send(()).unwrap();
    engine_handle.await.unwrap().unwrap();

    assert_eq!(ip_source.call_count(), 3);
    assert_eq!(provider.read_count(), 3);
    assert!(provider.written_ips().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failing_cycles_keep_the_loop_alive() {
    let log = call_log();
    let ip_source = ScriptedIpSource::failing(&log);
    let provider = MockDnsProvider::with(Published::Unreachable, &log);

    let mut config = minimal_config("home");
    config.engine.interval_secs = 10;

    let engine = DdnsEngine::new(
        Box::new(ip_source.clone()),
        Box::new(provider.clone()),
        config,
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Cycles at t=0, 10, 20, 30, 40
    tokio::time::sleep(Duration::from_secs(45)).await;
    shutdown_tx.send(()).unwrap();
    engine_handle.await.unwrap().unwrap();

    assert_eq!(ip_source.call_count(), 5);
    assert_eq!(provider.read_count(), 5);
}

#[tokio::test]
async fn shutdown_signal_terminates_engine() {
    let log = call_log();
    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::returning("203.0.113.9", &log)),
        Box::new(MockDnsProvider::publishing("203.0.113.9", &log)),
        minimal_config("home"),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(shutdown_tx.send(()).is_ok(), "shutdown signal send succeeds");

    let result = tokio::time::timeout(Duration::from_secs(5), engine_handle).await;
    assert!(result.is_ok(), "Engine should terminate within 5 seconds");

    let engine_result = result.unwrap().unwrap();
    assert!(
        engine_result.is_ok(),
        "Engine should shut down successfully: {:?}",
        engine_result
    );
}
