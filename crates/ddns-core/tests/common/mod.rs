//! Test doubles and common utilities for engine contract tests
//!
//! The doubles share their counters through `Arc`, so a test can clone one,
//! hand the clone to the engine, and inspect the original afterwards.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource};
use ddns_core::DdnsConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared log of which step ran, in order
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// An IpSource that always answers the same way
#[derive(Clone)]
pub struct ScriptedIpSource {
    /// `None` makes every call fail
    answer: Option<String>,
    /// Call counter for current()
    call_count: Arc<AtomicUsize>,
    log: CallLog,
}

impl ScriptedIpSource {
    pub fn returning(ip: &str, log: &CallLog) -> Self {
        Self {
            answer: Some(ip.to_string()),
            call_count: Arc::new(AtomicUsize::new(0)),
            log: Arc::clone(log),
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            answer: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            log: Arc::clone(log),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("current");
        self.answer
            .clone()
            .ok_or_else(|| Error::ip_resolution("connection refused"))
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}

/// How MockDnsProvider answers get_record()
#[derive(Clone, Debug)]
pub enum Published {
    Ip(String),
    Empty,
    Unreachable,
}

/// A mock DnsProvider that tracks calls
#[derive(Clone)]
pub struct MockDnsProvider {
    published: Published,
    fail_writes: bool,
    /// Call counter for get_record()
    read_count: Arc<AtomicUsize>,
    /// Recorded (subdomain, ip) pairs from update calls
    writes: Arc<Mutex<Vec<(String, String)>>>,
    log: CallLog,
}

impl MockDnsProvider {
    pub fn publishing(ip: &str, log: &CallLog) -> Self {
        Self::with(Published::Ip(ip.to_string()), log)
    }

    pub fn with(published: Published, log: &CallLog) -> Self {
        Self {
            published,
            fail_writes: false,
            read_count: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
            log: Arc::clone(log),
        }
    }

    /// Make every update_record() call fail
    pub fn rejecting_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Get the number of times get_record() was called
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// IPs passed to update_record(), in call order
    pub fn written_ips(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, ip)| ip.clone())
            .collect()
    }

    /// Record names passed to update_record(), in call order
    pub fn written_names(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn get_record(&self, domain: &str, subdomain: &str) -> Result<String> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("get_record");
        let record = format!("{}.{}", subdomain, domain);
        match &self.published {
            Published::Ip(ip) => Ok(ip.clone()),
            Published::Empty => Err(Error::empty_record_set(record)),
            Published::Unreachable => Err(Error::record_read(record, "connection reset")),
        }
    }

    async fn update_record(&self, domain: &str, subdomain: &str, ip: &str) -> Result<()> {
        self.log.lock().unwrap().push("update_record");
        self.writes
            .lock()
            .unwrap()
            .push((subdomain.to_string(), ip.to_string()));

        if self.fail_writes {
            return Err(Error::record_write(
                format!("{}.{}", subdomain, domain),
                ip,
                "Rate limit exceeded",
            ));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(subdomain: &str) -> DdnsConfig {
    DdnsConfig::new("test-key", "test-secret", "example.com", subdomain)
}
