// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newline-delimited JSON bus adapter (§1, §6): the real transport (DDS,
//! sockets) is out of scope, so the daemon speaks [`IngressMessage`] and
//! [`EgressMessage`] as one JSON object per line over stdin/stdout. This
//! is a development and integration-testing transport, not a production
//! one — a real deployment swaps this module out.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use wcp_core::{Clock, Sleeper};
use wcp_engine::controller::EgressSink;
use wcp_engine::Controller;
use wcp_wire::{EgressMessage, IngressMessage};

/// Writes each outbound message as one JSON line to stdout.
pub struct StdioEgress {
    out: Mutex<io::Stdout>,
}

impl StdioEgress {
    pub fn new() -> Self {
        Self { out: Mutex::new(io::stdout()) }
    }
}

impl Default for StdioEgress {
    fn default() -> Self {
        Self::new()
    }
}

impl EgressSink for StdioEgress {
    fn send(&self, message: EgressMessage) {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("failed to serialize egress message: {e}");
                return;
            }
        };
        let mut out = self.out.lock();
        if writeln!(out, "{line}").is_err() || out.flush().is_err() {
            tracing::warn!("egress write failed, stdout may be closed");
        }
    }
}

/// Reads one JSON-encoded [`IngressMessage`] per line from stdin until EOF
/// and forwards each to the controller. Malformed lines are logged and
/// skipped rather than killing the reader (§7: bad input never takes the
/// process down).
pub fn run_ingress_loop<S, C>(controller: &Arc<Controller<S, C>>)
where
    S: Sleeper + 'static,
    C: Clock + 'static,
{
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("stdin read error: {e}");
                break;
            }
        };
        match parse_ingress_line(&line) {
            Some(message) => controller.handle_ingress(message),
            None => continue,
        }
    }
}

/// Parses one ingress line, logging and discarding anything malformed or
/// blank rather than treating it as end-of-stream.
fn parse_ingress_line(line: &str) -> Option<IngressMessage> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<IngressMessage>(line) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!("discarding malformed ingress line: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
