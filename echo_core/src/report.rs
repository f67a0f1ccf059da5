//! Ping-style statistics printed after the match.

use crate::session::MatchOutcome;
use crate::types::RoundResult;
use std::fmt;
use std::net::IpAddr;

/// Totals over the played rounds
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Totals {
    pub transmitted: usize,
    pub received: usize,
    pub loss_percent: usize,
}

impl Totals {
    pub fn from_results(results: &[RoundResult]) -> Self {
        let transmitted = results.len();
        let received = results.iter().filter(|r| r.received).count();
        let loss_percent = if transmitted == 0 {
            0
        } else {
            100 - received * 100 / transmitted
        };
        Totals {
            transmitted,
            received,
            loss_percent,
        }
    }
}

/// Everything the final report needs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub destination: String,
    pub address: IpAddr,
    pub payload_bytes: usize,
    pub results: Vec<RoundResult>,
    pub aborted: bool,
    pub totals: Totals,
    pub elapsed_seconds: u64,
}

impl Report {
    pub fn new(
        destination: impl Into<String>,
        address: IpAddr,
        payload: &str,
        outcome: MatchOutcome,
        elapsed_seconds: u64,
    ) -> Self {
        let aborted = outcome.is_aborted();
        let results = match outcome {
            MatchOutcome::Completed(results) | MatchOutcome::Aborted(results) => results,
        };
        Report {
            destination: destination.into(),
            address,
            payload_bytes: payload.len(),
            totals: Totals::from_results(&results),
            results,
            aborted,
            elapsed_seconds,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            return writeln!(f, "^C");
        }

        writeln!(
            f,
            "PONG {}({}) {} bytes of data.",
            self.destination, self.address, self.payload_bytes
        )?;
        for (i, result) in self.results.iter().enumerate() {
            if result.received {
                writeln!(
                    f,
                    "{} bytes from {}: icmp_seq={} ttl={} time={} sec",
                    self.payload_bytes,
                    self.destination,
                    i + 1,
                    result.remaining_hops,
                    result.elapsed_seconds
                )?;
            } else {
                writeln!(
                    f,
                    "{} bytes from {}: request timed out",
                    self.payload_bytes, self.destination
                )?;
            }
        }
        if self.aborted {
            writeln!(f, "^C")?;
        }
        writeln!(f, "--- {} pong statistics ---", self.destination)?;
        writeln!(
            f,
            "{} packets transmitted, {} received, {}% packet loss, time {} sec",
            self.totals.transmitted,
            self.totals.received,
            self.totals.loss_percent,
            self.elapsed_seconds
        )
    }
}
