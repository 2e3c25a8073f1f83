// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Aggregate statistics over a snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::snapshot::{AnySnapshot, GridSnapshot, LegacyPortRecord, PortRecord};
use crate::Coord;

/// Read access to the fields statistics need, for both schema versions.
pub trait PortSummary {
    /// Cell of the port.
    fn coordinate(&self) -> Coord;
    /// Block identifier.
    fn block(&self) -> &str;
    /// Colour name.
    fn color(&self) -> &str;
    /// Incoming arrow count.
    fn input_count(&self) -> usize;
    /// Outgoing arrow count.
    fn output_count(&self) -> usize;
}

impl PortSummary for PortRecord {
    fn coordinate(&self) -> Coord {
        self.coordinate
    }
    fn block(&self) -> &str {
        &self.port.block
    }
    fn color(&self) -> &str {
        &self.port.color
    }
    fn input_count(&self) -> usize {
        self.port.input_arrows.len()
    }
    fn output_count(&self) -> usize {
        self.port.output_arrows.len()
    }
}

// v1 ports contribute 0 or 1 per side.
impl PortSummary for LegacyPortRecord {
    fn coordinate(&self) -> Coord {
        self.coordinate
    }
    fn block(&self) -> &str {
        &self.block
    }
    fn color(&self) -> &str {
        &self.color
    }
    fn input_count(&self) -> usize {
        usize::from(self.input_arrow)
    }
    fn output_count(&self) -> usize {
        usize::from(self.output_arrow)
    }
}

/// The port with the most arrows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexPort {
    /// Where it sits.
    pub coordinate: Coord,
    /// Block identifier.
    pub block: String,
    /// Colour name.
    pub color: String,
    /// Inputs plus outputs.
    pub complexity: usize,
}

/// Totals, means and frequency tables for one snapshot.
///
/// Averages are `None` for an empty snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStats {
    /// Number of ports.
    pub total_ports: usize,
    /// Sum of input arrows.
    pub total_inputs: usize,
    /// Sum of output arrows.
    pub total_outputs: usize,
    /// Mean inputs per port.
    pub average_inputs: Option<f64>,
    /// Mean outputs per port.
    pub average_outputs: Option<f64>,
    /// Port count per colour name.
    pub color_distribution: BTreeMap<String, usize>,
    /// Port count per block identifier.
    pub block_distribution: BTreeMap<String, usize>,
    /// Highest-complexity port; first one wins a tie.
    pub most_complex_port: Option<ComplexPort>,
}

fn mean(total: usize, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    // A grid holds at most 256 ports, so both fit in u32 exactly.
    let total = f64::from(u32::try_from(total).unwrap_or(u32::MAX));
    let count = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
    Some(total / count)
}

impl GridStats {
    /// Single pass over `ports`.
    pub fn from_ports<'a, P>(ports: impl IntoIterator<Item = &'a P>) -> Self
    where
        P: PortSummary + 'a,
    {
        let mut stats = Self::default();
        for port in ports {
            let inputs = port.input_count();
            let outputs = port.output_count();
            stats.total_ports += 1;
            stats.total_inputs += inputs;
            stats.total_outputs += outputs;
            *stats
                .color_distribution
                .entry(port.color().to_owned())
                .or_default() += 1;
            *stats
                .block_distribution
                .entry(port.block().to_owned())
                .or_default() += 1;

            let complexity = inputs + outputs;
            let beats = stats
                .most_complex_port
                .as_ref()
                .is_none_or(|best| complexity > best.complexity);
            if beats {
                stats.most_complex_port = Some(ComplexPort {
                    coordinate: port.coordinate(),
                    block: port.block().to_owned(),
                    color: port.color().to_owned(),
                    complexity,
                });
            }
        }
        stats.average_inputs = mean(stats.total_inputs, stats.total_ports);
        stats.average_outputs = mean(stats.total_outputs, stats.total_ports);
        stats
    }

    /// Statistics for a document of either schema.
    pub fn of(snapshot: &AnySnapshot) -> Self {
        match snapshot {
            AnySnapshot::Legacy(s) => Self::from_ports(&s.ports),
            AnySnapshot::Current(s) => Self::from_ports(&s.ports),
        }
    }
}

impl GridSnapshot {
    /// Statistics for this snapshot.
    pub fn stats(&self) -> GridStats {
        GridStats::from_ports(&self.ports)
    }
}
