//! Snapshot types produced by the data source.
//!
//! A [`BoardState`] is immutable value data. The board only ever swaps the
//! `Arc` it holds; equality between two snapshots is structural so a source
//! that rebuilds an unchanged snapshot on every poll causes no redraw work.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardState {
    /// Station name shown as the title of the "no services" screen
    pub name: String,
    pub departures: Vec<Departure>,
    /// Informational messages rotated while no services are running
    pub messages: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Departure {
    /// Timetabled departure, "HH:MM"
    pub scheduled: String,
    /// Expected departure, "HH:MM"
    pub actual: String,
    pub destination: String,
    pub platform: Option<String>,
    pub toc_name: String,
    /// Number of coaches
    pub length: Option<u32>,
    pub cancelled: bool,
    /// The train is standing at the platform
    pub arrived: bool,
    pub stops: Vec<Stop>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stop {
    pub location_name: String,
    /// "HH:MM"
    pub time: String,
}

impl Departure {
    /// Text for the status column.
    pub fn status(&self) -> String {
        if self.cancelled {
            "Cancelled".to_string()
        } else if self.arrived {
            "Arrived".to_string()
        } else if self.actual == self.scheduled {
            "On time".to_string()
        } else {
            format!("Exp {}", self.actual)
        }
    }

    pub fn destination_name(&self, replacements: &BTreeMap<String, String>) -> String {
        abbreviate(&self.destination, replacements)
    }

    /// Calling points as one sentence: "A, B and C", or "A only." for a
    /// single stop. With `with_times` every stop carries its "(HH:MM)".
    pub fn calling_at(&self, replacements: &BTreeMap<String, String>, with_times: bool) -> String {
        let mut names: Vec<String> = self
            .stops
            .iter()
            .map(|stop| {
                let name = abbreviate(&stop.location_name, replacements);
                if with_times {
                    format!("{} ({})", name, stop.time)
                } else {
                    name
                }
            })
            .collect();

        match names.len() {
            0 => String::new(),
            1 => format!("{} only.", names[0]),
            _ => {
                let last = names.pop().unwrap_or_default();
                format!("{} and {}", names.join(", "), last)
            }
        }
    }
}

/// Applies every substring replacement to `name`, in key order.
pub fn abbreviate(name: &str, replacements: &BTreeMap<String, String>) -> String {
    replacements
        .iter()
        .fold(name.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
