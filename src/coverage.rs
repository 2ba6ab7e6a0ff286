//! Recording of which CLI subcommands and options have been exercised.

use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use crate::consts::SUBCOMMAND_MARK;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct CoverageNode {
    count: u64,
    children: BTreeMap<String, CoverageNode>,
}

impl CoverageNode {
    fn to_json(&self) -> JsonValue {
        let mut obj = serde_json::Map::new();
        obj.insert("_count".to_string(), json!(self.count));
        for (name, child) in &self.children {
            obj.insert(name.clone(), child.to_json());
        }
        JsonValue::Object(obj)
    }
}

/// A tree of executed subcommands and options with per-node hit counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliCoverage {
    root: BTreeMap<String, CoverageNode>,
}

impl CliCoverage {
    /// An empty coverage record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed command.
    ///
    /// Option values are skipped; a [`SUBCOMMAND_MARK`] forces the following
    /// argument to be treated as a subcommand even when it trails an option.
    pub fn record(&mut self, cli_args: &[String]) {
        let mut tokens = Vec::new();
        let mut prev_arg = "";
        for arg in cli_args {
            if arg == SUBCOMMAND_MARK {
                prev_arg = SUBCOMMAND_MARK;
                continue;
            }
            // An argument following an option is that option's value.
            if prev_arg.starts_with("--") && !arg.starts_with("--") {
                continue;
            }
            prev_arg = arg;
            tokens.push(arg.clone());
        }
        walk(&mut self.root, &tokens);
    }

    /// The recorded coverage as JSON, counters stored under `_count`.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = serde_json::Map::new();
        for (name, node) in &self.root {
            obj.insert(name.clone(), node.to_json());
        }
        JsonValue::Object(obj)
    }

    /// Whether anything has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn walk(level: &mut BTreeMap<String, CoverageNode>, tokens: &[String]) {
    let Some((first, rest)) = tokens.split_first() else {
        return;
    };
    let node = level.entry(first.clone()).or_default();
    node.count += 1;
    if first.starts_with("--") {
        walk(level, rest);
    } else {
        walk(&mut node.children, rest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn counts_subcommands_and_options() {
        let mut coverage = CliCoverage::new();
        coverage.record(&args(&[
            "cardano-cli",
            "latest",
            "query",
            "tip",
            "--testnet-magic",
            "42",
        ]));
        coverage.record(&args(&["cardano-cli", "latest", "query", "tip"]));

        let json = coverage.to_json();
        assert_eq!(json["cardano-cli"]["_count"], 2);
        assert_eq!(json["cardano-cli"]["latest"]["query"]["tip"]["_count"], 2);
        assert_eq!(
            json["cardano-cli"]["latest"]["query"]["tip"]["--testnet-magic"]["_count"],
            1
        );
        // The option value must not become a node.
        assert!(json["cardano-cli"]["latest"]["query"]["tip"]
            .get("42")
            .is_none());
    }

    #[test]
    fn subcommand_mark_descends_after_option_value() {
        let mut coverage = CliCoverage::new();
        coverage.record(&args(&[
            "cardano-cli",
            "latest",
            "query",
            "tx-mempool",
            "--cardano-mode",
            SUBCOMMAND_MARK,
            "info",
        ]));

        let json = coverage.to_json();
        let mempool = &json["cardano-cli"]["latest"]["query"]["tx-mempool"];
        assert_eq!(mempool["_count"], 1);
        assert_eq!(mempool["--cardano-mode"]["_count"], 1);
        assert_eq!(mempool["info"]["_count"], 1);
    }
}
