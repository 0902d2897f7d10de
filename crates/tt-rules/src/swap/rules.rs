//! Built-in swap names and rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ConsumeSpec, ProduceSpec, SwapRule};

/// Placeholder replaced by the acting player's color.
pub const COLOR_TEMPLATE: &str = "$COLOR";

/// Maps symbolic rule names to nsids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl NameTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `nsid`.
    pub fn insert(&mut self, name: impl Into<String>, nsid: impl Into<String>) {
        self.names.insert(name.into(), nsid.into());
    }

    /// The nsid bound to `name`.
    pub fn nsid(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// Names shipped with the engine.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for unit in ["fighter", "infantry"] {
            table.insert(format!("{unit}_x1"), format!("token:base/{unit}_1"));
            table.insert(format!("{unit}_x3"), format!("token:base/{unit}_3"));
            table.insert(format!("{unit} {COLOR_TEMPLATE}"), format!("unit:base/{unit}"));
        }
        table.insert("tradegood_x1", "token:base/tradegood_commodity_1");
        table.insert("tradegood_x3", "token:base/tradegood_commodity_3");
        table
    }
}

fn rule(consume: &str, count: u32, produce: &str, produce_count: u32) -> SwapRule {
    SwapRule {
        face_up: false,
        face_down: false,
        repeat: false,
        consume: ConsumeSpec {
            name: Some(consume.to_string()),
            names: Vec::new(),
            count: Some(count),
        },
        produce: ProduceSpec {
            name: produce.to_string(),
            count: Some(produce_count),
        },
    }
}

/// Rules shipped with the engine, in the order they are tried.
pub fn builtin_rules() -> Vec<SwapRule> {
    let mut rules = Vec::new();
    for unit in ["fighter", "infantry"] {
        let x1 = format!("{unit}_x1");
        let x3 = format!("{unit}_x3");
        let plastic = format!("{unit} {COLOR_TEMPLATE}");
        rules.push(rule(&x3, 1, &x1, 3));
        rules.push(rule(&x1, 3, &x3, 1));
        rules.push(SwapRule {
            repeat: true,
            ..rule(&x1, 1, &plastic, 1)
        });
    }
    rules.push(SwapRule {
        face_up: true,
        ..rule("tradegood_x3", 1, "tradegood_x1", 3)
    });
    rules.push(SwapRule {
        face_up: true,
        ..rule("tradegood_x1", 3, "tradegood_x3", 1)
    });
    rules
}
