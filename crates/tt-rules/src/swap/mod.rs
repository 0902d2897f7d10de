//! Consume/produce swaps: trade a group of objects for others.
//!
//! A [`SwapRule`] names what it consumes and what it produces with symbolic
//! names (`fighter_x1`, `fighter $COLOR`) that the [`NameTable`] resolves to
//! nsids. [`SwapEngine::on_r`] is the entry point when a player asks to swap
//! around an object.

pub mod rules;

pub use rules::{COLOR_TEMPLATE, NameTable, builtin_rules};

use serde::{Deserialize, Serialize};
use tt_core::{ObjectId, Seat, Table, TableHost, TableObject, matches_type};

use crate::error::{RulesError, RulesResult};
use crate::messages;

/// What a rule consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeSpec {
    /// A single accepted name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Several accepted names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Objects per application (1 if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl ConsumeSpec {
    /// Every accepted name.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.name.iter().chain(self.names.iter()).map(String::as_str)
    }

    fn per_application(&self) -> usize {
        self.count.unwrap_or(1).max(1) as usize
    }
}

/// What a rule produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceSpec {
    /// Produced name; may contain `$COLOR`.
    pub name: String,
    /// Objects per application (1 if absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// One consume/produce rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRule {
    /// Only face-up objects qualify.
    #[serde(default)]
    pub face_up: bool,
    /// Only face-down objects qualify.
    #[serde(default)]
    pub face_down: bool,
    /// Apply as many times as the matches allow.
    #[serde(default)]
    pub repeat: bool,
    /// Consumed objects.
    pub consume: ConsumeSpec,
    /// Produced objects.
    pub produce: ProduceSpec,
}

/// What a rule would produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Produce {
    /// Resolved nsid.
    pub id: String,
    /// Owner color, for templated names.
    pub color: Option<String>,
    /// Number of objects; 0 means nothing to do.
    pub count: u32,
}

/// The outcome of applying one rule to candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapResult<'t> {
    /// Objects to remove.
    pub consume: Vec<&'t TableObject>,
    /// Objects to create.
    pub produce: Produce,
}

/// What [`SwapEngine::on_r`] changed on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Removed object ids.
    pub consumed: Vec<ObjectId>,
    /// Spawned object ids.
    pub produced: Vec<ObjectId>,
    /// Player-facing summary.
    pub message: String,
}

/// True if `candidate` may be consumed on behalf of `color`.
///
/// Tokens carry no owner and always qualify; units must carry the color in
/// their saved data.
pub fn is_color(candidate: &TableObject, color: &str) -> bool {
    if matches_type(&candidate.nsid, "token") {
        return true;
    }
    candidate.saved_color().as_deref() == Some(color)
}

/// Rules plus the names they use.
#[derive(Debug, Clone, Default)]
pub struct SwapEngine {
    names: NameTable,
    rules: Vec<SwapRule>,
}

impl SwapEngine {
    /// An engine with the given names and rules, tried in order.
    pub fn new(names: NameTable, rules: Vec<SwapRule>) -> Self {
        Self { names, rules }
    }

    /// The built-in names and rules.
    pub fn builtin() -> Self {
        Self::new(NameTable::builtin(), builtin_rules())
    }

    /// Rules, in the order they are tried.
    pub fn rules(&self) -> &[SwapRule] {
        &self.rules
    }

    /// True if `candidate` matches one of the rule's names and its face
    /// filter.
    ///
    /// A name bound in the name table matches by nsid; an unbound name
    /// matches the nsid's name part.
    pub fn is_consumable(&self, candidate: &TableObject, rule: &SwapRule) -> bool {
        if rule.face_up && !candidate.face_up {
            return false;
        }
        if rule.face_down && candidate.face_up {
            return false;
        }
        let Some(nsid) = candidate.parsed_nsid() else {
            return false;
        };
        rule.consume.all_names().any(|name| match self.names.nsid(name) {
            Some(bound) => bound == candidate.nsid,
            None => nsid.name == name,
        })
    }

    fn resolve_produce(&self, rule: &SwapRule, color: &str) -> RulesResult<(String, Option<String>)> {
        let name = &rule.produce.name;
        let id = self
            .names
            .nsid(name)
            .ok_or_else(|| RulesError::UnknownSwapName(name.clone()))?;
        let color = name.contains(COLOR_TEMPLATE).then(|| color.to_string());
        Ok((id.to_string(), color))
    }

    /// Apply `rule` to `candidates` on behalf of the player with `color`.
    ///
    /// Without `repeat`, consumes exactly `consume.count` matches (or none if
    /// there are fewer) and produces `produce.count`. With `repeat`, consumes
    /// whole groups of `consume.count` and produces `produce.count` per group.
    pub fn apply_rule<'t>(
        &self,
        candidates: &[&'t TableObject],
        rule: &SwapRule,
        color: &str,
    ) -> RulesResult<SwapResult<'t>> {
        let (id, produce_color) = self.resolve_produce(rule, color)?;
        let matches: Vec<&'t TableObject> = candidates
            .iter()
            .copied()
            .filter(|c| self.is_consumable(c, rule) && is_color(c, color))
            .collect();

        let per = rule.consume.per_application();
        let applications = if rule.repeat {
            matches.len() / per
        } else if matches.len() >= per {
            1
        } else {
            0
        };
        let consume = matches.into_iter().take(applications * per).collect();
        let count = applications as u32 * rule.produce.count.unwrap_or(1);
        Ok(SwapResult {
            consume,
            produce: Produce {
                id,
                color: produce_color,
                count,
            },
        })
    }

    /// Swap around `object_id` for `player`.
    ///
    /// Candidates are the objects in the same hex (or just the object when it
    /// is off the map), the triggering object first. The first rule that
    /// consumes the triggering object and produces something wins. Returns
    /// `None` when no rule applies.
    pub fn on_r(
        &self,
        table: &mut Table,
        object_id: &ObjectId,
        player: &Seat,
    ) -> RulesResult<Option<SwapOutcome>> {
        let color = player.color_name.as_str();
        let (consumed, produce, template) = {
            let trigger = table.get(object_id)?;
            let mut candidates: Vec<&TableObject> = vec![trigger];
            if let Some(hex) = trigger.hex {
                candidates.extend(table.objects_in_hex(hex).filter(|o| o.id != trigger.id));
            }

            let mut plan = None;
            for rule in &self.rules {
                if !self.is_consumable(trigger, rule) || !is_color(trigger, color) {
                    continue;
                }
                let result = self.apply_rule(&candidates, rule, color)?;
                if result.produce.count == 0 {
                    continue;
                }
                let consumed: Vec<ObjectId> = result.consume.iter().map(|o| o.id.clone()).collect();
                plan = Some((consumed, result.produce));
                break;
            }
            let Some((consumed, produce)) = plan else {
                tracing::debug!(object = %object_id, "no swap rule applies");
                return Ok(None);
            };
            let template = TableObject::new(ObjectId::new(), produce.id.clone())
                .with_position(trigger.position)
                .with_owner(player.slot);
            let template = match trigger.hex {
                Some(hex) => template.with_hex(hex),
                None => template,
            };
            (consumed, produce, template)
        };

        let outcome = execute(table, consumed, &produce, template)?;
        tracing::info!(
            player = %player.name,
            consumed = outcome.consumed.len(),
            produced = outcome.produced.len(),
            nsid = %produce.id,
            "swapped"
        );
        Ok(Some(SwapOutcome {
            message: messages::swapped(
                &player.name,
                outcome.consumed.len(),
                produce.count,
                &produce.id,
            ),
            ..outcome
        }))
    }
}

fn execute(
    host: &mut dyn TableHost,
    consumed: Vec<ObjectId>,
    produce: &Produce,
    template: TableObject,
) -> RulesResult<SwapOutcome> {
    for id in &consumed {
        host.destroy_object(id)?;
    }
    let mut produced = Vec::with_capacity(produce.count as usize);
    for _ in 0..produce.count {
        let mut object = template.clone();
        object.id = ObjectId::new();
        if let Some(color) = &produce.color {
            object = object.with_color(color);
        }
        produced.push(host.spawn_object(object));
    }
    Ok(SwapOutcome {
        consumed,
        produced,
        message: String::new(),
    })
}
