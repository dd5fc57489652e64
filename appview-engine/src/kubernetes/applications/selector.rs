//! Label selector evaluation
//!
//! Compiles a selector document into a predicate over label sets. A present
//! but empty selector matches everything; an absent controller selector is
//! rejected at compile time instead of silently adopting every pod.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::kubernetes::types::{LabelSelector, LabelSelectorRequirement};

/// Why a selector document could not be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidSelector(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Operator {
    Equals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Equals | Operator::In => value.is_some_and(|v| self.values.contains(v)),
            // An absent key satisfies NotIn
            Operator::NotIn => value.map_or(true, |v| !self.values.contains(v)),
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = || self.values.iter().cloned().collect::<Vec<_>>().join(",");
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, values()),
            Operator::In => write!(f, "{} in ({})", self.key, values()),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, values()),
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
        }
    }
}

/// Compiled label selector: an AND of requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// Compile a controller's selector. `None` is an error.
    pub fn from_label_selector(selector: Option<&LabelSelector>) -> Result<Self, InvalidSelector> {
        let selector =
            selector.ok_or_else(|| InvalidSelector("selector is missing".to_string()))?;

        let mut requirements = Vec::with_capacity(
            selector.match_labels.len() + selector.match_expressions.len(),
        );

        for (key, value) in &selector.match_labels {
            check_key(key)?;
            requirements.push(Requirement {
                key: key.clone(),
                operator: Operator::Equals,
                values: BTreeSet::from([value.clone()]),
            });
        }

        for expression in &selector.match_expressions {
            requirements.push(compile_expression(expression)?);
        }

        requirements.sort();
        requirements.dedup();

        Ok(Self { requirements })
    }

    /// Compile an equality-only selector such as a Service's.
    ///
    /// Absent and empty both match everything.
    pub fn from_labels(labels: Option<&BTreeMap<String, String>>) -> Self {
        let requirements = labels
            .into_iter()
            .flatten()
            .map(|(key, value)| Requirement {
                key: key.clone(),
                operator: Operator::Equals,
                values: BTreeSet::from([value.clone()]),
            })
            .collect();

        Self { requirements }
    }

    /// True when the selector places no constraint at all
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Evaluate the selector against a label set
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.requirements.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", rendered.join(","))
    }
}

fn check_key(key: &str) -> Result<(), InvalidSelector> {
    if key.is_empty() {
        return Err(InvalidSelector("selector key must not be empty".to_string()));
    }
    Ok(())
}

fn compile_expression(expression: &LabelSelectorRequirement) -> Result<Requirement, InvalidSelector> {
    check_key(&expression.key)?;

    let operator = match expression.operator.as_str() {
        "In" => Operator::In,
        "NotIn" => Operator::NotIn,
        "Exists" => Operator::Exists,
        "DoesNotExist" => Operator::DoesNotExist,
        other => {
            return Err(InvalidSelector(format!(
                "unknown operator '{}' for key '{}'",
                other, expression.key
            )))
        }
    };

    let needs_values = matches!(operator, Operator::In | Operator::NotIn);
    if needs_values && expression.values.is_empty() {
        return Err(InvalidSelector(format!(
            "operator '{}' for key '{}' requires at least one value",
            expression.operator, expression.key
        )));
    }
    if !needs_values && !expression.values.is_empty() {
        return Err(InvalidSelector(format!(
            "operator '{}' for key '{}' takes no values",
            expression.operator, expression.key
        )));
    }

    Ok(Requirement {
        key: expression.key.clone(),
        operator,
        values: expression.values.iter().cloned().collect(),
    })
}
