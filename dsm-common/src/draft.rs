//! Draft documents
//!
//! A draft is the in-progress state of one method page: task text,
//! counts, item names, matrices and any other form inputs. The shape
//! follows what the pages submit; unknown keys are carried through
//! untouched so older and newer pages can share the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matrix::ComparisonMatrix;
use crate::method::MethodType;

/// Plain grid (binary relations, competence, cost tables). No reciprocal rule.
pub type Grid = Vec<Vec<String>>;

/// Scalar captured from an arbitrary form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state
    Flag(bool),
    /// Text, number or selected option value
    Text(String),
}

impl FieldValue {
    /// Text content; a flag reads as `"true"` / `"false"`
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// Matrices entered on a method page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrices {
    /// Pairwise comparison of criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<ComparisonMatrix>,

    /// Pairwise comparison of alternatives, keyed by criterion
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alternatives: BTreeMap<String, ComparisonMatrix>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competence: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experts_data: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximin: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savage: Option<Grid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hurwitz: Option<Grid>,
}

impl Matrices {
    pub fn is_empty(&self) -> bool {
        self.criteria.is_none()
            && self.alternatives.is_empty()
            && self.binary.is_none()
            && self.competence.is_none()
            && self.experts_data.is_none()
            && self.cost.is_none()
            && self.maximin.is_none()
            && self.savage.is_none()
            && self.hurwitz.is_none()
    }
}

/// Form state of a method page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(default)]
    pub task: Option<String>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub num_alternatives: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_criteria: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_conditions: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_objects: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_experts: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub num_research: u32,

    #[serde(default, deserialize_with = "lenient::names")]
    pub alternatives: Vec<String>,
    #[serde(default, deserialize_with = "lenient::names")]
    pub criteria: Vec<String>,
    /// States of nature (Savage)
    #[serde(default, deserialize_with = "lenient::names")]
    pub conditions: Vec<String>,
    /// Compared objects (binary relations)
    #[serde(default, deserialize_with = "lenient::names")]
    pub objects: Vec<String>,
    /// Research items (experts)
    #[serde(default, deserialize_with = "lenient::names")]
    pub research: Vec<String>,

    /// Hurwitz optimism coefficient
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_type: Option<String>,

    #[serde(default)]
    pub matrices: Matrices,

    /// Remaining named inputs, checkboxes and selects
    #[serde(default)]
    pub other_data: BTreeMap<String, FieldValue>,

    /// When the page state was captured (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Keys this version does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Pages submit counts and coefficients straight from input values, so the
/// same field may arrive as `3`, `"3"`, `""` or `null`. Name lists may
/// contain `null` holes for inputs that were never rendered.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                .map(|v| v.min(u32::MAX as u64) as u32)
                .unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
        Ok(names
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }
}

fn any_named(names: &[String]) -> bool {
    names.iter().any(|n| !n.trim().is_empty())
}

fn all_blank(names: &[String]) -> bool {
    !any_named(names)
}

impl FormData {
    /// Whether the page holds anything worth saving
    pub fn has_content(&self) -> bool {
        self.task.as_deref().map(|t| !t.is_empty()).unwrap_or(false)
            || self.num_alternatives > 0
            || self.num_criteria > 0
            || self.num_conditions > 0
            || self.num_objects > 0
            || self.num_experts > 0
            || self.num_research > 0
            || any_named(&self.alternatives)
            || any_named(&self.criteria)
            || any_named(&self.conditions)
            || any_named(&self.objects)
            || any_named(&self.research)
            || !self.matrices.is_empty()
    }

    /// Fill gaps from a previously restored draft
    ///
    /// After a draft is restored, later pages may not render every field
    /// again. Zero counts, all-blank name lists, a blank task and empty
    /// matrices are taken from `restored` so re-saving does not lose them.
    pub fn fill_from(&mut self, restored: &FormData) {
        fn count(current: &mut u32, restored: u32) {
            if *current == 0 {
                *current = restored;
            }
        }
        fn names(current: &mut Vec<String>, restored: &[String]) {
            if all_blank(current) {
                *current = restored.to_vec();
            }
        }

        count(&mut self.num_alternatives, restored.num_alternatives);
        count(&mut self.num_criteria, restored.num_criteria);
        count(&mut self.num_conditions, restored.num_conditions);
        count(&mut self.num_objects, restored.num_objects);
        count(&mut self.num_experts, restored.num_experts);
        count(&mut self.num_research, restored.num_research);

        names(&mut self.alternatives, &restored.alternatives);
        names(&mut self.criteria, &restored.criteria);
        names(&mut self.conditions, &restored.conditions);
        names(&mut self.objects, &restored.objects);
        names(&mut self.research, &restored.research);

        if self.task.as_deref().map(|t| t.trim().is_empty()).unwrap_or(true) {
            self.task = restored.task.clone();
        }

        if self.matrices.is_empty() {
            self.matrices = restored.matrices.clone();
        }
    }

    /// Same page content, ignoring the capture timestamp
    pub fn same_content(&self, other: &FormData) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.timestamp = None;
        b.timestamp = None;
        a == b
    }
}

/// A draft as the page layer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub method_type: MethodType,
    pub route: String,
    pub form_data: FormData,
    pub title: Option<String>,
}

impl DraftRecord {
    /// Record for the page at `route`; the method is derived from the route
    pub fn for_route(route: &str, form_data: FormData, title: Option<String>) -> Self {
        Self {
            method_type: MethodType::from_route(route),
            route: route.to_string(),
            form_data,
            title,
        }
    }
}
