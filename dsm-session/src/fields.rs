//! Page field access
//!
//! Method pages name their inputs inconsistently (`task` on one page,
//! `savage_task` on another). [`FieldRegistry`] lists the candidate names
//! for every logical field; [`gather`] and [`restore`] move values between
//! a page, seen through [`FieldSource`] / [`FieldSink`], and a [`FormData`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use dsm_common::draft::{FieldValue, Grid};
use dsm_common::{ComparisonMatrix, FormData};
use tracing::{debug, warn};

/// Per-method entity counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Alternatives,
    Criteria,
    Conditions,
    Objects,
    Experts,
    Research,
}

/// Per-method name lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameList {
    Alternatives,
    Criteria,
    Conditions,
    Objects,
    Research,
}

fn count_mut(form: &mut FormData, field: CountField) -> &mut u32 {
    match field {
        CountField::Alternatives => &mut form.num_alternatives,
        CountField::Criteria => &mut form.num_criteria,
        CountField::Conditions => &mut form.num_conditions,
        CountField::Objects => &mut form.num_objects,
        CountField::Experts => &mut form.num_experts,
        CountField::Research => &mut form.num_research,
    }
}

fn count_of(form: &FormData, field: CountField) -> u32 {
    match field {
        CountField::Alternatives => form.num_alternatives,
        CountField::Criteria => form.num_criteria,
        CountField::Conditions => form.num_conditions,
        CountField::Objects => form.num_objects,
        CountField::Experts => form.num_experts,
        CountField::Research => form.num_research,
    }
}

fn names_of(form: &FormData, list: NameList) -> &[String] {
    match list {
        NameList::Alternatives => &form.alternatives,
        NameList::Criteria => &form.criteria,
        NameList::Conditions => &form.conditions,
        NameList::Objects => &form.objects,
        NameList::Research => &form.research,
    }
}

fn names_mut(form: &mut FormData, list: NameList) -> &mut Vec<String> {
    match list {
        NameList::Alternatives => &mut form.alternatives,
        NameList::Criteria => &mut form.criteria,
        NameList::Conditions => &mut form.conditions,
        NameList::Objects => &mut form.objects,
        NameList::Research => &mut form.research,
    }
}

/// Where each logical field lives on a page
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    /// Candidate names for the task description, first match wins
    pub task: Vec<String>,
    /// Candidate input names per count
    pub counts: Vec<(CountField, Vec<String>)>,
    /// Indexed input name per name list
    pub names: Vec<(NameList, String)>,
    /// Container holding the criteria comparison matrix
    pub criteria_matrix: String,
    /// Prefix of per-criterion alternative matrix containers
    pub alternatives_prefix: String,
    /// Hurwitz optimism coefficient input
    pub alpha: String,
    /// Cost/profit selector input
    pub matrix_type: String,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        let task = ["", "hierarchy_", "binary_", "experts_", "laplasa_", "maximin_", "hurwitz_", "savage_"]
            .iter()
            .map(|prefix| format!("{}task", prefix))
            .collect();

        let counts = vec![
            (CountField::Alternatives, vec!["num_alternatives".into(), "num_alt".into()]),
            (CountField::Criteria, vec!["num_criteria".into()]),
            (CountField::Conditions, vec!["num_conditions".into()]),
            (CountField::Objects, vec!["num".into()]),
            (CountField::Experts, vec!["num_experts".into()]),
            (CountField::Research, vec!["num_research".into()]),
        ];

        let names = vec![
            (NameList::Alternatives, "name_alternatives".into()),
            (NameList::Criteria, "name_criteria".into()),
            (NameList::Conditions, "name_conditions".into()),
            (NameList::Objects, "names".into()),
            (NameList::Research, "name_research".into()),
        ];

        Self {
            task,
            counts,
            names,
            criteria_matrix: "criteria".into(),
            alternatives_prefix: "alternatives_".into(),
            alpha: "alpha".into(),
            matrix_type: "matrix_type".into(),
        }
    }
}

impl FieldRegistry {
    /// Every input name the registry claims; the rest go to `other_data`
    fn claimed(&self) -> BTreeSet<&str> {
        self.task
            .iter()
            .chain(self.counts.iter().flat_map(|(_, names)| names.iter()))
            .chain(self.names.iter().map(|(_, name)| name))
            .chain([&self.alpha, &self.matrix_type])
            .map(String::as_str)
            .collect()
    }

    fn is_name_list(&self, name: &str) -> bool {
        self.names.iter().any(|(_, n)| n == name)
    }
}

/// Read access to the inputs of a page
pub trait FieldSource {
    /// Value of the named input; `None` when the page has no such input.
    /// Checkboxes read as flags, unchecked radio groups as `None`.
    fn value(&self, name: &str) -> Option<FieldValue>;

    /// Values of an indexed input group in index order
    fn indexed(&self, name: &str) -> Vec<String>;

    /// Cells of a matrix container, row-major; `None` when absent or empty
    fn matrix(&self, container: &str) -> Option<Grid>;

    /// Names of every matrix container on the page
    fn matrix_containers(&self) -> Vec<String>;

    /// Names of every plain input on the page
    fn field_names(&self) -> Vec<String>;
}

/// Write access to the inputs of a page
///
/// Each setter returns false when the page has no matching input; the
/// value is then dropped.
pub trait FieldSink {
    fn set_value(&mut self, name: &str, value: &FieldValue) -> bool;

    fn set_indexed(&mut self, name: &str, index: usize, value: &str) -> bool;

    fn set_matrix(&mut self, container: &str, rows: &[Vec<String>]) -> bool;
}

/// Scrape a page into a [`FormData`]
pub fn gather<S: FieldSource + ?Sized>(source: &S, registry: &FieldRegistry) -> FormData {
    let mut form = FormData::default();

    form.task = registry.task.iter().find_map(|name| text_of(source, name));

    for (field, candidates) in &registry.counts {
        let count = candidates
            .iter()
            .find_map(|name| text_of(source, name)?.trim().parse().ok())
            .unwrap_or(0);
        *count_mut(&mut form, *field) = count;
    }

    form.alpha = text_of(source, &registry.alpha).and_then(|t| t.trim().parse().ok());
    form.matrix_type = text_of(source, &registry.matrix_type);

    for (list, name) in &registry.names {
        *names_mut(&mut form, *list) = source.indexed(name);
    }

    form.matrices.criteria = read_matrix(source, &registry.criteria_matrix);
    for container in source.matrix_containers() {
        let Some(key) = container.strip_prefix(&registry.alternatives_prefix) else {
            continue;
        };
        if let Some(matrix) = read_matrix(source, &container) {
            form.matrices.alternatives.insert(key.to_string(), matrix);
        }
    }

    let claimed = registry.claimed();
    form.other_data = source
        .field_names()
        .into_iter()
        .filter(|name| !claimed.contains(name.as_str()))
        .filter_map(|name| source.value(&name).map(|v| (name, v)))
        .collect();

    form.timestamp = Some(Utc::now().to_rfc3339());
    form
}

/// Non-blank text of an input; blank inputs defer to the next candidate
fn text_of<S: FieldSource + ?Sized>(source: &S, name: &str) -> Option<String> {
    source
        .value(name)
        .map(|v| v.as_text())
        .filter(|t| !t.trim().is_empty())
}

/// Rendered matrix with at least one comparison entered
///
/// A freshly rendered grid only holds its diagonal and does not count as
/// page content.
fn read_matrix<S: FieldSource + ?Sized>(source: &S, container: &str) -> Option<ComparisonMatrix> {
    let matrix = ComparisonMatrix::restore_from_rows(&source.matrix(container)?);
    let size = matrix.size();
    let touched = (0..size).any(|r| (0..size).any(|c| r != c && matrix.is_set(r, c)));
    touched.then_some(matrix)
}

/// Write a [`FormData`] back onto a page
///
/// Pairwise matrices are written from their reconstructed form, so the
/// page shows reciprocal pairs even when the stored draft did not.
pub fn restore<S: FieldSink + ?Sized>(sink: &mut S, registry: &FieldRegistry, form: &FormData) {
    if let Some(task) = form.task.as_deref() {
        let value = FieldValue::from(task);
        if !registry.task.iter().any(|name| sink.set_value(name, &value)) {
            warn!("No task input on page");
        }
    }

    for (field, candidates) in &registry.counts {
        let count = count_of(form, *field);
        if count == 0 {
            continue;
        }
        let value = FieldValue::Text(count.to_string());
        candidates.iter().any(|name| sink.set_value(name, &value));
    }

    if let Some(alpha) = form.alpha {
        sink.set_value(&registry.alpha, &FieldValue::Text(alpha.to_string()));
    }
    if let Some(matrix_type) = form.matrix_type.as_deref() {
        sink.set_value(&registry.matrix_type, &FieldValue::from(matrix_type));
    }

    for (list, name) in &registry.names {
        for (index, value) in names_of(form, *list).iter().enumerate() {
            if !sink.set_indexed(name, index, value) {
                debug!(field = %name, index, "Name input not found");
            }
        }
    }

    if let Some(criteria) = &form.matrices.criteria {
        sink.set_matrix(&registry.criteria_matrix, &criteria.to_rows());
    }
    for (key, matrix) in &form.matrices.alternatives {
        let container = format!("{}{}", registry.alternatives_prefix, key);
        sink.set_matrix(&container, &matrix.to_rows());
    }

    for (name, value) in &form.other_data {
        if registry.is_name_list(name) {
            continue;
        }
        if !sink.set_value(name, value) {
            debug!(field = %name, "Input not found for restored value");
        }
    }
}

/// In-memory page, for headless use and tests
///
/// Inputs must be declared before they can be written, the way a rendered
/// page only has the inputs its template produced.
#[derive(Debug, Clone, Default)]
pub struct MemoryFields {
    values: BTreeMap<String, Option<FieldValue>>,
    indexed: BTreeMap<String, Vec<String>>,
    matrices: BTreeMap<String, Grid>,
}

impl MemoryFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an input with an initial value
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.to_string(), Some(value.into()));
        self
    }

    /// Declare an input whose value is unset (an unchecked radio group)
    pub fn with_empty_field(mut self, name: &str) -> Self {
        self.values.insert(name.to_string(), None);
        self
    }

    /// Declare `len` indexed inputs, all blank
    pub fn with_list(mut self, name: &str, len: usize) -> Self {
        self.indexed.insert(name.to_string(), vec![String::new(); len]);
        self
    }

    /// Declare a `size` x `size` matrix container with a "1" diagonal
    pub fn with_matrix(mut self, container: &str, size: usize) -> Self {
        self.matrices
            .insert(container.to_string(), ComparisonMatrix::new(size).to_rows());
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.indexed.get(name).map(Vec::as_slice)
    }

    pub fn grid(&self, container: &str) -> Option<&Grid> {
        self.matrices.get(container)
    }

    /// Simulate typing into a declared matrix cell
    pub fn type_cell(&mut self, container: &str, row: usize, col: usize, value: &str) -> bool {
        match self
            .matrices
            .get_mut(container)
            .and_then(|grid| grid.get_mut(row))
            .and_then(|r| r.get_mut(col))
        {
            Some(cell) => {
                *cell = value.to_string();
                true
            }
            None => false,
        }
    }
}

impl FieldSource for MemoryFields {
    fn value(&self, name: &str) -> Option<FieldValue> {
        self.values.get(name).cloned().flatten()
    }

    fn indexed(&self, name: &str) -> Vec<String> {
        self.indexed.get(name).cloned().unwrap_or_default()
    }

    fn matrix(&self, container: &str) -> Option<Grid> {
        self.matrices
            .get(container)
            .filter(|grid| !grid.is_empty())
            .cloned()
    }

    fn matrix_containers(&self) -> Vec<String> {
        self.matrices.keys().cloned().collect()
    }

    fn field_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

impl FieldSink for MemoryFields {
    fn set_value(&mut self, name: &str, value: &FieldValue) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = Some(value.clone());
                true
            }
            None => false,
        }
    }

    fn set_indexed(&mut self, name: &str, index: usize, value: &str) -> bool {
        match self.indexed.get_mut(name).and_then(|l| l.get_mut(index)) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn set_matrix(&mut self, container: &str, rows: &[Vec<String>]) -> bool {
        let Some(grid) = self.matrices.get_mut(container) else {
            return false;
        };
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if let Some(value) = rows.get(r).and_then(|src| src.get(c)) {
                    *cell = value.clone();
                }
            }
        }
        true
    }
}
