use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Orientation angles in degrees, index-aligned with every unit's curves.
pub type Orientations = Vec<f64>;

/// Names of the fixed unit columns, in source order.
pub const CORE_COLUMNS: [&str; 6] = [
    "id",
    "layer",
    "group",
    "osi_control",
    "hbw_control",
    "mean_control",
];

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a unit column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, used for grouping keys and for the extra
/// columns a source may carry beyond the fixed unit schema.
/// Used as a `BTreeMap` key downstream so `FieldValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// Equality follows `Ord`, so NaN keys match themselves.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Null sorts after every concrete value so a null group comes last.
impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Bool(_) => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
                Null => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v:.4}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Null, |s| FieldValue::String(s.to_string()))
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Float)
    }
}

// ---------------------------------------------------------------------------
// Unit – one row of the dataset
// ---------------------------------------------------------------------------

/// A single recorded unit with its control and laser tuning curves.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub id: i64,
    /// Cortical layer label, e.g. "SG" or "G".
    pub layer: String,
    /// Modulation group ("MUL" / "MXH"), if assigned.
    pub group: Option<String>,
    /// Orientation-selectivity index under control.
    pub osi_control: f64,
    /// Half-bandwidth under control; not every unit has one.
    pub hbw_control: Option<f64>,
    pub mean_control: f64,
    /// Response per orientation without laser.
    pub control: Vec<f64>,
    /// Response per orientation with laser – same length as `control`.
    pub laser: Vec<f64>,
    /// Any further source columns, kept as-is.
    pub extra: BTreeMap<String, FieldValue>,
}

impl Unit {
    /// Look up a column by name, fixed columns first, then `extra`.
    /// Unknown columns read as `Null`.
    pub fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::Integer(self.id),
            "layer" => FieldValue::String(self.layer.clone()),
            "group" => self.group.as_deref().into(),
            "osi_control" => FieldValue::Float(self.osi_control),
            "hbw_control" => self.hbw_control.into(),
            "mean_control" => FieldValue::Float(self.mean_control),
            other => self.extra.get(other).cloned().unwrap_or(FieldValue::Null),
        }
    }
}

// ---------------------------------------------------------------------------
// UnitDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered table of units with pre-computed column indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitDataset {
    /// All units (rows), in source order.
    pub units: Vec<Unit>,
    /// Sorted distinct layer labels.
    pub layers: BTreeSet<String>,
    /// Distinct group values, null last.
    pub groups: BTreeSet<FieldValue>,
    /// Sorted names of the extra columns seen on any unit.
    pub extra_columns: Vec<String>,
}

impl UnitDataset {
    /// Build column indices from the units.
    pub fn from_units(units: Vec<Unit>) -> Self {
        let mut layers = BTreeSet::new();
        let mut groups = BTreeSet::new();
        let mut extra: BTreeSet<String> = BTreeSet::new();

        for unit in &units {
            layers.insert(unit.layer.clone());
            groups.insert(FieldValue::from(unit.group.as_deref()));
            extra.extend(unit.extra.keys().cloned());
        }

        UnitDataset {
            units,
            layers,
            groups,
            extra_columns: extra.into_iter().collect(),
        }
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether `column` names a fixed or extra column.
    pub fn has_column(&self, column: &str) -> bool {
        CORE_COLUMNS.contains(&column) || self.extra_columns.iter().any(|c| c == column)
    }

    /// Find a unit by id.
    pub fn unit(&self, id: i64) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }
}

#[cfg(test)]
pub(crate) fn unit(id: i64, layer: &str, group: Option<&str>, osi: f64, hbw: Option<f64>) -> Unit {
    Unit {
        id,
        layer: layer.to_string(),
        group: group.map(str::to_string),
        osi_control: osi,
        hbw_control: hbw,
        mean_control: 1.0,
        control: vec![1.0, 2.0, 3.0, 4.0],
        laser: vec![1.0, 2.0, 3.0, 4.0],
        extra: BTreeMap::new(),
    }
}
