use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{FieldValue, Orientations, Unit, UnitDataset, CORE_COLUMNS};
use crate::error::{Result, TuningError};

/// Schema metadata key holding the orientation vector of a Parquet file.
pub const ORIENTATIONS_METADATA_KEY: &str = "orientations";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a unit dataset and its orientation vector from a file.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.json`    – `{ "orientations": [...], "units": [{...}, ...] }`
/// * `.parquet` – one row per unit, `control` / `laser` list columns and the
///   orientations as JSON in the schema metadata
pub fn load_file(path: &Path) -> Result<(UnitDataset, Orientations)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (units, orientations) = match ext.as_str() {
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(TuningError::malformed(format!(
                "unsupported file extension: .{other}"
            )))
        }
    };

    validate_units(&units, &orientations)?;
    log::info!(
        "Loaded {} units over {} orientations from {}",
        units.len(),
        orientations.len(),
        path.display()
    );
    Ok((UnitDataset::from_units(units), orientations))
}

/// Enforce the per-row invariants every loader shares: curves aligned with
/// the orientation vector and unique ids.
fn validate_units(units: &[Unit], orientations: &[f64]) -> Result<()> {
    let mut seen = HashSet::with_capacity(units.len());
    for (i, unit) in units.iter().enumerate() {
        if !seen.insert(unit.id) {
            return Err(TuningError::malformed(format!(
                "unit {i}: duplicate id {}",
                unit.id
            )));
        }
        if unit.control.len() != unit.laser.len() {
            return Err(TuningError::malformed(format!(
                "unit {i}: control has {} values but laser has {}",
                unit.control.len(),
                unit.laser.len()
            )));
        }
        if unit.control.len() != orientations.len() {
            return Err(TuningError::malformed(format!(
                "unit {i}: curves have {} values but there are {} orientations",
                unit.control.len(),
                orientations.len()
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "orientations": [0, 45, 90, 135],
///   "units": [
///     {
///       "id": 1, "layer": "SG", "group": null,
///       "osi_control": 0.5, "hbw_control": 30, "mean_control": 2.0,
///       "control": [1, 2, 3, 4], "laser": [1, 2, 3, 4]
///     }
///   ]
/// }
/// ```
fn load_json(path: &Path) -> Result<(Vec<Unit>, Orientations)> {
    let text = std::fs::read_to_string(path)?;
    parse_json(&text)
}

/// Parse the JSON document form of a dataset.
pub fn parse_json(text: &str) -> Result<(Vec<Unit>, Orientations)> {
    let root: JsonValue = serde_json::from_str(text)
        .map_err(|e| TuningError::malformed(format!("parsing JSON: {e}")))?;
    let root = root
        .as_object()
        .ok_or_else(|| TuningError::malformed("expected a top-level JSON object"))?;

    let orientations = json_array_to_f64(root.get("orientations"), "orientations")?;
    let records = root
        .get("units")
        .and_then(|v| v.as_array())
        .ok_or_else(|| TuningError::malformed("missing or invalid 'units' array"))?;

    let units = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| TuningError::malformed(format!("unit {i} is not a JSON object")))?;
            json_to_unit(obj, i)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((units, orientations))
}

fn json_to_unit(obj: &Map<String, JsonValue>, row: usize) -> Result<Unit> {
    let missing = |col: &str| TuningError::malformed(format!("unit {row}: missing or invalid '{col}'"));

    let id = obj.get("id").and_then(json_integer).ok_or_else(|| missing("id"))?;
    let layer = obj
        .get("layer")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing("layer"))?
        .to_string();
    let group = match obj.get("group") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(_) => return Err(missing("group")),
    };
    let osi_control = obj
        .get("osi_control")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| missing("osi_control"))?;
    let hbw_control = match obj.get("hbw_control") {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(v.as_f64().ok_or_else(|| missing("hbw_control"))?),
    };
    let mean_control = obj
        .get("mean_control")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| missing("mean_control"))?;
    let control = json_array_to_f64(obj.get("control"), &format!("unit {row}: control"))?;
    let laser = json_array_to_f64(obj.get("laser"), &format!("unit {row}: laser"))?;

    let extra = obj
        .iter()
        .filter(|(key, _)| !is_fixed_key(key))
        .map(|(key, val)| (key.clone(), json_to_field(val)))
        .collect::<BTreeMap<_, _>>();

    Ok(Unit {
        id,
        layer,
        group,
        osi_control,
        hbw_control,
        mean_control,
        control,
        laser,
        extra,
    })
}

fn is_fixed_key(key: &str) -> bool {
    key == "control" || key == "laser" || CORE_COLUMNS.contains(&key)
}

/// Integral JSON number; `3.0` is accepted as `3`.
fn json_integer(val: &JsonValue) -> Option<i64> {
    val.as_i64().or_else(|| {
        val.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn json_array_to_f64(val: Option<&JsonValue>, what: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .ok_or_else(|| TuningError::malformed(format!("{what}: missing or invalid array")))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .ok_or_else(|| TuningError::malformed(format!("{what}[{j}]: not a number")))
        })
        .collect()
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one row per unit.
///
/// Expected schema:
/// - `id`: Int32 / Int64
/// - `layer`, `group` (nullable): Utf8 / LargeUtf8
/// - `osi_control`, `hbw_control` (nullable), `mean_control`: numeric
/// - `control`, `laser`: List<Float64|Float32> or LargeList of the same
/// - any other column is kept as an extra column
///
/// The orientation vector is read from the Arrow schema metadata entry
/// `orientations`, a JSON array of numbers.
fn load_parquet(path: &Path) -> Result<(Vec<Unit>, Orientations)> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let orientations: Orientations = builder
        .schema()
        .metadata()
        .get(ORIENTATIONS_METADATA_KEY)
        .ok_or_else(|| TuningError::malformed("parquet schema has no 'orientations' metadata"))
        .and_then(|raw| {
            serde_json::from_str(raw).map_err(|e| {
                TuningError::malformed(format!("parsing 'orientations' metadata: {e}"))
            })
        })?;

    let reader = builder.build()?;
    let mut units = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let id_col = required_column(&batch, "id")?;
        let layer_col = required_column(&batch, "layer")?;
        let group_col = batch.column_by_name("group");
        let osi_col = required_column(&batch, "osi_control")?;
        let hbw_col = batch.column_by_name("hbw_control");
        let mean_col = required_column(&batch, "mean_control")?;
        let control_col = required_column(&batch, "control")?;
        let laser_col = required_column(&batch, "laser")?;

        let extra_cols: Vec<(usize, String)> = batch
            .schema_ref()
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| !is_fixed_key(f.name()))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let base = units.len();
            let required = |v: Option<f64>, col: &str| {
                v.ok_or_else(|| TuningError::malformed(format!("unit {}: null '{col}'", base)))
            };

            let id = integer_at(id_col, row)?
                .ok_or_else(|| TuningError::malformed(format!("unit {base}: null 'id'")))?;
            let layer = string_at(layer_col, row)?
                .ok_or_else(|| TuningError::malformed(format!("unit {base}: null 'layer'")))?;
            let group = match group_col {
                Some(col) => string_at(col, row)?,
                None => None,
            };
            let osi_control = required(numeric_at(osi_col, row)?, "osi_control")?;
            let hbw_control = match hbw_col {
                Some(col) => numeric_at(col, row)?.filter(|v| !v.is_nan()),
                None => None,
            };
            let mean_control = required(numeric_at(mean_col, row)?, "mean_control")?;
            let control = extract_f64_list(control_col, row)
                .map_err(|e| TuningError::malformed(format!("unit {base}: control: {e}")))?;
            let laser = extract_f64_list(laser_col, row)
                .map_err(|e| TuningError::malformed(format!("unit {base}: laser: {e}")))?;

            let mut extra = BTreeMap::new();
            for (col_idx, col_name) in &extra_cols {
                extra.insert(col_name.clone(), extract_field_value(batch.column(*col_idx), row));
            }

            units.push(Unit {
                id,
                layer,
                group,
                osi_control,
                hbw_control,
                mean_control,
                control,
                laser,
                extra,
            });
        }
    }

    Ok((units, orientations))
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| TuningError::malformed(format!("parquet file missing '{name}' column")))
}

fn integer_at(col: &ArrayRef, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Int64 => Ok(Some(col.as_primitive::<Int64Type>().value(row))),
        DataType::Int32 => Ok(Some(col.as_primitive::<Int32Type>().value(row) as i64)),
        other => Err(TuningError::malformed(format!(
            "expected an integer column, got {other:?}"
        ))),
    }
}

fn numeric_at(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        other => {
            return Err(TuningError::malformed(format!(
                "expected a numeric column, got {other:?}"
            )))
        }
    };
    Ok(Some(value))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => Err(TuningError::malformed(format!(
            "expected a string column, got {other:?}"
        ))),
    }
}

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &ArrayRef, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        return Err(TuningError::malformed("null value in list column"));
    }

    let values_array = match col.data_type() {
        DataType::List(_) => col.as_list::<i32>().value(row),
        DataType::LargeList(_) => col.as_list::<i64>().value(row),
        other => {
            return Err(TuningError::malformed(format!(
                "expected List or LargeList column, got {other:?}"
            )))
        }
    };

    let null_item = |i: usize| TuningError::malformed(format!("[{i}]: null value in list"));

    // The inner array can be Float64 or Float32
    if let Some(f64_arr) = values_array.as_primitive_opt::<Float64Type>() {
        f64_arr
            .iter()
            .enumerate()
            .map(|(i, v)| v.ok_or_else(|| null_item(i)))
            .collect()
    } else if let Some(f32_arr) = values_array.as_primitive_opt::<Float32Type>() {
        f32_arr
            .iter()
            .enumerate()
            .map(|(i, v)| v.map(f64::from).ok_or_else(|| null_item(i)))
            .collect()
    } else {
        Err(TuningError::malformed(format!(
            "list inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )))
    }
}

/// Extract a single extra-column value from an Arrow column at a given row.
fn extract_field_value(col: &ArrayRef, row: usize) -> FieldValue {
    if col.is_null(row) {
        return FieldValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => FieldValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => FieldValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => FieldValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => FieldValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => FieldValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => FieldValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => FieldValue::Bool(col.as_boolean().value(row)),
        other => FieldValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{
        Float32Builder, Float64Array, Float64Builder, Int64Array, ListBuilder, StringArray,
    };
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const SAMPLE: &str = r#"{
        "orientations": [0, 45, 90, 135],
        "units": [
            {"id": 1, "layer": "SG", "group": null, "osi_control": 0.5,
             "hbw_control": 30, "mean_control": 2.0,
             "control": [1, 2, 3, 4], "laser": [1, 2, 3, 4]},
            {"id": 2, "layer": "G", "group": "MXH", "osi_control": 0.2,
             "hbw_control": null, "mean_control": 1.5, "depth": 420,
             "control": [4.0, 3.0, 2.0, 1.0], "laser": [1.0, 1.0, 1.0, 1.0]}
        ]
    }"#;

    fn write_json(text: &str) -> tempfile::TempPath {
        let mut tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        tmp.write_all(text.as_bytes()).unwrap();
        tmp.into_temp_path()
    }

    #[test]
    fn loads_json_units_and_orientations() {
        let path = write_json(SAMPLE);
        let (ds, ori) = load_file(&path).unwrap();

        assert_eq!(ori, vec![0.0, 45.0, 90.0, 135.0]);
        assert_eq!(ds.len(), 2);

        let first = &ds.units[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.group, None);
        assert_eq!(first.hbw_control, Some(30.0));
        assert_eq!(first.control, vec![1.0, 2.0, 3.0, 4.0]);

        let second = &ds.units[1];
        assert_eq!(second.group.as_deref(), Some("MXH"));
        assert_eq!(second.hbw_control, None);
        assert_eq!(second.extra.get("depth"), Some(&FieldValue::Integer(420)));
        assert_eq!(ds.extra_columns, vec!["depth".to_string()]);
    }

    #[test]
    fn missing_top_level_key_is_malformed() {
        let err = parse_json(r#"{"units": []}"#).unwrap_err();
        assert!(matches!(err, TuningError::MalformedInput(_)));

        let err = parse_json(r#"{"orientations": [0, 90]}"#).unwrap_err();
        assert!(matches!(err, TuningError::MalformedInput(_)));
    }

    #[test]
    fn missing_unit_field_is_malformed() {
        let text = r#"{"orientations": [0], "units": [
            {"id": 1, "layer": "SG", "mean_control": 1.0, "control": [1], "laser": [1]}
        ]}"#;
        let err = parse_json(text).unwrap_err();
        assert!(err.to_string().contains("osi_control"), "{err}");
    }

    #[test]
    fn absent_hbw_and_group_read_as_null() {
        let text = r#"{"orientations": [0], "units": [
            {"id": 3, "layer": "G", "osi_control": 0.1, "mean_control": 1.0,
             "control": [1], "laser": [2]}
        ]}"#;
        let (units, _) = parse_json(text).unwrap();
        assert_eq!(units[0].group, None);
        assert_eq!(units[0].hbw_control, None);
    }

    #[test]
    fn curve_length_mismatch_aborts_load() {
        let text = r#"{"orientations": [0, 90], "units": [
            {"id": 1, "layer": "SG", "osi_control": 0.1, "hbw_control": 10,
             "mean_control": 1.0, "control": [1, 2], "laser": [1]}
        ]}"#;
        let path = write_json(text);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, TuningError::MalformedInput(_)));
    }

    #[test]
    fn duplicate_ids_abort_load() {
        let text = r#"{"orientations": [0], "units": [
            {"id": 1, "layer": "SG", "osi_control": 0.1, "mean_control": 1.0, "control": [1], "laser": [1]},
            {"id": 1, "layer": "G", "osi_control": 0.2, "mean_control": 1.0, "control": [1], "laser": [1]}
        ]}"#;
        let path = write_json(text);
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate id"), "{err}");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(err, TuningError::MalformedInput(_)));
    }

    #[test]
    fn loads_parquet_with_float32_lists() {
        let mut control = ListBuilder::new(Float32Builder::new());
        let mut laser = ListBuilder::new(Float32Builder::new());
        for (c, l) in [([1.0f32, 2.0], [2.0f32, 4.0]), ([3.0, 1.0], [3.0, 1.0])] {
            control.values().append_slice(&c);
            control.append(true);
            laser.values().append_slice(&l);
            laser.append(true);
        }
        let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float32, true)));

        let metadata = [(ORIENTATIONS_METADATA_KEY.to_string(), "[0, 90]".to_string())]
            .into_iter()
            .collect();
        let schema = Arc::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64, false),
                Field::new("layer", DataType::Utf8, false),
                Field::new("group", DataType::Utf8, true),
                Field::new("osi_control", DataType::Float64, false),
                Field::new("hbw_control", DataType::Float64, true),
                Field::new("mean_control", DataType::Float64, false),
                Field::new("control", list_type.clone(), false),
                Field::new("laser", list_type, false),
                Field::new("animal", DataType::Utf8, false),
            ])
            .with_metadata(metadata),
        );
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![10, 11])),
                Arc::new(StringArray::from(vec!["SG", "G"])),
                Arc::new(StringArray::from(vec![Some("MUL"), None])),
                Arc::new(Float64Array::from(vec![0.4, 0.6])),
                Arc::new(Float64Array::from(vec![Some(25.0), None])),
                Arc::new(Float64Array::from(vec![1.5, 2.0])),
                Arc::new(control.finish()),
                Arc::new(laser.finish()),
                Arc::new(StringArray::from(vec!["m1", "m2"])),
            ],
        )
        .unwrap();

        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let (ds, ori) = load_file(tmp.path()).unwrap();
        assert_eq!(ori, vec![0.0, 90.0]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.units[0].laser, vec![2.0, 4.0]);
        assert_eq!(ds.units[0].group.as_deref(), Some("MUL"));
        assert_eq!(ds.units[1].hbw_control, None);
        assert_eq!(
            ds.units[1].extra.get("animal"),
            Some(&FieldValue::String("m2".into()))
        );
    }

    #[test]
    fn null_item_in_parquet_curve_aborts_load() {
        let mut control = ListBuilder::new(Float64Builder::new());
        control.values().append_value(1.0);
        control.values().append_null();
        control.append(true);
        let mut laser = ListBuilder::new(Float64Builder::new());
        laser.values().append_slice(&[1.0, 2.0]);
        laser.append(true);
        let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));

        let metadata = [(ORIENTATIONS_METADATA_KEY.to_string(), "[0, 90]".to_string())]
            .into_iter()
            .collect();
        let schema = Arc::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64, false),
                Field::new("layer", DataType::Utf8, false),
                Field::new("osi_control", DataType::Float64, false),
                Field::new("mean_control", DataType::Float64, false),
                Field::new("control", list_type.clone(), false),
                Field::new("laser", list_type, false),
            ])
            .with_metadata(metadata),
        );
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(StringArray::from(vec!["SG"])),
                Arc::new(Float64Array::from(vec![0.5])),
                Arc::new(Float64Array::from(vec![1.5])),
                Arc::new(control.finish()),
                Arc::new(laser.finish()),
            ],
        )
        .unwrap();

        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(tmp.path()).unwrap_err();
        match err {
            TuningError::MalformedInput(msg) => assert!(msg.contains("control"), "{msg}"),
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn parquet_without_orientations_metadata_is_malformed() {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema.clone(), vec![Arc::new(Int64Array::from(vec![1]))]).unwrap();
        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(tmp.path()).unwrap_err();
        assert!(matches!(err, TuningError::MalformedInput(_)));
    }
}
