use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, Float64Builder, Int64Array, ListBuilder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

use tuning_panda::data::loader::ORIENTATIONS_METADATA_KEY;

/// Seeded SplitMix64 stream; enough for reproducible sample data.
struct Sampler(u64);

impl Sampler {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Gaussian noise via Box-Muller.
    fn noise(&mut self, sd: f64) -> f64 {
        let u = self.unit().max(f64::MIN_POSITIVE);
        sd * (-2.0 * u.ln()).sqrt() * (std::f64::consts::TAU * self.unit()).cos()
    }
}

/// Orientation distance on the 180° circle.
fn orientation_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}

struct SampleUnit {
    id: i64,
    layer: &'static str,
    group: Option<&'static str>,
    osi_control: f64,
    hbw_control: Option<f64>,
    mean_control: f64,
    control: Vec<f64>,
    laser: Vec<f64>,
}

fn generate_unit(id: i64, orientations: &[f64], rng: &mut Sampler) -> SampleUnit {
    let layer = *rng.pick(&["SG", "G", "IG"]);
    let preferred = *rng.pick(orientations);
    let sigma = rng.uniform(15.0, 45.0);
    let baseline = rng.uniform(0.5, 2.0);
    let amplitude = rng.uniform(3.0, 12.0);
    let multiplicative = rng.unit() < 0.5;

    let control: Vec<f64> = orientations
        .iter()
        .map(|&o| {
            let d = orientation_distance(o, preferred);
            let r = baseline + amplitude * (-(d * d) / (2.0 * sigma * sigma)).exp();
            (r + rng.noise(0.15)).max(0.0)
        })
        .collect();

    let gain = rng.uniform(0.4, 0.8);
    let laser: Vec<f64> = orientations
        .iter()
        .zip(&control)
        .map(|(&o, &c)| {
            let r = if multiplicative {
                c * gain
            } else {
                // Flank suppression: responses away from the peak drop more.
                let d = orientation_distance(o, preferred);
                c * (1.0 - 0.9 * (d / 90.0)) + 2.0 * (d / 90.0) * rng.uniform(-1.0, 1.0)
            };
            (r + rng.noise(0.1)).max(0.0)
        })
        .collect();

    let r_pref = baseline + amplitude;
    let r_orth = baseline + amplitude * (-(90.0f64 * 90.0) / (2.0 * sigma * sigma)).exp();
    let osi_control = (r_pref - r_orth) / (r_pref + r_orth);
    let hbw_control = (rng.unit() > 0.1).then(|| sigma * (2.0 * 2f64.ln()).sqrt());
    let mean_control = control.iter().sum::<f64>() / control.len() as f64;
    let group = (rng.unit() > 0.2).then_some(if multiplicative { "MUL" } else { "MXH" });

    SampleUnit {
        id,
        layer,
        group,
        osi_control,
        hbw_control,
        mean_control,
        control,
        laser,
    }
}

fn write_json(path: &Path, orientations: &[f64], units: &[SampleUnit]) -> Result<()> {
    let units: Vec<_> = units
        .iter()
        .map(|u| {
            json!({
                "id": u.id,
                "layer": u.layer,
                "group": u.group,
                "osi_control": u.osi_control,
                "hbw_control": u.hbw_control,
                "mean_control": u.mean_control,
                "control": u.control,
                "laser": u.laser,
            })
        })
        .collect();
    let doc = json!({ "orientations": orientations, "units": units });
    let text = serde_json::to_string_pretty(&doc)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_parquet(path: &Path, orientations: &[f64], units: &[SampleUnit]) -> Result<()> {
    let mut control_builder = ListBuilder::new(Float64Builder::new());
    let mut laser_builder = ListBuilder::new(Float64Builder::new());
    for u in units {
        control_builder.values().append_slice(&u.control);
        control_builder.append(true);
        laser_builder.values().append_slice(&u.laser);
        laser_builder.append(true);
    }

    let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let metadata = HashMap::from([(
        ORIENTATIONS_METADATA_KEY.to_string(),
        serde_json::to_string(orientations)?,
    )]);
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
        ])
        .with_metadata(metadata),
    );

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(units.iter().map(|u| u.id))),
            Arc::new(StringArray::from_iter_values(units.iter().map(|u| u.layer))),
            Arc::new(units.iter().map(|u| u.group).collect::<StringArray>()),
            Arc::new(Float64Array::from_iter_values(units.iter().map(|u| u.osi_control))),
            Arc::new(units.iter().map(|u| u.hbw_control).collect::<Float64Array>()),
            Arc::new(Float64Array::from_iter_values(units.iter().map(|u| u.mean_control))),
            Arc::new(control_builder.finish()),
            Arc::new(laser_builder.finish()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "sample_units.json".to_string());
    let n_units: i64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid unit count '{n}'"))?,
        None => 60,
    };

    let mut rng = Sampler(42);

    // 0° → 157.5°, step 22.5
    let orientations: Vec<f64> = (0..8).map(|i| i as f64 * 22.5).collect();
    let units: Vec<SampleUnit> = (1..=n_units)
        .map(|id| generate_unit(id, &orientations, &mut rng))
        .collect();

    let path = Path::new(&output);
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => write_json(path, &orientations, &units)?,
        Some("parquet") | Some("pq") => write_parquet(path, &orientations, &units)?,
        _ => bail!("output must end in .json or .parquet: {output}"),
    }

    log::info!("Wrote {} units to {output}", units.len());
    println!(
        "Wrote {} units ({} orientations each) to {output}",
        units.len(),
        orientations.len()
    );
    Ok(())
}
