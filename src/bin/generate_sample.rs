use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_ROWS: usize = 500;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct Sample {
    id: Vec<i64>,
    group: Vec<String>,
    height: Vec<f64>,
    weight: Vec<Option<f64>>,
    income: Vec<f64>,
}

/// Normal columns with a few injected spikes, a log-normal column and some
/// missing weights.
fn generate(rng: &mut SimpleRng) -> Sample {
    let groups = ["north", "south", "east", "west"];
    let mut sample = Sample {
        id: Vec::with_capacity(N_ROWS),
        group: Vec::with_capacity(N_ROWS),
        height: Vec::with_capacity(N_ROWS),
        weight: Vec::with_capacity(N_ROWS),
        income: Vec::with_capacity(N_ROWS),
    };

    for i in 0..N_ROWS {
        let mut height = rng.gauss(170.0, 8.0);
        if rng.chance(0.01) {
            height += if rng.chance(0.5) { 60.0 } else { -60.0 };
        }
        let weight = if rng.chance(0.02) {
            None
        } else if rng.chance(0.01) {
            Some(rng.gauss(250.0, 20.0))
        } else {
            Some(rng.gauss(72.0, 11.0))
        };

        sample.id.push(i as i64);
        sample.group.push(groups[i % groups.len()].to_string());
        sample.height.push((height * 10.0).round() / 10.0);
        sample.weight.push(weight.map(|w| (w * 10.0).round() / 10.0));
        sample.income.push(rng.gauss(10.5, 0.6).exp().round());
    }
    sample
}

fn write_csv(sample: &Sample, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["id", "group", "height", "weight", "income"])?;
    for i in 0..sample.id.len() {
        writer.write_record([
            sample.id[i].to_string(),
            sample.group[i].clone(),
            sample.height[i].to_string(),
            sample.weight[i].map(|w| w.to_string()).unwrap_or_default(),
            sample.income[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(sample: &Sample, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("group", DataType::Utf8, false),
        Field::new("height", DataType::Float64, false),
        Field::new("weight", DataType::Float64, true),
        Field::new("income", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(sample.id.clone())),
        Arc::new(StringArray::from(
            sample.group.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(sample.height.clone())),
        Arc::new(Float64Array::from(sample.weight.clone())),
        Arc::new(Float64Array::from(sample.income.clone())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let sample = generate(&mut rng);

    write_csv(&sample, "sample_data.csv")?;
    write_parquet(&sample, "sample_data.parquet")?;

    println!("Wrote {N_ROWS} rows to sample_data.csv and sample_data.parquet");
    Ok(())
}
