//! Writes `sample_data.csv` and `sample_data.parquet`: a small customer table
//! with missing cells, a few gross outliers, a constant column and two
//! categorical columns, for trying every preprocessing step.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 200;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cities = ["Lyon", "Nice", "Paris", "Lille"];
    let segments = ["retail", "wholesale", "online"];

    let mut age: Vec<Option<i64>> = Vec::with_capacity(ROWS);
    let mut income: Vec<Option<f64>> = Vec::with_capacity(ROWS);
    let mut score: Vec<f64> = Vec::with_capacity(ROWS);
    let mut plant: Vec<i64> = Vec::with_capacity(ROWS);
    let mut city: Vec<Option<&str>> = Vec::with_capacity(ROWS);
    let mut segment: Vec<&str> = Vec::with_capacity(ROWS);
    let mut member: Vec<bool> = Vec::with_capacity(ROWS);

    for _ in 0..ROWS {
        age.push((!rng.chance(0.05)).then(|| rng.gauss(41.0, 9.0).round().max(18.0) as i64));

        let base = rng.gauss(48_000.0, 9_000.0);
        // A handful of extreme earners to trim.
        let value = if rng.chance(0.03) { base * 25.0 } else { base };
        income.push((!rng.chance(0.04)).then_some((value * 100.0).round() / 100.0));

        score.push((rng.gauss(0.6, 0.15) * 1000.0).round() / 1000.0);
        plant.push(7);
        city.push((!rng.chance(0.03)).then(|| rng.pick(&cities)));
        segment.push(rng.pick(&segments));
        member.push(rng.chance(0.4));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("age", DataType::Int64, true),
        Field::new("income", DataType::Float64, true),
        Field::new("score", DataType::Float64, false),
        Field::new("plant", DataType::Int64, false),
        Field::new("city", DataType::Utf8, true),
        Field::new("segment", DataType::Utf8, false),
        Field::new("member", DataType::Boolean, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(age)),
        Arc::new(Float64Array::from(income)),
        Arc::new(Float64Array::from(score)),
        Arc::new(Int64Array::from(plant)),
        Arc::new(StringArray::from(city)),
        Arc::new(StringArray::from(segment)),
        Arc::new(BooleanArray::from(member)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Parquet
    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path)
        .with_context(|| format!("creating {parquet_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // CSV, nulls as empty cells
    let csv_path = "sample_data.csv";
    let mut csv_out =
        csv::Writer::from_path(csv_path).with_context(|| format!("creating {csv_path}"))?;
    let headers: Vec<&str> = batch
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();
    csv_out.write_record(&headers)?;
    for row in 0..batch.num_rows() {
        let record: Vec<String> = batch
            .columns()
            .iter()
            .map(|col| cell_text(col, row))
            .collect::<Result<_>>()?;
        csv_out.write_record(&record)?;
    }
    csv_out.flush().context("flushing CSV")?;

    let preview = pretty_format_batches(&[batch.slice(0, 5)]).context("formatting preview")?;
    println!("{preview}");
    println!("Wrote {ROWS} rows to {csv_path} and {parquet_path}");
    Ok(())
}

fn cell_text(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(arrow::util::display::array_value_to_string(col, row)?)
}
