use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

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

    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize % items.len()]
    }
}

struct Sale {
    date: NaiveDate,
    category: &'static str,
    region: &'static str,
    sales: i64,
    quantity: i64,
    profit: f64,
}

fn generate(days: i64, per_day: usize, rng: &mut SimpleRng) -> Vec<Sale> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid start date");
    let categories = [("A", 18), ("B", 24), ("C", 31)];
    let regions = ["North", "South", "East", "West"];

    let mut rows = Vec::new();
    for day in 0..days {
        let date = start + Duration::days(day);
        for _ in 0..per_day {
            let &(category, unit_price) = rng.pick(&categories);
            let quantity = rng.range(1, 12);
            let sales = quantity * unit_price + rng.range(-5, 5);
            let margin = 0.12 + rng.next_f64() * 0.15;
            rows.push(Sale {
                date,
                category,
                region: *rng.pick(&regions),
                sales,
                quantity,
                profit: (sales as f64 * margin * 100.0).round() / 100.0,
            });
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Sale]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Date", "Category", "Region", "Sales", "Quantity", "Profit"])?;
    for r in rows {
        writer.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.category.to_string(),
            r.region.to_string(),
            r.sales.to_string(),
            r.quantity.to_string(),
            r.profit.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn to_batch(rows: &[Sale]) -> RecordBatch {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Region", DataType::Utf8, false),
        Field::new("Sales", DataType::Int64, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Profit", DataType::Float64, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Date32Array::from(
                rows.iter()
                    .map(|r| (r.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.category).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.region).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.sales).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.quantity).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.profit).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch")
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(60, 4, &mut rng);

    let csv_path = "sample_sales.csv";
    write_csv(csv_path, &rows).expect("Failed to write CSV");

    let batch = to_batch(&rows);
    let parquet_path = "sample_sales.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    print_batches(&[batch.slice(0, 5)]).expect("Failed to print preview");
    println!("Wrote {} rows to {csv_path} and {parquet_path}", rows.len());
}
