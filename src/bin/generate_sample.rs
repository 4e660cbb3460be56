use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One row of the synthetic export. `price` and `host_response_rate` are
/// decorated text, as in real listings files.
#[derive(Debug, Serialize)]
struct ListingRecord {
    id: i64,
    host_neighbourhood: String,
    neighbourhood_cleansed: String,
    room_type: String,
    review_scores_rating: Option<f64>,
    number_of_reviews: i64,
    host_response_rate: String,
    price: String,
    estimated_revenue_l365d: f64,
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Neighbourhoods with a relative weight, so the top-10 cut is visible.
const NEIGHBOURHOODS: [(&str, usize); 14] = [
    ("Dorchester", 30),
    ("Downtown", 26),
    ("Jamaica Plain", 22),
    ("South End", 20),
    ("Back Bay", 18),
    ("East Boston", 16),
    ("Brighton", 14),
    ("Roxbury", 12),
    ("Allston", 10),
    ("Fenway", 9),
    ("Charlestown", 6),
    ("Beacon Hill", 5),
    ("Mattapan", 3),
    ("Leather District", 1),
];

const ROOM_TYPES: [(&str, f64); 4] = [
    ("Entire home/apt", 1.6),
    ("Private room", 0.8),
    ("Hotel room", 1.3),
    ("Shared room", 0.4),
];

fn pick_weighted(rng: &mut SimpleRng) -> &'static str {
    let total: usize = NEIGHBOURHOODS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.below(total);
    for (name, weight) in NEIGHBOURHOODS {
        if roll < weight {
            return name;
        }
        roll -= weight;
    }
    NEIGHBOURHOODS[0].0
}

fn format_price(dollars: f64) -> String {
    let whole = dollars.round() as i64;
    let digits = whole.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${out}.00")
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<ListingRecord> {
    (0..n)
        .map(|i| {
            let neighbourhood = pick_weighted(rng);
            let (room_type, price_factor) = ROOM_TYPES[rng.below(ROOM_TYPES.len())];
            let base_price = (rng.gauss(160.0, 90.0).abs() + 25.0) * price_factor;
            // A handful of luxury outliers above the tick-plot cap.
            let price = if rng.next_f64() < 0.02 {
                base_price * 25.0
            } else {
                base_price
            };

            let number_of_reviews = rng.gauss(0.0, 60.0).abs() as i64;
            let review_scores_rating = if number_of_reviews == 0 {
                None
            } else {
                Some(((5.0 - rng.gauss(0.0, 0.5).abs()).max(1.0) * 100.0).round() / 100.0)
            };

            let host_response_rate = match rng.below(20) {
                0 => "N/A".to_string(),
                1 => String::new(),
                _ => format!("{}%", (100.0 - rng.gauss(0.0, 12.0).abs()).max(0.0).round()),
            };

            let occupied_nights = (rng.next_f64() * 365.0).round();
            let estimated_revenue_l365d = (price * occupied_nights).round();

            ListingRecord {
                id: i as i64,
                host_neighbourhood: neighbourhood.to_string(),
                neighbourhood_cleansed: neighbourhood.to_string(),
                room_type: room_type.to_string(),
                review_scores_rating,
                number_of_reviews,
                host_response_rate,
                price: format_price(price),
                estimated_revenue_l365d,
            }
        })
        .collect()
}

fn write_csv(path: &str, records: &[ListingRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for record in records {
        writer.serialize(record).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, records: &[ListingRecord]) -> Result<()> {
    let text = |f: fn(&ListingRecord) -> &str| -> StringArray {
        StringArray::from(records.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("host_neighbourhood", DataType::Utf8, false),
        Field::new("neighbourhood_cleansed", DataType::Utf8, false),
        Field::new("room_type", DataType::Utf8, false),
        Field::new("review_scores_rating", DataType::Float64, true),
        Field::new("number_of_reviews", DataType::Int64, false),
        Field::new("host_response_rate", DataType::Utf8, false),
        Field::new("price", DataType::Utf8, false),
        Field::new("estimated_revenue_l365d", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.id))),
            Arc::new(text(|r| r.host_neighbourhood.as_str())),
            Arc::new(text(|r| r.neighbourhood_cleansed.as_str())),
            Arc::new(text(|r| r.room_type.as_str())),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.review_scores_rating).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| r.number_of_reviews),
            )),
            Arc::new(text(|r| r.host_response_rate.as_str())),
            Arc::new(text(|r| r.price.as_str())),
            Arc::new(Float64Array::from_iter_values(
                records.iter().map(|r| r.estimated_revenue_l365d),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let records = generate(2000, &mut rng);

    write_csv("listings.csv", &records)?;
    write_parquet("listings.parquet", &records)?;

    println!(
        "Wrote {} listings to listings.csv and listings.parquet",
        records.len()
    );
    Ok(())
}
