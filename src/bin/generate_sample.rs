//! Writes a synthetic Mexico City listings dataset as CSV and Parquet.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const LISTINGS: usize = 2_000;
const MXN_PER_USD: f64 = 19.6;

/// (alcaldía, price per m² in MXN, latitude, longitude)
const PLACES: &[(&str, f64, f64, f64)] = &[
    ("Álvaro Obregón", 38_000.0, 19.358, -99.203),
    ("Azcapotzalco", 24_000.0, 19.483, -99.184),
    ("Benito Juárez", 45_000.0, 19.372, -99.157),
    ("Coyoacán", 36_000.0, 19.350, -99.162),
    ("Cuajimalpa de Morelos", 42_000.0, 19.357, -99.299),
    ("Cuauhtémoc", 41_000.0, 19.433, -99.146),
    ("Gustavo A. Madero", 20_000.0, 19.482, -99.112),
    ("Iztacalco", 22_000.0, 19.395, -99.097),
    ("Iztapalapa", 16_000.0, 19.355, -99.062),
    ("La Magdalena Contreras", 27_000.0, 19.332, -99.211),
    ("Miguel Hidalgo", 58_000.0, 19.433, -99.204),
    ("Milpa Alta", 10_000.0, 19.192, -99.023),
    ("Tláhuac", 13_000.0, 19.286, -99.004),
    ("Tlalpan", 30_000.0, 19.288, -99.167),
    ("Venustiano Carranza", 21_000.0, 19.430, -99.093),
    ("Xochimilco", 17_000.0, 19.257, -99.103),
];

/// (property type, price multiplier, typical area in m²)
const PROPERTY_TYPES: &[(&str, f64, f64)] = &[
    ("apartment", 1.0, 85.0),
    ("house", 0.85, 180.0),
    ("PH", 1.2, 130.0),
    ("store", 0.9, 70.0),
];

#[derive(Serialize)]
struct Row {
    property_type: &'static str,
    places: &'static str,
    currency: &'static str,
    price: f64,
    price_per_m2: f64,
    surface_total_in_m2: f64,
    price_aprox_local_currency: f64,
    price_aprox_usd: f64,
    price_usd_per_m2: f64,
    lat: f64,
    lon: f64,
    #[serde(rename = "lat-lon")]
    lat_lon: String,
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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..LISTINGS)
        .map(|_| {
            let &(place, base_m2, lat, lon) = rng.pick(PLACES);
            let &(kind, multiplier, typical_area) = rng.pick(PROPERTY_TYPES);

            let mut area = rng.gauss(typical_area, typical_area * 0.3).max(25.0).round();
            // A few listings with a mistyped surface.
            if rng.next_f64() < 0.02 {
                area *= 25.0;
            }
            let per_m2_mxn = (base_m2 * multiplier * rng.gauss(1.0, 0.15).max(0.4)).round();
            let price_mxn = per_m2_mxn * area;
            let mut usd = price_mxn / rng.gauss(MXN_PER_USD, 0.2);
            // Listings without a usable USD quote.
            if rng.next_f64() < 0.01 {
                usd = 0.0;
            }

            let in_usd = rng.next_f64() < 0.15;
            let (currency, price, price_per_m2) = if in_usd {
                ("USD", (price_mxn / MXN_PER_USD).round(), per_m2_mxn / MXN_PER_USD)
            } else {
                ("MXN", price_mxn, per_m2_mxn)
            };

            let lat = lat + rng.gauss(0.0, 0.01);
            let lon = lon + rng.gauss(0.0, 0.01);
            Row {
                property_type: kind,
                places: place,
                currency,
                price,
                price_per_m2,
                surface_total_in_m2: area,
                price_aprox_local_currency: price_mxn,
                price_aprox_usd: usd.round(),
                price_usd_per_m2: usd / area,
                lat,
                lon,
                lat_lon: format!("{lat:.6},{lon:.6}"),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("property_type", text(|r| r.property_type)),
        ("places", text(|r| r.places)),
        ("currency", text(|r| r.currency)),
        ("price", number(|r| r.price)),
        ("price_per_m2", number(|r| r.price_per_m2)),
        ("surface_total_in_m2", number(|r| r.surface_total_in_m2)),
        ("price_aprox_local_currency", number(|r| r.price_aprox_local_currency)),
        ("price_aprox_usd", number(|r| r.price_aprox_usd)),
        ("price_usd_per_m2", number(|r| r.price_usd_per_m2)),
        ("lat", number(|r| r.lat)),
        ("lon", number(|r| r.lon)),
        ("lat-lon", text(|r| r.lat_lon.as_str())),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
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
    let rows = generate(&mut rng);

    write_csv(&rows, "housing_data_CDMX_v2.csv")?;
    write_parquet(&rows, "housing_data_CDMX_v2.parquet")?;

    let in_usd = rows.iter().filter(|r| r.currency == "USD").count();
    println!(
        "Wrote {} listings ({in_usd} priced in USD) to housing_data_CDMX_v2.csv and .parquet",
        rows.len()
    );
    Ok(())
}
