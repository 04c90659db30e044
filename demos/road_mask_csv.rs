/// Kerb example: road mask over CSV files
///
/// Reads raw road and query records from two CSV files, standardizes and rounds
/// them, labels each valid query record as near the road or not, and writes the
/// labelled query records to a third CSV file.
///
/// Usage: `cargo run --example road-mask-csv --features csv -- road.csv points.csv out.csv`
use elapsed::ElapsedDuration;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use kerb::io::{read_records_from_path, write_labelled};
use kerb::{label_road_points, PipelineSettings};

use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = fmt().with_max_level(Level::DEBUG).without_time().finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let road_path = args.next().unwrap_or_else(|| "./road.csv".to_string());
    let query_path = args.next().unwrap_or_else(|| "./points.csv".to_string());
    let out_path = args.next().unwrap_or_else(|| "./labelled.csv".to_string());

    let start = Instant::now();

    let road = read_records_from_path(&road_path)?;
    let query = read_records_from_path(&query_path)?;

    println!(
        "Records loaded from CSV. Road: {}, query: {}",
        road.len(),
        query.len()
    );

    let batch = label_road_points(road, query, &PipelineSettings::default())?;

    println!(
        "Labelled {} records, {} near the road. Took {}",
        batch.records.len(),
        batch.near_road().count(),
        ElapsedDuration::new(start.elapsed())
    );

    write_labelled(
        BufWriter::new(File::create(&out_path)?),
        &batch.records,
        &batch.mask,
    )?;
    println!("Written to {out_path}");

    Ok(())
}
