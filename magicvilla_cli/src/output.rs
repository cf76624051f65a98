use anyhow::Result;
use magicvilla_lib::types::VillaDto;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct VillaRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Rate")]
    #[serde(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Sqft")]
    #[serde(rename = "Sqft")]
    sqft: i32,
    #[tabled(rename = "Occupancy")]
    #[serde(rename = "Occupancy")]
    occupancy: i32,
    #[tabled(rename = "Amenity")]
    #[serde(rename = "Amenity")]
    amenity: String,
}

fn build_villa_rows(villas: &[VillaDto]) -> Vec<VillaRow> {
    villas
        .iter()
        .map(|v| VillaRow {
            id: v.id,
            name: v.name.clone(),
            rate: format_rate(v.rate),
            sqft: v.sqft,
            occupancy: v.occupancy,
            amenity: v.amenity.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn print_villas(villas: &[VillaDto], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(build_villa_rows(villas))),
        OutputFormat::Markdown => {
            let mut table = Table::new(build_villa_rows(villas));
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => print_villas_csv(villas)?,
        OutputFormat::Json => print_json(&villas),
    }
    Ok(())
}

fn print_villas_csv(villas: &[VillaDto]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_villa_rows(villas) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_rate(rate: f64) -> String {
    format!("${:.2}", rate)
}
