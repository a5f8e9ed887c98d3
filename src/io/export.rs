//! CSV export for ranked tier recommendations.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::catalog::Tier;

/// Column header for the recommendations CSV.
const HEADER: &str = "rank,tier_id,name,capacity_wh_total,inverter_w_continuous";

/// Exports ranked recommendations to a CSV file at the given path.
///
/// Writes a header row followed by one row per tier, best match first.
/// Unrated figures are left empty.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_recommendations_csv(tiers: &[Tier], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_recommendations_csv(tiers, buf)
}

/// Writes ranked recommendations as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_recommendations_csv(tiers: &[Tier], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    let figure = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for (rank, tier) in tiers.iter().enumerate() {
        wtr.write_record(&[
            (rank + 1).to_string(),
            tier.id.clone(),
            tier.name().unwrap_or_default().to_string(),
            figure(tier.capacity_wh_total),
            figure(tier.inverter_w_continuous),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tiers() -> Vec<Tier> {
        vec![
            Tier::new("tier_2_comfort", "Comfort", 2048.0, 2400.0),
            Tier::new("tier_3_resilience", "Resilience, expandable", 4096.0, 3600.0),
        ]
    }

    fn render(tiers: &[Tier]) -> String {
        let mut buf = Vec::new();
        write_recommendations_csv(tiers, &mut buf).expect("csv export should succeed");
        String::from_utf8(buf).expect("csv output should be valid UTF-8")
    }

    #[test]
    fn header_and_rank_order() {
        let output = render(&tiers());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "1,tier_2_comfort,Comfort,2048,2400");
        // 1 header + 2 data rows
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let output = render(&tiers());
        assert!(output.contains("\"Resilience, expandable\""));

        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let names: Vec<String> = rdr
            .records()
            .filter_map(Result::ok)
            .map(|r| r[2].to_string())
            .collect();
        assert_eq!(names, ["Comfort", "Resilience, expandable"]);
    }

    #[test]
    fn unrated_figures_are_blank() {
        let tier = Tier::from_record(
            "odd",
            json!({"capacity_wh_total": "unknown"})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        );
        let output = render(&[tier]);
        assert_eq!(output.lines().nth(1), Some("1,odd,,,"));
    }

    #[test]
    fn empty_list_writes_header_only() {
        assert_eq!(render(&[]).lines().count(), 1);
    }
}
