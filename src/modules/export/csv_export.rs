//! CSV Export
//!
//! Writes the chart series of a dashboard payload as flat rows.

use std::path::Path;

use crate::domain::{DashboardData, DataPoint};

/// Write every chart data point as `series,name,value,color`
pub fn write_dashboard(
    path: &Path,
    data: &DashboardData,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)?;

    // Write header
    wtr.write_record(["series", "name", "value", "color"])?;

    let series: [(&str, &[DataPoint]); 3] = [
        ("personnel", data.personnel_data.as_slice()),
        ("technology", data.tech_data.as_slice()),
        ("processing_time", data.time_data.as_slice()),
    ];

    let mut rows = 0;
    for (name, points) in series {
        for point in points {
            wtr.write_record([
                name.to_string(),
                point.name.clone(),
                point.value.to_string(),
                point.color.clone(),
            ])?;
            rows += 1;
        }
    }

    // Summary values carry no colour; trends are left to the JSON export
    if let Some(summary) = data.summary_data.as_object() {
        for (key, value) in summary {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            wtr.write_record(["summary", key.as_str(), value.as_str(), ""])?;
            rows += 1;
        }
    }

    wtr.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_dashboard_rows() {
        let data: DashboardData = serde_json::from_str(
            r##"{
                "tech_data": [{"name": "VPN", "value": 12, "color": "#4299E1"}],
                "time_data": [{"name": "VPN", "value": 125.5, "color": "#4299E1"}],
                "summary_data": {"total_tickets": 12}
            }"##,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let rows = write_dashboard(&path, &data).unwrap();
        assert_eq!(rows, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "series,name,value,color");
        assert_eq!(lines[1], "technology,VPN,12,#4299E1");
        assert_eq!(lines[2], "processing_time,VPN,125.5,#4299E1");
        assert_eq!(lines[3], "summary,total_tickets,12,");
    }
}
