use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::WriterBuilder;
use std::io::Write;

use crate::model::Resolved;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Nested list per position, e.g. [['1/8', 'D']]
    #[default]
    List,
    /// Flattened literals per position, e.g. ['1/8', 'D']
    Flat,
    /// position,value_1,value_2,... with flattened literals
    Csv,
}

/// Write one line (or record) per resolved position
pub fn write_resolved<W: Write>(mut out: W, results: &[Resolved], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::List => {
            for resolved in results {
                writeln!(out, "{}", resolved).context("Failed to write result")?;
            }
        }
        OutputFormat::Flat => {
            for resolved in results {
                let flat = Resolved::List(
                    resolved
                        .leaves()
                        .into_iter()
                        .map(|v| Resolved::Value(v.to_string()))
                        .collect(),
                );
                writeln!(out, "{}", flat).context("Failed to write result")?;
            }
        }
        OutputFormat::Csv => write_csv(&mut out, results)?,
    }
    out.flush().context("Failed to flush output")?;
    Ok(())
}

fn write_csv<W: Write>(out: W, results: &[Resolved]) -> Result<()> {
    let rows: Vec<Vec<&str>> = results.iter().map(|r| r.leaves()).collect();
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    let mut writer = WriterBuilder::new().from_writer(out);

    let mut header = vec!["position".to_string()];
    header.extend((1..=columns).map(|i| format!("value_{}", i)));
    writer
        .write_record(&header)
        .context("Failed to write CSV header")?;

    for (position, leaves) in rows.iter().enumerate() {
        let mut record = vec![position.to_string()];
        record.extend(leaves.iter().map(|v| v.to_string()));
        record.resize(columns + 1, String::new());
        writer
            .write_record(&record)
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: &str) -> Resolved {
        Resolved::Value(v.to_string())
    }

    fn results() -> Vec<Resolved> {
        vec![
            Resolved::List(vec![value("1/2"), value("E")]),
            Resolved::List(vec![Resolved::List(vec![value("1/8"), value("D")])]),
            Resolved::List(vec![value("C")]),
        ]
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_resolved(&mut buf, &results(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_format_keeps_nesting() {
        assert_eq!(render(OutputFormat::List), "['1/2', 'E']\n[['1/8', 'D']]\n['C']\n");
    }

    #[test]
    fn test_flat_format() {
        assert_eq!(render(OutputFormat::Flat), "['1/2', 'E']\n['1/8', 'D']\n['C']\n");
    }

    #[test]
    fn test_csv_format_pads_short_rows() {
        assert_eq!(
            render(OutputFormat::Csv),
            "position,value_1,value_2\n0,1/2,E\n1,1/8,D\n2,C,\n"
        );
    }

    #[test]
    fn test_empty_results() {
        let mut buf = Vec::new();
        write_resolved(&mut buf, &[], OutputFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "position\n");
    }
}
