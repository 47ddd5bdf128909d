//! CSV export for simulated days and training curves.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::SimulationTrace;

/// Column header for the per-hour simulation export.
const SIMULATION_HEADER: [&str; 4] = ["hour", "actions", "hourly_kwh", "cumulative_kwh"];

/// Column header for the per-episode training export.
const TRAINING_HEADER: [&str; 3] = ["episode", "reward", "consumption_kwh"];

/// Exports a simulated day to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_simulation_csv(trace: &SimulationTrace, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_simulation_csv(trace, io::BufWriter::new(file))
}

/// Writes a simulated day as CSV to any writer.
///
/// One row per hour, then a `Total` row carrying the day's consumption.
/// The action column lists the per-device bits separated by spaces, in
/// registry order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_simulation_csv(trace: &SimulationTrace, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SIMULATION_HEADER)?;

    for h in &trace.hours {
        let bits: Vec<String> = h.bits.iter().map(u8::to_string).collect();
        wtr.write_record(&[
            h.hour.to_string(),
            bits.join(" "),
            format!("{:.4}", h.consumption_kwh),
            format!("{:.4}", h.cumulative_kwh),
        ])?;
    }

    let total = format!("{:.4}", trace.total_consumption_kwh);
    wtr.write_record(["Total", "", total.as_str(), total.as_str()])?;

    wtr.flush()?;
    Ok(())
}

/// Exports per-episode training totals to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_training_csv(rewards: &[f64], consumptions: &[f64], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_training_csv(rewards, consumptions, io::BufWriter::new(file))
}

/// Writes per-episode training totals as CSV to any writer.
///
/// Rows stop at the shorter of the two slices.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_training_csv(
    rewards: &[f64],
    consumptions: &[f64],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TRAINING_HEADER)?;

    for (i, (reward, kwh)) in rewards.iter().zip(consumptions).enumerate() {
        wtr.write_record(&[i.to_string(), format!("{reward:.4}"), format!("{kwh:.4}")])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::HourRecord;

    fn make_trace(hours: usize) -> SimulationTrace {
        let mut cumulative = 0.0;
        let records = (0..hours)
            .map(|h| {
                let kwh = if h % 2 == 0 { 0.25 } else { 0.5 };
                cumulative += kwh;
                HourRecord {
                    hour: h,
                    action: h % 4,
                    bits: vec![(h % 4 >> 1) as u8, (h % 2) as u8],
                    consumption_kwh: kwh,
                    cumulative_kwh: cumulative,
                    reward: 20.0,
                    cost: kwh * 0.2,
                }
            })
            .collect();
        SimulationTrace {
            total_consumption_kwh: cumulative,
            hours: records,
            device_states: Vec::new(),
        }
    }

    fn output(trace: &SimulationTrace) -> String {
        let mut buf = Vec::new();
        write_simulation_csv(trace, &mut buf).expect("in-memory write");
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn header_and_total_row() {
        let out = output(&make_trace(24));
        let lines: Vec<&str> = out.lines().collect();
        // 1 header + 24 hours + total
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "hour,actions,hourly_kwh,cumulative_kwh");
        assert_eq!(lines[25], "Total,,9.0000,9.0000");
    }

    #[test]
    fn action_bits_are_space_separated() {
        let out = output(&make_trace(4));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[4], "3,1 1,0.5000,1.5000");
    }

    #[test]
    fn deterministic_output() {
        let trace = make_trace(5);
        assert_eq!(output(&trace), output(&trace));
    }

    #[test]
    fn round_trip_parseable() {
        let out = output(&make_trace(3));
        let mut rdr = csv::ReaderBuilder::new().from_reader(out.as_bytes());
        assert_eq!(rdr.headers().map(csv::StringRecord::len).ok(), Some(4));

        let records: Vec<csv::StringRecord> = rdr.records().filter_map(|r| r.ok()).collect();
        assert_eq!(records.len(), 4);
        for rec in &records[..3] {
            assert!(rec[0].parse::<usize>().is_ok());
            assert!(rec[2].parse::<f64>().is_ok());
            assert!(rec[3].parse::<f64>().is_ok());
        }
        assert_eq!(&records[3][0], "Total");
    }

    #[test]
    fn training_rows_follow_episodes() {
        let mut buf = Vec::new();
        write_training_csv(&[10.0, 12.5, 14.0], &[3.0, 2.5], &mut buf).expect("in-memory write");
        let out = String::from_utf8(buf).expect("utf-8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "episode,reward,consumption_kwh");
        assert_eq!(lines[2], "1,12.5000,2.5000");
    }
}
