//! CSV and JSON export of a run.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::{ScheduleRow, SimulationOverview};

/// Column header of the schedule CSV.
const HEADER: &str = "period,timeslot,total_demand,total_generation,\
                      consumption_from_grid,consumption_from_generation,\
                      grid_charge_power,generation_charge_power,discharge_power,battery_soc";

/// Exports the schedule table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_schedule_csv(rows: &[ScheduleRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_schedule_csv(rows, io::BufWriter::new(file))
}

/// Writes the schedule table as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_csv(rows: &[ScheduleRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.period.to_string(),
            r.timeslot.clone(),
            format!("{:.4}", r.total_demand),
            format!("{:.4}", r.total_generation),
            format!("{:.4}", r.consumption_from_grid),
            format!("{:.4}", r.consumption_from_generation),
            format!("{:.4}", r.grid_charge_power),
            format!("{:.4}", r.generation_charge_power),
            format!("{:.4}", r.discharge_power),
            format!("{:.4}", r.battery_soc),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the overview document as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_overview_json(overview: &SimulationOverview, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_overview_json(overview, io::BufWriter::new(file))
}

/// Writes the overview document as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_overview_json(overview: &SimulationOverview, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, overview)?;
    writeln!(writer)?;
    writer.flush()
}
