//! CSV export of step records.

use std::io::Write;

use crate::ResultsResult;
use crate::types::StepRecord;

pub const CSV_HEADER: &str = "time_s,Vtb,Itb,gap,gamma,gap_ddt";

/// Write `records` as CSV with a header row.
///
/// Values use the shortest representation that round-trips to the same f64.
pub fn write_csv<W: Write>(records: &[StepRecord], mut writer: W) -> ResultsResult<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for r in records {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            r.time_s, r.vtb, r.itb, r.gap, r.gamma, r.gap_ddt
        )?;
    }
    writer.flush()?;
    Ok(())
}
