//! Units command: minutes to billing units.

use std::io::Write;

use anyhow::Result;
use ts_core::{MINUTES_PER_UNIT, calculate_units};

pub fn run<W: Write>(writer: &mut W, minutes: i64) -> Result<()> {
    let units = calculate_units(minutes);
    writeln!(
        writer,
        "{minutes} minutes = {units} units ({MINUTES_PER_UNIT} minutes each)"
    )?;
    Ok(())
}
