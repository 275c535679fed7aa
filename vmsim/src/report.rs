use std::io::{self, Write};

use vm::{frame_table::FrameTable, stats::Statistics};

/// Printed for frames that hold no page.
pub const EMPTY_FRAME: &str = "ffffffff";

pub fn write_report<W: Write>(
    out: &mut W,
    stats: &Statistics,
    frames: &FrameTable,
) -> io::Result<()> {
    writeln!(out, "num reads = {}", stats.reads)?;
    writeln!(out, "num writes = {}", stats.writes)?;
    writeln!(out, "percentage of page faults = {:.2}", stats.fault_ratio())?;

    for (frame_index, slot) in frames.slots().enumerate() {
        match slot {
            Some(page_number) => writeln!(out, "mem[{}]: {:x}", frame_index, page_number)?,
            None => writeln!(out, "mem[{}]: {}", frame_index, EMPTY_FRAME)?,
        }
    }

    Ok(())
}
