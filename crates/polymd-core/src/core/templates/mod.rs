//! Renderers for the text files handed to external programs.
//!
//! Each renderer writes into any [`std::io::Write`] so it can be tested against an
//! in-memory buffer, with a `*_to_path` convenience for the real output directory.

pub mod emc;
pub mod lammps;
pub mod pbs;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Formats a float the way the MD tools' own examples do: integral values keep a
/// trailing `.0` (`1.0`, not `1`), everything else uses the shortest exact form.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub(crate) fn render_to_path<P, F>(path: P, render: F) -> io::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    render(&mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_float_keeps_a_decimal_on_integral_values() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(986.92326), "986.92326");
    }
}
