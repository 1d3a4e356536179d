//! The CSV sink used by the listing utilities.

use anyhow::{Context, Result};
use canvas_tools_util::file_util;
use std::{
    io::{self, Write},
    path::Path,
};

pub struct CsvOutput {
    writer: csv::Writer<Box<dyn Write>>,
}

impl CsvOutput {
    /// Writes to the file at `path`, or to stdout if no path is given.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let sink: Box<dyn Write> = match path {
            Some(path) => Box::new(file_util::create_file(path)?),
            None => Box::new(io::stdout()),
        };
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(sink);
        Ok(Self { writer })
    }

    pub fn write_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer
            .write_record(row)
            .context("Failed to write CSV output")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")
    }
}
