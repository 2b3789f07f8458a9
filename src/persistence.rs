//! Text sample files.
//!
//! ```text
//! M
//! <criterion name 1>
//! ...
//! <criterion name M>
//! N
//! <x> <y> [<attr 1> ... <attr M-2>]
//! ...
//! ```
//!
//! The first two criteria name the numeric axes. Every point line carries
//! exactly `M` whitespace-separated tokens.

use crate::error::{KdTableError, Result};
use crate::types::{Criteria, Point, Sample};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};

/// Criteria and samples read from a sample file.
#[derive(Debug, Clone)]
pub struct SampleSet {
    pub criteria: Criteria,
    pub samples: Vec<Sample>,
}

/// A sample file on disk.
#[derive(Debug, Clone)]
pub struct SampleFile {
    path: PathBuf,
}

impl SampleFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<SampleSet> {
        let file = File::open(&self.path)?;
        read_samples(BufReader::new(file))
    }

    /// Write the samples to a sibling temp file and rename it over the target.
    pub fn save(&self, criteria: &Criteria, samples: &[Sample]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);
        if let Err(e) = write_samples(&mut writer, criteria, samples) {
            drop(writer);
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }
}

/// Serialize criteria and samples in sample file layout.
pub fn write_samples<W: Write>(writer: &mut W, criteria: &Criteria, samples: &[Sample]) -> Result<()> {
    writeln!(writer, "{}", criteria.len())?;
    for name in criteria.names() {
        writeln!(writer, "{}", name)?;
    }
    writeln!(writer, "{}", samples.len())?;
    for sample in samples {
        write!(writer, "{:?} {:?}", sample.point.x(), sample.point.y())?;
        for attribute in &sample.attributes {
            write!(writer, " {}", attribute)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a sample file. Lines after the last declared point are ignored.
pub fn read_samples<R: BufRead>(reader: R) -> Result<SampleSet> {
    let mut lines = NumberedLines {
        lines: reader.lines(),
        line: 0,
    };

    let criteria_count: usize = parse_count(&mut lines, "criteria count")?;
    if criteria_count < 2 {
        return Err(KdTableError::at_line(
            lines.line,
            format!("criteria count must be at least 2, got {}", criteria_count),
        ));
    }

    let mut names = Vec::new();
    for _ in 0..criteria_count {
        let name = lines.next_line("criterion name")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(KdTableError::at_line(lines.line, "empty criterion name"));
        }
        names.push(name.to_string());
    }
    let criteria = Criteria::new(names)?;

    let point_count: usize = parse_count(&mut lines, "point count")?;
    let mut samples = Vec::with_capacity(point_count.min(1024));
    for _ in 0..point_count {
        let text = lines.next_line("point")?;
        samples.push(parse_point_line(&text, criteria_count, lines.line)?);
    }

    Ok(SampleSet { criteria, samples })
}

fn parse_count<R: BufRead>(lines: &mut NumberedLines<R>, what: &str) -> Result<usize> {
    let text = lines.next_line(what)?;
    text.trim()
        .parse()
        .map_err(|_| KdTableError::at_line(lines.line, format!("invalid {}: {:?}", what, text.trim())))
}

fn parse_point_line(text: &str, expected: usize, line: usize) -> Result<Sample> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != expected {
        return Err(KdTableError::at_line(
            line,
            format!("expected {} values, found {}", expected, tokens.len()),
        ));
    }

    let coord = |token: &str| -> Result<f64> {
        match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(KdTableError::at_line(
                line,
                format!("invalid coordinate: {:?}", token),
            )),
        }
    };
    let point = Point::new(coord(tokens[0])?, coord(tokens[1])?);

    Ok(Sample::new(point, tokens[2..].iter().copied()))
}

struct NumberedLines<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self, what: &str) -> Result<String> {
        self.line += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(KdTableError::at_line(self.line, format!("missing {}", what))),
        }
    }
}
