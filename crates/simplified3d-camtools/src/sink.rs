//! Output sinks for generated G-code.
//!
//! Generators receive the sink as a parameter and only ever append to it;
//! opening, flushing and closing belong to the caller.

use crate::error::CamToolResult;
use crate::waveform::Waveform;
use simplified3d_core::{CoordinateFormat, MotionCommand};
use std::io::{self, Write};
use tracing::debug;

/// Append-only destination for G-code lines.
pub trait CommandSink {
    /// Append one line. `line` carries no trailing newline.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl CommandSink for String {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push_str(line);
        self.push('\n');
        Ok(())
    }
}

impl CommandSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink over any [`io::Write`], one newline-terminated line per command.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Consume the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.lines += 1;
        Ok(())
    }
}

/// Renders commands into a borrowed sink for the duration of one generation call.
pub struct GcodeWriter<'a> {
    sink: &'a mut dyn CommandSink,
    emitted: usize,
}

impl<'a> GcodeWriter<'a> {
    pub fn new(sink: &'a mut dyn CommandSink) -> Self {
        Self { sink, emitted: 0 }
    }

    /// Emit a command with the coordinate convention of the call site
    pub fn emit(&mut self, command: &MotionCommand, format: CoordinateFormat) -> CamToolResult<()> {
        self.sink.write_line(&command.to_line(format))?;
        self.emitted += 1;
        Ok(())
    }

    /// Emit a `;` comment line
    pub fn comment(&mut self, text: impl Into<String>) -> CamToolResult<()> {
        self.emit(&MotionCommand::comment(text), CoordinateFormat::Natural)
    }

    /// Emit a G04 dwell
    pub fn dwell(&mut self, milliseconds: f64) -> CamToolResult<()> {
        self.emit(&MotionCommand::dwell(milliseconds), CoordinateFormat::Natural)
    }

    /// Emit the start marker of a generator section, naming the waveform in
    /// use, followed by the fallback warning when the requested tag was unknown.
    pub fn start_section(&mut self, label: &str, wave: &Waveform) -> CamToolResult<()> {
        self.comment(format!("{} Start ({} waveform)", label, wave.kind()))?;
        if let Some(warning) = wave.warning() {
            self.comment(warning)?;
        }
        Ok(())
    }

    /// Emit the end marker of a generator section
    pub fn end_section(&mut self, label: &str, wave: &Waveform) -> CamToolResult<()> {
        self.comment(format!("{} End ({} waveform)", label, wave.kind()))?;
        debug!("{} wrote {} lines so far", label, self.emitted);
        Ok(())
    }

    /// Number of commands emitted through this writer
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
