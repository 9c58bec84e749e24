//! Single-pass ADI writer bound to one sink and one format version.

use std::io::Write;

use tracing::{debug, trace};

use crate::{
    document::{Document, Header, Record, userdef_id},
    types::AdifVersion,
};

use super::{WriterError, config::WriterConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Open,
    HeaderWritten,
    Records,
    Closed,
}

/// Forward-only ADI serializer.
///
/// Accepts at most one header, which must come before any record, then any
/// number of records. Every tag's length is the byte length of its value.
pub struct AdiWriter<W: Write> {
    sink: W,
    config: WriterConfig,
    state: WriterState,
    records_written: usize,
}

impl<W: Write> AdiWriter<W> {
    /// Creates a writer over `sink`.
    pub fn new(sink: W, config: WriterConfig) -> Self {
        Self {
            sink,
            config,
            state: WriterState::Open,
            records_written: 0,
        }
    }

    /// Creates a writer with default options for ADIF major version `major`.
    pub fn with_version(major: u8, sink: W) -> Result<Self, WriterError> {
        let version = AdifVersion::try_from(major).map_err(WriterError::UnsupportedVersion)?;
        Ok(Self::new(sink, WriterConfig::for_version(version)))
    }

    /// Options in use.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Returns true after [`AdiWriter::finish`].
    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    /// Writes the preamble, header fields, user-defined field declarations,
    /// and `<EOH>`.
    pub fn write_header(&mut self, header: &Header) -> Result<(), WriterError> {
        match self.state {
            WriterState::Closed => return Err(WriterError::Closed),
            WriterState::HeaderWritten => return Err(WriterError::HeaderAlreadyWritten),
            WriterState::Records => return Err(WriterError::HeaderAfterRecords),
            WriterState::Open => {}
        }

        for field in header.fields() {
            check_name(&field.name)?;
        }

        let version = self.config.version;
        if !self.config.preamble.is_empty() {
            writeln!(self.sink, "{}", self.config.preamble)?;
        }

        self.header_tag("adif_ver", None, version.adif_ver())?;

        let program_id = header
            .get("programid")
            .map(str::to_string)
            .unwrap_or_else(|| self.config.program_id.clone());
        self.header_tag("programid", None, &program_id)?;

        let program_version = header
            .get("programversion")
            .map(str::to_string)
            .or_else(|| self.config.program_version.clone());
        if let Some(v) = program_version {
            self.header_tag("programversion", None, &v)?;
        }

        if version == AdifVersion::V3 {
            let created = header.get("created_timestamp").map(str::to_string).or_else(|| {
                self.config
                    .created_timestamp
                    .map(|ts| ts.format("%Y%m%d %H%M%S").to_string())
            });
            if let Some(ts) = created {
                self.header_tag("created_timestamp", None, &ts)?;
            }
        }

        for field in header.fields() {
            if Self::is_generated(version, &field.name)
                || userdef_id(&field.name).is_some_and(|id| header.userdef(id).is_some())
            {
                continue;
            }
            self.header_tag(&field.name, None, &field.value)?;
        }

        for userdef in header.userdefs() {
            let code = userdef.data_type.map(|t| t.code());
            let name = userdef.field_name();
            let value = match header.get(&name) {
                Some(raw) => raw.to_string(),
                None => userdef.adi_value(),
            };
            self.header_tag(&name, code, &value)?;
        }

        let eoh = self.marker("eoh");
        writeln!(self.sink, "{eoh}")?;

        debug!(
            version = version.major(),
            userdefs = header.userdefs().len(),
            "wrote ADI header"
        );
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    /// Writes every field of `record` in order, then `<EOR>`.
    pub fn write_record(&mut self, record: &Record) -> Result<(), WriterError> {
        if self.state == WriterState::Closed {
            return Err(WriterError::Closed);
        }
        for field in record.iter() {
            check_name(&field.name)?;
        }

        for field in record.iter() {
            self.tag(&field.name, None, &field.value)?;
            self.sink.write_all(self.config.field_separator.as_bytes())?;
        }
        let eor = self.marker("eor");
        writeln!(self.sink, "{eor}")?;

        self.records_written += 1;
        self.state = WriterState::Records;
        trace!(fields = record.len(), "wrote ADI record");
        Ok(())
    }

    /// Writes the header and then each record of `document`.
    pub fn write_document(&mut self, document: &Document) -> Result<(), WriterError> {
        self.write_header(&document.header)?;
        for record in &document.records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flushes the sink and closes the writer.
    pub fn finish(&mut self) -> Result<(), WriterError> {
        if self.state == WriterState::Closed {
            return Err(WriterError::Closed);
        }
        self.sink.flush()?;
        self.state = WriterState::Closed;
        debug!(records = self.records_written, "ADI writer finished");
        Ok(())
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn is_generated(version: AdifVersion, name: &str) -> bool {
        match name {
            "adif_ver" | "programid" | "programversion" => true,
            "created_timestamp" => version == AdifVersion::V3,
            _ => false,
        }
    }

    fn header_tag(
        &mut self,
        name: &str,
        type_code: Option<char>,
        value: &str,
    ) -> Result<(), WriterError> {
        self.tag(name, type_code, value)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    fn tag(
        &mut self,
        name: &str,
        type_code: Option<char>,
        value: &str,
    ) -> Result<(), WriterError> {
        check_name(name)?;
        let name = self.display_name(name);
        match type_code {
            Some(code) => write!(self.sink, "<{name}:{}:{code}>", value.len())?,
            None => write!(self.sink, "<{name}:{}>", value.len())?,
        }
        self.sink.write_all(value.as_bytes())?;
        Ok(())
    }

    fn marker(&self, name: &str) -> String {
        format!("<{}>", self.display_name(name))
    }

    fn display_name(&self, name: &str) -> String {
        if self.config.uppercase_names {
            name.to_ascii_uppercase()
        } else {
            name.to_string()
        }
    }
}

/// A name the ADI tag grammar can carry: non-empty, with no delimiters or whitespace.
fn check_name(name: &str) -> Result<(), WriterError> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| matches!(c, '<' | '>' | ':' | ',') || c.is_whitespace() || c.is_control());
    if bad {
        return Err(WriterError::InvalidFieldName(name.to_string()));
    }
    Ok(())
}
