//! ADX (XML) decoding onto the shared document model.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use tracing::{debug, trace};

use crate::{
    diagnostic::{Diagnostic, Parsed},
    document::{Constraint, Document, UserDef},
    field::FieldMap,
    types::{DataType, UserDefId, normalize_name},
};

#[derive(Debug)]
enum LeafKind {
    Field(String),
    UserDefDecl {
        id: Option<UserDefId>,
        data_type: Option<DataType>,
        constraint: Option<Constraint>,
    },
    UserDefValue {
        field_name: Option<String>,
    },
    App {
        program_id: Option<String>,
        field_name: Option<String>,
        data_type: Option<String>,
    },
}

#[derive(Debug)]
struct Leaf {
    element: String,
    kind: LeafKind,
    text: String,
    malformed: bool,
}

#[derive(Debug)]
enum Frame {
    Wrapper,
    Header,
    Records,
    Record(FieldMap),
    Leaf(Leaf),
    Skip,
}

/// Maps ADX events onto a [`Document`].
///
/// Unexpected elements are skipped with their whole subtree; an XML syntax
/// error ends the parse and keeps everything mapped before it.
#[derive(Debug, Default)]
pub struct AdxMapper {
    stack: Vec<Frame>,
    document: Document,
    diagnostics: Vec<Diagnostic>,
}

impl AdxMapper {
    /// Creates an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads all of `input`.
    pub fn read(mut self, input: &[u8]) -> Parsed {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => self.on_start(e),
                Ok(Event::Empty(ref e)) => {
                    self.on_start(e);
                    self.on_end();
                }
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .unescape()
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(t).into_owned());
                    self.on_text(&text);
                }
                Ok(Event::CData(ref c)) => self.on_text(&String::from_utf8_lossy(c)),
                Ok(Event::End(_)) => self.on_end(),
                Ok(Event::Eof) => break,
                Err(err) => {
                    let position = reader.error_position() as u64;
                    debug!(position, error = %err, "ADX parse stopped at malformed XML");
                    self.diagnostics.push(Diagnostic::MalformedXml {
                        position,
                        message: err.to_string(),
                    });
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        self.finish()
    }

    fn finish(mut self) -> Parsed {
        for frame in self.stack.drain(..) {
            if let Frame::Record(fields) = frame {
                if !fields.is_empty() {
                    debug!(fields = fields.len(), "discarding unclosed ADX record");
                    self.diagnostics.push(Diagnostic::UnterminatedRecord {
                        fields: fields.len(),
                    });
                }
            }
        }
        Parsed {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }

    fn on_start(&mut self, e: &BytesStart<'_>) {
        let element = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let upper = element.to_ascii_uppercase();

        let frame = match self.stack.last_mut() {
            None | Some(Frame::Wrapper) => match upper.as_str() {
                "HEADER" => Frame::Header,
                "RECORDS" => Frame::Records,
                _ => Frame::Wrapper,
            },
            Some(Frame::Records) => {
                if upper == "RECORD" {
                    Frame::Record(FieldMap::new())
                } else {
                    trace!(element = %element, "skipping element inside RECORDS");
                    self.diagnostics.push(Diagnostic::IgnoredElement { name: element });
                    Frame::Skip
                }
            }
            Some(Frame::Header) => Frame::Leaf(header_leaf(e, element, &upper)),
            Some(Frame::Record(_)) => Frame::Leaf(record_leaf(e, element, &upper)),
            Some(Frame::Leaf(leaf)) => {
                leaf.malformed = true;
                Frame::Skip
            }
            Some(Frame::Skip) => Frame::Skip,
        };
        self.stack.push(frame);
    }

    fn on_text(&mut self, text: &str) {
        if let Some(Frame::Leaf(leaf)) = self.stack.last_mut() {
            leaf.text.push_str(text);
        }
    }

    fn on_end(&mut self) {
        match self.stack.pop() {
            Some(Frame::Leaf(leaf)) => self.close_leaf(leaf),
            Some(Frame::Record(fields)) => {
                if fields.is_empty() {
                    self.diagnostics.push(Diagnostic::EmptyRecord);
                } else {
                    self.document.push(fields.into());
                }
            }
            _ => {}
        }
    }

    fn close_leaf(&mut self, leaf: Leaf) {
        if leaf.malformed {
            trace!(element = %leaf.element, "skipping element with nested children");
            self.diagnostics.push(Diagnostic::IgnoredElement { name: leaf.element });
            return;
        }

        let text = leaf.text;
        match (self.stack.last_mut(), leaf.kind) {
            (
                Some(Frame::Header),
                LeafKind::UserDefDecl {
                    id: Some(id),
                    data_type,
                    constraint,
                },
            ) => {
                let userdef = UserDef {
                    id,
                    data_type,
                    constraint,
                    name: text.trim().to_string(),
                };
                let header = &mut self.document.header;
                header.set(&userdef.field_name(), userdef.adi_value());
                header.add_userdef(userdef);
            }
            (Some(Frame::Header), LeafKind::Field(name)) => {
                self.document.header.set(&name, text);
            }
            (
                Some(Frame::Header),
                LeafKind::App {
                    program_id,
                    field_name: Some(name),
                    data_type,
                },
            ) => {
                trace!(?program_id, ?data_type, field = %name, "mapping APP header field");
                self.document.header.set(&name, text);
            }
            (Some(Frame::Record(fields)), LeafKind::Field(name)) => {
                fields.insert(&name, text);
            }
            (
                Some(Frame::Record(fields)),
                LeafKind::UserDefValue {
                    field_name: Some(name),
                },
            ) => {
                fields.insert(&name, text);
            }
            (
                Some(Frame::Record(fields)),
                LeafKind::App {
                    program_id,
                    field_name: Some(name),
                    data_type,
                },
            ) => {
                trace!(?program_id, ?data_type, field = %name, "mapping APP record field");
                fields.insert(&name, text);
            }
            _ => {
                trace!(element = %leaf.element, "skipping element missing required attributes");
                self.diagnostics.push(Diagnostic::IgnoredElement { name: leaf.element });
            }
        }
    }
}

fn header_leaf(e: &BytesStart<'_>, element: String, upper: &str) -> Leaf {
    let kind = match upper {
        "USERDEF" => {
            let attrs = attributes(e);
            LeafKind::UserDefDecl {
                id: attr(&attrs, "FIELDID").and_then(|v| v.trim().parse().ok()),
                data_type: attr(&attrs, "TYPE").and_then(DataType::from_code),
                constraint: attr(&attrs, "ENUM")
                    .or_else(|| attr(&attrs, "RANGE"))
                    .and_then(Constraint::parse),
            }
        }
        "APP" => app_kind(e),
        _ => LeafKind::Field(normalize_name(&element)),
    };
    leaf(element, kind)
}

fn record_leaf(e: &BytesStart<'_>, element: String, upper: &str) -> Leaf {
    let kind = match upper {
        "USERDEF" => {
            let attrs = attributes(e);
            LeafKind::UserDefValue {
                field_name: attr(&attrs, "FIELDNAME").map(normalize_name),
            }
        }
        "APP" => app_kind(e),
        _ => LeafKind::Field(normalize_name(&element)),
    };
    leaf(element, kind)
}

fn app_kind(e: &BytesStart<'_>) -> LeafKind {
    let attrs = attributes(e);
    LeafKind::App {
        program_id: attr(&attrs, "PROGRAMID").map(str::to_string),
        field_name: attr(&attrs, "FIELDNAME").map(normalize_name),
        data_type: attr(&attrs, "TYPE").map(str::to_string),
    }
}

fn leaf(element: String, kind: LeafKind) -> Leaf {
    Leaf {
        element,
        kind,
        text: String::new(),
        malformed: false,
    }
}

/// Attributes with upper-cased keys; unreadable attributes are skipped.
fn attributes(e: &BytesStart<'_>) -> Vec<(String, String)> {
    e.attributes()
        .filter_map(Result::ok)
        .filter_map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).to_ascii_uppercase();
            let value = a.unescape_value().ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.trim().is_empty())
}

/// Decodes ADX bytes, reporting what was dropped.
pub fn decode(input: &[u8]) -> Parsed {
    AdxMapper::new().read(input)
}
