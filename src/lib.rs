//! ADIF (Amateur Data Interchange Format) decoding and encoding.
//!
//! Both encodings, ADI tag-length-value text and ADX XML, decode into the
//! same [`document::Document`]. Decoding never fails: non-conformant input is
//! reduced to its largest well-formed part and the dropped pieces are listed
//! as [`diagnostic::Diagnostic`]s. [`writer::adi::AdiWriter`] emits ADI for
//! ADIF 2 or 3.
//!
//! # Examples
//!
//! Parsing ADI:
//! ```
//! let doc = adif::parse_adi("<call:6>WN4AZY<band:3>20M<CALL:6>N6MRQ<eor>");
//! assert_eq!(doc.records.len(), 1);
//! assert_eq!(doc.records[0].get("call"), Some("N6MRQ"));
//! assert_eq!(doc.records[0].get("BAND"), Some("20M"));
//! ```
//!
//! Writing ADI:
//! ```
//! use adif::{
//!     document::{Constraint, Header, Record, UserDef},
//!     types::DataType,
//!     writer::adi::AdiWriter,
//! };
//!
//! let mut writer = AdiWriter::with_version(3, Vec::new()).expect("version");
//! writer
//!     .write_header(
//!         &Header::new().with("programid", "ruby-adif").with_userdef(
//!             UserDef::new(1, "SWEATERSIZE")
//!                 .with_type(DataType::Enumeration)
//!                 .with_constraint(Constraint::Enum(vec!["S".into(), "M".into(), "L".into()])),
//!         ),
//!     )
//!     .expect("header");
//! writer
//!     .write_record(&Record::new().with("call", "JH1UMV").with("qso_date", "20140624"))
//!     .expect("record");
//! writer.finish().expect("finish");
//!
//! let text = String::from_utf8(writer.into_inner()).expect("utf8");
//! assert!(text.contains("<USERDEF1:19:E>SWEATERSIZE,{S,M,L}"));
//! assert!(text.contains("<CALL:6>JH1UMV"));
//! ```
#![deny(missing_docs)]

/// ADI tokenizer and assembler.
pub mod adi;
/// ADX mapper.
pub mod adx;
/// Decoder trait and parse entry points.
pub mod decode;
/// Degradation reports.
pub mod diagnostic;
/// Header, record, and user-defined field model.
pub mod document;
/// Ordered case-insensitive field map.
pub mod field;
/// Persistence abstraction and SQLite archive.
pub mod persist;
/// Shared primitive types and enums.
pub mod types;
/// ADI writer.
pub mod writer;

pub use decode::{parse, parse_adi, parse_adi_bytes, parse_adx, parse_adx_bytes};
