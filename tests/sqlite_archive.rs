use tempfile::TempDir;

use adif::{
    parse_adi,
    persist::{DocumentSink, sqlite::SqliteArchive},
};

const LOG: &str = "MonoLog export
<adif_ver:5>3.0.4<programid:7>MonoLog<USERDEF2:19:E>SweaterSize,{S,M,L}<eoh>
<call:6>WN4AZY<band:3>20M<mode:4>RTTY<eor>
<call:5>N6MRQ<band:2>2M<mode:2>FM<eor>
<call:6>wn4azy<band:3>40M<mode:2>CW<eor>
";

#[test]
fn archive_round_trips_document() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("log.db");

    let doc = parse_adi(LOG);
    let mut archive = SqliteArchive::open(&db_path).expect("open sqlite");
    let id = archive.append_document(&doc, "monolog.adi").expect("append");
    archive.flush().expect("flush");
    drop(archive);

    let reopened = SqliteArchive::open(&db_path).expect("reopen");
    let loaded = reopened.load_document(id).expect("load").expect("present");
    assert_eq!(loaded, doc);
    assert_eq!(loaded.header.userdef(2).map(|u| u.name.as_str()), Some("SweaterSize"));

    let imports = reopened.imports().expect("imports");
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].id, id);
    assert_eq!(imports[0].source, "monolog.adi");
    assert_eq!(imports[0].record_count, 3);
}

#[test]
fn records_by_call_spans_imports() {
    let mut archive = SqliteArchive::open_in_memory().expect("open");
    let first = archive.append_document(&parse_adi(LOG), "a.adi").expect("append a");
    let second = archive
        .append_document(&parse_adi("<call:6>WN4AZY<band:2>6M<eor>"), "b.adi")
        .expect("append b");

    let hits = archive.records_by_call("Wn4Azy").expect("query");
    let bands: Vec<_> = hits
        .iter()
        .map(|(id, r)| (*id, r.get("band").unwrap_or_default().to_string()))
        .collect();
    assert_eq!(
        bands,
        [
            (first, "20M".to_string()),
            (first, "40M".to_string()),
            (second, "6M".to_string()),
        ]
    );
}

#[test]
fn delete_import_removes_records() {
    let mut archive = SqliteArchive::open_in_memory().expect("open");
    let id = archive.append_document(&parse_adi(LOG), "a.adi").expect("append");

    assert_eq!(archive.delete_import(id).expect("delete"), 3);
    assert!(archive.load_document(id).expect("load").is_none());
    assert!(archive.records_by_call("N6MRQ").expect("query").is_empty());
    assert!(archive.imports().expect("imports").is_empty());
}

#[test]
fn sink_trait_object_accepts_documents() {
    let mut sink: Box<dyn DocumentSink> = Box::new(SqliteArchive::open_in_memory().expect("open"));
    let id = sink.append_document(&parse_adi(LOG), "boxed").expect("append");
    assert!(id > 0);
}
