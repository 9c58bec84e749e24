use adif::{document::AccessorError, parse_adi};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("valid datetime")
}

#[test]
fn combines_date_and_time_pairs() {
    let doc = parse_adi(
        "<eoh>
        <qso_date:8:d>19960513<time_on:4>1305
        <qso_date_off:8:d>19960513<time_off:4>1310<eor>
        <qso_date:8:d>19961231<time_on:6>235959
        <qso_date_off:8:d>19970101<time_off:6>000005<eor>
        ",
    );
    assert_eq!(doc.records.len(), 2);

    let r = &doc.records[0];
    assert_eq!(r.datetime_on(), Ok(at(1996, 5, 13, 13, 5, 0)));
    assert_eq!(r.datetime_off(), Ok(at(1996, 5, 13, 13, 10, 0)));
    assert_eq!(
        r.datetime_on().map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        Ok("1996-05-13 13:05:00".to_string())
    );

    let r = &doc.records[1];
    assert_eq!(r.datetime_on(), Ok(at(1996, 12, 31, 23, 59, 59)));
    assert_eq!(r.datetime_off(), Ok(at(1997, 1, 1, 0, 0, 5)));
}

#[test]
fn missing_half_is_reported() {
    let doc = parse_adi("<qso_date:8>19960513<call:4>K1AB<eor>");
    let r = &doc.records[0];
    assert_eq!(
        r.datetime_on(),
        Err(AccessorError::MissingField { field: "time_on" })
    );
    assert_eq!(
        r.datetime_off(),
        Err(AccessorError::MissingField {
            field: "qso_date_off"
        })
    );
}

#[test]
fn non_digit_values_are_format_errors() {
    let doc = parse_adi("<qso_date:10>1996-05-13<time_on:4>1305<eor>");
    assert_eq!(
        doc.records[0].datetime_on(),
        Err(AccessorError::Format {
            field: "qso_date",
            value: "1996-05-13".to_string()
        })
    );
}
