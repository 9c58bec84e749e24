use adif::{
    decode::{Adx, Decoder, Format},
    diagnostic::Diagnostic,
    document::Constraint,
    parse, parse_adi, parse_adx,
    types::DataType,
};

const MONOLOG_ADX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ADX>
    <HEADER>
        <ADIF_VER>3.0.4</ADIF_VER>
        <PROGRAMID>monolog</PROGRAMID>
        <USERDEF FIELDID="1" TYPE="N">EPC</USERDEF>
        <USERDEF FIELDID="2" TYPE="E" ENUM="{S,M,L}">SWEATERSIZE</USERDEF>
        <USERDEF FIELDID="3" TYPE="N" RANGE="{5:20}">SHOESIZE</USERDEF>
    </HEADER>
    <RECORDS>
        <RECORD>
            <QSO_DATE>19900620</QSO_DATE>
            <TIME_ON>1523</TIME_ON>
            <CALL>VK9NS</CALL>
            <BAND>20M</BAND>
            <MODE>RTTY</MODE>
            <USERDEF FIELDNAME="SWEATERSIZE">M</USERDEF>
            <USERDEF FIELDNAME="SHOESIZE">11</USERDEF>
            <APP PROGRAMID="MONOLOG" FIELDNAME="Compression" TYPE="s">off</APP>
        </RECORD>
        <RECORD>
            <QSO_DATE>20101022</QSO_DATE>
            <TIME_ON>0111</TIME_ON>
            <CALL>ON4UN</CALL>
            <BAND>40M</BAND>
            <MODE>PSK</MODE>
            <SUBMODE>PSK63</SUBMODE>
            <USERDEF FIELDNAME="EPC">32123</USERDEF>
            <APP PROGRAMID="MONOLOG" FIELDNAME="COMPRESSION" TYPE="s">off</APP>
        </RECORD>
    </RECORDS>
</ADX>
"#;

#[test]
fn maps_header_and_userdef_declarations() {
    let doc = parse_adx(MONOLOG_ADX);
    let header = &doc.header;

    assert_eq!(header.get("adif_ver"), Some("3.0.4"));
    assert_eq!(header.get("programid"), Some("monolog"));

    assert_eq!(header.userdefs().len(), 3);
    let epc = header.userdef(1).expect("userdef1");
    assert_eq!(epc.name, "EPC");
    assert_eq!(epc.data_type, Some(DataType::Number));
    assert_eq!(epc.constraint, None);

    let sweater = header.userdef(2).expect("userdef2");
    assert_eq!(sweater.name, "SWEATERSIZE");
    assert_eq!(
        sweater.constraint,
        Some(Constraint::Enum(vec!["S".into(), "M".into(), "L".into()]))
    );

    let shoe = header.userdef_named("ShoeSize").expect("userdef3");
    assert_eq!(shoe.constraint, Some(Constraint::Range { min: 5.0, max: 20.0 }));

    assert_eq!(header.get("userdef2"), Some("SWEATERSIZE,{S,M,L}"));
    assert_eq!(header.get("userdef3"), Some("SHOESIZE,{5:20}"));
}

#[test]
fn maps_records_userdef_values_and_app_fields() {
    let parsed = Adx.decode(MONOLOG_ADX.as_bytes());
    assert!(parsed.is_clean(), "{:?}", parsed.diagnostics);

    let records = &parsed.document.records;
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.get("qso_date"), Some("19900620"));
    assert_eq!(first.get("time_on"), Some("1523"));
    assert_eq!(first.get("call"), Some("VK9NS"));
    assert_eq!(first.get("sweatersize"), Some("M"));
    assert_eq!(first.get("shoesize"), Some("11"));
    assert_eq!(first.get("compression"), Some("off"));
    assert_eq!(first.len(), 8);

    let second = &records[1];
    assert_eq!(second.get("call"), Some("ON4UN"));
    assert_eq!(second.get("submode"), Some("PSK63"));
    assert_eq!(second.get("epc"), Some("32123"));
    assert_eq!(second.get("COMPRESSION"), Some("off"));
}

#[test]
fn adx_and_adi_agree_on_shared_content() {
    let adx = parse_adx(
        "<ADX><HEADER><PROGRAMID>MonoLog</PROGRAMID>\
         <USERDEF FIELDID=\"2\" TYPE=\"E\" ENUM=\"{S,M,L}\">SweaterSize</USERDEF></HEADER>\
         <RECORDS><RECORD><CALL>WN4AZY</CALL><BAND>20M</BAND></RECORD></RECORDS></ADX>",
    );
    let adi = parse_adi(
        "x\n<PROGRAMID:7>MonoLog<USERDEF2:19:E>SweaterSize,{S,M,L}<eoh><CALL:6>WN4AZY<BAND:3>20M<eor>",
    );
    assert_eq!(adx, adi);
}

#[test]
fn unexpected_elements_are_ignored() {
    let parsed = Adx.decode(
        b"<ADX><RECORDS><SUMMARY>2</SUMMARY><RECORD><CALL>K1ABC</CALL>\
          <USERDEF>orphan</USERDEF><APP PROGRAMID=\"X\">nofield</APP></RECORD>\
          <RECORD></RECORD></RECORDS></ADX>",
    );
    let doc = &parsed.document;
    assert_eq!(doc.records.len(), 1);
    assert_eq!(doc.records[0].len(), 1);
    assert_eq!(
        parsed.diagnostics,
        [
            Diagnostic::IgnoredElement {
                name: "SUMMARY".to_string()
            },
            Diagnostic::IgnoredElement {
                name: "USERDEF".to_string()
            },
            Diagnostic::IgnoredElement {
                name: "APP".to_string()
            },
            Diagnostic::EmptyRecord,
        ]
    );
}

#[test]
fn entities_and_lower_case_elements() {
    let doc = parse_adx("<adx><records><record><call>K1ABC</call><comment>59 &amp; 73</comment></record></records></adx>");
    assert_eq!(doc.records.len(), 1);
    assert_eq!(doc.records[0].get("comment"), Some("59 & 73"));
}

#[test]
fn format_detection_routes_to_decoder() {
    assert_eq!(Format::detect(MONOLOG_ADX.as_bytes()), Format::Adx);
    let parsed = parse(MONOLOG_ADX.as_bytes());
    assert_eq!(parsed.document.records.len(), 2);

    let parsed = parse(b"<call:5>VK9NS<eor>");
    assert_eq!(parsed.document.records[0].get("call"), Some("VK9NS"));
}
