//! Parse/serialize tests over realistic form documents

use xform_xml::{parse, serialize};

#[test]
fn test_controls_document_round_trip() {
    let xml = r#"<xxf:controls xmlns:xxf="http://orbeon.org/oxf/xml/xforms" xmlns:xf="http://www.w3.org/2002/xforms" xmlns:ev="http://www.w3.org/2001/xml-events"><xf:input xxf:id="c1" ref="/data/x"><xf:setvalue ev:event="my-event" ref="/data/x" value="'hello'"/></xf:input></xxf:controls>"#;
    let doc = parse(xml).unwrap();
    assert_eq!(serialize(&doc).unwrap(), xml);
}

#[test]
fn test_instance_document_with_default_namespace() {
    let xml = r#"<data xmlns="urn:data"><x>old</x><y attr="1"/></data>"#;
    let doc = parse(xml).unwrap();

    let root = doc.document_element().unwrap();
    let elem = doc.get(root).unwrap().as_element().unwrap();
    assert_eq!(elem.name.uri.as_deref(), Some("urn:data"));

    assert_eq!(serialize(&doc).unwrap(), xml);
}

#[test]
fn test_whitespace_and_mixed_content_survive() {
    let xml = "<data>\n  <x>a b</x>\n  <y>c</y>\n</data>";
    let doc = parse(xml).unwrap();
    assert_eq!(serialize(&doc).unwrap(), xml);

    let root = doc.document_element().unwrap();
    assert_eq!(doc.tree().string_value(root), "\n  a b\n  c\n");
}

#[test]
fn test_escaped_characters_round_trip() {
    let xml = r#"<data><x>a &lt; b &amp; c</x><y attr="say &quot;hi&quot;"/></data>"#;
    let doc = parse(xml).unwrap();

    let root = doc.document_element().unwrap();
    let (x, _) = doc.tree().children(root).next().unwrap();
    assert_eq!(doc.tree().string_value(x), "a < b & c");
}

#[test]
fn test_event_document() {
    let doc = parse(r#"<event source-control-id="c1" name="my-event"/>"#).unwrap();
    let root = doc.document_element().unwrap();
    let elem = doc.get(root).unwrap().as_element().unwrap();

    assert_eq!(elem.attr("source-control-id"), Some("c1"));
    assert_eq!(elem.attr("name"), Some("my-event"));
}

#[test]
fn test_malformed_markup_is_rejected() {
    assert!(parse("<data><x></data>").is_err());
    assert!(parse("").is_err());
}
