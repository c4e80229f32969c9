//! Whole-pattern rendering scenarios.

use stix_pattern::{
    ComparisonExpr, Constant, HashAlgorithm, ObjectPath, ObservationExpr, PropertyExpr, Qualifier,
    Timestamp,
};

fn eq(object_type: &str, segment: &str, value: &str) -> ComparisonExpr {
    let path = ObjectPath::new(object_type, [segment]).unwrap();
    ComparisonExpr::equal(path, value).unwrap()
}

#[test]
fn domain_name_equality() {
    let pattern = ObservationExpr::observe(eq("domain-name", "value", "site.of.interest.zaz"));
    assert_eq!(
        pattern.to_pattern_string(),
        "[domain-name:value = 'site.of.interest.zaz']"
    );
}

#[test]
fn nested_path_with_wildcard_and_float() {
    let path = ObjectPath::new(
        "file",
        ["extensions", "windows-pebinary-ext", "sections[*]", "entropy"],
    )
    .unwrap();
    let cmp = ComparisonExpr::greater_than(path, Constant::float(7.0).unwrap()).unwrap();
    assert_eq!(
        ObservationExpr::observe(cmp).to_pattern_string(),
        "[file:extensions.windows-pebinary-ext.sections[*].entropy > 7.0]"
    );
}

#[test]
fn email_conjunction_shares_brackets() {
    let sender = ComparisonExpr::equal(
        ObjectPath::new("email-message", ["sender_ref", "value"]).unwrap(),
        "stark@example.com",
    )
    .unwrap();
    let subject = eq("email-message", "subject", "Conference Info");
    let both = PropertyExpr::and(vec![sender.into(), subject.into()]).unwrap();
    assert_eq!(
        ObservationExpr::observe(both).to_pattern_string(),
        "[email-message:sender_ref.value = 'stark@example.com' AND email-message:subject = 'Conference Info']"
    );
}

#[test]
fn parenthesized_or_anded_with_timestamp() {
    let name = eq("file", "name", "pdf.exe");
    let size = ComparisonExpr::equal(
        ObjectPath::new("file", ["size"]).unwrap(),
        Constant::integer(371712),
    )
    .unwrap();
    let created = ComparisonExpr::equal(
        ObjectPath::new("file", ["created"]).unwrap(),
        Constant::timestamp_str("2014-01-13T07:03:17Z").unwrap(),
    )
    .unwrap();

    let or = PropertyExpr::or(vec![name.into(), size.into()]).unwrap();
    let and = PropertyExpr::and(vec![PropertyExpr::paren(or), created.into()]).unwrap();
    assert_eq!(
        ObservationExpr::observe(and).to_pattern_string(),
        "[(file:name = 'pdf.exe' OR file:size = 371712) AND file:created = t'2014-01-13T07:03:17Z']"
    );
}

#[test]
fn followed_by_within_window() {
    let obs1 = ObservationExpr::observe(eq("file", "name", "malware.exe"));
    let obs2 = ObservationExpr::observe(eq("domain-name", "value", "evil.example.com"));
    let pattern = ObservationExpr::followed_by(vec![obs1, obs2])
        .unwrap()
        .paren()
        .qualified(Qualifier::within(300).unwrap());
    assert_eq!(
        pattern.to_pattern_string(),
        "([file:name = 'malware.exe'] FOLLOWEDBY [domain-name:value = 'evil.example.com']) WITHIN 300 SECONDS"
    );
}

#[test]
fn stacked_qualifiers_render_innermost_first() {
    let pattern = ObservationExpr::observe(eq("network-traffic", "dst_port", "1234"))
        .qualified(Qualifier::repeats(5).unwrap())
        .qualified(Qualifier::within(180).unwrap());
    assert_eq!(
        pattern.to_pattern_string(),
        "[network-traffic:dst_port = '1234'] REPEATS 5 TIMES WITHIN 180 SECONDS"
    );
}

#[test]
fn hash_comparison_end_to_end() {
    let path = ObjectPath::hash("file", HashAlgorithm::Md5).unwrap();
    let digest = Constant::hash(HashAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e").unwrap();
    let cmp = ComparisonExpr::new(path, stix_pattern::ComparisonOp::Eq, digest).unwrap();
    assert_eq!(
        ObservationExpr::observe(cmp).to_pattern_string(),
        "[file:hashes.'MD5' = 'd41d8cd98f00b204e9800998ecf8427e']"
    );
}

#[test]
fn start_stop_window() {
    let start = Timestamp::parse("2018-03-11T00:00:00Z").unwrap();
    let stop = Timestamp::parse("2018-03-12T00:00:00Z").unwrap();
    let pattern = ObservationExpr::observe(eq("ipv4-addr", "value", "198.51.100.5"))
        .qualified(Qualifier::start_stop(start, stop).unwrap());
    assert_eq!(
        pattern.to_pattern_string(),
        "[ipv4-addr:value = '198.51.100.5'] START t'2018-03-11T00:00:00Z' STOP t'2018-03-12T00:00:00Z'"
    );
}

#[test]
fn cidr_subset_pattern() {
    let path = ObjectPath::new("ipv4-addr", ["value"]).unwrap();
    let cmp = ComparisonExpr::is_subset(path, "2001:0db8:dead:beef:0000:0000:0000:0000/64").unwrap();
    assert_eq!(
        ObservationExpr::observe(cmp).to_pattern_string(),
        "[ipv4-addr:value ISSUBSET '2001:0db8:dead:beef:0000:0000:0000:0000/64']"
    );
}

#[test]
fn mixed_observation_precedence() {
    let a = ObservationExpr::observe(eq("file", "name", "a"));
    let b = ObservationExpr::observe(eq("file", "name", "b"));
    let c = ObservationExpr::observe(eq("file", "name", "c"));
    let d = ObservationExpr::observe(eq("file", "name", "d"));

    // OR under AND gets parenthesized; the AND result under FOLLOWEDBY does not
    let or = ObservationExpr::or(vec![a, b]).unwrap();
    let and = ObservationExpr::and(vec![or, c]).unwrap();
    let fb = ObservationExpr::followed_by(vec![and, d]).unwrap();
    assert_eq!(
        fb.to_pattern_string(),
        "([file:name = 'a'] OR [file:name = 'b']) AND [file:name = 'c'] FOLLOWEDBY [file:name = 'd']"
    );
}

#[test]
fn rendering_is_deterministic() {
    let build = || {
        let or = PropertyExpr::or(vec![
            eq("file", "name", "pdf.exe").into(),
            eq("file", "name", "cmd.exe").into(),
        ])
        .unwrap();
        ObservationExpr::observe(or).to_pattern_string()
    };
    assert_eq!(build(), build());
}

#[test]
fn negated_comparison_in_pattern() {
    let cmp = eq("process", "name", "svchost.exe").negate();
    assert_eq!(
        ObservationExpr::observe(cmp).to_pattern_string(),
        "[process:name != 'svchost.exe']"
    );
}

#[cfg(feature = "serde")]
#[test]
fn pattern_serializes_as_rendered_string() {
    let pattern = ObservationExpr::observe(eq("domain-name", "value", "site.of.interest.zaz"));
    let json = serde_json::to_string(&pattern).unwrap();
    assert_eq!(json, "\"[domain-name:value = 'site.of.interest.zaz']\"");
}
