use chrono::NaiveTime;
use std::collections::BTreeMap;
use task_tools::model::{LinkPair, ParseError, parse, process_links, render, summary};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_all_annotations() {
    let p = parse("(15) Write report 09:00-10:00 see [spec](https://example.com/s)").unwrap();

    assert_eq!(p.short_duration.as_deref(), Some("15"));
    assert_eq!(p.start_time, Some(time(9, 0)));
    assert_eq!(p.end_time, Some(time(10, 0)));
    assert_eq!(p.links, vec![LinkPair::new("spec", "https://example.com/s")]);
    // The time period is cut out in place and nothing else is removed, so the
    // word "see" and the spaces around the period stay; only trimming applies.
    assert_eq!(p.clean_content, "Write report  see spec");
}

#[test]
fn test_at_least_duration_token() {
    let p = parse("(30+) Long task").unwrap();

    assert_eq!(p.short_duration.as_deref(), Some("30+"));
    assert_eq!(p.clean_content, "Long task");
    assert!(p.start_time.is_none());
    assert!(p.end_time.is_none());
    assert!(p.links.is_empty());
}

#[test]
fn test_plain_title() {
    let p = parse("Plain task").unwrap();

    assert_eq!(p.clean_content, "Plain task");
    assert!(p.short_duration.is_none());
    assert!(p.start_time.is_none());
    assert!(p.end_time.is_none());
    assert!(p.links.is_empty());
}

#[test]
fn test_empty_title() {
    let p = parse("").unwrap();
    assert_eq!(p.clean_content, "");
    assert!(p.short_duration.is_none());
}

#[test]
fn test_title_is_trimmed_without_markers() {
    let p = parse("   Call the bank  ").unwrap();
    assert_eq!(p.clean_content, "Call the bank");
    assert!(p.short_duration.is_none());
}

#[test]
fn test_duration_token_must_be_leading() {
    let p = parse("Task (15) later").unwrap();
    assert!(p.short_duration.is_none());
    assert_eq!(p.clean_content, "Task (15) later");

    let p = parse(" (15) Task").unwrap();
    assert!(p.short_duration.is_none(), "Leading whitespace defeats the anchor");
}

#[test]
fn test_malformed_duration_tokens_are_text() {
    for title in ["() Task", "(abc) Task", "(+) Task", "(15++) Task"] {
        let p = parse(title).unwrap();
        assert!(p.short_duration.is_none(), "{}", title);
        assert_eq!(p.clean_content, title);
    }
}

#[test]
fn test_time_period_anywhere() {
    let p = parse("Standup 9:30-9:45").unwrap();
    assert_eq!(p.start_time, Some(time(9, 30)));
    assert_eq!(p.end_time, Some(time(9, 45)));
    assert_eq!(p.clean_content, "Standup");
}

#[test]
fn test_only_first_time_period_is_taken() {
    let p = parse("Shift 08:00-12:00 then 13:00-17:00").unwrap();
    assert_eq!(p.start_time, Some(time(8, 0)));
    assert_eq!(p.end_time, Some(time(12, 0)));
    assert_eq!(p.clean_content, "Shift  then 13:00-17:00");
}

#[test]
fn test_malformed_time_period_is_an_error() {
    let err = parse("Broken 99:99-10:00").unwrap_err();
    match err {
        ParseError::MalformedTimePeriod { period, half } => {
            assert_eq!(period, "99:99-10:00");
            assert_eq!(half, "99:99");
        }
    }

    assert!(parse("Late 23:00-24:30").is_err());
}

#[test]
fn test_time_without_range_is_text() {
    let p = parse("Call at 10:00").unwrap();
    assert!(p.start_time.is_none());
    assert_eq!(p.clean_content, "Call at 10:00");
}

#[test]
fn test_multiple_links_keep_order() {
    let p = parse("[b](http://b.example) and [a](https://a.example/x?y=1)").unwrap();
    assert_eq!(
        p.links,
        vec![
            LinkPair::new("b", "http://b.example"),
            LinkPair::new("a", "https://a.example/x?y=1"),
        ]
    );
    assert_eq!(p.clean_content, "b and a");
}

#[test]
fn test_duplicate_anchors_are_kept() {
    let p = parse("[doc](https://one.example) vs [doc](https://two.example)").unwrap();
    assert_eq!(p.links.len(), 2);
    assert_eq!(p.clean_content, "doc vs doc");

    let rendered = render(&p.clean_content, &p.links);
    assert_eq!(
        rendered,
        "[doc](https://one.example) vs [doc](https://two.example)"
    );
}

#[test]
fn test_non_http_links_stay_markdown() {
    let p = parse("Open [file](file:///tmp/x)").unwrap();
    assert!(p.links.is_empty());
    assert_eq!(p.clean_content, "Open [file](file:///tmp/x)");
}

#[test]
fn test_render_round_trip() {
    let titles = [
        "(15) Write report 09:00-10:00 see [spec](https://example.com/s)",
        "Review [PR 12](https://git.example/pr/12) with [Ann](http://people.example/ann)",
        "[start](https://s.example) middle [end](https://e.example)",
    ];
    for title in titles {
        let p = parse(title).unwrap();
        let rendered = render(&p.clean_content, &p.links);
        for link in &p.links {
            assert!(
                rendered.contains(&link.to_markdown()),
                "{} missing from {}",
                link.to_markdown(),
                rendered
            );
        }
    }
}

#[test]
fn test_render_skips_missing_anchor() {
    let links = vec![LinkPair::new("absent", "https://x.example")];
    assert_eq!(render("Nothing here", &links), "Nothing here");
}

#[test]
fn test_summary_truncates_by_characters() {
    let long = "é".repeat(60);
    assert_eq!(summary(&long).chars().count(), 50);
    assert_eq!(summary("short"), "short");

    let p = parse(&format!("(5) {}", "x".repeat(80))).unwrap();
    assert_eq!(p.summary(), "x".repeat(50));
}

#[test]
fn test_parse_is_deterministic() {
    let title = "(10+) Ping [team](https://chat.example) 14:00-14:15";
    assert_eq!(parse(title).unwrap(), parse(title).unwrap());
}

#[test]
fn test_render_links_out_of_order() {
    let links = vec![
        LinkPair::new("b", "https://b"),
        LinkPair::new("a", "https://a"),
    ];
    assert_eq!(render("a b", &links), "[a](https://a) [b](https://b)");
}

#[test]
fn test_render_uses_first_free_occurrence() {
    // The first "x" sits inside the "box" anchor, which is already taken.
    let links = vec![
        LinkPair::new("box", "https://box"),
        LinkPair::new("x", "https://x"),
    ];
    assert_eq!(
        render("box x", &links),
        "[box](https://box) [x](https://x)"
    );
}

fn dictionary(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_process_links_prefers_longer_keys() {
    let links = dictionary(&[
        ("DR-1", "https://jira.example/browse/DR-1"),
        ("DR-12", "https://jira.example/browse/DR-12"),
    ]);
    let raw = process_links("DR-1 and DR-12", &links);
    assert_eq!(
        raw,
        "[DR-1](https://jira.example/browse/DR-1) and [DR-12](https://jira.example/browse/DR-12)"
    );
}

#[test]
fn test_process_links_needs_word_boundaries() {
    let links = dictionary(&[("DR-1", "https://jira.example/browse/DR-1")]);
    assert_eq!(process_links("DR-12 XDR-1", &links), "DR-12 XDR-1");
}

#[test]
fn test_process_links_leaves_existing_links_alone() {
    let links = dictionary(&[("DR-1", "https://jira.example/browse/DR-1")]);
    let raw = process_links("DR-1 see [DR-1](https://jira.example/browse/DR-1)", &links);
    assert_eq!(
        raw,
        "[DR-1](https://jira.example/browse/DR-1) see [DR-1](https://jira.example/browse/DR-1)"
    );

    let p = parse(&raw).unwrap();
    assert_eq!(p.clean_content, "DR-1 see DR-1");
    assert!(p.links.iter().all(|l| l.anchor == "DR-1"));
    assert_eq!(p.links.len(), 2);

    let bare_url = process_links("Open https://jira.example/issues/DR-1 now", &links);
    assert_eq!(bare_url, "Open https://jira.example/issues/DR-1 now");
}
