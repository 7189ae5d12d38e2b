use dirdigest_core::{
    Decision, DigestConfig, DigestNode, Entry, Mode, NodeKind, PatternDecl, PatternKind,
    PatternSource, ProcessingLog, Reason, ReasonKind, SortKey, Verdict,
};

#[test]
fn test_mode_coverage() {
    let py = || PatternDecl::include("*.py", 0);
    let tests = |i| PatternDecl::exclude("tests/", i);

    assert_eq!(Mode::resolve(&[]), Mode::IncludeAllDefault);
    assert_eq!(Mode::resolve(&[py()]), Mode::OnlyInclude);
    assert_eq!(Mode::resolve(&[tests(0)]), Mode::OnlyExclude);
    assert_eq!(Mode::resolve(&[py(), tests(1)]), Mode::IncludeFirst);
    assert_eq!(
        Mode::resolve(&[tests(0), PatternDecl::include("*.py", 1)]),
        Mode::ExcludeFirst
    );
}

#[test]
fn test_mode_with_unknown_order() {
    let decls = [
        PatternDecl::new("*.py", PatternKind::Include, PatternSource::Config, 0),
        PatternDecl::new("build/", PatternKind::Exclude, PatternSource::Config, 1),
    ];
    assert_eq!(Mode::resolve(&decls), Mode::ExcludeFirst);
}

#[test]
fn test_config_serde_defaults() {
    let config: DigestConfig = serde_json::from_str(r#"{"root": "/srv/project"}"#).unwrap();
    assert!(config.default_ignore);
    assert_eq!(config.max_size, dirdigest_core::DEFAULT_MAX_SIZE);
    assert_eq!(config.max_depth, None);
    assert_eq!(config.sort_keys, SortKey::DEFAULT_ORDER.to_vec());
    assert!(config.validate().is_ok());
}

#[test]
fn test_sort_status_size_grouping() {
    let mut log = ProcessingLog::new();
    log.push(Decision::included(Entry::file("small.txt", 5), Reason::included_by_default()));
    log.push(Decision::included(Entry::file("large.txt", 500), Reason::included_by_default()));
    log.push(Decision::excluded(
        Entry::file("debug.log", 40),
        Reason::user_exclude("*.log"),
    ));
    log.push(Decision::included(Entry::folder("docs"), Reason::included_by_default()));
    log.push(Decision::excluded(
        Entry::folder("node_modules"),
        Reason::default_ignore("**/node_modules/", true),
    ));

    let sorted = log.sorted(&[SortKey::Status, SortKey::Size]);
    let order: Vec<(&str, Verdict)> = sorted.iter().map(|d| (d.path(), d.verdict)).collect();
    assert_eq!(
        order,
        vec![
            ("node_modules", Verdict::Excluded),
            ("debug.log", Verdict::Excluded),
            ("docs", Verdict::Included),
            ("large.txt", Verdict::Included),
            ("small.txt", Verdict::Included),
        ]
    );

    // Sorting never drops or duplicates decisions.
    assert_eq!(sorted.len(), log.len());
}

#[test]
fn test_decision_serialization() {
    let decision = Decision::excluded(Entry::file("secret.env", 12), Reason::user_exclude("*.env"));
    let json = serde_json::to_value(&decision).unwrap();

    assert_eq!(json["verdict"], "excluded");
    assert_eq!(json["entry"]["kind"], "file");
    assert_eq!(json["reason"]["kind"], "user_exclude");

    let back: Decision = serde_json::from_value(json).unwrap();
    assert_eq!(back.reason.kind, ReasonKind::UserExclude);
}

#[test]
fn test_digest_node_serialization_skips_empty() {
    let node = DigestNode::new_file("src/main.rs", 42);
    let json = serde_json::to_value(&node).unwrap();

    assert_eq!(json["type"], "file");
    assert_eq!(json["relative_path"], "src/main.rs");
    assert!(json.get("children").is_none());
    assert!(json.get("content").is_none());

    let folder = DigestNode::new_folder("src");
    assert_eq!(folder.kind, NodeKind::Folder);
}
