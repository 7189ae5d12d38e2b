use dirdigest_core::{DigestConfig, Entry, Mode, PatternDecl, ReasonKind};
use dirdigest_filter::{
    FilterEngine, Limits, Pattern, PatternOrigin, PatternSet, decide, specificity,
};

fn engine_for(decls: Vec<PatternDecl>) -> FilterEngine {
    let mut config = DigestConfig::new(".");
    config.patterns = decls;
    FilterEngine::new(&config).unwrap()
}

#[test]
fn test_only_include_python() {
    let engine = engine_for(vec![PatternDecl::include("*.py", 0)]);
    assert_eq!(engine.mode(), Mode::OnlyInclude);

    assert!(engine.decide(Entry::file("a.py", 10)).is_included());

    let txt = engine.decide(Entry::file("a.txt", 10));
    assert!(txt.is_excluded());
    assert!(txt.reason.message.contains("not matched by include"));
}

#[test]
fn test_exclude_first_rescue() {
    let engine = engine_for(vec![
        PatternDecl::exclude("output/*", 0),
        PatternDecl::include("output/critical/", 1),
    ]);
    assert_eq!(engine.mode(), Mode::ExcludeFirst);

    let output = engine.decide(Entry::folder("output"));
    assert!(output.is_included(), "{:?}", output.reason);

    assert!(engine.decide(Entry::folder("output/critical")).is_included());
    assert!(
        engine
            .decide(Entry::file("output/critical/report.md", 100))
            .is_included()
    );

    let other = engine.decide(Entry::file("output/other.txt", 100));
    assert!(other.is_excluded());
    assert_eq!(other.reason.kind, ReasonKind::UserExclude);
}

#[test]
fn test_excluded_directory_reached_by_nested_include() {
    let engine = engine_for(vec![
        PatternDecl::exclude("docs/", 0),
        PatternDecl::include("docs/api/", 1),
    ]);
    let docs = engine.decide(Entry::folder("docs"));
    assert!(docs.is_included());
    assert_eq!(docs.reason.kind, ReasonKind::Traversal);

    assert!(engine.decide(Entry::file("docs/api/index.md", 1)).is_included());
    assert!(engine.decide(Entry::file("docs/guide.md", 1)).is_excluded());
}

#[test]
fn test_default_ignore_suppression() {
    let mut config = DigestConfig::new(".");
    assert!(
        FilterEngine::new(&config)
            .unwrap()
            .decide(Entry::folder(".git"))
            .is_excluded()
    );

    config.default_ignore = false;
    let engine = FilterEngine::new(&config).unwrap();
    let git = engine.decide(Entry::folder(".git"));
    assert!(git.is_included());
    assert_eq!(git.reason.kind, ReasonKind::Default);
}

#[test]
fn test_size_boundary() {
    let mut config = DigestConfig::new(".");
    config.max_size = 1024;
    let engine = FilterEngine::new(&config).unwrap();

    assert!(engine.decide(Entry::file("exact.txt", 1024)).is_included());

    let over = engine.decide(Entry::file("over.txt", 1025));
    assert!(over.is_excluded());
    assert!(over.reason.message.contains("exceeds max size"));

    // Folders are never size-excluded.
    let mut big = Entry::folder("big");
    big.size = 10_000;
    assert!(engine.decide(big).is_included());
}

#[test]
fn test_user_include_overrides_default_ignore() {
    let engine = engine_for(vec![PatternDecl::include("build/keep.txt", 0)]);
    let build = engine.decide(Entry::folder("build"));
    assert!(build.is_included(), "{}", build.reason);
    assert!(engine.decide(Entry::file("build/keep.txt", 1)).is_included());
    assert!(engine.decide(Entry::file("build/out.o", 1)).is_excluded());
}

#[test]
fn test_only_exclude_with_default() {
    let engine = engine_for(vec![PatternDecl::exclude("tests/", 0)]);
    assert_eq!(engine.mode(), Mode::OnlyExclude);
    assert!(engine.decide(Entry::file("src/lib.rs", 1)).is_included());
    assert_eq!(
        engine.decide(Entry::folder("tests")).reason.kind,
        ReasonKind::UserExclude
    );
    assert_eq!(
        engine.decide(Entry::file("debug.log", 1)).reason.kind,
        ReasonKind::DefaultIgnore
    );
}

#[test]
fn test_every_mode_yields_one_decision_with_reason() {
    let paths = [
        Entry::file("README.md", 10),
        Entry::file("src/main.rs", 10),
        Entry::folder("src"),
        Entry::folder("target"),
        Entry::file(".env", 1),
    ];
    let decl_sets = vec![
        vec![],
        vec![PatternDecl::include("*.rs", 0)],
        vec![PatternDecl::exclude("*.md", 0)],
        vec![PatternDecl::include("src/", 0), PatternDecl::exclude("*.rs", 1)],
        vec![PatternDecl::exclude("src/", 0), PatternDecl::include("*.rs", 1)],
    ];

    for decls in decl_sets {
        let engine = engine_for(decls);
        for entry in &paths {
            let first = engine.decide(entry.clone());
            let second = engine.decide(entry.clone());
            assert_eq!(first, second);
            assert!(!first.reason.message.is_empty());
            if first.is_excluded() {
                assert!(first.reason.kind.is_exclusion());
            } else {
                assert!(!first.reason.kind.is_exclusion());
            }
        }
    }
}

#[test]
fn test_specificity_monotonic_in_depth() {
    let deep = Pattern::new("a/b/*", PatternOrigin::Include, 0).unwrap();
    let shallow = Pattern::new("a/**/x.tar.gz", PatternOrigin::Exclude, 1).unwrap();
    let floating = Pattern::new("x.tar.gz", PatternOrigin::Exclude, 2).unwrap();

    let d = specificity(&deep, "a/b/x.tar.gz", false).unwrap();
    let s = specificity(&shallow, "a/b/x.tar.gz", false).unwrap();
    let f = specificity(&floating, "a/b/x.tar.gz", false).unwrap();
    assert!(d > s);
    assert!(s > f);
}

#[test]
fn test_decide_free_function() {
    let patterns = PatternSet::compile(&[PatternDecl::exclude("*.bin", 0)], false).unwrap();
    let limits = Limits {
        max_size: 100,
        max_depth: None,
        follow_symlinks: true,
    };
    let d = decide(Entry::symlink("data.bin", false, 10), &patterns, Mode::OnlyExclude, &limits);
    assert_eq!(d.reason.kind, ReasonKind::UserExclude);

    let d = decide(Entry::symlink("docs", true, 0), &patterns, Mode::OnlyExclude, &limits);
    assert!(d.is_included());
}

#[test]
fn test_invalid_patterns_rejected() {
    let mut config = DigestConfig::new(".");
    config.patterns = vec![PatternDecl::include("src/[a", 0)];
    assert!(FilterEngine::new(&config).is_err());

    config.patterns = vec![PatternDecl::exclude("/", 0)];
    assert!(FilterEngine::new(&config).is_err());
}

#[test]
fn test_exclude_first_directory_include_outranks_file_name() {
    let engine = engine_for(vec![
        PatternDecl::exclude("main.py", 0),
        PatternDecl::include("src/", 1),
    ]);
    assert_eq!(engine.mode(), Mode::ExcludeFirst);

    let main = engine.decide(Entry::file("src/main.py", 10));
    assert!(main.is_included(), "{}", main.reason);
    assert_eq!(main.reason.kind, ReasonKind::MatchedInclude);

    let root_main = engine.decide(Entry::file("main.py", 10));
    assert_eq!(root_main.reason.kind, ReasonKind::UserExclude);
}

#[test]
fn test_include_first_directory_include_outranks_file_name() {
    let engine = engine_for(vec![
        PatternDecl::include("src/", 0),
        PatternDecl::exclude("secret.txt", 1),
    ]);
    assert_eq!(engine.mode(), Mode::IncludeFirst);

    let secret = engine.decide(Entry::file("src/secret.txt", 10));
    assert!(secret.is_included(), "{}", secret.reason);
    assert_eq!(secret.matched.exclude.as_deref(), Some("secret.txt"));
}

#[test]
fn test_include_first_default_ignore_against_include() {
    let engine = engine_for(vec![
        PatternDecl::include("*.py", 0),
        PatternDecl::include("*.log", 1),
        PatternDecl::exclude("secret.txt", 2),
    ]);
    assert_eq!(engine.mode(), Mode::IncludeFirst);

    // `**/__pycache__/` anchors one component deeper than `*.py`.
    let cached = engine.decide(Entry::file("__pycache__/mod.py", 10));
    assert!(cached.is_excluded());
    assert_eq!(cached.reason.kind, ReasonKind::DefaultIgnore);

    // `*.log` and `**/*.log` are equally specific: the include holds.
    let log = engine.decide(Entry::file("app.log", 10));
    assert!(log.is_included(), "{}", log.reason);
    assert_eq!(log.matched.default_ignore.as_deref(), Some("**/*.log"));
}

#[test]
fn test_exclude_first_default_ignore_against_include() {
    let engine = engine_for(vec![
        PatternDecl::exclude("secret.txt", 0),
        PatternDecl::include("*.py", 1),
        PatternDecl::include("*.log", 2),
        PatternDecl::include("debug.tmp", 3),
    ]);
    assert_eq!(engine.mode(), Mode::ExcludeFirst);

    let cached = engine.decide(Entry::file("__pycache__/mod.py", 10));
    assert!(cached.is_excluded());
    assert_eq!(cached.reason.kind, ReasonKind::DefaultIgnore);

    // Equal specificity rescues.
    let log = engine.decide(Entry::file("app.log", 10));
    assert!(log.is_included(), "{}", log.reason);

    // Strictly more specific rescues too.
    let tmp = engine.decide(Entry::file("debug.tmp", 10));
    assert!(tmp.is_included(), "{}", tmp.reason);
    assert_eq!(tmp.matched.default_ignore.as_deref(), Some("**/*.tmp"));

    // No include matched, so the default ignore stands.
    let other = engine.decide(Entry::file("scratch.tmp", 10));
    assert_eq!(other.reason.kind, ReasonKind::DefaultIgnore);
}
