#[cfg(test)]
mod tests {
    use roster_capability::*;
    use roster_core::{DocumentStore, RosterError, Severity};
    use std::collections::BTreeSet;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn fixture(root: &Path) {
        write(
            root,
            "backend/api-architect.mdc",
            "---\nname: api-architect\ndescription: Designs REST APIs for web clients\ncapabilities:\n  specializations: [api_design, backend]\n  technologies: [REST, OpenAPI]\n  requires_agents: [security-auditor, ghost]\n---\n# API Architect\n",
        );
        write(
            root,
            "backend/db-tuner.mdc",
            "---\nname: db-tuner\ndescription: Tunes database queries\n---\nPostgreSQL and Redis caching.\n",
        );
        write(
            root,
            "quality/security-auditor.mdc",
            "---\nname: security-auditor\ndescription: Reviews code\nalwaysApply: true\ncapabilities:\n  specializations: []\n  technologies: []\n---\n",
        );
        write(root, "quality/readme.mdc", "# Just notes, no header\n");
        write(
            root,
            "quality/nameless.mdc",
            "---\ndescription: forgot the name\n---\n",
        );
        write(root, "backend/ignored.txt", "---\nname: wrong-extension\n---\n");
    }

    fn scanned(root: &Path) -> (CapabilityIndex, ScanReport) {
        let mut index = CapabilityIndex::new();
        let report = index.scan(&DocumentStore::new(root, &["mdc"])).unwrap();
        (index, report)
    }

    // ── Scan ──────────────────────────────────────────────────

    #[test]
    fn test_scan_skips_headerless_and_nameless() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, report) = scanned(dir.path());

        assert_eq!(report.indexed, 3);
        assert_eq!(report.skipped, 2);
        assert!(index.get("wrong-extension").is_none());

        let skipped: BTreeSet<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.severity == roster_core::Severity::Skip)
            .map(|d| Path::new(&d.source).file_name().unwrap().to_owned())
            .collect();
        assert_eq!(skipped.len(), 2);
        assert!(skipped.contains(std::ffi::OsStr::new("readme.mdc")));
        assert!(skipped.contains(std::ffi::OsStr::new("nameless.mdc")));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let mut index = CapabilityIndex::new();
        let store = DocumentStore::new(dir.path(), &["mdc"]);
        index.scan(&store).unwrap();
        let first: Vec<CapabilityRecord> = index.records().to_vec();
        let report = index.scan(&store).unwrap();

        assert_eq!(report.indexed, 3);
        assert_eq!(index.records(), first.as_slice());
        assert_eq!(index.find_by_category("backend"), ["api-architect", "db-tuner"]);
    }

    #[test]
    fn test_scan_missing_root_fails_and_empties() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (mut index, _) = scanned(dir.path());
        assert!(!index.is_empty());

        let result = index.scan(&DocumentStore::new(dir.path().join("nope"), &["mdc"]));
        assert!(result.is_err());
        assert!(index.is_empty());
    }

    #[test]
    fn test_inferred_facets_from_body() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());

        let db = index.get("db-tuner").unwrap();
        assert_eq!(db.technologies, vec!["PostgreSQL", "Redis"]);
        assert!(db.specializations.contains(&"database".to_string()));
        assert_eq!(index.find_by_technology("postgresql"), ["db-tuner"]);

        let auditor = index.get("security-auditor").unwrap();
        assert!(auditor.always_apply);
        assert!(auditor.specializations.is_empty());
    }

    // ── Export ────────────────────────────────────────────────

    #[test]
    fn test_export_preserves_facet_sets() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());

        let out = dir.path().join("index.json");
        index.export_json(&out).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();

        assert_eq!(json["stats"]["total_agents"], 3);
        assert!(json["generated_at"].is_string());
        for record in index.records() {
            let exported: CapabilityRecord =
                serde_json::from_value(json["agents"][&record.name].clone()).unwrap();
            let set = |v: &[String]| v.iter().cloned().collect::<BTreeSet<_>>();
            assert_eq!(set(&exported.specializations), set(&record.specializations));
            assert_eq!(set(&exported.technologies), set(&record.technologies));
            assert_eq!(exported.keywords, record.keywords);
        }
    }

    // ── Matching and teams ────────────────────────────────────

    #[test]
    fn test_find_agents_ranks_specialist_first() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());

        let ranked = index.find_agents("design a rest api_design for the backend", 2);
        assert_eq!(ranked[0].0.name, "api-architect");
        assert!(ranked[0].1 >= 5.0 / 8.0);
        assert!(ranked.iter().all(|(_, s)| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_team_skips_missing_dependency() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());

        let team = index.recommend_team("api_design backend with rest", 5);
        assert!(team.contains("api-architect"));
        assert!(team.contains("security-auditor"));
        assert!(!team.contains("ghost"));
        let auditor = team
            .members
            .iter()
            .find(|m| m.agent == "security-auditor")
            .unwrap();
        assert_eq!(
            auditor.reason,
            SelectionReason::RequiredBy { agent: "api-architect".into() }
        );
    }

    #[test]
    fn test_team_respects_cap() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());

        let team = index.recommend_team("api_design backend with rest", 1);
        assert_eq!(team.len(), 1);
        assert_eq!(team.members[0].agent, "api-architect");
    }

    // ── Summaries ─────────────────────────────────────────────

    #[test]
    fn test_generate_and_search_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let agents = dir.path().join("agents");
        let out = dir.path().join("summaries");
        fixture(&agents);

        let store = DocumentStore::new(&agents, &["mdc"]);
        let report = generate_all(&store, &out, false).unwrap();
        assert_eq!(report.generated, 3);
        assert_eq!(report.failed, 2);

        let again = generate_all(&store, &out, false).unwrap();
        assert_eq!(again.generated, 0);
        assert_eq!(again.existing, 3);
        let kept = again
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .count();
        assert_eq!(kept, 3);

        let forced = generate_all(&store, &out, true).unwrap();
        assert_eq!((forced.generated, forced.existing), (3, 0));

        let (mut directory, diags) = SummaryDirectory::load(&out);
        assert!(diags.is_empty());
        assert_eq!(directory.list_categories(), vec!["backend", "quality"]);
        assert_eq!(directory.list_agents(Some("backend")), vec!["api-architect", "db-tuner"]);

        let hits = directory.find("api design", 5);
        assert_eq!(hits[0].0, "api-architect");
        assert!(hits.iter().all(|(_, s)| *s > 0.0));

        let full = directory.load_full_definition("api-architect").unwrap();
        assert!(full.contains("# API Architect"));
        assert!(directory.is_active("api-architect"));
        assert!(matches!(
            directory.summary("ghost"),
            Err(RosterError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unreadable_summary_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.summary.yaml", "name: good\ncategory: misc\n");
        write(dir.path(), "bad.summary.yaml", "name: [unterminated\n");
        write(dir.path(), "other.yaml", "name: not-a-summary\n");

        let (directory, diags) = SummaryDirectory::load(dir.path());
        assert_eq!(directory.list_agents(None), vec!["good"]);
        assert_eq!(diags.skipped(), 1);
    }

    #[test]
    fn test_report_mentions_always_apply() {
        let dir = tempfile::tempdir().unwrap();
        fixture(dir.path());
        let (index, _) = scanned(dir.path());
        let report = index.report();
        assert!(report.contains("Total Agents: 3"));
        assert!(report.contains("⭐ ALWAYS-APPLY AGENTS\n  - security-auditor"));
    }
}
