//! Integration tests for manifest integrity across generated packages.

use proptest::prelude::*;
use serde_json::json;

use scormkit::clock::FixedClock;
use scormkit::export::ScormExporter;
use scormkit::model::{ExportOptions, FormationRecord, MasteryScore, ModuleRecord, ScormVersion};
use scormkit::{PackageSummary, inspect_package, normalize_formation};

fn record(id: &str, title: &str, module_titles: &[String], with_quiz: bool) -> FormationRecord {
    FormationRecord {
        id: id.to_string(),
        titre: title.to_string(),
        description: None,
        organization_id: None,
        modules: module_titles
            .iter()
            .enumerate()
            .map(|(i, t)| ModuleRecord::new(format!("m{i}"), t.clone(), (i as i32) * 10 - 1))
            .collect(),
        evaluations_data: with_quiz.then(|| {
            json!([{"question": "Q", "options": ["a", "b"], "correctAnswer": 1}])
        }),
    }
}

fn package(
    record: &FormationRecord,
    version: ScormVersion,
    options: ExportOptions,
) -> PackageSummary {
    let formation = normalize_formation(record).unwrap();
    let pkg = ScormExporter::new()
        .with_clock(FixedClock::epoch())
        .export(&formation, version, &options)
        .unwrap();
    inspect_package(&pkg.bytes).unwrap()
}

fn assert_integrity(summary: &PackageSummary) {
    let manifest = &summary.manifest;
    assert!(manifest.check().is_ok(), "{:?}", manifest.check());
    assert!(manifest.dangling_refs().is_empty());
    assert!(manifest.duplicate_identifiers().is_empty());
    assert!(summary.is_complete(), "missing: {:?}", summary.missing_files);
    // Every archive entry other than the manifest is declared by a resource.
    for entry in summary.entries.iter().filter(|e| *e != "imsmanifest.xml") {
        assert!(
            manifest.resources.iter().any(|r| r.files.contains(entry)),
            "{entry} is not declared"
        );
    }
}

// ============================================================================
// Fixed cases
// ============================================================================

#[test]
fn test_zero_modules() {
    for version in [ScormVersion::V1_2, ScormVersion::V2004] {
        let summary = package(&record("f0", "Vide", &[], false), version, ExportOptions::default());
        assert_integrity(&summary);
        assert!(summary.manifest.items.is_empty());
        assert_eq!(summary.manifest.resources.len(), 1);
        assert_eq!(summary.manifest.resources[0].href.as_deref(), Some("index.html"));
    }
}

#[test]
fn test_unsafe_formation_id() {
    let summary = package(
        &record("f 1/\"x\"", "T", &["A".to_string()], false),
        ScormVersion::V1_2,
        ExportOptions::default(),
    );
    assert_integrity(&summary);
    assert_eq!(summary.manifest.identifier, "SCORM_f_1__x_");
}

#[test]
fn test_mastery_bounds() {
    for mastery in [0, 100] {
        let options = ExportOptions {
            mastery_score: MasteryScore::new(mastery),
            include_evaluations: true,
        };
        let summary = package(
            &record("f", "T", &["A".to_string()], true),
            ScormVersion::V1_2,
            options,
        );
        assert_eq!(summary.manifest.mastery_score, Some(mastery as u8));
    }
}

#[test]
fn test_item_references_follow_positions() {
    let titles: Vec<String> = ["Un", "Deux", "Trois", "Quatre"].map(String::from).to_vec();
    let summary = package(
        &record("f", "T", &titles, false),
        ScormVersion::V2004,
        ExportOptions::default(),
    );
    for (i, item) in summary.manifest.items.iter().enumerate() {
        let n = i + 1;
        assert_eq!(item.identifier, format!("ITEM-{n}"));
        assert_eq!(item.identifierref.as_deref(), Some(format!("RES-{n}").as_str()));
        assert_eq!(item.title, titles[i]);
        let resource = summary.manifest.resource(&format!("RES-{n}")).unwrap();
        assert_eq!(resource.href.as_deref(), Some(format!("module_{n}.html").as_str()));
        assert_eq!(resource.scorm_type.as_deref(), Some("sco"));
    }
}

// ============================================================================
// Property tests
// ============================================================================

fn title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9&<>'\"é]([A-Za-z0-9 &<>'\"é]{0,18}[A-Za-z0-9])?"
}

fn version() -> impl Strategy<Value = ScormVersion> {
    prop_oneof![Just(ScormVersion::V1_2), Just(ScormVersion::V2004)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_manifest_integrity(
        formation_title in title(),
        module_titles in prop::collection::vec(title(), 0..12),
        version in version(),
        mastery in 0i64..=100,
        with_quiz in any::<bool>(),
        include_evaluations in any::<bool>(),
    ) {
        let options = ExportOptions {
            mastery_score: MasteryScore::new(mastery),
            include_evaluations,
        };
        let rec = record("formation-1", &formation_title, &module_titles, with_quiz);
        let summary = package(&rec, version, options);
        assert_integrity(&summary);

        let manifest = &summary.manifest;
        let n = module_titles.len();
        prop_assert_eq!(manifest.version, Some(version));
        prop_assert_eq!(manifest.resources.len(), n + 1);

        let modules: Vec<_> = match version {
            ScormVersion::V1_2 => {
                prop_assert_eq!(manifest.items.len(), if n == 0 { 0 } else { n + 1 });
                manifest.items.iter().filter(|i| i.depth == 1).collect()
            }
            ScormVersion::V2004 => {
                prop_assert_eq!(manifest.items.len(), n);
                prop_assert!(manifest.items.iter().all(|i| i.has_sequencing));
                manifest.items.iter().collect()
            }
        };
        let seen: Vec<&str> = modules.iter().map(|i| i.title.as_str()).collect();
        prop_assert_eq!(seen, module_titles.iter().map(String::as_str).collect::<Vec<_>>());

        let quiz_listed = manifest
            .resource("RES-0")
            .is_some_and(|r| r.files.iter().any(|f| f == "quiz.html"));
        prop_assert_eq!(quiz_listed, with_quiz && include_evaluations);
        prop_assert_eq!(summary.entries.iter().any(|e| e == "quiz.html"), quiz_listed);

        if version == ScormVersion::V1_2 && n > 0 {
            prop_assert_eq!(manifest.mastery_score, Some(mastery as u8));
            prop_assert_eq!(manifest.title.as_deref(), Some(formation_title.as_str()));
        } else {
            prop_assert_eq!(manifest.mastery_score, None);
        }
    }
}
