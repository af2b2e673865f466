//! Benchmarks for the export pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use scormkit::clock::FixedClock;
use scormkit::export::ScormExporter;
use scormkit::model::{ExportOptions, FormationRecord, ModuleRecord, ScormVersion};
use scormkit::{inspect_package, normalize_formation, parse_manifest};

/// A formation with `modules` rich-text modules and a ten-question quiz.
fn sample_record(modules: usize) -> FormationRecord {
    let paragraph = |i: usize| {
        json!({"type": "paragraph", "content": [
            {"type": "text", "text": format!("Paragraphe {i} : "), "marks": []},
            {"type": "text", "text": "les cellules & les <plages>", "marks": [{"type": "bold"}]}
        ]})
    };
    let modules = (0..modules)
        .map(|i| {
            let mut m = ModuleRecord::new(format!("m{i}"), format!("Module {i}"), i as i32);
            m.duree = Some(20);
            m.contenu = Some(json!({
                "type": "doc",
                "content": (0..20).map(paragraph).collect::<Vec<_>>()
            }));
            m
        })
        .collect();
    let questions: Vec<_> = (0..10)
        .map(|i| {
            json!({
                "question": format!("Question {i}"),
                "options": ["a", "b", "c"],
                "correctAnswer": i % 3
            })
        })
        .collect();

    FormationRecord {
        id: "bench".into(),
        titre: "Excel Initiation".into(),
        description: Some("Les bases du tableur".into()),
        organization_id: None,
        modules,
        evaluations_data: Some(json!({ "qcm": questions })),
    }
}

// ============================================================================
// Export Benchmarks
// ============================================================================

fn bench_normalize(c: &mut Criterion) {
    let record = sample_record(30);
    c.bench_function("normalize_30_modules", |b| {
        b.iter(|| normalize_formation(&record).unwrap());
    });
}

fn bench_export_1_2(c: &mut Criterion) {
    let formation = normalize_formation(&sample_record(30)).unwrap();
    let exporter = ScormExporter::new().with_clock(FixedClock::epoch());
    let options = ExportOptions::default();
    c.bench_function("export_scorm_1_2", |b| {
        b.iter(|| {
            exporter
                .export(&formation, ScormVersion::V1_2, &options)
                .unwrap()
        });
    });
}

fn bench_export_2004(c: &mut Criterion) {
    let formation = normalize_formation(&sample_record(30)).unwrap();
    let exporter = ScormExporter::new().with_clock(FixedClock::epoch());
    let options = ExportOptions::default();
    c.bench_function("export_scorm_2004", |b| {
        b.iter(|| {
            exporter
                .export(&formation, ScormVersion::V2004, &options)
                .unwrap()
        });
    });
}

// ============================================================================
// Inspection Benchmarks
// ============================================================================

fn bench_parse_manifest(c: &mut Criterion) {
    let formation = normalize_formation(&sample_record(200)).unwrap();
    let package = ScormExporter::new()
        .with_clock(FixedClock::epoch())
        .export(&formation, ScormVersion::V2004, &ExportOptions::default())
        .unwrap();
    let manifest = package.manifest().to_string();
    c.bench_function("parse_manifest_200_modules", |b| {
        b.iter(|| parse_manifest(&manifest).unwrap());
    });
}

fn bench_inspect_package(c: &mut Criterion) {
    let formation = normalize_formation(&sample_record(30)).unwrap();
    let package = ScormExporter::new()
        .with_clock(FixedClock::epoch())
        .export(&formation, ScormVersion::V1_2, &ExportOptions::default())
        .unwrap();
    c.bench_function("inspect_package", |b| {
        b.iter(|| inspect_package(&package.bytes).unwrap());
    });
}

criterion_group!(
    benches,
    bench_normalize,
    bench_export_1_2,
    bench_export_2004,
    bench_parse_manifest,
    bench_inspect_package,
);

criterion_main!(benches);
