//! Tests for the per-file reductions.

use repo_harvest::metrics::{
    AnalysisReport, ComplexityFile, ComplexityGrade, HalsteadFile, MaintainabilityFile,
    MaintainabilityIndex, RawFile, reduce_complexity, reduce_halstead, reduce_maintainability,
    reduce_raw,
};

fn report(json: &str) -> AnalysisReport {
    AnalysisReport::from_json(json).unwrap()
}

#[test]
fn test_complexity_total_average_and_grade() {
    let cc = report(
        r#"{
            "app/models.py": [
                {"type": "function", "name": "load", "complexity": 3},
                {"type": "class", "name": "Store", "complexity": 7}
            ],
            "app/views.py": [
                {"type": "function", "name": "index", "complexity": 0},
                {"type": "method", "name": "get", "complexity": 5}
            ]
        }"#,
    );

    let summary = reduce_complexity(&cc.records::<ComplexityFile>());

    assert_eq!(summary.entries, 4);
    assert_eq!(summary.total, 15);
    assert!((summary.average - 3.75).abs() < f64::EPSILON);
    assert_eq!(ComplexityGrade::from_average(summary.average), ComplexityGrade::A);
}

#[test]
fn test_complexity_without_entries_averages_zero() {
    let summary = reduce_complexity(&report("{}").records::<ComplexityFile>());
    assert_eq!(summary.entries, 0);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.average, 0.0);

    let only_empty_files = report(r#"{"a.py": [], "b.py": []}"#);
    assert_eq!(
        reduce_complexity(&only_empty_files.records::<ComplexityFile>()).average,
        0.0
    );
}

#[test]
fn test_complexity_skips_error_files_and_missing_scores() {
    let cc = report(
        r#"{
            "ok.py": [{"name": "f", "complexity": 4}, {"name": "g"}],
            "broken.py": {"error": "invalid syntax (<unknown>, line 3)"}
        }"#,
    );

    let summary = reduce_complexity(&cc.records::<ComplexityFile>());

    assert_eq!(summary.entries, 1);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.average, 4.0);
}

#[test]
fn test_grade_thresholds() {
    assert_eq!(ComplexityGrade::from_average(0.0), ComplexityGrade::A);
    assert_eq!(ComplexityGrade::from_average(4.99), ComplexityGrade::A);
    assert_eq!(ComplexityGrade::from_average(5.0), ComplexityGrade::B);
    assert_eq!(ComplexityGrade::from_average(9.99), ComplexityGrade::B);
    assert_eq!(ComplexityGrade::from_average(10.0), ComplexityGrade::C);
    assert_eq!(ComplexityGrade::C.as_str(), "C");
}

#[test]
fn test_raw_missing_fields_default_to_zero() {
    let raw = report(
        r#"{
            "a.py": {"loc": 120, "lloc": 80, "sloc": 100, "comments": 10, "multi": 4, "blank": 16, "single_comments": 8},
            "b.py": {"loc": 40, "lloc": 20, "sloc": 30, "multi": 0, "blank": 6, "single_comments": 0}
        }"#,
    );

    let summary = reduce_raw(&raw.records::<RawFile>());

    // b.py has no "comments" but still reports, so it stays in the denominator
    assert_eq!(summary.files, 2);
    assert_eq!(summary.totals.comments, 10);
    assert_eq!(summary.averages.comments, 5.0);
    assert_eq!(summary.totals.sloc, 130);
    assert_eq!(summary.averages.sloc, 65.0);
    assert_eq!(summary.averages.lloc, 50.0);
    assert_eq!(summary.averages.blank, 11.0);
    assert_eq!(summary.averages.multi, 2.0);
}

#[test]
fn test_raw_error_files_leave_population() {
    let raw = report(
        r#"{
            "a.py": {"sloc": 10, "comments": 2},
            "bad.py": {"error": "invalid syntax"}
        }"#,
    );

    let summary = reduce_raw(&raw.records::<RawFile>());

    assert_eq!(summary.files, 1);
    assert_eq!(summary.averages.sloc, 10.0);
    assert_eq!(summary.averages.comments, 2.0);
}

#[test]
fn test_raw_without_files_is_zero() {
    let summary = reduce_raw(&report("{}").records::<RawFile>());
    assert_eq!(summary.files, 0);
    assert_eq!(summary.averages.sloc, 0.0);
}

#[test]
fn test_halstead_averages_over_reporting_files() {
    let hal = report(
        r#"{
            "a.py": {"total": {"h1": 3, "volume": 10.0, "difficulty": 2.0, "effort": 20.0, "time": 1.0, "bugs": 0.01}, "functions": {}},
            "b.py": {"total": {"volume": 30.0, "difficulty": 4.0, "effort": 120.0, "time": 5.0, "bugs": 0.03}},
            "__init__.py": {"functions": {}}
        }"#,
    );

    let summary = reduce_halstead(&hal.records::<HalsteadFile>());

    assert_eq!(summary.reporting_files, 2);
    assert_eq!(summary.files_ignored, 1);
    assert_eq!(summary.totals.volume, 40.0);
    assert_eq!(summary.averages.volume, 20.0);
    assert_eq!(summary.averages.difficulty, 3.0);
    assert_eq!(summary.averages.effort, 70.0);
    assert_eq!(summary.averages.time, 3.0);
    assert!((summary.averages.bugs - 0.02).abs() < 1e-12);
}

#[test]
fn test_halstead_without_reporting_files_uses_totals() {
    let hal = report(r#"{"a.py": {"error": "invalid syntax"}, "b.py": {}}"#);

    let summary = reduce_halstead(&hal.records::<HalsteadFile>());

    assert_eq!(summary.reporting_files, 0);
    assert_eq!(summary.files_ignored, 2);
    assert_eq!(summary.averages, summary.totals);
    assert_eq!(summary.averages.volume, 0.0);
}

#[test]
fn test_halstead_incomplete_total_is_excluded() {
    let hal = report(
        r#"{
            "a.py": {"total": {"volume": 8.0, "difficulty": 1.0, "effort": 8.0, "time": 0.5, "bugs": 0.002}},
            "b.py": {"total": {"volume": 99.0}}
        }"#,
    );

    let summary = reduce_halstead(&hal.records::<HalsteadFile>());

    assert_eq!(summary.reporting_files, 1);
    assert_eq!(summary.files_ignored, 0);
    assert_eq!(summary.averages.volume, 8.0);
}

#[test]
fn test_maintainability_mean_of_reported_values() {
    let mi = report(
        r#"{
            "a.py": {"mi": 70.0, "rank": "A"},
            "b.py": {"mi": 50.0, "rank": "A"},
            "c.py": {"error": "invalid syntax"}
        }"#,
    );

    assert_eq!(
        reduce_maintainability(&mi.records::<MaintainabilityFile>()),
        MaintainabilityIndex::Average(60.0)
    );
}

#[test]
fn test_maintainability_without_values_is_zero() {
    let mi = report(r#"{"c.py": {"error": "invalid syntax"}}"#);
    assert_eq!(
        reduce_maintainability(&mi.records::<MaintainabilityFile>()),
        MaintainabilityIndex::Average(0.0)
    );
    assert_eq!(MaintainabilityIndex::Error.to_string(), "Error");
}

#[test]
fn test_malformed_file_record_is_dropped() {
    let raw = report(
        r#"{
            "a.py": {"sloc": 12},
            "weird.py": {"sloc": "twelve"}
        }"#,
    );

    let records = raw.records::<RawFile>();

    assert_eq!(raw.len(), 2);
    assert_eq!(records.len(), 1);
    assert_eq!(reduce_raw(&records).averages.sloc, 12.0);
}
