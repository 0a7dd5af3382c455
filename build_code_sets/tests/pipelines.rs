mod support;

use std::{fs, sync::Arc};

use build_code_sets::classify::ClassificationTables;
use build_code_sets::classify::adjustment::{AdjustmentType, FinancialClass};
use build_code_sets::code_system::PipelineKind;
use build_code_sets::pipeline::{
    PipelineOutput, collect_batches, collect_batches_parallel, run_pipeline, run_sequential,
};
use build_code_sets::progress::RowProgress;
use build_code_sets::readers::Cell;
use build_code_sets::readers::spreadsheet::{SheetRef, read_spreadsheet};
use build_code_sets::record::{CodeDetail, NormalizedCodeRecord};
use build_code_sets::summary::{RunOutcome, SourceStatus};

use support::{Workspace, XlsxCell, write_file, write_workbook};

fn run_one(workspace: &Workspace, pipeline: PipelineKind) -> PipelineOutput {
    let tables = ClassificationTables::standard();
    run_pipeline(
        pipeline,
        &workspace.config,
        &tables,
        RowProgress::hidden(pipeline),
    )
}

fn find<'a>(output: &'a PipelineOutput, code: &str) -> &'a NormalizedCodeRecord {
    output
        .batch
        .records
        .iter()
        .find(|r| r.code == code)
        .unwrap_or_else(|| panic!("record {code} missing"))
}

#[test]
fn icd10_malformed_line_is_skipped() {
    let workspace = Workspace::new().select(&[PipelineKind::Icd10]);
    write_file(
        &workspace.config.sources.icd10,
        "00001 A00     0 Cholera                  Cholera\n00002 A001 1\n",
    );

    let summary = run_sequential(&workspace.config, &ClassificationTables::standard())
        .expect("run");
    assert_eq!(summary.records_for(PipelineKind::Icd10), 1);
    assert_eq!(summary.outcome, RunOutcome::Written);
    assert_eq!(summary.total_records, 1);

    let sql = fs::read_to_string(&workspace.config.output_path).expect("artifact");
    assert_eq!(sql.matches("INSERT INTO icd10_code_master").count(), 1);
    assert!(sql.contains("('A00', 'Cholera', 'Cholera', 'Infectious and parasitic diseases', 'A00-B99'"));
}

#[test]
fn icd10_records_are_classified() {
    let workspace = Workspace::with_all_sources();
    let output = run_one(&workspace, PipelineKind::Icd10);

    assert_eq!(output.report.records, 3);
    assert_eq!(output.report.rows_read, 5);
    assert_eq!(output.report.rejected.get("too_few_fields"), Some(&1));
    assert_eq!(output.report.rejected.get("invalid_code"), Some(&1));

    let header = find(&output, "A00");
    assert!(header.is_header);
    assert!(!header.billable);
    assert_eq!(header.category, "A00");

    let fracture = find(&output, "S72001A");
    assert!(fracture.billable);
    assert!(fracture.requires_additional_digit);
    assert!(!fracture.is_header);
    assert_eq!(
        fracture.detail,
        CodeDetail::Icd10 {
            chapter: "Injury, poisoning (by body region)".to_string(),
            chapter_range: "S00-T88".to_string(),
        }
    );
    assert_eq!(
        fracture.effective_date,
        workspace.config.icd10_effective_date
    );
}

#[test]
fn cpt_duplicates_keep_first_description() {
    let workspace = Workspace::with_all_sources();
    let output = run_one(&workspace, PipelineKind::Cpt);

    assert_eq!(output.report.records, 3);
    assert_eq!(output.report.duplicates, 1);
    assert_eq!(output.report.conflicting_duplicates, 1);
    assert_eq!(output.report.rejected.get("not_a_code_line"), Some(&1));

    let visit = find(&output, "99213");
    assert_eq!(
        visit.long_description,
        "Office or other outpatient visit for an established patient"
    );
    assert_eq!(visit.category, "Evaluation and Management");
    assert_eq!(find(&output, "71045").category, "Radiology");
    assert_eq!(find(&output, "00100").category, "ANESTHESIA FOR HEAD");
}

#[test]
fn hcpcs_discontinued_codes_are_inactive() {
    let workspace = Workspace::with_all_sources();
    let output = run_one(&workspace, PipelineKind::Hcpcs);

    assert_eq!(output.report.records, 3);
    assert_eq!(output.report.rejected.get("missing_code"), Some(&1));

    let ambulance = find(&output, "A0021");
    assert!(!ambulance.is_active);
    assert_eq!(
        ambulance.category,
        "Transportation Services, Medical and Surgical Supplies"
    );

    let cane = find(&output, "E0100");
    assert!(cane.is_active);
    assert_eq!(cane.short_description, "Cane adjust/fixed w tip");

    let injection = find(&output, "J1100");
    assert!(injection.is_active);
    assert_eq!(injection.detail, CodeDetail::Hcpcs { action_code: None });
}

#[test]
fn explicit_rarc_type_overrides_code_shape() {
    let workspace = Workspace::with_all_sources();
    let output = run_one(&workspace, PipelineKind::Adjustment);

    assert_eq!(output.report.records, 4);
    assert_eq!(output.report.duplicates, 1);
    assert_eq!(output.report.conflicting_duplicates, 0);

    assert_eq!(find(&output, "N1").code_type(), Some(AdjustmentType::Rarc));
    assert_eq!(find(&output, "MA130").code_type(), Some(AdjustmentType::Rarc));
    assert_eq!(find(&output, "1").code_type(), Some(AdjustmentType::Carc));

    let co45 = find(&output, "CO45");
    assert_eq!(co45.code_type(), Some(AdjustmentType::Carc));
    assert_eq!(co45.financial_class(), Some(FinancialClass::Contractual));
    assert_eq!(co45.category, "Benefit Limit");

    let deductible = find(&output, "1");
    assert_eq!(deductible.category, "Patient Responsibility");
    assert_eq!(
        deductible.financial_class(),
        Some(FinancialClass::PatientResponsibility)
    );
}

#[test]
fn modifier_catalog_needs_no_source() {
    let workspace = Workspace::new();
    let output = run_one(&workspace, PipelineKind::Modifier);
    assert_eq!(output.report.status, SourceStatus::Embedded);
    assert!(output.report.records > 100);

    let telehealth = find(&output, "95");
    assert_eq!(telehealth.category, "telehealth");
    assert!(matches!(
        telehealth.detail,
        CodeDetail::Modifier {
            level_i: true,
            level_ii: false,
            ..
        }
    ));
}

fn hcpcs_workbook_sheets() -> Vec<(&'static str, Vec<Vec<XlsxCell>>)> {
    use XlsxCell::{Blank, Text};
    vec![
        (
            "Read Me",
            vec![
                vec![Text("Transaction report notes")],
                vec![Text("Z9999 is not a real change row")],
            ],
        ),
        (
            "Changes by HCPC",
            vec![
                vec![
                    Text("HCPC"),
                    Text("ACTION CD"),
                    Text("SHORT DESCRIPTION"),
                    Text("LONG DESCRIPTION"),
                ],
                vec![
                    Text("A0021"),
                    Text("D"),
                    Text("Outside state ambulance serv"),
                    Text("Ambulance service outside state per mile transport"),
                ],
                vec![
                    Text("E0100"),
                    Blank,
                    Text("Cane adjust/fixed w tip"),
                    Text("Cane includes canes of all materials"),
                ],
            ],
        ),
    ]
}

#[test]
fn hcpcs_workbook_prefers_changes_sheet() {
    let mut workspace = Workspace::new().select(&[PipelineKind::Hcpcs]);
    workspace.config.sources.hcpcs = workspace
        .root()
        .join("data/raw/hcpcs/hcpcs_transaction_report.xlsx");
    write_workbook(&workspace.config.sources.hcpcs, &hcpcs_workbook_sheets());

    let output = run_one(&workspace, PipelineKind::Hcpcs);
    assert_eq!(output.report.status, SourceStatus::Loaded);
    let codes: Vec<(&str, bool)> = output
        .batch
        .records
        .iter()
        .map(|r| (r.code.as_str(), r.is_active))
        .collect();
    assert_eq!(codes, vec![("A0021", false), ("E0100", true)]);
    assert_eq!(
        find(&output, "E0100").detail,
        CodeDetail::Hcpcs { action_code: None }
    );
}

#[test]
fn cpt_workbook_numeric_codes_read_as_text() {
    use XlsxCell::{Number, Text};
    let mut workspace = Workspace::new().select(&[PipelineKind::Cpt]);
    workspace.config.sources.cpt = workspace.root().join("data/raw/cpt/cpt_code_list.xlsx");
    write_workbook(
        &workspace.config.sources.cpt,
        &[(
            "CPT",
            vec![
                vec![Text("Code"), Text("Description")],
                vec![Text("RADIOLOGY SERVICES")],
                vec![Number(99213.0), Text("Office or other outpatient visit")],
                vec![Number(71045.0), Text("Radiologic examination chest; single view")],
            ],
        )],
    );

    let output = run_one(&workspace, PipelineKind::Cpt);
    assert_eq!(output.report.status, SourceStatus::Loaded);
    assert_eq!(output.report.records, 2);
    assert_eq!(find(&output, "99213").category, "Evaluation and Management");
    assert_eq!(find(&output, "71045").category, "Radiology");
}

#[test]
fn workbook_sheets_resolve_by_name_or_index() {
    let workspace = Workspace::new();
    let path = workspace.root().join("report.xlsx");
    write_workbook(&path, &hcpcs_workbook_sheets());

    let by_name = read_spreadsheet(&path, &[SheetRef::named("Changes by HCPC")]).expect("by name");
    assert_eq!(by_name.headers[0], "HCPC");
    assert_eq!(by_name.rows.len(), 2);

    let fallback = read_spreadsheet(&path, &[SheetRef::named("Codes"), SheetRef::Index(1)])
        .expect("by index");
    assert_eq!(fallback.origin, "#1");
    assert_eq!(fallback.rows[0].get(0), &Cell::text("A0021"));

    let first = read_spreadsheet(&path, &[SheetRef::Index(0)]).expect("first sheet");
    assert_eq!(first.headers, vec!["Transaction report notes".to_string()]);

    assert!(read_spreadsheet(&path, &[SheetRef::named("Codes")]).is_err());
}

#[test]
fn missing_source_degrades_only_its_pipeline() {
    let workspace = Workspace::with_all_sources();
    fs::remove_file(&workspace.config.sources.hcpcs).expect("remove hcpcs");

    let outputs = collect_batches(&workspace.config, &ClassificationTables::standard());
    let hcpcs = outputs
        .iter()
        .find(|o| o.report.pipeline == PipelineKind::Hcpcs)
        .expect("hcpcs output");
    assert_eq!(hcpcs.report.status, SourceStatus::Missing);
    assert!(hcpcs.batch.is_empty());

    for output in outputs.iter().filter(|o| o.report.pipeline != PipelineKind::Hcpcs) {
        assert!(!output.batch.is_empty(), "{}", output.report.pipeline);
    }
}

#[test]
fn unreadable_workbook_degrades_to_failed() {
    let workspace = Workspace::new().select(&[PipelineKind::Cpt, PipelineKind::Icd10]);
    let mut config = workspace.config.clone();
    config.sources.cpt = workspace.root().join("data/raw/cpt/cpt_code_list.xlsx");
    write_file(&config.sources.cpt, "not really a workbook");
    write_file(&config.sources.icd10, support::ICD10_ORDER_FILE);

    let summary = run_sequential(&config, &ClassificationTables::standard()).expect("run");
    let cpt = summary.report(PipelineKind::Cpt).expect("cpt report");
    assert!(matches!(cpt.status, SourceStatus::Failed { .. }));
    assert_eq!(cpt.records, 0);
    assert_eq!(summary.records_for(PipelineKind::Icd10), 3);
    assert_eq!(summary.outcome, RunOutcome::Written);
}

#[test]
fn all_sources_missing_is_nothing_processed() {
    let workspace = Workspace::new();
    let summary = run_sequential(&workspace.config, &ClassificationTables::standard())
        .expect("run");

    assert_eq!(summary.outcome, RunOutcome::NothingProcessed);
    assert_eq!(summary.output_path, None);
    assert!(!workspace.config.output_path.exists());
    assert!(summary.records_for(PipelineKind::Modifier) > 0);

    let json = fs::read_to_string(&workspace.config.summary_path).expect("summary json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse summary");
    assert_eq!(value["outcome"], "nothing_processed");
}

#[test]
fn modifier_only_selection_writes_catalog() {
    let workspace = Workspace::new().select(&[PipelineKind::Modifier]);
    let summary = run_sequential(&workspace.config, &ClassificationTables::standard())
        .expect("run");
    assert_eq!(summary.outcome, RunOutcome::Written);
    let sql = fs::read_to_string(&workspace.config.output_path).expect("artifact");
    assert!(sql.contains("INSERT INTO modifier_code"));
}

#[test]
fn dry_run_writes_nothing() {
    let mut workspace = Workspace::with_all_sources();
    workspace.config.dry_run = true;
    let summary = run_sequential(&workspace.config, &ClassificationTables::standard())
        .expect("run");
    assert_eq!(summary.outcome, RunOutcome::DryRun);
    assert_eq!(summary.statements, 5);
    assert!(!workspace.config.output_path.exists());
    assert!(!workspace.config.summary_path.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn parallel_run_matches_sequential() {
    let workspace = Workspace::with_all_sources();
    let tables = ClassificationTables::standard();
    let sequential = collect_batches(&workspace.config, &tables);
    let parallel =
        collect_batches_parallel(Arc::new(workspace.config.clone()), Arc::new(tables)).await;

    assert_eq!(sequential.len(), parallel.len());
    for (left, right) in sequential.iter().zip(&parallel) {
        assert_eq!(left.report.pipeline, right.report.pipeline);
        assert_eq!(left.batch.records, right.batch.records);
    }
}
