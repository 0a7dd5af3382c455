#![allow(dead_code)]

use std::{fs, path::Path};

use build_code_sets::args::PipelineConfig;
use build_code_sets::code_system::PipelineKind;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

pub const ICD10_ORDER_FILE: &str = "\
00001 A00     0 Cholera                                                      Cholera
00002 A000    1 Cholera due to Vibrio cholerae 01, biovar cholerae           Cholera due to Vibrio cholerae 01, biovar cholerae
00003 A001 1
00004 S72001A 1 Fx unsp part of neck of right femur, init                   Fracture of unspecified part of neck of right femur, initial encounter
00005 a99     1 lowercase code                                               lowercase code
";

pub const CPT_CSV: &str = "\
CPT Code,Description
EVALUATION AND MANAGEMENT SERVICES,
99213,Office or other outpatient visit for an established patient
99213,Office visit (repeated row with different text)
ANESTHESIA FOR HEAD,
00100,Anesthesia for procedures on salivary glands
71045,Radiologic examination chest; single view
Note: codes below are provisional,
";

pub const HCPCS_CSV: &str = "\
HCPC,ACTION CD,SHORT DESCRIPTION,LONG DESCRIPTION
E0100,N,Cane adjust/fixed w tip,Cane includes canes of all materials adjustable or fixed with tip
A0021,D,Outside state ambulance serv,Ambulance service outside state per mile transport
J1100,,Dexamethasone sodium phos,Injection dexamethasone sodium phosphate 1 mg
,N,Orphan row,Row without a code
";

pub const CARC_RARC_CSV: &str = "\
Code,Description,Type
N1,Alert: You may appeal this decision,RARC — informational
CO45,Charge exceeds fee schedule/maximum allowable,
1,Deductible amount,CARC
MA130,Your claim contains incomplete and/or invalid information,
1,Deductible amount,CARC
";

/// A scratch workspace with every source present under `data/raw`.
pub struct Workspace {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = PipelineConfig::with_root(dir.path()).expect("config");
        config.sources.cpt = dir.path().join("data/raw/cpt/cpt_code_list.csv");
        config.sources.hcpcs = dir.path().join("data/raw/hcpcs/hcpcs_transaction_report.csv");
        config.sources.carc_rarc = dir.path().join("data/raw/carc_rarc/carc_rarc_codes.csv");
        Self { dir, config }
    }

    pub fn with_all_sources() -> Self {
        let workspace = Self::new();
        write_file(&workspace.config.sources.icd10, ICD10_ORDER_FILE);
        write_file(&workspace.config.sources.cpt, CPT_CSV);
        write_file(&workspace.config.sources.hcpcs, HCPCS_CSV);
        write_file(&workspace.config.sources.carc_rarc, CARC_RARC_CSV);
        workspace
    }

    pub fn select(mut self, systems: &[PipelineKind]) -> Self {
        self.config.systems = systems.to_vec();
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, contents).expect("write fixture");
}

/// A cell written into an `.xlsx` fixture.
#[derive(Debug, Clone, Copy)]
pub enum XlsxCell {
    Text(&'static str),
    Number(f64),
    Blank,
}

/// Writes a workbook with one worksheet per `(name, rows)` pair, in order.
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<XlsxCell>>)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).expect("sheet name");
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let (row_num, col_num) = (row_idx as u32, col_idx as u16);
                match cell {
                    XlsxCell::Text(text) => {
                        sheet.write_string(row_num, col_num, *text).expect("write text");
                    }
                    XlsxCell::Number(value) => {
                        sheet.write_number(row_num, col_num, *value).expect("write number");
                    }
                    XlsxCell::Blank => {}
                }
            }
        }
    }
    workbook.save(path).expect("save workbook");
}
