use crate::args::PipelineConfig;
use crate::classify::ClassificationTables;
use crate::classify::adjustment::{requires_patient_notification, resolve_type};
use crate::code_system::PipelineKind;
use crate::constants::SHORT_DESCRIPTION_LEN;
use crate::error::{RowRejection, SourceError};
use crate::normalize::{clean, truncate_chars};
use crate::pipeline::BatchBuilder;
use crate::readers::spreadsheet::{SheetRef, read_spreadsheet};
use crate::record::{CodeDetail, NormalizedCodeRecord};
use crate::schema_map::{RoleKeywords, label_at, map_columns};

pub const ADJUSTMENT_ROLES: RoleKeywords = RoleKeywords {
    code: &["code", "number"],
    description: &["description", "desc", "reason"],
    code_type: &["type", "carc", "rarc"],
};

pub fn sheet_candidates() -> Vec<SheetRef> {
    vec![
        SheetRef::Index(0),
        SheetRef::named("Sheet1"),
        SheetRef::named("CARC-RARC"),
        SheetRef::named("Codes"),
        SheetRef::named("Data"),
    ]
}

pub fn load(
    config: &PipelineConfig,
    tables: &ClassificationTables,
    builder: &mut BatchBuilder,
) -> Result<(), SourceError> {
    let path = &config.sources.carc_rarc;
    let table = read_spreadsheet(path, &sheet_candidates())?;
    let columns = map_columns(&table.headers, &ADJUSTMENT_ROLES);
    tracing::info!(
        "CARC/RARC: reading {} sheet {} ({} rows, code={}, description={}, type={})",
        path.display(),
        table.origin,
        table.rows.len(),
        label_at(&table.headers, Some(columns.code)),
        label_at(&table.headers, Some(columns.description)),
        label_at(&table.headers, columns.code_type),
    );

    builder.set_message(format!("sheet {}", table.origin));
    let effective_date = config.effective_date_for(PipelineKind::Adjustment);
    let max_len = config.adjustment_max_text_len;
    let rules = &tables.adjustment;

    for row in &table.rows {
        builder.row();
        let Some(code) = clean(row.get(columns.code), max_len).filter(|c| !c.is_empty()) else {
            builder.reject(RowRejection::MissingCode, "empty code field");
            continue;
        };

        let description = clean(row.get(columns.description), max_len).unwrap_or_default();
        let type_value = clean(row.at(columns.code_type), max_len);
        let code_type = resolve_type(&code, type_value.as_deref());

        let mut record = NormalizedCodeRecord::new(
            code.as_str(),
            effective_date,
            CodeDetail::Adjustment {
                code_type,
                financial_class: rules.financial_class(&description),
                requires_patient_notification: requires_patient_notification(&description),
                appealable: rules.appealable(&description),
            },
        );
        record.category = rules.category(&description).to_string();
        record.short_description = truncate_chars(&description, SHORT_DESCRIPTION_LEN).to_string();
        record.long_description = description;
        builder.push(record);
    }
    Ok(())
}
