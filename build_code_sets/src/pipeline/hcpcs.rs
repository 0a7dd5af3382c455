use crate::args::PipelineConfig;
use crate::classify::{ClassificationTables, hcpcs};
use crate::code_system::PipelineKind;
use crate::constants::{HCPCS_CATEGORY_LEN, SHORT_DESCRIPTION_LEN};
use crate::error::{RowRejection, SourceError};
use crate::normalize::{clean, truncate_chars};
use crate::pipeline::BatchBuilder;
use crate::readers::spreadsheet::{SheetRef, read_spreadsheet};
use crate::record::{CodeDetail, NormalizedCodeRecord};
use crate::schema_map::{find_column, label_at};

/// Sheet of the CMS transaction report that lists every code.
pub const CHANGES_SHEET: &str = "Changes by HCPC";

const CODE_KEYWORDS: &[&str] = &["hcpc"];
const ACTION_KEYWORDS: &[&str] = &["action cd", "action code"];
const SHORT_KEYWORDS: &[&str] = &["short desc"];
const LONG_KEYWORDS: &[&str] = &["long desc"];

pub fn load(
    config: &PipelineConfig,
    tables: &ClassificationTables,
    builder: &mut BatchBuilder,
) -> Result<(), SourceError> {
    let path = &config.sources.hcpcs;
    let table = read_spreadsheet(path, &[SheetRef::named(CHANGES_SHEET), SheetRef::Index(0)])?;

    let code_col = find_column(&table.headers, CODE_KEYWORDS).unwrap_or(0);
    let action_col = find_column(&table.headers, ACTION_KEYWORDS);
    let short_col = find_column(&table.headers, SHORT_KEYWORDS);
    let long_col = find_column(&table.headers, LONG_KEYWORDS);
    tracing::info!(
        "HCPCS: reading {} sheet {} ({} rows, code={}, action={}, short={}, long={})",
        path.display(),
        table.origin,
        table.rows.len(),
        label_at(&table.headers, Some(code_col)),
        label_at(&table.headers, action_col),
        label_at(&table.headers, short_col),
        label_at(&table.headers, long_col),
    );

    builder.set_message(format!("sheet {}", table.origin));
    let effective_date = config.effective_date_for(PipelineKind::Hcpcs);

    for row in &table.rows {
        builder.row();
        let Some(code) = clean(row.get(code_col), config.max_text_len).filter(|c| !c.is_empty())
        else {
            builder.reject(RowRejection::MissingCode, "empty HCPC field");
            continue;
        };

        let action_code = clean(row.at(action_col), config.max_text_len).filter(|a| !a.is_empty());
        let category = tables.hcpcs_categories.category(&code);

        let mut record = NormalizedCodeRecord::new(
            code.as_str(),
            effective_date,
            CodeDetail::Hcpcs {
                action_code: action_code.clone(),
            },
        );
        record.short_description =
            clean(row.at(short_col), SHORT_DESCRIPTION_LEN).unwrap_or_default();
        record.long_description = clean(row.at(long_col), config.max_text_len).unwrap_or_default();
        record.category = truncate_chars(category, HCPCS_CATEGORY_LEN).to_string();
        record.is_active = hcpcs::is_active(action_code.as_deref());
        builder.push(record);
    }
    Ok(())
}
