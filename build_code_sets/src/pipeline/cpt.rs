use crate::args::PipelineConfig;
use crate::classify::ClassificationTables;
use crate::code_system::PipelineKind;
use crate::constants::{CPT_CATEGORY_LEN, SHORT_DESCRIPTION_LEN};
use crate::error::{RowRejection, SourceError};
use crate::normalize::{CptLine, classify_cpt_line, clean, truncate_chars};
use crate::pipeline::BatchBuilder;
use crate::readers::spreadsheet::{SheetRef, read_spreadsheet};
use crate::record::{CodeDetail, NormalizedCodeRecord};
use crate::schema_map::{RoleKeywords, label_at, map_columns};

pub fn load(
    config: &PipelineConfig,
    tables: &ClassificationTables,
    builder: &mut BatchBuilder,
) -> Result<(), SourceError> {
    let path = &config.sources.cpt;
    let table = read_spreadsheet(path, &[SheetRef::Index(0)])?;
    // The code list has no usable labels; code and description are positional.
    let columns = map_columns(&table.headers, &RoleKeywords::POSITIONAL);
    tracing::info!(
        "CPT: reading {} sheet {} ({} rows, code={}, description={})",
        path.display(),
        table.origin,
        table.rows.len(),
        label_at(&table.headers, Some(columns.code)),
        label_at(&table.headers, Some(columns.description)),
    );

    builder.set_message(format!("sheet {}", table.origin));
    let effective_date = config.effective_date_for(PipelineKind::Cpt);
    let mut current_category: Option<String> = None;

    for row in &table.rows {
        builder.row();
        let first = clean(row.get(columns.code), config.max_text_len).unwrap_or_default();

        let code = match classify_cpt_line(&first) {
            CptLine::Code(code) => code,
            CptLine::SectionHeader(header) => {
                tracing::debug!("CPT: section {header}");
                current_category = Some(header);
                continue;
            }
            CptLine::Other => {
                builder.reject(RowRejection::NotACodeLine, &first);
                continue;
            }
        };

        let description = clean(row.get(columns.description), config.max_text_len)
            .unwrap_or_default();
        let category = tables
            .cpt_ranges
            .category(&code, current_category.as_deref());

        let mut record = NormalizedCodeRecord::new(code, effective_date, CodeDetail::Cpt);
        record.short_description = truncate_chars(&description, SHORT_DESCRIPTION_LEN).to_string();
        record.category = truncate_chars(&category, CPT_CATEGORY_LEN).to_string();
        record.long_description = description;
        builder.push(record);
    }
    Ok(())
}
