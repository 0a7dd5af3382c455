use crate::args::PipelineConfig;
use crate::classify::{ClassificationTables, icd10};
use crate::code_system::PipelineKind;
use crate::constants::SHORT_DESCRIPTION_LEN;
use crate::error::{RowRejection, SourceError};
use crate::normalize::{Icd10Filter, clean};
use crate::pipeline::BatchBuilder;
use crate::readers::text::OrderFileReader;
use crate::record::{CodeDetail, NormalizedCodeRecord};

const CODE: usize = 1;
const HIERARCHY_LEVEL: usize = 2;
const SHORT_DESCRIPTION: usize = 3;
const LONG_DESCRIPTION: usize = 4;

/// Order-file level marking a category header rather than a leaf code.
const HEADER_LEVEL: &str = "0";

pub fn load(
    config: &PipelineConfig,
    tables: &ClassificationTables,
    builder: &mut BatchBuilder,
) -> Result<(), SourceError> {
    let path = &config.sources.icd10;
    let mut reader = OrderFileReader::open(path)?;
    tracing::info!("ICD-10: reading order file {}", path.display());

    let filter = Icd10Filter::new().map_err(|err| SourceError::format(path, err.to_string()))?;
    let effective_date = config.effective_date_for(PipelineKind::Icd10);

    for row in reader.by_ref() {
        let row = row?;
        builder.row();

        let Some(code) = clean(row.get(CODE), config.max_text_len).filter(|c| !c.is_empty())
        else {
            builder.reject(RowRejection::MissingCode, "empty code field");
            continue;
        };
        if !filter.accepts(&code) {
            builder.reject(RowRejection::InvalidCode, &code);
            continue;
        }

        let chapter = tables.icd10_chapters.chapter(&code);
        let level = clean(row.get(HIERARCHY_LEVEL), config.max_text_len).unwrap_or_default();

        let mut record = NormalizedCodeRecord::new(
            code.as_str(),
            effective_date,
            CodeDetail::Icd10 {
                chapter: chapter.name.to_string(),
                chapter_range: chapter.range.to_string(),
            },
        );
        record.short_description =
            clean(row.get(SHORT_DESCRIPTION), SHORT_DESCRIPTION_LEN).unwrap_or_default();
        record.long_description =
            clean(row.get(LONG_DESCRIPTION), config.max_text_len).unwrap_or_default();
        record.category = icd10::category(&code).to_string();
        record.billable = icd10::is_billable(&code);
        record.requires_additional_digit = icd10::requires_additional_digit(&code);
        record.is_header = level == HEADER_LEVEL;
        builder.push(record);
    }

    builder.reject_unread(RowRejection::TooFewFields, reader.short_lines());
    tracing::info!(
        "ICD-10: {} lines read, {} skipped with fewer than 5 fields",
        reader.lines_read(),
        reader.short_lines()
    );
    Ok(())
}
