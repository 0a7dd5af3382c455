use crate::args::PipelineConfig;
use crate::code_system::PipelineKind;
use crate::constants::SHORT_DESCRIPTION_LEN;
use crate::error::{RowRejection, SourceError};
use crate::normalize::clean_str;
use crate::pipeline::BatchBuilder;
use crate::readers::catalog::modifier_catalog;
use crate::record::{CodeDetail, NormalizedCodeRecord};

pub fn load(config: &PipelineConfig, builder: &mut BatchBuilder) -> Result<(), SourceError> {
    let entries = modifier_catalog()?;
    tracing::info!("Modifier: {} catalog entries", entries.len());
    let effective_date = config.effective_date_for(PipelineKind::Modifier);

    for entry in entries {
        builder.row();
        let code = clean_str(&entry.code, config.max_text_len);
        if code.is_empty() {
            builder.reject(RowRejection::MissingCode, "catalog entry without a code");
            continue;
        }

        let mut record = NormalizedCodeRecord::new(
            code,
            effective_date,
            CodeDetail::Modifier {
                modifier_type: clean_str(&entry.modifier_type, config.max_text_len),
                level_i: entry.level_i,
                level_ii: entry.level_ii,
            },
        );
        record.long_description = clean_str(&entry.description, config.max_text_len);
        record.short_description = clean_str(&entry.short_description, SHORT_DESCRIPTION_LEN);
        record.category = clean_str(&entry.category, config.max_text_len);
        builder.push(record);
    }
    Ok(())
}
