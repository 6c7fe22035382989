use crate::errors::{EtlError, Result};
use crate::models::joined::JoinedTable;
use crate::util::arrow_utils;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const STAGING_TABLE: &str = "stock_data_stg";

/// 连接结果的落地目标
///
/// `stage` hands over the joined table; `finalize` applies the SQL script that
/// turns the staged table into its final form and commits.
pub trait StagingSink {
    fn stage(&mut self, table: &JoinedTable) -> Result<()>;
    fn finalize(&mut self, sql_script: &Path) -> Result<()>;
}

/// Stages the joined table as an Arrow IPC file under `data_dir`.
///
/// The table is written to `stock_data_stg.arrow.tmp` and only renamed to
/// `stock_data_stg.arrow` on `finalize`, after the SQL script has been read and
/// stored alongside it as `stock_data_stg.sql`. The script is not executed.
pub struct ArrowStagingSink {
    data_dir: PathBuf,
    pending: Option<PathBuf>,
}

impl ArrowStagingSink {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            pending: None,
        }
    }

    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.arrow", STAGING_TABLE))
    }

    pub fn script_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.sql", STAGING_TABLE))
    }

    fn pending_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.arrow.tmp", STAGING_TABLE))
    }
}

/// 脚本中的非空语句数（按分号切分）
fn count_statements(script: &str) -> usize {
    script
        .split(';')
        .map(|s| {
            s.lines()
                .filter(|l| !l.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|s| !s.trim().is_empty())
        .count()
}

impl StagingSink for ArrowStagingSink {
    fn stage(&mut self, table: &JoinedTable) -> Result<()> {
        if table.is_empty() {
            warn!("Staging an empty joined table");
        }

        // 确保目录存在
        fs::create_dir_all(&self.data_dir)?;

        let batch = arrow_utils::joined_table_to_record_batch(table)?;
        let path = self.pending_path();
        arrow_utils::save_record_batch_to_arrow(&batch, &path)?;
        self.pending = Some(path);
        Ok(())
    }

    fn finalize(&mut self, sql_script: &Path) -> Result<()> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| EtlError::DataError("Nothing staged to finalize".to_string()))?;

        let script = match fs::read_to_string(sql_script) {
            Ok(script) => script,
            Err(e) => {
                // 保留暂存文件，修正脚本后可重新 finalize
                self.pending = Some(pending);
                return Err(e.into());
            }
        };
        let statements = count_statements(&script);
        if statements == 0 {
            self.pending = Some(pending);
            return Err(EtlError::ValidationError(format!(
                "SQL script {} contains no statements",
                sql_script.display()
            )));
        }

        fs::write(self.script_path(), &script)?;
        fs::rename(&pending, self.table_path())?;

        info!(
            "Data successfully loaded into {} ({} statements from {} recorded).",
            self.table_path().display(),
            statements,
            sql_script.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_ignore_comments_and_blanks() {
        let script = "-- finalize staging\nINSERT INTO stock_data SELECT * FROM stock_data_stg;\n\n;DROP TABLE stock_data_stg;\n";
        assert_eq!(count_statements(script), 2);
        assert_eq!(count_statements("-- nothing here\n;;"), 0);
    }

    #[test]
    fn finalize_without_stage_fails() {
        let mut sink = ArrowStagingSink::new(std::env::temp_dir().join("stock_fx_etl_unstaged"));
        let err = sink.finalize(Path::new("load_sql.sql")).unwrap_err();
        assert!(matches!(err, EtlError::DataError(_)));
    }
}
