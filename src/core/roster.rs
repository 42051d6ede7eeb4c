use crate::domain::model::RosterRecord;
use crate::utils::error::Result;
use std::path::Path;

/// 讀取名單檔:每行「標題<分隔符>帳號」兩欄。
/// 空白行(含檔尾那行)忽略;欄位不足或帳號為空的行記 warning 後跳過。
pub fn load_roster<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<RosterRecord>> {
    let content = std::fs::read_to_string(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;

        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        let title = row.get(0).unwrap_or("");
        let username = row.get(1).unwrap_or("");
        if title.is_empty() || username.is_empty() {
            tracing::warn!("⚠️ Skipping malformed roster line {}: {:?}", index + 1, row);
            continue;
        }

        records.push(RosterRecord {
            title: title.to_string(),
            username: username.to_string(),
        });
    }

    Ok(records)
}
