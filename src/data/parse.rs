use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::util::format_player_name;

use super::records::PassRecord;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawPassRow {
    #[serde(default, rename = "TEAM_ID")]
    team_id: Value,
    #[serde(default, rename = "TEAM_NAME")]
    team_name: Value,
    #[serde(default, rename = "GAME_DATE")]
    game_date: Value,
    #[serde(default, rename = "PLAYER_ID")]
    player_id: Value,
    #[serde(default, rename = "PLAYER_NAME_LAST_FIRST")]
    player_name: Value,
    #[serde(default, rename = "PASS_TEAMMATE_PLAYER_ID")]
    teammate_id: Value,
    #[serde(default, rename = "PASS_TO")]
    teammate_name: Value,
    #[serde(default, rename = "PASS")]
    passes: Value,
    #[serde(default, rename = "AST")]
    assists: Value,
}

// Export tooling is inconsistent about numeric columns: ids and counts show
// up as JSON numbers or as quoted strings depending on the producer.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn count_of(value: &Value) -> u32 {
    match value {
        Value::Number(number) => number.as_u64().unwrap_or(0).min(u32::MAX as u64) as u32,
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn row_to_record(row: RawPassRow) -> Option<PassRecord> {
    let source_id = text_of(&row.player_id);
    let target_id = text_of(&row.teammate_id);
    if source_id.is_empty() || target_id.is_empty() {
        return None;
    }

    Some(PassRecord {
        team_id: text_of(&row.team_id),
        team_name: text_of(&row.team_name),
        game_date: text_of(&row.game_date),
        source_id,
        source_name: format_player_name(&text_of(&row.player_name)),
        target_id,
        target_name: format_player_name(&text_of(&row.teammate_name)),
        passes: count_of(&row.passes),
        assists: count_of(&row.assists),
    })
}

pub(super) fn parse_json_records(raw: &str) -> Result<Vec<PassRecord>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in pass export")?;

    let rows = if let Some(array) = parsed.as_array() {
        array
    } else if let Some(array) = parsed.get("records").and_then(Value::as_array) {
        array
    } else {
        return Err(anyhow!(
            "expected a JSON array of pass rows or an object with a records array"
        ));
    };

    let mut records = Vec::with_capacity(rows.len());
    for row_value in rows {
        let row = RawPassRow::deserialize(row_value).context("invalid pass row in JSON export")?;
        if let Some(record) = row_to_record(row) {
            records.push(record);
        }
    }

    Ok(records)
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
}

pub(super) fn parse_csv_records(raw: &str) -> Result<Vec<PassRecord>> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    let header_line = lines.next().ok_or_else(|| anyhow!("pass export is empty"))?;

    let header = split_csv_line(header_line)
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect::<Vec<_>>();
    let column = |name: &str| header.iter().position(|field| field == name);

    let source_id_col = column("PLAYER_ID")
        .ok_or_else(|| anyhow!("pass export is missing the PLAYER_ID column"))?;
    let target_id_col = column("PASS_TEAMMATE_PLAYER_ID")
        .ok_or_else(|| anyhow!("pass export is missing the PASS_TEAMMATE_PLAYER_ID column"))?;
    let passes_col =
        column("PASS").ok_or_else(|| anyhow!("pass export is missing the PASS column"))?;
    let assists_col = column("AST");
    let team_id_col = column("TEAM_ID");
    let team_name_col = column("TEAM_NAME");
    let date_col = column("GAME_DATE");
    let source_name_col = column("PLAYER_NAME_LAST_FIRST");
    let target_name_col = column("PASS_TO");

    let mut records = Vec::new();
    for line in lines {
        let fields = split_csv_line(line);

        let source_id = field_at(&fields, Some(source_id_col)).to_string();
        let target_id = field_at(&fields, Some(target_id_col)).to_string();
        if source_id.is_empty() || target_id.is_empty() {
            continue;
        }

        records.push(PassRecord {
            team_id: field_at(&fields, team_id_col).to_string(),
            team_name: field_at(&fields, team_name_col).to_string(),
            game_date: field_at(&fields, date_col).to_string(),
            source_id,
            source_name: format_player_name(field_at(&fields, source_name_col)),
            target_id,
            target_name: format_player_name(field_at(&fields, target_name_col)),
            passes: field_at(&fields, Some(passes_col)).parse().unwrap_or(0),
            assists: field_at(&fields, assists_col).parse().unwrap_or(0),
        });
    }

    Ok(records)
}

fn field_at<'a>(fields: &'a [String], column: Option<usize>) -> &'a str {
    column
        .and_then(|index| fields.get(index))
        .map(|value| value.trim())
        .unwrap_or("")
}
