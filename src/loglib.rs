//!`loglib` is a collection of tools to append and re-read the flat data log.
//!A log starts with one `#` header line naming every column group, so the
//!offline readers never have to hard-code slice indices into a row.
use crate::errorlib::NgFecErrorKind;
use crate::auxiliar::{misc, value_types::*};
use crate::commandlib::{expected_count, Reading, VariableKind};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use regex::Regex;

///One named group of columns, `leakI[192]` style.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub channels: CHANNEL,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogSchema {
    pub columns: Vec<ColumnSpec>,
}

impl LogSchema {
    ///Column layout a command list will produce, in command order. Repeated
    ///variables get a numeric suffix so every group name stays unique.
    pub fn from_commands(cmds: &[String]) -> LogSchema {
        let mut columns: Vec<ColumnSpec> = Vec::with_capacity(cmds.len());
        for cmd in cmds {
            let base = VariableKind::classify(cmd).short_name();
            let repeats = columns.iter().filter(|c| c.name == base || c.name.starts_with(&format!("{}_", base))).count();
            let name = if repeats == 0 { base.to_owned() } else { format!("{}_{}", base, repeats + 1) };
            columns.push(ColumnSpec { name, channels: expected_count(cmd) });
        }
        LogSchema { columns }
    }

    ///Parses a `# date time name[ch] ...` header line back into a schema.
    pub fn from_header(line: &str) -> Result<LogSchema, NgFecErrorKind> {
        let group = Regex::new(r"^(\w+)\[(\d+)\]$").expect("literal regex");
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("#") || tokens.next() != Some("date") || tokens.next() != Some("time") {
            return Err(NgFecErrorKind::LogBadHeader);
        }
        let mut columns = Vec::new();
        for token in tokens {
            let cap = match group.captures(token) {
                Some(cap) => cap,
                None => return Err(NgFecErrorKind::LogBadHeader),
            };
            let channels = match cap[2].parse::<CHANNEL>() {
                Ok(channels) if channels > 0 => channels,
                _ => return Err(NgFecErrorKind::LogBadHeader),
            };
            columns.push(ColumnSpec { name: cap[1].to_owned(), channels });
        }
        if columns.is_empty() {
            return Err(NgFecErrorKind::LogBadHeader);
        }
        Ok(LogSchema { columns })
    }

    pub fn header_line(&self) -> String {
        let mut line = String::from("# date time");
        for col in &self.columns {
            line.push_str(&format!(" {}[{}]", col.name, col.channels));
        }
        line
    }

    pub fn total_channels(&self) -> CHANNEL {
        self.columns.iter().map(|c| c.channels).sum()
    }

    ///Layout of the headerless legacy HB logs.
    pub fn legacy_hb() -> LogSchema {
        LogSchema {
            columns: vec![
                ColumnSpec { name: "temp".to_owned(), channels: 4 },
                ColumnSpec { name: "hum".to_owned(), channels: 4 },
                ColumnSpec { name: "peltV".to_owned(), channels: 4 },
                ColumnSpec { name: "peltI".to_owned(), channels: 4 },
                ColumnSpec { name: "leakI".to_owned(), channels: 192 },
            ],
        }
    }
}

///One appended row, values grouped per schema column.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub date: String,
    pub time: String,
    pub values: Vec<Vec<READING>>,
}

///Appends one timestamped row. A fresh file gets the schema header first.
pub fn append_entry(path: &str, schema: &LogSchema, readings: &[Reading]) -> Result<(), NgFecErrorKind> {
    let fresh = match std::fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(_) => true,
    };
    let mut file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return Err(NgFecErrorKind::LogCouldNotCreateFile),
    };
    if fresh {
        file.write_all(schema.header_line().as_bytes())?;
        file.write_all(b"\n")?;
    }
    let (date, time) = misc::now_stamp();
    let mut row = format!("{} {}", date, time);
    for reading in readings {
        for val in &reading.values {
            row.push_str(&format!(" {}", val));
        }
    }
    file.write_all(row.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

///Reads rows back, honoring the `--min`/`--max` row selectors. Rows that do
///not parse against the schema are skipped with a warning, matching how the
///offline scripts always treated damaged lines.
pub fn read_log(path: &str, min: Option<usize>, max: Option<usize>) -> Result<(LogSchema, Vec<LogEntry>), NgFecErrorKind> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo >= hi {
            return Err(NgFecErrorKind::LogMinGreaterThanMax);
        }
    }
    let file = std::fs::File::open(Path::new(path))?;
    let mut lines = BufReader::new(file).lines();

    let first = match lines.next() {
        Some(first) => first?,
        None => return Err(NgFecErrorKind::LogEmpty),
    };
    let (schema, mut data_lines) = match LogSchema::from_header(&first) {
        Ok(schema) => (schema, Vec::new()),
        Err(_) => (LogSchema::legacy_hb(), vec![first]),
    };
    for line in lines {
        data_lines.push(line?);
    }

    let mut entries = Vec::new();
    for (row, line) in data_lines.iter().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        if row < min.unwrap_or(0) {
            continue;
        }
        if let Some(hi) = max {
            if row >= hi {
                break;
            }
        }
        match parse_row(line, &schema) {
            Some(entry) => entries.push(entry),
            None => log::warn!("***Log***: skipping unparseable row {} of {}.", row, path),
        }
    }
    if entries.is_empty() {
        return Err(NgFecErrorKind::LogEmpty);
    }
    Ok((schema, entries))
}

fn parse_row(line: &str, schema: &LogSchema) -> Option<LogEntry> {
    let mut tokens = line.split_whitespace();
    let date = tokens.next()?.to_owned();
    let time = tokens.next()?.to_owned();
    let mut values = Vec::with_capacity(schema.columns.len());
    for col in &schema.columns {
        let mut group = Vec::with_capacity(col.channels);
        for _ in 0..col.channels {
            group.push(tokens.next()?.parse::<READING>().ok()?);
        }
        values.push(group);
    }
    Some(LogEntry { date, time, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commandlib::VariableKind;

    fn test_path(tag: &str) -> String {
        let path = std::env::temp_dir().join(format!("ngfec_loglib_{}_{}.log", tag, std::process::id()));
        let path = path.to_str().expect("temp path is utf8").to_owned();
        let _ = std::fs::remove_file(&path);
        path
    }

    fn reading(cmd: &str, values: Vec<READING>) -> Reading {
        Reading { kind: VariableKind::classify(cmd), cmd: cmd.to_owned(), values }
    }

    #[test]
    fn schema_from_commands_matches_header_round_trip() {
        let cmds = vec![
            "get HB[1-4]-adc58_f".to_owned(),
            "get HB[1-4]-humidityS_f".to_owned(),
            "get HB[1-4]-QIE[1-64]-LeakageCurrent".to_owned(),
        ];
        let schema = LogSchema::from_commands(&cmds);
        assert_eq!(schema.total_channels(), 4 + 4 + 256);
        assert_eq!(schema.header_line(), "# date time temp[4] hum[4] leakI[256]");
        let reparsed = LogSchema::from_header(&schema.header_line()).unwrap();
        assert_eq!(reparsed, schema);
    }

    #[test]
    fn repeated_variables_get_unique_names() {
        let cmds = vec![
            "get HB1-adc58_f".to_owned(),
            "get HB2-adc58_f".to_owned(),
        ];
        let schema = LogSchema::from_commands(&cmds);
        assert_eq!(schema.columns[0].name, "temp");
        assert_eq!(schema.columns[1].name, "temp_2");
    }

    #[test]
    fn bad_headers_are_rejected() {
        assert!(LogSchema::from_header("date time temp[4]").is_err());
        assert!(LogSchema::from_header("# date time temp[zero]").is_err());
        assert!(LogSchema::from_header("# date time").is_err());
    }

    #[test]
    fn append_then_read_round_trips() {
        let path = test_path("roundtrip");
        let cmds = vec!["get HB[1-4]-adc58_f".to_owned(), "get HB[1-4]-humidityS_f".to_owned()];
        let schema = LogSchema::from_commands(&cmds);
        let pass = vec![
            reading(&cmds[0], vec![26.1, 26.2, 26.3, 26.4]),
            reading(&cmds[1], vec![11.0, 12.0, 13.0, 14.0]),
        ];
        append_entry(&path, &schema, &pass).unwrap();
        append_entry(&path, &schema, &pass).unwrap();

        let (read_schema, entries) = read_log(&path, None, None).unwrap();
        assert_eq!(read_schema, schema);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].values[0], vec![26.1, 26.2, 26.3, 26.4]);
        assert_eq!(entries[1].values[1], vec![11.0, 12.0, 13.0, 14.0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn damaged_rows_are_skipped() {
        let path = test_path("damaged");
        let cmds = vec!["get HB[1-4]-adc58_f".to_owned()];
        let schema = LogSchema::from_commands(&cmds);
        append_entry(&path, &schema, &[reading(&cmds[0], vec![26.1, 26.2, 26.3, 26.4])]).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"2026-08-05 10:00:00 26.1 garbage 26.3 26.4\n").unwrap();
        }
        append_entry(&path, &schema, &[reading(&cmds[0], vec![27.1, 27.2, 27.3, 27.4])]).unwrap();

        let (_, entries) = read_log(&path, None, None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].values[0][0], 27.1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn row_selection_honors_min_and_max() {
        let path = test_path("minmax");
        let cmds = vec!["get HB1-humidityS_f".to_owned()];
        let schema = LogSchema::from_commands(&cmds);
        for i in 0..5 {
            append_entry(&path, &schema, &[reading(&cmds[0], vec![10.0 + i as READING])]).unwrap();
        }
        let (_, entries) = read_log(&path, Some(1), Some(4)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].values[0][0], 11.0);
        assert_eq!(entries[2].values[0][0], 13.0);
        assert!(read_log(&path, Some(3), Some(3)).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
