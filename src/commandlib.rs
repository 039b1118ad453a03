//!`commandlib` is a collection of tools to handle ngFEC command text.
use crate::errorlib::NgFecErrorKind;
use crate::auxiliar::value_types::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use regex::Regex;

///Reads a command file, one command per line. Blank lines are ignored.
pub fn load_command_list(file: &str) -> Result<Vec<String>, NgFecErrorKind> {
    let cmd_file = match File::open(file) {
        Ok(cmd_file) => cmd_file,
        Err(_) => return Err(NgFecErrorKind::SetNoCommandFile),
    };
    let mut cmd_list: Vec<String> = Vec::new();
    for line in BufReader::new(cmd_file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            cmd_list.push(trimmed.to_owned());
        }
    }
    if cmd_list.is_empty() {
        return Err(NgFecErrorKind::SetEmptyCommandList);
    }
    Ok(cmd_list)
}

///How many readings a command must produce. Integers sitting immediately
///before a closing bracket multiply together, so `RM[1-4]-QIE[1-64]` expects
///256 values. A command without range tokens expects a single value.
pub fn expected_count(cmd: &str) -> CHANNEL {
    let range_end = Regex::new(r"(\d+)\]").expect("literal regex");
    let mut count: CHANNEL = 1;
    for cap in range_end.captures_iter(cmd) {
        if let Ok(n) = cap[1].parse::<CHANNEL>() {
            count *= n.max(1);
        }
    }
    count.max(1)
}

///Expands the first `[a-b]` token into one command per value, keeping the
///remaining tokens untouched. The hub answers one line per expanded command,
///which is what the non-batched retry walks through.
pub fn expand_first_range(cmd: &str) -> Vec<String> {
    let range = Regex::new(r"\[(\d+)-(\d+)\]").expect("literal regex");
    if let Some(cap) = range.captures(cmd) {
        let whole = cap.get(0).expect("capture 0 always present");
        let (first, last) = (cap[1].parse::<u64>(), cap[2].parse::<u64>());
        if let (Ok(first), Ok(last)) = (first, last) {
            if first <= last {
                return (first..=last)
                    .map(|i| format!("{}{}{}", &cmd[..whole.start()], i, &cmd[whole.end()..]))
                    .collect();
            }
        }
    }
    vec![cmd.to_owned()]
}

///Named measurement channels read from the hardware.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Temperature,
    Humidity,
    PeltierVoltage,
    PeltierCurrent,
    LeakageCurrent,
    BiasVoltageIn,
    VoltageIn,
    Other,
}

impl VariableKind {
    ///Which variable a command reads, judged from its text.
    pub fn classify(cmd: &str) -> VariableKind {
        let lower = cmd.to_lowercase();
        if lower.contains("temperature") || lower.contains("adc58") {
            VariableKind::Temperature
        } else if lower.contains("humidity") {
            VariableKind::Humidity
        } else if lower.contains("peltiervoltage") {
            VariableKind::PeltierVoltage
        } else if lower.contains("peltiercurrent") {
            VariableKind::PeltierCurrent
        } else if lower.contains("leakagecurrent") {
            VariableKind::LeakageCurrent
        } else if lower.contains("bvin") {
            VariableKind::BiasVoltageIn
        } else if lower.contains("vin") {
            VariableKind::VoltageIn
        } else {
            VariableKind::Other
        }
    }

    ///Column-group name written into the data-log header.
    pub fn short_name(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "temp",
            VariableKind::Humidity => "hum",
            VariableKind::PeltierVoltage => "peltV",
            VariableKind::PeltierCurrent => "peltI",
            VariableKind::LeakageCurrent => "leakI",
            VariableKind::BiasVoltageIn => "BVin",
            VariableKind::VoltageIn => "Vin",
            VariableKind::Other => "other",
        }
    }

    pub fn from_short_name(name: &str) -> VariableKind {
        match name {
            "temp" => VariableKind::Temperature,
            "hum" => VariableKind::Humidity,
            "peltV" => VariableKind::PeltierVoltage,
            "peltI" => VariableKind::PeltierCurrent,
            "leakI" => VariableKind::LeakageCurrent,
            "BVin" => VariableKind::BiasVoltageIn,
            "Vin" => VariableKind::VoltageIn,
            _ => VariableKind::Other,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "RM Temperatures (deg C)",
            VariableKind::Humidity => "RBX Humidities (%)",
            VariableKind::PeltierVoltage => "RBX Peltier Voltages (V)",
            VariableKind::PeltierCurrent => "RBX Peltier Currents (A)",
            VariableKind::LeakageCurrent => "RBX Leakage Currents (mA)",
            VariableKind::BiasVoltageIn => "RBX BVin (V)",
            VariableKind::VoltageIn => "RBX Vin (V)",
            VariableKind::Other => "Other readings",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VariableKind::Temperature => "Temp (deg C)",
            VariableKind::Humidity => "Humidity (%)",
            VariableKind::PeltierVoltage => "Voltage (V)",
            VariableKind::PeltierCurrent => "Current (A)",
            VariableKind::LeakageCurrent => "Current (mA)",
            VariableKind::BiasVoltageIn => "Voltage (V)",
            VariableKind::VoltageIn => "Voltage (V)",
            VariableKind::Other => "Value",
        }
    }

    ///Wider quantities get a wider padding around their plot ranges.
    pub fn range_pad(&self) -> READING {
        match self {
            VariableKind::Humidity => crate::constlib::HUMIDITY_PAD,
            _ => crate::constlib::RANGE_PAD,
        }
    }
}

///One parsed reading: the command that produced it, the variable it maps to
///and the ordered values, sentinel-filled when the command failed.
#[derive(Clone, Debug)]
pub struct Reading {
    pub kind: VariableKind,
    pub cmd: String,
    pub values: Vec<READING>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_count_multiplies_range_ends() {
        assert_eq!(expected_count("get HB[1-4]-adc58_f"), 4);
        assert_eq!(expected_count("get HB[1-4]-QIE[1-64]-LeakageCurrent"), 256);
        assert_eq!(expected_count("get HB2-humidityS_f"), 1);
    }

    #[test]
    fn expected_count_ignores_tokens_without_digits() {
        assert_eq!(expected_count("get HB[x-y]-adc58_f"), 1);
        assert_eq!(expected_count("get HB[]-adc58_f"), 1);
    }

    #[test]
    fn expand_first_range_keeps_order() {
        let cmds = expand_first_range("get HB[1-4]-PeltierVoltage_f");
        assert_eq!(cmds.len(), 4);
        assert_eq!(cmds[0], "get HB1-PeltierVoltage_f");
        assert_eq!(cmds[3], "get HB4-PeltierVoltage_f");
    }

    #[test]
    fn expand_without_range_returns_command() {
        let cmds = expand_first_range("get HB2-humidityS_f");
        assert_eq!(cmds, vec!["get HB2-humidityS_f".to_owned()]);
        let reversed = expand_first_range("get HB[4-1]-adc58_f");
        assert_eq!(reversed.len(), 1);
    }

    #[test]
    fn classify_covers_the_monitored_variables() {
        assert_eq!(VariableKind::classify("get HB[1-4]-adc58_f"), VariableKind::Temperature);
        assert_eq!(VariableKind::classify("get HB[1-4]-humidityS_f"), VariableKind::Humidity);
        assert_eq!(VariableKind::classify("get HB[1-4]-PeltierVoltage_f"), VariableKind::PeltierVoltage);
        assert_eq!(VariableKind::classify("get HB[1-4]-PeltierCurrent_f"), VariableKind::PeltierCurrent);
        assert_eq!(VariableKind::classify("get HB[1-4]-QIE[1-64]-LeakageCurrent"), VariableKind::LeakageCurrent);
        assert_eq!(VariableKind::classify("get HB[1-4]-BVin_f"), VariableKind::BiasVoltageIn);
        assert_eq!(VariableKind::classify("get HB[1-4]-Vin_f"), VariableKind::VoltageIn);
        assert_eq!(VariableKind::classify("get HB2-fec-sfp_status"), VariableKind::Other);
    }

    #[test]
    fn short_names_round_trip() {
        for kind in [
            VariableKind::Temperature,
            VariableKind::Humidity,
            VariableKind::PeltierVoltage,
            VariableKind::PeltierCurrent,
            VariableKind::LeakageCurrent,
            VariableKind::BiasVoltageIn,
            VariableKind::VoltageIn,
        ] {
            assert_eq!(VariableKind::from_short_name(kind.short_name()), kind);
        }
    }
}
