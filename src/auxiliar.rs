//!`auxiliar` is a collection of tools to set monitoring conditions.
use crate::errorlib::NgFecErrorKind;
use crate::constlib::*;
use crate::auxiliar::value_types::*;
use std::io::Read;
use std::fs::File;
use serde::{Deserialize, Serialize};

///`Settings` contains all relevant parameters for a given monitoring pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub control_hub: String,
    pub port: u16,
    pub step: SECS, //seconds between readings
    pub total_time: SECS, //total measurement time. Zero means a single pass
    pub log_file: String,
}

impl Settings {
    //Used a lot by the binaries to share one hub setup between runs
    pub fn get_settings_from_json(file: &str) -> Result<Self, NgFecErrorKind> {
        let mut json_file = File::open(file)?;
        let mut json_buffer: Vec<u8> = Vec::new();
        json_file.read_to_end(&mut json_buffer)?;
        let my_settings: Settings = serde_json::from_slice(&json_buffer)?;
        Ok(my_settings)
    }

    pub fn hub_address(&self) -> String {
        format!("{}:{}", self.control_hub, self.port)
    }

    ///Port and per-RM channel count for a named readout box (HB* or HE*).
    pub fn rbx_layout(rbx: &str) -> Result<(u16, CHANNEL), NgFecErrorKind> {
        if rbx.contains("HE") {
            Ok((HE_PORT, HE_QIE_CHANNELS))
        } else if rbx.contains("HB") {
            Ok((HB_PORT, HB_QIE_CHANNELS))
        } else {
            Err(NgFecErrorKind::SetBadRbx(rbx.to_owned()))
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            control_hub: CONTROL_HUB.to_owned(),
            port: HB_PORT,
            step: POLL_STEP,
            total_time: 0,
            log_file: DATA_LOG_FILE.to_owned(),
        }
    }
}

///`simple_log` keeps the timestamped action log the scripted tests append to.
pub mod simple_log {
    use chrono::prelude::*;
    use std::{fs::{File, OpenOptions, create_dir_all}, path::Path};
    use std::io::Write;
    use std::io;
    use crate::constlib::{ACTION_LOG_DIR, TIMESTAMP_FORMAT};
    use crate::errorlib::NgFecErrorKind;

    pub fn start(name: &str) -> io::Result<File> {
        let dir = Path::new(ACTION_LOG_DIR);
        create_dir_all(dir)?;
        let file_path = dir.join(name);
        let mut file = OpenOptions::new().write(true).truncate(false).create(true).append(true).open(file_path)?;
        let date = Local::now().format(TIMESTAMP_FORMAT).to_string();
        file.write_all(date.as_bytes())?;
        file.write_all(b" Starting new loop\n")?;
        Ok(file)
    }

    ///One timestamped line, also echoed to the console.
    pub fn note(file: &mut File, message: &str) -> io::Result<()> {
        let date = Local::now().format(TIMESTAMP_FORMAT).to_string();
        println!("{} {}", date, message);
        file.write_all(date.as_bytes())?;
        file.write_all(b" ")?;
        file.write_all(message.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    pub fn error(file: &mut File, error: NgFecErrorKind) -> io::Result<()> {
        let date = Local::now().format(TIMESTAMP_FORMAT).to_string();
        file.write_all(date.as_bytes())?;
        file.write_all(b" ERROR ")?;
        let error = format!("{:?}", error);
        file.write_all(error.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

pub mod value_types {
    pub type READING = f64;
    pub type CHANNEL = usize;
    pub type SECS = u64;
}

///`misc` are miscellaneous functions.
pub mod misc {
    use chrono::prelude::*;
    use crate::constlib::TIMESTAMP_FORMAT;

    ///Current local date and time as the two log columns.
    pub fn now_stamp() -> (String, String) {
        let now = Local::now();
        (now.format("%Y-%m-%d").to_string(), now.format("%H:%M:%S").to_string())
    }

    pub fn full_stamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rbx_layout_selects_port_and_channels() {
        assert_eq!(Settings::rbx_layout("HB0").unwrap(), (HB_PORT, HB_QIE_CHANNELS));
        assert_eq!(Settings::rbx_layout("HE3").unwrap(), (HE_PORT, HE_QIE_CHANNELS));
        assert!(Settings::rbx_layout("CALIB2").is_err());
    }

    #[test]
    fn default_settings_point_at_the_hub() {
        let set = Settings::default();
        assert_eq!(set.hub_address(), format!("{}:{}", CONTROL_HUB, HB_PORT));
        assert_eq!(set.total_time, 0);
    }
}
