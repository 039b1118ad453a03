use crate::auxiliar::value_types::*;

//***General Values***//
pub const CONTROL_HUB: &str = "hcal904daq04";
pub const HB_PORT: u16 = 64400;
pub const HE_PORT: u16 = 64100;
pub const HB_QIE_CHANNELS: CHANNEL = 64; //per readout module
pub const HE_QIE_CHANNELS: CHANNEL = 48; //per readout module
pub const RM_SLOTS: CHANNEL = 4; //readout modules per readout box
pub const READ_TIMEOUT_MS: u64 = 5_000;
pub const HUB_BUFFER_SIZE: usize = 16384;

//***PARSELIB***//
pub const SENTINEL_READING: READING = -1.0; //substituted when a command errors out
pub const ERROR_TOKEN: &str = "ERROR";

//***MONLIB***//
pub const POLL_STEP: SECS = 20; //seconds between readings
pub const POLL_INTERVAL: SECS = 240; //seconds between scripted actions

//***LOGLIB***//
pub const DATA_LOG_FILE: &str = "ngfec_data.log";
pub const ACTION_LOG_DIR: &str = "Hcal/Log/";
pub const POWER_SUPPLY_LOG: &str = "power_supply.log";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

//***PLOTLIB***//
pub const IMAGE_DIR: &str = "images/";
pub const HISTOGRAM_BINS: usize = 20;
pub const MAX_GRAPH_SERIES: usize = 8; //beyond this only the histogram is drawn
pub const PLOT_SIZE: (u32, u32) = (1200, 1200);
pub const RANGE_PAD: READING = 0.05; //y padding for narrow quantities
pub const HUMIDITY_PAD: READING = 0.5; //humidity spans more, pad wider
