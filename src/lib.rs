//!# ngFEC monitoring
//!
//!`ngfec_mon` is a collection of tools to operate and monitor detector
//!front-end electronics through the ngFEC control hub. Textual commands are
//!sent over a socket to the hub, numeric readings are parsed back out of the
//!plain-text responses, appended to a flat log file and rendered as line
//!graphs and histograms.

pub mod auxiliar;
pub mod constlib;
pub mod commandlib;
pub mod parselib;
pub mod hublib;
pub mod loglib;
pub mod plotlib;
pub mod monlib;
pub mod errorlib;
