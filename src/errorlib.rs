//!`errorlib` is a simply enumeration to control error handling and logging.
#[derive(Debug)]
pub enum NgFecErrorKind {
    //From settings
    SetNoCommandFile,
    SetEmptyCommandList,
    SetBadRbx(String),
    SetPowerSupplyPair,

    //From the control hub link
    HubCouldNotConnect,
    HubWriteFailed,
    HubReadLoop,
    HubReadOver,

    //Data log related
    LogCouldNotCreateFile,
    LogEmpty,
    LogBadHeader,
    LogMinGreaterThanMax,

    //Plot rendering
    PlotNoEntries,
    PlotBackend(String),

    //From IO-based, such as external libraries (like json parser)
    IOGeneralError,
    IOCouldNotCreateFile,
    SerdeGeneralError,
    Utf8GeneralError,
}

impl From<std::io::Error> for NgFecErrorKind {
    fn from(e: std::io::Error) -> NgFecErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => NgFecErrorKind::IOCouldNotCreateFile,
            std::io::ErrorKind::ConnectionRefused => NgFecErrorKind::HubCouldNotConnect,
            _ => NgFecErrorKind::IOGeneralError,
        }
    }
}

impl From<std::str::Utf8Error> for NgFecErrorKind {
    fn from(_: std::str::Utf8Error) -> NgFecErrorKind {
        NgFecErrorKind::Utf8GeneralError
    }
}

impl From<serde_json::Error> for NgFecErrorKind {
    fn from(error: serde_json::Error) -> NgFecErrorKind {
        println!("***Errorlib***: Serde general error is {:?}", error);
        NgFecErrorKind::SerdeGeneralError
    }
}
