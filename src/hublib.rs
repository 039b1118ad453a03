//!`hublib` is a collection of tools to drive the ngFEC control hub link.
//!Commands go out as newline-terminated text and every command line is
//!answered by one response line. A batched pass writes the whole list before
//!reading anything; the non-batched pass used for retries walks one command
//!at a time.
use crate::errorlib::NgFecErrorKind;
use crate::auxiliar::Settings;
use crate::commandlib::{expected_count, expand_first_range, Reading, VariableKind};
use crate::parselib;
use crate::constlib::*;
use std::net::TcpStream;
use std::fs::File;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

///The transport seam. Anything that can carry text both ways can stand in
///for the hub, which is how the tests run without hardware.
pub trait HubLink: Read + Write {}

impl<T: Read + Write + ?Sized> HubLink for Box<T> {}
impl HubLink for TcpStream {}
impl HubLink for File {}

///One executed command, the consumed remote-execution contract.
#[derive(Clone, Debug)]
pub struct CommandRecord {
    pub cmd: String,
    pub result: String,
    pub elapsed: Duration,
}

///Blocking connection to the control hub with a read timeout, so a quiet
///link degrades into a truncated response instead of hanging the pass.
pub fn connect(settings: &Settings) -> Result<HubClient<TcpStream>, NgFecErrorKind> {
    let sock = match TcpStream::connect(settings.hub_address()) {
        Ok(sock) => sock,
        Err(_) => return Err(NgFecErrorKind::HubCouldNotConnect),
    };
    sock.set_read_timeout(Some(Duration::from_millis(READ_TIMEOUT_MS)))?;
    log::info!("***Hub***: connected at {}.", settings.hub_address());
    Ok(HubClient::new(sock))
}

pub struct HubClient<T: HubLink> {
    link: T,
    carry: Vec<u8>, //bytes read past the last consumed newline
}

impl<T: HubLink> HubClient<T> {
    pub fn new(link: T) -> Self {
        HubClient { link, carry: Vec::new() }
    }

    fn write_command(&mut self, cmd: &str) -> Result<(), NgFecErrorKind> {
        let okay = self.link.write_all(cmd.as_bytes()).and_then(|_| self.link.write_all(b"\n"));
        if okay.is_err() {
            return Err(NgFecErrorKind::HubWriteFailed);
        }
        Ok(())
    }

    ///One response line. A timeout or a closed socket hands back whatever
    ///arrived, so a short read surfaces as a parsed-count mismatch upstream.
    fn read_line(&mut self) -> Result<String, NgFecErrorKind> {
        loop {
            if let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.carry.drain(..=pos).collect();
                return Ok(std::str::from_utf8(&line)?.trim_end().to_owned());
            }
            let mut buf = [0_u8; HUB_BUFFER_SIZE];
            match self.link.read(&mut buf) {
                Ok(0) => break,
                Ok(size) => self.carry.extend_from_slice(&buf[..size]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(_) => return Err(NgFecErrorKind::HubReadLoop),
            }
        }
        let partial: Vec<u8> = self.carry.drain(..).collect();
        if partial.is_empty() {
            return Err(NgFecErrorKind::HubReadOver);
        }
        Ok(std::str::from_utf8(&partial)?.trim_end().to_owned())
    }

    ///Batched pass: the whole command list goes out before the first read.
    pub fn send_commands(&mut self, cmds: &[String]) -> Result<Vec<CommandRecord>, NgFecErrorKind> {
        for cmd in cmds {
            self.write_command(cmd)?;
        }
        if self.link.flush().is_err() {
            return Err(NgFecErrorKind::HubWriteFailed);
        }
        let mut records = Vec::with_capacity(cmds.len());
        for cmd in cmds {
            let start = Instant::now();
            let result = self.read_line()?;
            records.push(CommandRecord {
                cmd: cmd.clone(),
                result,
                elapsed: start.elapsed(),
            });
        }
        Ok(records)
    }

    ///Non-batched pass: write one command, read its answer, repeat.
    pub fn send_single(&mut self, cmd: &str) -> Result<CommandRecord, NgFecErrorKind> {
        let start = Instant::now();
        self.write_command(cmd)?;
        if self.link.flush().is_err() {
            return Err(NgFecErrorKind::HubWriteFailed);
        }
        let result = self.read_line()?;
        Ok(CommandRecord {
            cmd: cmd.to_owned(),
            result,
            elapsed: start.elapsed(),
        })
    }

    ///Full pass over a command list. Each response is parsed with the strict
    ///regex and checked against the bracket-derived expected count; a
    ///mismatch resends that single command expanded, in non-batched mode,
    ///and reparses with the loose pass. A hub-side ERROR or a retry that
    ///still mismatches yields the sentinel list.
    pub fn collect_readings(&mut self, cmds: &[String]) -> Result<Vec<Reading>, NgFecErrorKind> {
        let records = self.send_commands(cmds)?;
        let mut readings = Vec::with_capacity(cmds.len());
        for record in records {
            let expected = expected_count(&record.cmd);
            let values = if parselib::is_error(&record.result) {
                log::warn!("***Hub***: '{}' answered with an error. Substituting {} placeholder values.", record.cmd, expected);
                parselib::sentinel_values(expected)
            } else {
                let strict = parselib::strict_floats(&record.result);
                if strict.len() == expected {
                    strict
                } else {
                    log::warn!("***Hub***: expected {} values for '{}', parsed {}. Resending in non-batched mode.", expected, record.cmd, strict.len());
                    self.retry_single(&record.cmd, expected)?
                }
            };
            readings.push(Reading {
                kind: VariableKind::classify(&record.cmd),
                cmd: record.cmd,
                values,
            });
        }
        Ok(readings)
    }

    fn retry_single(&mut self, cmd: &str, expected: usize) -> Result<Vec<f64>, NgFecErrorKind> {
        let mut values = Vec::with_capacity(expected);
        for sub in expand_first_range(cmd) {
            let record = self.send_single(&sub)?;
            if parselib::is_error(&record.result) {
                break;
            }
            values.extend(parselib::loose_floats(&record.result));
        }
        if values.len() == expected {
            Ok(values)
        } else {
            log::warn!("***Hub***: retry of '{}' still parsed {} of {} values. Substituting placeholders.", cmd, values.len(), expected);
            Ok(parselib::sentinel_values(expected))
        }
    }
}
