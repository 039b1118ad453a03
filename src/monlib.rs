//!`monlib` is a collection of tools to run periodic monitoring passes over
//!the control hub link.
use crate::errorlib::NgFecErrorKind;
use crate::auxiliar::value_types::*;
use crate::commandlib::Reading;
use crate::hublib::{HubClient, HubLink};
use crate::loglib::{self, LogSchema};
use std::{thread, time};
use indicatif::{ProgressBar, ProgressStyle};

///One poll: collect every command's readings and append the log row.
pub fn monitor_pass<T: HubLink>(
    client: &mut HubClient<T>,
    cmds: &[String],
    schema: &LogSchema,
    log_file: &str,
) -> Result<Vec<Reading>, NgFecErrorKind> {
    let readings = client.collect_readings(cmds)?;
    loglib::append_entry(log_file, schema, &readings)?;
    Ok(readings)
}

///How many polls a timed run performs, one every `step` seconds.
pub fn passes_planned(total_time: SECS, step: SECS) -> usize {
    if total_time == 0 {
        return 1;
    }
    let step = step.max(1);
    ((total_time + step - 1) / step) as usize
}

///Polls until `total_time` elapses, sleeping `step` seconds between passes
///but never after the final one. A zero `total_time` means a single pass.
pub fn monitor_for<T: HubLink>(
    client: &mut HubClient<T>,
    cmds: &[String],
    schema: &LogSchema,
    log_file: &str,
    total_time: SECS,
    step: SECS,
) -> Result<usize, NgFecErrorKind> {
    if total_time == 0 {
        monitor_pass(client, cmds, schema, log_file)?;
        return Ok(1);
    }
    let step = step.max(1);
    let bar = ProgressBar::new(total_time);
    bar.set_style(ProgressStyle::with_template("[{elapsed_precise}] {bar:40.white/black} {pos:>5}/{len:5} s [ETA: {eta}] Monitoring")
                  .expect("valid progress template")
                  .progress_chars("=>-"));
    let mut passes = 0;
    let mut runtime: SECS = 0;
    loop {
        monitor_pass(client, cmds, schema, log_file)?;
        passes += 1;
        runtime += step;
        if runtime >= total_time {
            break;
        }
        thread::sleep(time::Duration::from_secs(step));
        bar.inc(step);
    }
    bar.finish();
    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commandlib::expected_count;
    use std::io::{Read, Write};

    //Echoing stand-in for the hub socket, enough for a single pass.
    struct EchoHub {
        out: Vec<u8>,
    }

    impl Write for EchoHub {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let text = String::from_utf8_lossy(buf).into_owned();
            for cmd in text.lines().filter(|l| !l.trim().is_empty()) {
                let values: Vec<String> = (0..expected_count(cmd)).map(|i| format!("2{}.00", i)).collect();
                self.out.extend_from_slice(format!("{} # {}\n", cmd, values.join(" ")).as_bytes());
            }
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Read for EchoHub {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let size = self.out.len().min(buf.len());
            buf[..size].copy_from_slice(&self.out[..size]);
            self.out.drain(..size);
            Ok(size)
        }
    }

    impl HubLink for EchoHub {}

    #[test]
    fn passes_planned_rounds_up() {
        assert_eq!(passes_planned(0, 20), 1);
        assert_eq!(passes_planned(240, 20), 12);
        assert_eq!(passes_planned(250, 20), 13);
        assert_eq!(passes_planned(10, 0), 10);
    }

    #[test]
    fn a_pass_appends_one_row() {
        let path = std::env::temp_dir().join(format!("ngfec_monlib_{}.log", std::process::id()));
        let path = path.to_str().expect("temp path is utf8").to_owned();
        let _ = std::fs::remove_file(&path);

        let cmds = vec!["get HB[1-4]-adc58_f".to_owned()];
        let schema = LogSchema::from_commands(&cmds);
        let mut client = HubClient::new(EchoHub { out: Vec::new() });
        let readings = monitor_pass(&mut client, &cmds, &schema, &path).unwrap();
        assert_eq!(readings[0].values.len(), 4);

        let (_, entries) = loglib::read_log(&path, None, None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].values[0].len(), 4);
        let _ = std::fs::remove_file(&path);
    }
}
