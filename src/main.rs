use ngfec_mon::errorlib::NgFecErrorKind;
use ngfec_mon::auxiliar::{misc, Settings};
use ngfec_mon::auxiliar::value_types::*;
use ngfec_mon::commandlib::load_command_list;
use ngfec_mon::loglib::LogSchema;
use ngfec_mon::{hublib, monlib};
use clap::Parser;

///Sends a list of ngFEC commands to the control hub and appends the parsed
///readings to the data log.
#[derive(Parser, Debug)]
#[command(name = "ngfec_auto")]
struct Args {
    ///Text file containing the list of ngFEC commands
    cmds: String,
    ///Data log file to append readings to
    #[arg(short = 'o', long = "log")]
    log: Option<String>,
    ///Control hub host
    #[arg(long)]
    host: Option<String>,
    ///Control hub port
    #[arg(short = 'p', long)]
    port: Option<u16>,
    ///Total measurement time in seconds. Zero runs a single pass
    #[arg(short = 't', long = "time")]
    time: Option<SECS>,
    ///Seconds between readings
    #[arg(short = 's', long)]
    step: Option<SECS>,
    ///JSON settings file, applied before the flags
    #[arg(long)]
    config: Option<String>,
}

impl Args {
    fn to_settings(&self) -> Result<Settings, NgFecErrorKind> {
        let mut settings = match &self.config {
            Some(file) => Settings::get_settings_from_json(file)?,
            None => Settings::default(),
        };
        if let Some(log) = &self.log {
            settings.log_file = log.clone();
        }
        if let Some(host) = &self.host {
            settings.control_hub = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(time) = self.time {
            settings.total_time = time;
        }
        if let Some(step) = self.step {
            settings.step = step;
        }
        Ok(settings)
    }
}

fn connect_and_run(args: &Args) -> Result<usize, NgFecErrorKind> {
    let settings = args.to_settings()?;
    let cmd_list = load_command_list(&args.cmds)?;
    let schema = LogSchema::from_commands(&cmd_list);
    let mut client = hublib::connect(&settings)?;

    let date = misc::full_stamp();
    println!("-------------------------------------");
    println!("| ngFEC output:\t{} |", date);
    println!("-------------------------------------");

    if settings.total_time == 0 {
        let readings = monlib::monitor_pass(&mut client, &cmd_list, &schema, &settings.log_file)?;
        for reading in &readings {
            println!("{}", reading.cmd);
            for val in &reading.values {
                println!("{}", val);
            }
        }
        Ok(1)
    } else {
        println!("total time: {}", settings.total_time);
        monlib::monitor_for(&mut client, &cmd_list, &schema, &settings.log_file, settings.total_time, settings.step)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match connect_and_run(&args) {
        Ok(passes) => {
            println!("***ngFEC***: {} monitoring pass(es) appended to the log.", passes);
        },
        Err(e) => {
            println!("Error in monitoring. Error message: {:?}.", e);
            std::process::exit(1);
        },
    }
}
