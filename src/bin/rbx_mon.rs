use ngfec_mon::errorlib::NgFecErrorKind;
use ngfec_mon::auxiliar::{simple_log, Settings};
use ngfec_mon::auxiliar::value_types::*;
use ngfec_mon::commandlib::load_command_list;
use ngfec_mon::constlib::*;
use ngfec_mon::loglib::LogSchema;
use ngfec_mon::{hublib, monlib};
use clap::{Parser, ValueEnum};

///Runs the scripted Peltier tests against one readout box: apply an action
///command list, then poll the monitoring commands between actions, appending
///every pass to the data log and every action to the action log.
#[derive(Parser, Debug)]
#[command(name = "rbx_mon")]
struct Args {
    ///Test type
    #[arg(short = 't', long, value_enum, default_value = "monitor")]
    test: TestType,
    ///Step time in seconds between readings
    #[arg(short = 's', long, default_value_t = POLL_STEP)]
    step: SECS,
    ///Interval time in seconds between actions
    #[arg(short = 'i', long, default_value_t = POLL_INTERVAL)]
    interval: SECS,
    ///Readout box name (HB0, HE0, ...). Selects port and channel count
    #[arg(short = 'r', long, default_value = "HB0")]
    rbx: String,
    ///Control hub host
    #[arg(long)]
    host: Option<String>,
    ///Current read from the power supply
    #[arg(short = 'c', long)]
    current: Option<READING>,
    ///Voltage read from the power supply
    #[arg(short = 'v', long)]
    voltage: Option<READING>,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum TestType {
    Disable,
    Set,
    Scan,
    Monitor,
}

///Action command files and log names for each test, the way the old shifts
///ran them.
fn test_plan(test: TestType) -> (&'static str, &'static str, Vec<String>, Vec<String>) {
    match test {
        TestType::Disable => (
            "Disable Peltier Test",
            "disable_peltier.log",
            vec!["enablePeltier.txt".to_owned(), "disablePeltier.txt".to_owned(), "enablePeltier.txt".to_owned()],
            vec!["Enabling Peltiers".to_owned(), "Disabling Peltiers".to_owned(), "Enabling Peltiers".to_owned()],
        ),
        TestType::Set => (
            "Set Temperature Test",
            "set_temperature.log",
            vec!["set_temp_18.txt".to_owned(), "set_temp_5.txt".to_owned(), "set_temp_18.txt".to_owned()],
            vec!["Set temperature to 18.0 deg C".to_owned(), "Set temperature to 5.0 deg C".to_owned(), "Set temperature to 18.0 deg C".to_owned()],
        ),
        TestType::Scan => (
            "Scan Peltier Voltage Test",
            "scan_voltage.log",
            (0..8).map(|i| format!("set_voltage_{}.txt", i)).collect(),
            (0..8).map(|i| format!("Set Peltier Voltage to {}V", i)).collect(),
        ),
        TestType::Monitor => (
            "Monitor Values",
            "monitor.log",
            Vec::new(),
            vec!["Read values".to_owned()],
        ),
    }
}

fn run(args: &Args) -> Result<(), NgFecErrorKind> {
    //power-supply bookkeeping is a separate, manual branch
    match (args.voltage, args.current) {
        (Some(voltage), Some(current)) => {
            let mut psl = simple_log::start(POWER_SUPPLY_LOG)?;
            simple_log::note(&mut psl, &format!("{} {}", voltage, current))?;
            return Ok(());
        },
        (None, None) => {},
        _ => return Err(NgFecErrorKind::SetPowerSupplyPair),
    }

    let (port, _channels) = Settings::rbx_layout(&args.rbx)?;
    let mut settings = Settings::default();
    settings.port = port;
    settings.step = args.step;
    if let Some(host) = &args.host {
        settings.control_hub = host.clone();
    }

    let (test_name, action_log, cmd_files, actions) = test_plan(args.test);
    let data_log = format!("{}_{}", &args.rbx[..2], action_log);
    let monitor_cmds = load_command_list(&format!("{}commandList.txt", &args.rbx[..2]))?;
    let schema = LogSchema::from_commands(&monitor_cmds);

    println!("Step time: {}", args.step);
    println!("Interval time: {}", args.interval);
    let mut log = simple_log::start(action_log)?;
    simple_log::note(&mut log, &format!("Starting {}", test_name))?;

    let mut client = hublib::connect(&settings)?;
    for (i, action) in actions.iter().enumerate() {
        simple_log::note(&mut log, action)?;
        if let Some(cmd_file) = cmd_files.get(i) {
            let action_cmds = load_command_list(cmd_file)?;
            for record in client.send_commands(&action_cmds)? {
                println!("{}", record.result);
            }
        }
        monlib::monitor_for(&mut client, &monitor_cmds, &schema, &data_log, args.interval, args.step)?;
    }

    simple_log::note(&mut log, &format!("Finishing {}", test_name))?;
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        println!("Error in test sequence. Error message: {:?}.", e);
        if let Ok(mut log) = simple_log::start("rbx_mon_errors.log") {
            let _ = simple_log::error(&mut log, e);
        }
        std::process::exit(1);
    }
}
