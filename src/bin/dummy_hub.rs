use ngfec_mon::commandlib::{expected_count, VariableKind};
use ngfec_mon::constlib::HB_PORT;
use clap::Parser;
use rand_distr::{Normal, Distribution};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

///Stands in for the ngFEC control hub on the bench: answers every command
///line with an echo plus plausible values, so the toolkit can be exercised
///without powered hardware.
#[derive(Parser, Debug)]
#[command(name = "dummy_hub")]
struct Args {
    ///Port to listen on
    #[arg(short = 'p', long, default_value_t = HB_PORT)]
    port: u16,
    ///Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
}

///Typical operating points per variable, wiggled with a Normal spread.
fn operating_point(kind: VariableKind) -> Option<(f64, f64)> {
    match kind {
        VariableKind::Temperature => Some((26.0, 0.5)),
        VariableKind::Humidity => Some((12.0, 1.5)),
        VariableKind::PeltierVoltage => Some((4.2, 0.1)),
        VariableKind::PeltierCurrent => Some((0.6, 0.05)),
        VariableKind::LeakageCurrent => Some((10.0, 2.0)),
        VariableKind::BiasVoltageIn => Some((67.0, 0.5)),
        VariableKind::VoltageIn => Some((10.0, 0.2)),
        VariableKind::Other => None,
    }
}

fn respond(cmd: &str) -> String {
    if !cmd.starts_with("get") {
        return format!("{} # OK", cmd);
    }
    let (mean, spread) = match operating_point(VariableKind::classify(cmd)) {
        Some(point) => point,
        None => return format!("{} # ERROR: no such register", cmd),
    };
    let normal = Normal::new(mean, spread).expect("spread is positive");
    let values: Vec<String> = (0..expected_count(cmd))
        .map(|_| format!("{:.2}", normal.sample(&mut rand::thread_rng())))
        .collect();
    format!("{} # {}", cmd, values.join(" "))
}

fn serve(sock: TcpStream) -> std::io::Result<()> {
    let mut writer = sock.try_clone()?;
    for line in BufReader::new(sock).lines() {
        let cmd = line?;
        let cmd = cmd.trim();
        if cmd.is_empty() {
            continue;
        }
        writer.write_all(respond(cmd).as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let listener = TcpListener::bind(format!("{}:{}", args.bind, args.port)).expect("Could not bind to the requested port.");
    println!("***Dummy Hub***: listening at {}:{}.", args.bind, args.port);
    for sock in listener.incoming() {
        match sock {
            Ok(sock) => {
                log::info!("***Dummy Hub***: client connected at {:?}.", sock.peer_addr());
                if let Err(e) = serve(sock) {
                    println!("***Dummy Hub***: client dropped: {:?}.", e);
                }
            },
            Err(e) => println!("***Dummy Hub***: failed accept: {:?}.", e),
        }
    }
}
