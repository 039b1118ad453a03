use ngfec_mon::errorlib::NgFecErrorKind;
use ngfec_mon::constlib::IMAGE_DIR;
use ngfec_mon::{loglib, plotlib};
use clap::Parser;
use rayon::prelude::*;

///Parses a data log and renders every variable as a line graph plus a
///histogram, with an entries/mean/std-dev summary per variable.
#[derive(Parser, Debug)]
#[command(name = "stat_plot")]
struct Args {
    ///Data log file written by ngfec_auto
    log: String,
    ///First data row to keep (zero-based)
    #[arg(short = 'n', long)]
    min: Option<usize>,
    ///Row to stop before
    #[arg(short = 'x', long)]
    max: Option<usize>,
    ///Directory the PNG files go to
    #[arg(long, default_value = IMAGE_DIR)]
    out_dir: String,
}

fn run(args: &Args) -> Result<(), NgFecErrorKind> {
    let (schema, entries) = loglib::read_log(&args.log, args.min, args.max)?;
    println!("***Stat Plot***: {} rows read from {}.", entries.len(), args.log);

    let all_series = plotlib::series_from_log(&schema, &entries);
    all_series
        .par_iter()
        .map(|series| {
            if let Some(graph) = plotlib::draw_graph(series, &args.out_dir)? {
                println!("***Stat Plot***: wrote {}.", graph);
            }
            match plotlib::draw_histogram(series, &args.out_dir) {
                Ok(histo) => println!("***Stat Plot***: wrote {}.", histo),
                //a variable whose every reading failed has nothing to bin
                Err(NgFecErrorKind::PlotNoEntries) => {
                    println!("***Stat Plot***: no valid readings for {}, histogram skipped.", series.name);
                },
                Err(e) => return Err(e),
            }
            Ok(())
        })
        .collect::<Result<Vec<()>, NgFecErrorKind>>()?;

    for series in &all_series {
        match series.stats() {
            Some(stats) => println!(
                "{:<10} entries {:>6}  mean {:>10.4}  std dev {:>10.4}",
                series.name, stats.entries, stats.mean, stats.std_dev
            ),
            None => println!("{:<10} no valid readings", series.name),
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        println!("Error in plotting. Error message: {:?}.", e);
        std::process::exit(1);
    }
}
