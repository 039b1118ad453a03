//!`plotlib` is a collection of tools to render the collected values as line
//!graphs and histograms, one PNG per variable.
use crate::errorlib::NgFecErrorKind;
use crate::auxiliar::value_types::*;
use crate::commandlib::VariableKind;
use crate::constlib::*;
use crate::loglib::{LogEntry, LogSchema};
use std::path::Path;
use plotters::prelude::*;

///One variable's worth of a log: per-channel value tracks plus the
///timestamp labels shared by every track.
#[derive(Clone, Debug)]
pub struct VariableSeries {
    pub name: String,
    pub kind: VariableKind,
    pub stamps: Vec<(String, String)>, //(date, time) per entry
    pub channels: Vec<Vec<READING>>,   //channels[ch][entry]
}

///Entries/mean/std-dev, the stat box of the old plots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub entries: usize,
    pub mean: READING,
    pub std_dev: READING,
}

///Regroups log rows into per-variable, per-channel tracks.
pub fn series_from_log(schema: &LogSchema, entries: &[LogEntry]) -> Vec<VariableSeries> {
    let stamps: Vec<(String, String)> = entries.iter().map(|e| (e.date.clone(), e.time.clone())).collect();
    schema
        .columns
        .iter()
        .enumerate()
        .map(|(col, spec)| {
            let mut channels = vec![Vec::with_capacity(entries.len()); spec.channels];
            for entry in entries {
                for (ch, val) in entry.values[col].iter().enumerate() {
                    channels[ch].push(*val);
                }
            }
            VariableSeries {
                name: spec.name.clone(),
                kind: VariableKind::from_short_name(spec.name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '_')),
                stamps: stamps.clone(),
                channels,
            }
        })
        .collect::<Vec<_>>()
}

impl VariableSeries {
    ///Every value except the placeholders substituted for failed commands.
    fn valid_values(&self) -> Vec<READING> {
        self.channels
            .iter()
            .flatten()
            .copied()
            .filter(|v| *v != SENTINEL_READING)
            .collect()
    }

    pub fn stats(&self) -> Option<Stats> {
        let values = self.valid_values();
        if values.is_empty() {
            return None;
        }
        let n = values.len() as READING;
        let mean = values.iter().sum::<READING>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<READING>() / n;
        Some(Stats { entries: values.len(), mean, std_dev: var.sqrt() })
    }

    fn series_label(&self, ch: CHANNEL) -> String {
        if self.channels.len() == RM_SLOTS {
            format!("RM{}", ch + 1)
        } else {
            format!("CH{}", ch + 1)
        }
    }

    ///X tick text: full date + time when the date changes, time alone otherwise.
    fn stamp_label(&self, idx: usize) -> String {
        match self.stamps.get(idx) {
            Some((date, time)) => {
                let new_day = idx == 0 || self.stamps[idx - 1].0 != *date;
                if new_day {
                    format!("{} {}", date, time)
                } else {
                    time.clone()
                }
            }
            None => String::new(),
        }
    }
}

fn backend_err<E: std::fmt::Debug>(e: E) -> NgFecErrorKind {
    NgFecErrorKind::PlotBackend(format!("{:?}", e))
}

///Multi-series line graph of one variable over the log entries. Variables
///with more channels than fit a readable legend only get the histogram.
pub fn draw_graph(series: &VariableSeries, out_dir: &str) -> Result<Option<String>, NgFecErrorKind> {
    if series.stamps.is_empty() || series.channels.is_empty() {
        return Err(NgFecErrorKind::PlotNoEntries);
    }
    if series.channels.len() > MAX_GRAPH_SERIES {
        return Ok(None);
    }
    std::fs::create_dir_all(out_dir)?;
    let out = Path::new(out_dir)
        .join(format!("{}_graphs.png", series.name))
        .to_string_lossy()
        .into_owned();

    let all: Vec<READING> = series.channels.iter().flatten().copied().collect();
    let lo = all.iter().cloned().fold(READING::INFINITY, READING::min);
    let hi = all.iter().cloned().fold(READING::NEG_INFINITY, READING::max);
    let pad = series.kind.range_pad();
    let last = (series.stamps.len().max(2) - 1) as f64;

    let root = BitMapBackend::new(&out, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(series.kind.title(), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0_f64..last, (lo - pad)..(hi + pad))
        .map_err(backend_err)?;
    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(series.kind.unit())
        .x_labels(series.stamps.len().min(12))
        .x_label_formatter(&|x| series.stamp_label(x.round() as usize))
        .draw()
        .map_err(backend_err)?;

    for (ch, track) in series.channels.iter().enumerate() {
        let color = Palette99::pick(ch).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                track.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                color.clone(),
            ))
            .map_err(backend_err)?
            .label(series.series_label(ch))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.clone()));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(backend_err)?;
    root.present().map_err(backend_err)?;
    drop(chart);
    drop(root);
    Ok(Some(out))
}

///Bin layout shared by the drawing code and the tests: padded range plus a
///count per bin. Placeholder values never fill a bin.
pub fn histogram_bins(values: &[READING], pad: READING, nbins: usize) -> Option<(READING, READING, Vec<usize>)> {
    let valid: Vec<READING> = values.iter().copied().filter(|v| *v != SENTINEL_READING).collect();
    if valid.is_empty() || nbins == 0 {
        return None;
    }
    let lo = valid.iter().cloned().fold(READING::INFINITY, READING::min) - pad;
    let hi = valid.iter().cloned().fold(READING::NEG_INFINITY, READING::max) + pad;
    let width = (hi - lo) / nbins as READING;
    let mut counts = vec![0_usize; nbins];
    for val in valid {
        let bin = (((val - lo) / width) as usize).min(nbins - 1);
        counts[bin] += 1;
    }
    Some((lo, hi, counts))
}

///Histogram of every channel of every entry for one variable.
pub fn draw_histogram(series: &VariableSeries, out_dir: &str) -> Result<String, NgFecErrorKind> {
    let all: Vec<READING> = series.channels.iter().flatten().copied().collect();
    let (lo, hi, counts) = match histogram_bins(&all, series.kind.range_pad(), HISTOGRAM_BINS) {
        Some(bins) => bins,
        None => return Err(NgFecErrorKind::PlotNoEntries),
    };
    std::fs::create_dir_all(out_dir)?;
    let out = Path::new(out_dir)
        .join(format!("{}_histo.png", series.name))
        .to_string_lossy()
        .into_owned();

    let top = counts.iter().max().copied().unwrap_or(0) + 1;
    let width = (hi - lo) / HISTOGRAM_BINS as READING;

    let root = BitMapBackend::new(&out, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(backend_err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(series.kind.title(), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0_usize..top)
        .map_err(backend_err)?;
    chart
        .configure_mesh()
        .x_desc(series.kind.unit())
        .y_desc("Entries")
        .draw()
        .map_err(backend_err)?;
    chart
        .draw_series(counts.iter().enumerate().map(|(bin, count)| {
            let x0 = lo + bin as READING * width;
            Rectangle::new([(x0, 0), (x0 + width, *count)], RED.filled())
        }))
        .map_err(backend_err)?;
    root.present().map_err(backend_err)?;
    drop(chart);
    drop(root);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loglib::ColumnSpec;

    fn two_row_log() -> (LogSchema, Vec<LogEntry>) {
        let schema = LogSchema {
            columns: vec![
                ColumnSpec { name: "temp".to_owned(), channels: 2 },
                ColumnSpec { name: "hum".to_owned(), channels: 1 },
            ],
        };
        let entries = vec![
            LogEntry {
                date: "2026-08-04".to_owned(),
                time: "10:00:00".to_owned(),
                values: vec![vec![26.0, 27.0], vec![12.5]],
            },
            LogEntry {
                date: "2026-08-05".to_owned(),
                time: "10:00:20".to_owned(),
                values: vec![vec![26.2, 27.2], vec![-1.0]],
            },
        ];
        (schema, entries)
    }

    #[test]
    fn series_are_transposed_per_channel() {
        let (schema, entries) = two_row_log();
        let series = series_from_log(&schema, &entries);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].channels, vec![vec![26.0, 26.2], vec![27.0, 27.2]]);
        assert_eq!(series[0].kind, VariableKind::Temperature);
        assert_eq!(series[1].kind, VariableKind::Humidity);
    }

    #[test]
    fn suffixed_groups_map_back_to_their_kind() {
        let schema = LogSchema {
            columns: vec![
                ColumnSpec { name: "temp".to_owned(), channels: 1 },
                ColumnSpec { name: "temp_2".to_owned(), channels: 1 },
            ],
        };
        let entries = vec![LogEntry {
            date: "2026-08-05".to_owned(),
            time: "10:00:00".to_owned(),
            values: vec![vec![26.0], vec![27.0]],
        }];
        let series = series_from_log(&schema, &entries);
        assert_eq!(series[1].kind, VariableKind::Temperature);
    }

    #[test]
    fn stats_exclude_sentinels() {
        let (schema, entries) = two_row_log();
        let series = series_from_log(&schema, &entries);
        let hum = series[1].stats().unwrap();
        assert_eq!(hum.entries, 1);
        assert!((hum.mean - 12.5).abs() < 1e-9);
        assert!(hum.std_dev.abs() < 1e-9);
    }

    #[test]
    fn stamp_labels_show_date_on_change() {
        let (schema, entries) = two_row_log();
        let series = series_from_log(&schema, &entries);
        assert_eq!(series[0].stamp_label(0), "2026-08-04 10:00:00");
        assert_eq!(series[0].stamp_label(1), "2026-08-05 10:00:20");
    }

    #[test]
    fn histogram_counts_every_valid_value() {
        let values = vec![1.0, 1.0, 2.0, -1.0];
        let (lo, hi, counts) = histogram_bins(&values, 0.05, 20).unwrap();
        assert!(lo < 1.0 && hi > 2.0);
        assert_eq!(counts.iter().sum::<usize>(), 3);
        assert_eq!(counts[0], 2);
        assert_eq!(counts[19], 1);
    }

    #[test]
    fn histogram_of_sentinels_is_empty() {
        assert!(histogram_bins(&[-1.0, -1.0], 0.05, 20).is_none());
    }
}
