use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use skycontour::pipeline::{BatchReport, EventInput, Pipeline, RingOutcome};
use skycontour::region::EventRecord;
use skycontour::{PipelineCfg, ResampleCfg, Smoothing, SplineCfg};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

#[derive(Parser)]
#[command(name = "skycontour")]
#[command(about = "Clean sky-localization contours into web-ready region records")]
struct Cmd {
    /// Log every per-ring decision
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Clean all events and write `{ident: record}` JSON plus a provenance sidecar
    Process {
        /// JSON array of events: {"ident", "peak_gps", "features": [[[x, y], ...], ...]}
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Exit non-zero if any ring was malformed
        #[arg(long)]
        strict: bool,
        #[command(flatten)]
        tune: TuneArgs,
    },
    /// Print per-ring area and keep/drop decisions without writing anything
    Check {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        tune: TuneArgs,
    },
    /// Print a provenance block and the default configuration
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Resample,
    Spline,
}

/// Configuration file plus per-flag overrides.
#[derive(Args, Debug, Default)]
struct TuneArgs {
    /// JSON file with a `PipelineCfg`; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Minimum kept area (deg²)
    #[arg(long)]
    area_cutoff: Option<f64>,
    /// Assumed source-grid resolution (deg), resample strategy only
    #[arg(long)]
    resolution: Option<f64>,
    /// Hamming window length, resample strategy only
    #[arg(long)]
    window_size: Option<usize>,
    /// Minimum distinct output points, resample strategy only
    #[arg(long)]
    min_points: Option<usize>,
    /// Residual budget (deg²), spline strategy only
    #[arg(long)]
    smoothing: Option<f64>,
}

impl TuneArgs {
    fn resolve(&self) -> Result<PipelineCfg> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<PipelineCfg>(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => PipelineCfg::default(),
        };
        match (self.strategy, cfg.smoothing) {
            (Some(StrategyArg::Resample), Smoothing::Spline(_)) => {
                cfg.smoothing = Smoothing::Resample(ResampleCfg::default())
            }
            (Some(StrategyArg::Spline), Smoothing::Resample(_)) => {
                cfg.smoothing = Smoothing::Spline(SplineCfg::default())
            }
            _ => {}
        }
        if let Some(a) = self.area_cutoff {
            cfg.area_cutoff = a;
        }
        match &mut cfg.smoothing {
            Smoothing::Resample(r) => {
                if self.smoothing.is_some() {
                    bail!("--smoothing applies to the spline strategy only");
                }
                if let Some(v) = self.resolution {
                    r.assumed_resolution = v;
                }
                if let Some(v) = self.window_size {
                    r.window_size = v;
                }
                if let Some(v) = self.min_points {
                    r.min_points = v;
                }
            }
            Smoothing::Spline(s) => {
                if self.resolution.is_some() || self.window_size.is_some() || self.min_points.is_some()
                {
                    bail!("--resolution/--window-size/--min-points apply to the resample strategy only");
                }
                if let Some(v) = self.smoothing {
                    s.smoothing = v;
                }
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Process {
            input,
            out,
            strict,
            tune,
        } => process(&input, &out, strict, &tune),
        Action::Check { input, tune } => check(&input, &tune),
        Action::Report => report(),
    }
}

fn read_events(path: &Path) -> Result<Vec<EventInput>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing events in {}", path.display()))
}

/// Records keyed by ident; a repeated ident keeps the later record.
fn records_by_ident(batch: &BatchReport) -> BTreeMap<String, &EventRecord> {
    let mut map = BTreeMap::new();
    for rec in batch.records() {
        if map.insert(rec.ident.clone(), rec).is_some() {
            tracing::warn!(ident = %rec.ident, "duplicate event ident; keeping the later one");
        }
    }
    map
}

fn process(input: &Path, out: &Path, strict: bool, tune: &TuneArgs) -> Result<()> {
    let cfg = tune.resolve()?;
    tracing::info!(input = %input.display(), out = %out.display(), cfg = ?cfg, "process");
    let events = read_events(input)?;
    let pipeline = Pipeline::new(cfg)?;
    let batch = pipeline.process_batch(&events);
    let summary = batch.summary();

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let body = serde_json::to_vec(&records_by_ident(&batch))?;
    std::fs::write(out, body).with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(json!({
        "input": input.to_string_lossy(),
        "config": cfg,
        "strict": strict,
    }))
    .with_summary(serde_json::to_value(summary)?);
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(
        events = summary.events,
        regions = summary.regions,
        dropped = summary.dropped,
        skipped = summary.skipped,
        failed_rings = summary.failed_rings,
        failed_events = summary.failed_events,
        provenance = %prov.display(),
        "done"
    );

    if !batch.failures.is_empty() {
        let names: Vec<String> = batch
            .failures
            .iter()
            .map(|f| format!("#{} ({:?}): {}", f.index, f.ident, f.error))
            .collect();
        bail!("{} event(s) failed: {}", names.len(), names.join("; "));
    }
    if strict && summary.failed_rings > 0 {
        bail!("{} malformed ring(s) in strict mode", summary.failed_rings);
    }
    Ok(())
}

/// One line per feature, one line per failed event.
fn render_check(batch: &BatchReport) -> String {
    let mut s = String::new();
    for ev in &batch.events {
        let ident = &ev.record.ident;
        for r in &ev.rings {
            let tag = format!("{}+{}", ident, r.feature + 1);
            let _ = match &r.outcome {
                RingOutcome::Kept {
                    area,
                    points_in,
                    points_out,
                } => writeln!(
                    s,
                    "kept {tag}: A={area:.1} points {points_in} -> {points_out}"
                ),
                RingOutcome::Dropped { area } => writeln!(s, "skipping {tag}: A={area:.1}"),
                RingOutcome::Skipped { reason } => writeln!(s, "degenerate {tag}: {reason}"),
                RingOutcome::Failed { error } => writeln!(s, "malformed {tag}: {error}"),
            };
        }
    }
    for f in &batch.failures {
        let _ = writeln!(s, "failed event #{} ({:?}): {}", f.index, f.ident, f.error);
    }
    s
}

fn check(input: &Path, tune: &TuneArgs) -> Result<()> {
    let cfg = tune.resolve()?;
    tracing::info!(input = %input.display(), cfg = ?cfg, "check");
    let events = read_events(input)?;
    let batch = Pipeline::new(cfg)?.process_batch(&events);
    print!("{}", render_check(&batch));
    println!("{}", serde_json::to_string(&batch.summary())?);
    Ok(())
}

fn report() -> Result<()> {
    let mut obj = provenance::header();
    obj["config"] = serde_json::to_value(PipelineCfg::default())?;
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn square(x0: f64, side: f64) -> Vec<[f64; 2]> {
        vec![
            [x0, 0.0],
            [x0, side],
            [x0 + side, side],
            [x0 + side, 0.0],
            [x0, 0.0],
        ]
    }

    fn write_events(dir: &Path) -> PathBuf {
        let events = json!([
            {"ident": "GW150914", "peak_gps": 1126259462,
             "features": [square(0.0, 8.0), square(20.0, 1.0)]},
            {"ident": "GW151226", "peak_gps": 1135136350, "features": []}
        ]);
        let path = dir.join("events.json");
        std::fs::write(&path, serde_json::to_vec(&events).unwrap()).unwrap();
        path
    }

    #[test]
    fn tune_defaults_and_overrides() {
        let cfg = TuneArgs::default().resolve().unwrap();
        assert_eq!(cfg, PipelineCfg::default());

        let tune = TuneArgs {
            strategy: Some(StrategyArg::Spline),
            smoothing: Some(0.25),
            area_cutoff: Some(3.0),
            ..TuneArgs::default()
        };
        let cfg = tune.resolve().unwrap();
        assert_eq!(cfg.area_cutoff, 3.0);
        assert_eq!(cfg.smoothing, Smoothing::Spline(SplineCfg { smoothing: 0.25 }));

        let bad = TuneArgs {
            strategy: Some(StrategyArg::Spline),
            window_size: Some(9),
            ..TuneArgs::default()
        };
        assert!(bad.resolve().is_err());

        let invalid = TuneArgs {
            resolution: Some(0.0),
            ..TuneArgs::default()
        };
        assert!(invalid.resolve().is_err());
    }

    #[test]
    fn tune_reads_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{"area_cutoff": 20.0, "smoothing": {"strategy": "resample", "min_points": 12}}"#,
        )
        .unwrap();
        let tune = TuneArgs {
            config: Some(path),
            window_size: Some(7),
            ..TuneArgs::default()
        };
        let cfg = tune.resolve().unwrap();
        assert_eq!(cfg.area_cutoff, 20.0);
        assert_eq!(
            cfg.smoothing,
            Smoothing::Resample(ResampleCfg {
                min_points: 12,
                window_size: 7,
                ..ResampleCfg::default()
            })
        );
    }

    #[test]
    fn process_writes_records_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = write_events(dir.path());
        let out = dir.path().join("app").join("bootstrap_data.json");
        process(&input, &out, false, &TuneArgs::default()).unwrap();

        let parsed: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed["GW150914"]["peak_gps"], 1126259462);
        let regions = parsed["GW150914"]["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 1);
        let contour = regions[0]["contours"]["68"].as_array().unwrap();
        assert!(contour.len() >= 9);
        assert_eq!(contour[0], contour[contour.len() - 1]);
        assert!(parsed["GW151226"]["regions"].as_array().unwrap().is_empty());

        let prov = dir.path().join("app").join("bootstrap_data.provenance.json");
        let prov: Value = serde_json::from_slice(&std::fs::read(prov).unwrap()).unwrap();
        assert_eq!(prov["summary"]["regions"], 1);
        assert_eq!(prov["summary"]["dropped"], 1);
    }

    #[test]
    fn process_fails_on_missing_metadata_after_writing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("events.json");
        std::fs::write(
            &input,
            r#"[{"ident": "GW170104", "features": []}, {"ident": "GW170608", "peak_gps": 1180922494}]"#,
        )
        .unwrap();
        let out = dir.path().join("out.json");
        let err = process(&input, &out, false, &TuneArgs::default()).unwrap_err();
        assert!(err.to_string().contains("peak_gps"));
        let parsed: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert!(parsed.get("GW170608").is_some());
        assert!(parsed.get("GW170104").is_none());
    }

    #[test]
    fn strict_mode_rejects_malformed_rings() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("events.json");
        std::fs::write(
            &input,
            r#"[{"ident": "GW170729", "peak_gps": 1185389807, "features": [[[0, 0], [1, 1]]]}]"#,
        )
        .unwrap();
        let out = dir.path().join("out.json");
        assert!(process(&input, &out, false, &TuneArgs::default()).is_ok());
        assert!(process(&input, &out, true, &TuneArgs::default()).is_err());
    }

    #[test]
    fn check_lines_name_each_feature() {
        let dir = tempdir().unwrap();
        let input = write_events(dir.path());
        let events = read_events(&input).unwrap();
        let batch = Pipeline::new(PipelineCfg::default())
            .unwrap()
            .process_batch(&events);
        let text = render_check(&batch);
        assert!(text.contains("kept GW150914+1: A=64.0"));
        assert!(text.contains("skipping GW150914+2: A=1.0"));
        assert_eq!(text.lines().count(), 2);
    }
}
