mod builder;
mod cli;
mod config;
mod report;
mod telemetry;

use std::{path::Path, sync::Mutex};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use frame_ingest::{load_frame, synthetic_frame};
use pipeline_core::{
    BatchTags, DefectResult, Frame, Pipeline, PixelFormat, run_batch_parallel_indexed, run_single,
};
use tracing::{info, warn};

use crate::{
    cli::Args,
    config::PipelineConfig,
    report::{Report, StageTiming},
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let _telemetry = telemetry::enter_runtime(&args.telemetry());

    let config = PipelineConfig::resolve(args.config.as_deref(), &args.overrides())?;
    let pipeline = builder::build_pipeline(&config).context("failed to build pipeline")?;
    info!(
        stages = ?pipeline.stage_names().collect::<Vec<_>>(),
        inputs = args.inputs.len(),
        "pipeline ready"
    );

    if args.inputs.is_empty() {
        let frame = synthetic_frame(320, 240, PixelFormat::Rgb8)?;
        return run_one(&pipeline, &frame, None, &args, &config);
    }

    let mut sources = Vec::with_capacity(args.inputs.len());
    let mut frames = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match load_frame(path) {
            Ok(frame) => {
                sources.push(path.as_path());
                frames.push(frame);
            }
            Err(err) => warn!("skipping input: {err}"),
        }
    }

    match frames.as_slice() {
        [] => bail!("none of the {} input(s) could be loaded", args.inputs.len()),
        [frame] => run_one(&pipeline, frame, Some(sources[0]), &args, &config),
        _ => run_many(&pipeline, &frames, &sources, &args, &config),
    }
}

fn run_one(
    pipeline: &Pipeline,
    frame: &Frame,
    source: Option<&Path>,
    args: &Args,
    config: &PipelineConfig,
) -> Result<()> {
    let mut raw_timings = Vec::new();
    let mut record = |index: usize, ms: f64| raw_timings.push((index, ms));
    let timing = if args.timings {
        Some(&mut record as &mut dyn FnMut(usize, f64))
    } else {
        None
    };

    let result = run_single(
        pipeline,
        frame,
        timing,
        args.camera_id.as_deref(),
        args.customer_id.as_deref(),
    )
    .with_context(|| match source {
        Some(path) => format!("pipeline failed on {}", path.display()),
        None => "pipeline failed on synthetic frame".to_string(),
    })?;

    let names: Vec<&str> = pipeline.stage_names().collect();
    let timings = raw_timings
        .into_iter()
        .map(|(index, ms)| StageTiming {
            index,
            stage: names.get(index).copied().unwrap_or("?").to_string(),
            ms,
        })
        .collect();

    let report =
        Report::new(source, &result, &config.high_value_categories).with_timings(timings);
    emit(&report, args)
}

fn run_many(
    pipeline: &Pipeline,
    frames: &[Frame],
    sources: &[&Path],
    args: &Args,
    config: &PipelineConfig,
) -> Result<()> {
    if args.timings {
        warn!("--timings only applies to single-frame runs");
    }

    let cameras = args.camera_id.as_ref().map(|id| vec![id.clone(); frames.len()]);
    let customers = args.customer_id.as_ref().map(|id| vec![id.clone(); frames.len()]);
    let tags = BatchTags::new(cameras.as_deref(), customers.as_deref());

    let collected: Mutex<Vec<(usize, DefectResult)>> = Mutex::new(Vec::new());
    run_batch_parallel_indexed(
        pipeline,
        frames,
        |index, result| {
            if let Ok(mut collected) = collected.lock() {
                collected.push((index, result));
            }
        },
        config.workers,
        tags,
    );

    let mut results = collected
        .into_inner()
        .map_err(|_| anyhow!("result collector poisoned"))?;
    results.sort_by_key(|(index, _)| *index);

    let mut next = 0;
    for (index, result) in &results {
        for skipped in &sources[next..*index] {
            warn!("no result for {}", skipped.display());
        }
        next = index + 1;
        let report = Report::new(Some(sources[*index]), result, &config.high_value_categories);
        emit(&report, args)?;
    }
    for skipped in &sources[next..] {
        warn!("no result for {}", skipped.display());
    }

    info!(
        processed = results.len(),
        failed = frames.len() - results.len(),
        "batch finished"
    );
    Ok(())
}

fn emit(report: &Report<'_>, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    match report.write_to(&args.output_dir) {
        Ok(Some(path)) => info!("wrote {}", path.display()),
        Ok(None) => {}
        Err(err) => warn!(
            "could not write report to {}: {err}",
            args.output_dir.display()
        ),
    }
    Ok(())
}
