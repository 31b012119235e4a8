// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use serde_json::json;
use std::env;
use std::sync::Arc;
use framestack::backends::local::LocalProcessorFactory;
use framestack::config::{load_and_validate_config, ProcessorRegistry};
use framestack::data::boundary::normalize_legacy;
use framestack::engine::{InMemoryUsage, ProcessorContext, StackOutcome, StackRunner};
use framestack::observability::init_tracing;
use framestack::traits::TracingProgress;

const DEFAULT_VIDEO: &str = "sample.mp4";

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <config.yaml> <stack-id> [video]", args[0]);
        eprintln!("Example: {} configs/best-frame.yaml best-frame clip.mp4", args[0]);
        std::process::exit(2);
    }

    let video = args.get(3).map(String::as_str).unwrap_or(DEFAULT_VIDEO);
    match run(&args[1], &args[2], video).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Run one stack; `Ok(false)` means the stack itself failed.
async fn run(config_path: &str, stack_id: &str, video: &str) -> anyhow::Result<bool> {
    let mut registry = ProcessorRegistry::new();
    LocalProcessorFactory::register_all(&mut registry)?;

    let config = load_and_validate_config(config_path, &registry)
        .with_context(|| format!("loading {}", config_path))?;
    let template = config.template(stack_id)?;

    let usage = Arc::new(InMemoryUsage::new());
    let work_dir = env::temp_dir().join(format!("framestack-{}", stack_id));
    let ctx = ProcessorContext::new(format!("{}-{}", stack_id, std::process::id()), work_dir)
        .with_progress(Arc::new(TracingProgress))
        .with_config(json!({ "concurrency": config.runner.concurrency() }))
        .with_usage(usage.clone());

    let initial = normalize_legacy(json!({ "video": video }))?;
    let runner = StackRunner::new(Arc::new(registry));

    println!("🚀 Running stack '{}' ({} steps)", template.name, template.steps.len());
    let outcome = runner.execute(template, initial, &ctx).await?;

    println!("\n📊 Timing summary:");
    for summary in ctx.timer.summary().await {
        println!(
            "  {:<20} count={:<4} total={:?} mean={:?}",
            summary.name,
            summary.count,
            summary.total,
            summary.mean()
        );
    }
    for (provider, units) in usage.totals() {
        println!("  usage {:<14} {}", provider, units);
    }

    match &outcome {
        StackOutcome::Completed { data, .. } => {
            println!("\n✅ Stack completed:");
            println!("{}", serde_json::to_string_pretty(&data.to_json())?);
            Ok(true)
        }
        StackOutcome::Failed(failure) => {
            match &failure.failed_at {
                Some(step) => eprintln!(
                    "\n❌ Stack failed at step {} ('{}'): {}",
                    step.index + 1,
                    step.processor_id,
                    failure.error
                ),
                None => eprintln!("\n❌ Stack rejected: {}", failure.error),
            }
            Ok(false)
        }
    }
}
