use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use racs_core::catalog::ids::{RuleId, UnknownIdError};
use racs_core::catalog::presets::{Architecture, LevelFilter};
use racs_core::exec::context::{RunContext, RunOptions};
use racs_core::exec::registry::EntryRegistry;
use racs_core::exec::runner::RuleRunner;
use racs_core::platform::Platform;
use racs_core::platform::read::read_profile;
use racs_core::platform::sim::SimPlatform;
use racs_core::report::model::{PlatformInfo, Report, SelectionsInfo, ToolInfo};
use racs_core::report::render;
use racs_core::select::Selections;
use racs_core::select::filter::filter_rule_list;
use racs_core::suite::register_entries;

mod args;

fn main() {
    let args = args::Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(2);
        }
    }
}

fn run(args: &args::Args) -> Result<i32> {
    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let context = read_profile(&args.description_path)?;
    let (profile, description) = context.into_parts();

    let kind = profile.kind;
    let platform_info = PlatformInfo::new(&profile, description);
    let platform: Arc<dyn Platform> =
        Arc::new(SimPlatform::new(profile).context("booting simulated platform")?);

    let selections = build_selections(args)?;
    let run_list = filter_rule_list(&selections);
    let selections_info = SelectionsInfo::new(&selections, &run_list);
    info!(
        architectures = ?selections_info.architectures,
        level = %selections_info.level,
        views = ?selections.view,
        skipped_rules = selections.skip_rules.len(),
        skipped_modules = selections.skip_modules.len(),
        candidates = run_list.len(),
        "resolved rule selections"
    );

    let mut registry = EntryRegistry::new();
    register_entries(&mut registry);

    let options = RunOptions::for_platform(kind).with_timeout_multiplier(args.timeout_mult);
    let runner = RuleRunner::new(&platform, &registry, &selections, options);
    let mut ctx = RunContext::new();
    let records = runner.run_rules(&run_list, &mut ctx);

    let report = Report::new(
        tool,
        platform_info,
        selections_info,
        &records,
        ctx.defects().to_vec(),
    );

    let output = match args.format {
        args::OutputFormat::Text => render::render_text(&report),
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    match &args.out {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{output}"),
    }

    Ok(report.summary.exit_code())
}

fn build_selections(args: &args::Args) -> Result<Selections> {
    let archs = args.archs.iter().map(|arch| arch.to_core()).collect();
    let mut selections = Selections::new(archs);

    if let Some(rules_path) = &args.rules {
        selections.rules = Some(read_rule_list(rules_path)?);
    }
    selections.skip_rules = parse_ids(&args.skip, "rule id in --skip");
    selections.modules = parse_ids(&args.modules, "module in --module");
    selections.skip_modules = parse_ids(&args.skip_modules, "module in --skip-module");

    if let Some(exact) = args.only {
        selections.level = LevelFilter::Exact(exact);
    } else if let Some(max) = args.level {
        selections.level = LevelFilter::Max(max);
    }
    selections.include_future = args.fr;

    if let Some(view) = args.view_mask() {
        if selections.archs.contains(&Architecture::Bsa) {
            selections.view = view;
        } else {
            warn!("--os/--hyp/--ps only apply to BSA rules; ignoring view flags");
        }
    }

    Ok(selections)
}

/// Parse a list of identifier tokens. Unknown tokens are logged and
/// dropped rather than aborting the run.
fn parse_ids<T>(tokens: &[String], what: &str) -> BTreeSet<T>
where
    T: FromStr<Err = UnknownIdError> + Ord,
{
    let mut ids = BTreeSet::new();
    for token in tokens {
        match token.parse() {
            Ok(id) => {
                ids.insert(id);
            }
            Err(err) => warn!(%err, "ignoring unknown {what}"),
        }
    }
    ids
}

/// Read an explicit rule list: ids separated by commas or newlines,
/// `#` starts a comment, blank lines are ignored. Unknown ids are
/// logged and dropped.
fn read_rule_list(path: &Path) -> Result<Vec<RuleId>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rule list: {}", path.display()))?;

    let mut rules = Vec::new();
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("");
        for token in line.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<RuleId>() {
                Ok(rule) => rules.push(rule),
                Err(err) => warn!(%err, file = %path.display(), "ignoring unknown rule id"),
            }
        }
    }
    Ok(rules)
}

fn init_tracing(verbosity: u8) {
    let default_filter = if verbosity == 0 { "info" } else { "trace" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
