use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use racs_core::catalog::presets::{Architecture, ViewMask};

#[derive(Debug, Parser)]
#[command(
    name = "racs",
    version,
    about = "Rule-based architecture compliance suite"
)]
pub struct Args {
    /// Path to the platform description (JSON)
    pub description_path: PathBuf,

    /// Architectures to run; repeatable or comma separated
    #[arg(long = "arch", value_delimiter = ',', default_value = "bsa")]
    pub archs: Vec<ArchArg>,

    /// File with one rule id per line; `#` starts a comment
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Rule ids to exclude, comma separated
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Restrict the run to these modules, comma separated
    #[arg(long = "module", value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Modules to exclude, comma separated
    #[arg(long = "skip-module", value_delimiter = ',')]
    pub skip_modules: Vec<String>,

    /// Highest compliance level to run
    #[arg(long, conflicts_with = "only")]
    pub level: Option<u8>,

    /// Run exactly one compliance level
    #[arg(long)]
    pub only: Option<u8>,

    /// Include future requirements
    #[arg(long)]
    pub fr: bool,

    /// Keep only rules relevant to the operating system view
    #[arg(long)]
    pub os: bool,

    /// Keep only rules relevant to the hypervisor view
    #[arg(long)]
    pub hyp: bool,

    /// Keep only rules relevant to the platform security view
    #[arg(long)]
    pub ps: bool,

    /// Multiply the multi-PE wait bound, for slow machines
    #[arg(long = "timeout-mult", default_value_t = 1)]
    pub timeout_mult: u32,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,

    /// Trace-level execution logging
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// View mask from the --os/--hyp/--ps flags. `None` when no flag
    /// was given and every view stays in.
    pub fn view_mask(&self) -> Option<ViewMask> {
        [
            (self.os, ViewMask::OS),
            (self.hyp, ViewMask::HYP),
            (self.ps, ViewMask::PS),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, mask)| mask)
        .reduce(ViewMask::or)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArchArg {
    Bsa,
    Sbsa,
    Pcbsa,
}

impl ArchArg {
    pub fn to_core(self) -> Architecture {
        match self {
            ArchArg::Bsa => Architecture::Bsa,
            ArchArg::Sbsa => Architecture::Sbsa,
            ArchArg::Pcbsa => Architecture::Pcbsa,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
