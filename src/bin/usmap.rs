use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use usmap_rs::{LoadOptions, MapPlotter, PlotConfigUpdate, RejectReason, ScaleType, Style};

#[derive(Parser, Debug)]
#[command(
    name = "usmap",
    version,
    about = "Validate, summarize & map US state-level data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a choropleth map (.html, .svg or .png).
    Plot(PlotArgs),
    /// Print summary statistics and rejected-row counts.
    Stats(InputArgs),
    /// Write the cleaned code,name,value table (.csv or .json).
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScaleArg {
    Linear,
    Log,
    Custom,
}

impl From<ScaleArg> for ScaleType {
    fn from(s: ScaleArg) -> Self {
        match s {
            ScaleArg::Linear => ScaleType::Linear,
            ScaleArg::Log => ScaleType::Log,
            ScaleArg::Custom => ScaleType::Custom,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Professional,
    Light,
    Dark,
    Colorblind,
}

impl From<StyleArg> for Style {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Professional => Style::Professional,
            StyleArg::Light => Style::Light,
            StyleArg::Dark => Style::Dark,
            StyleArg::Colorblind => Style::Colorblind,
        }
    }
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input table (.csv, .xlsx, .xls or .ods).
    input: PathBuf,
    /// Name of the column holding two-letter state codes (auto-detected if omitted).
    #[arg(long)]
    state_column: Option<String>,
    /// Name of the numeric value column (auto-detected if omitted).
    #[arg(long)]
    value_column: Option<String>,
}

impl InputArgs {
    fn load(&self, config: PlotConfigUpdate) -> Result<MapPlotter> {
        let mut opts = LoadOptions::new().config(config);
        if let Some(c) = &self.state_column {
            opts = opts.state_column(c);
        }
        if let Some(c) = &self.value_column {
            opts = opts.value_column(c);
        }
        MapPlotter::from_path_with(&self.input, &opts)
            .with_context(|| format!("loading {}", self.input.display()))
    }
}

#[derive(Args, Debug)]
struct PlotArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output path; the format follows the extension (unknown → HTML).
    #[arg(short, long)]
    out: PathBuf,
    /// Chart title.
    #[arg(long)]
    title: Option<String>,
    /// Color scale name (e.g. Blues, Viridis, RdYlGn).
    #[arg(long)]
    color_scheme: Option<String>,
    #[arg(long, value_enum)]
    scale: Option<ScaleArg>,
    /// Bin edges for `--scale custom`, comma separated (e.g. 0,10,20,50).
    #[arg(long)]
    bins: Option<String>,
    #[arg(long, value_enum)]
    style: Option<StyleArg>,
    /// Label shown in tooltips and above the color bar.
    #[arg(long)]
    value_label: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long, default_value_t = false)]
    reverse_scale: bool,
    /// Draw states without data in the missing color.
    #[arg(long, default_value_t = false)]
    show_missing: bool,
    #[arg(long)]
    missing_color: Option<String>,
    /// JSON file with configuration keys; command-line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print the summary block.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output path (.csv or .json).
    #[arg(short, long)]
    out: PathBuf,
}

fn parse_bins(s: &str) -> Result<Vec<f64>> {
    s.split([',', ';'])
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| {
            x.parse::<f64>()
                .with_context(|| format!("invalid bin edge `{x}`"))
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn config_from_flags(args: &PlotArgs) -> Result<PlotConfigUpdate> {
    let mut update = match &args.config {
        Some(p) => PlotConfigUpdate::from_json_file(p)?,
        None => PlotConfigUpdate::new(),
    };
    let mut flags = PlotConfigUpdate {
        color_scheme: args.color_scheme.clone(),
        scale_type: args.scale.map(Into::into),
        style: args.style.map(Into::into),
        title: args.title.clone(),
        value_label: args.value_label.clone(),
        width: args.width,
        height: args.height,
        missing_color: args.missing_color.clone(),
        ..Default::default()
    };
    if args.reverse_scale {
        flags.reverse_scale = Some(true);
    }
    if args.show_missing {
        flags.show_missing = Some(true);
    }
    if let Some(b) = &args.bins {
        flags.custom_bins = Some(parse_bins(b)?);
        // Bins imply a custom scale unless one was chosen.
        if flags.scale_type.is_none() && update.scale_type.is_none() {
            flags.scale_type = Some(ScaleType::Custom);
        }
    }
    update = update.overlay(flags);
    Ok(update)
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    let update = config_from_flags(&args)?;
    let plotter = args.input.load(update)?;
    if args.stats {
        print!("{}", plotter.summary());
    }
    let (_, written) = plotter
        .plot(Some(args.out.as_path()))
        .with_context(|| format!("plotting to {}", args.out.display()))?;
    if let Some(p) = written {
        eprintln!("Wrote map to {}", p.display());
    }
    Ok(())
}

fn cmd_stats(args: InputArgs) -> Result<()> {
    let plotter = args.load(PlotConfigUpdate::new())?;
    print!("{}", plotter.summary());
    let report = plotter.report();
    println!("Rows read: {}", report.total_rows);
    if report.is_clean() {
        println!("Rejected rows: 0");
    } else {
        println!("Rejected rows: {}", report.rejected.len());
        for (reason, n) in report.by_reason() {
            println!("  {:<18} {}", format!("{reason}:"), n);
        }
        let dups = report.count(RejectReason::DuplicateCode);
        if dups > 0 {
            eprintln!("Note: {dups} duplicate rows ignored; the first valid row per state is kept.");
        }
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let plotter = args.input.load(PlotConfigUpdate::new())?;
    plotter
        .export_data(&args.out)
        .with_context(|| format!("exporting to {}", args.out.display()))?;
    eprintln!(
        "Saved {} rows to {}",
        plotter.entries().len(),
        args.out.display()
    );
    Ok(())
}
