use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use flow_packer_core::config::{
    FlowConfig, HorizontalAlignment, LineAlignment, Spacing, VerticalAlignment,
};
use flow_packer_core::measure::{ChipMetrics, RECIPE_CATEGORIES, measure_items};
use flow_packer_core::model::{Item, PackResult};
use flow_packer_core::pipeline::LayoutItem;
use flow_packer_core::preview::{PreviewOptions, save_preview};
use flow_packer_core::{pack, pack_widths};
use globset::{Glob, GlobSetBuilder};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "flow-packer",
    about = "Lay out items into wrapped lines (tag chips, thumbnails)",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out image files (measured by their pixel size) or an item list (.json/.yaml)
    Layout(LayoutArgs),
    /// Lay out text chips measured with a fixed-advance estimate
    Chips(ChipsArgs),
    /// Simple timing bench on random items (packs repeatedly, prints time + stats)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// Input image file, directory, or item list file (.json/.yaml with [{key, w, h}])
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,
    /// Scale applied to image pixel sizes before layout (e.g. 0.25 for thumbnails)
    #[arg(long, default_value_t = 1.0, help_heading = "Input/Output")]
    image_scale: f64,
    #[command(flatten)]
    opts: LayoutOpts,
}

#[derive(Parser, Debug, Clone)]
struct ChipsArgs {
    /// Chip labels, in layout order
    #[arg(help_heading = "Input/Output")]
    labels: Vec<String>,
    /// Use the recipe catalog's category tags as labels
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    recipe_categories: bool,
    /// Advance per character
    #[arg(long, default_value_t = 7.5, help_heading = "Chip Metrics")]
    char_width: f64,
    /// Text line height
    #[arg(long, default_value_t = 16.0, help_heading = "Chip Metrics")]
    line_height: f64,
    /// Horizontal inner padding
    #[arg(long, default_value_t = 8.0, help_heading = "Chip Metrics")]
    chip_padding_x: f64,
    /// Vertical inner padding
    #[arg(long, default_value_t = 4.0, help_heading = "Chip Metrics")]
    chip_padding_y: f64,
    #[command(flatten)]
    opts: LayoutOpts,
}

#[derive(Args, Debug, Clone)]
struct LayoutOpts {
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name (files will be name.json/.png)
    #[arg(short, long, default_value = "flow", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Line width; omit (or 0) to wrap against the widest item
    #[arg(long, help_heading = "Layout")]
    max_width: Option<f64>,
    /// Gap between items on a line
    #[arg(long, default_value_t = 8.0, help_heading = "Layout")]
    spacing_x: f64,
    /// Gap between lines
    #[arg(long, default_value_t = 8.0, help_heading = "Layout")]
    spacing_y: f64,
    /// Horizontal line alignment: start|center|end (leading/trailing accepted)
    #[arg(long, default_value = "start", help_heading = "Layout")]
    align_h: String,
    /// Vertical alignment within a line: start|center|end (top/bottom accepted)
    #[arg(long, default_value = "start", help_heading = "Layout")]
    align_v: String,
    /// Named alignment (top_leading, center, bottom_trailing, ...); overrides --align-h/--align-v
    #[arg(long, help_heading = "Layout")]
    align: Option<String>,

    // Export
    /// Metadata format: json-array | json (alias) | json-hash | template
    #[arg(long, default_value = "json-array", help_heading = "Export")]
    metadata: String,
    /// Built-in template: svg | css | html
    #[arg(long, help_heading = "Export")]
    engine: Option<String>,
    /// External template file (handlebars), used when --metadata template
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Write a PNG preview (name.png)
    #[arg(long, default_value_t = false, help_heading = "Export")]
    preview: bool,
    /// Preview pixels per layout unit
    #[arg(long, default_value_t = 1.0, help_heading = "Export")]
    scale: f64,
    /// Draw red outlines in the preview
    #[arg(long, default_value_t = false, help_heading = "Export")]
    outlines: bool,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of random items
    #[arg(long, default_value_t = 1000)]
    count: usize,
    /// Smallest item side
    #[arg(long, default_value_t = 16.0)]
    min_size: f64,
    /// Largest item side
    #[arg(long, default_value_t = 120.0)]
    max_size: f64,
    /// Line width
    #[arg(long, default_value_t = 375.0)]
    max_width: f64,
    /// Packing passes to time
    #[arg(long, default_value_t = 100)]
    iterations: u32,
    /// RNG seed for reproducible inputs
    #[arg(long)]
    seed: Option<u64>,
    /// Also time a sweep over this many widths (80, 160, ...)
    #[arg(long, default_value_t = 0)]
    sweep: usize,
    /// Evaluate the sweep in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    let show_progress = cli.progress && !cli.quiet;
    match &cli.command {
        Commands::Layout(args) => run_layout(args, show_progress),
        Commands::Chips(args) => run_chips(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_layout(args: &LayoutArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(&args.opts)?;
    if args.opts.print_config {
        return print_config(&cfg, &args.opts.print_config_format);
    }
    let items = if is_item_list(&args.input) {
        let list = read_item_list(&args.input)?;
        info!(count = list.len(), "loaded item list");
        list
    } else {
        let paths = gather_paths(&args.input, &args.include, &args.exclude)?;
        let items = measure_images_with_progress(&paths, args.image_scale, show_progress)?;
        info!(count = items.len(), "measured input images");
        items
    };
    emit(&items, &cfg, &args.opts)
}

fn run_chips(args: &ChipsArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.opts)?;
    if args.opts.print_config {
        return print_config(&cfg, &args.opts.print_config_format);
    }
    let labels: Vec<String> = if args.recipe_categories || args.labels.is_empty() {
        RECIPE_CATEGORIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.labels.clone()
    };
    let metrics = ChipMetrics {
        char_width: args.char_width,
        line_height: args.line_height,
        padding: (args.chip_padding_x, args.chip_padding_y),
    };
    let items = measure_items(&labels, &metrics);
    info!(count = items.len(), "measured chips");
    emit(&items, &cfg, &args.opts)
}

fn emit(items: &[Item], cfg: &FlowConfig, opts: &LayoutOpts) -> anyhow::Result<()> {
    if !opts.dry_run {
        fs::create_dir_all(&opts.out_dir)
            .with_context(|| format!("create out_dir {}", opts.out_dir.display()))?;
    }

    let out = pack(items, cfg);
    let stats = out.stats();
    info!(
        items = stats.num_items,
        lines = stats.num_lines,
        width = stats.width,
        height = stats.height,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    match opts.metadata.as_str() {
        "json-array" | "json" => {
            let json_value = flow_packer_core::to_json_array(&out);
            write_json(opts, &json_value)?;
        }
        "json-hash" => {
            let json_value = flow_packer_core::to_json_hash(&out);
            write_json(opts, &json_value)?;
        }
        "template" => {
            let ctx = build_template_context(&out, &opts.name);
            let tpl_owned_from_file: Option<String> = if let Some(path) = &opts.template {
                Some(
                    fs::read_to_string(path)
                        .with_context(|| format!("read template {}", path.display()))?,
                )
            } else {
                None
            };
            let (tpl_ref, ext): (&str, &str) = if let Some(engine) = &opts.engine {
                match engine.to_ascii_lowercase().as_str() {
                    "svg" => (include_str!("templates/svg.hbs"), "svg"),
                    "css" => (include_str!("templates/css.hbs"), "css"),
                    "html" => (include_str!("templates/html.hbs"), "html"),
                    other => anyhow::bail!("unknown engine template: {}", other),
                }
            } else if let Some(ref s) = tpl_owned_from_file {
                (s.as_str(), "txt")
            } else {
                // default to svg if not specified
                (include_str!("templates/svg.hbs"), "svg")
            };

            let mut reg = Handlebars::new();
            reg.set_strict_mode(true);
            reg.register_template_string("tpl", tpl_ref)?;
            let rendered = reg.render("tpl", &ctx)?;

            if !opts.dry_run {
                let out_path = opts.out_dir.join(format!("{}.{}", opts.name, ext));
                fs::write(&out_path, rendered)
                    .with_context(|| format!("write {}", out_path.display()))?;
                info!(?out_path, "template written");
            }
        }
        other => anyhow::bail!("unknown metadata format: {}", other),
    }

    if opts.preview && !opts.dry_run {
        let png_path = opts.out_dir.join(format!("{}.png", opts.name));
        let preview_opts = PreviewOptions {
            scale: opts.scale,
            outlines: opts.outlines,
            ..Default::default()
        };
        save_preview(&out, &preview_opts, &png_path)
            .with_context(|| format!("write {}", png_path.display()))?;
        info!(?png_path, "wrote preview");
    }

    if let Some(stats_path) = &opts.export_stats {
        if !opts.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn write_json(opts: &LayoutOpts, value: &serde_json::Value) -> anyhow::Result<()> {
    if opts.dry_run {
        return Ok(());
    }
    let json_path = opts.out_dir.join(format!("{}.json", opts.name));
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, "layout written");
    Ok(())
}

fn print_config(cfg: &FlowConfig, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn build_config(opts: &LayoutOpts) -> anyhow::Result<FlowConfig> {
    let line_alignment = if let Some(named) = &opts.align {
        named.parse::<LineAlignment>()?
    } else {
        LineAlignment::new(
            opts.align_h.parse::<HorizontalAlignment>()?,
            opts.align_v.parse::<VerticalAlignment>()?,
        )
    };
    let mut cfg = FlowConfig {
        max_width: opts.max_width,
        spacing: Spacing::new(opts.spacing_x, opts.spacing_y),
        line_alignment,
        ..Default::default()
    };
    // Config file sets layout options en bloc
    if let Some(path) = &opts.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_flow_config(cfg)?;
    }
    cfg.validate()?;
    debug!(?cfg, "resolved config");
    Ok(cfg)
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use rand::{Rng, SeedableRng};
    if b.min_size > b.max_size {
        anyhow::bail!("--min-size must not exceed --max-size");
    }
    let mut rng = match b.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    let items: Vec<Item> = (0..b.count)
        .map(|i| {
            let w = rng.gen_range(b.min_size..=b.max_size);
            let h = rng.gen_range(b.min_size..=b.max_size);
            Item::new(format!("item_{}", i), w, h)
        })
        .collect();
    let cfg = FlowConfig::builder()
        .with_max_width(b.max_width)
        .parallel(b.parallel)
        .build();
    cfg.validate()?;

    let iterations = b.iterations.max(1);
    let start = Instant::now();
    let mut out = PackResult::empty();
    for _ in 0..iterations {
        out = pack(&items, &cfg);
    }
    let dur = start.elapsed() / iterations;
    println!("{} time={}/pass", out.stats().summary(), bench_fmt_dur(dur));

    if b.sweep > 0 {
        let widths: Vec<f64> = (1..=b.sweep).map(|i| i as f64 * 80.0).collect();
        let start = Instant::now();
        let results = pack_widths(&items, &cfg, &widths);
        let dur = start.elapsed();
        for (w, r) in &results {
            println!("width={:.0} lines={} height={:.1}", w, r.lines.len(), r.size.h);
        }
        println!("sweep widths={} time={}", widths.len(), bench_fmt_dur(dur));
    }
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn is_item_list(p: &Path) -> bool {
    p.is_file()
        && matches!(
            p.extension()
                .and_then(|e| e.to_str())
                .map(|s| s.to_ascii_lowercase()),
            Some(ext) if matches!(ext.as_str(), "json" | "yaml" | "yml")
        )
}

fn read_item_list(p: &Path) -> anyhow::Result<Vec<Item>> {
    let text = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let is_json = p
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let list: Vec<LayoutItem> = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse {}", p.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", p.display()))?
    };
    let items: Vec<Item> = list
        .into_iter()
        .map(|it| Item::new(it.key, it.w, it.h))
        .collect();
    flow_packer_core::validate_items(&items)?;
    Ok(items)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Reads image headers only; pixel data is never decoded.
fn measure_images_with_progress(
    paths: &[PathBuf],
    scale: f64,
    progress: bool,
) -> anyhow::Result<Vec<Item>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} measuring {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push(Item::new(key, w as f64 * scale, h as f64 * scale));
            }
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Serialize)]
struct TemplateItem {
    name: String,
    frame: serde_json::Value,
    center: serde_json::Value,
    line: usize,
    clamped: bool,
    color: String,
}

#[derive(Serialize)]
struct TemplateContext {
    title: String,
    size: serde_json::Value,
    radius: f64,
    font_size: f64,
    items: Vec<TemplateItem>,
}

fn build_template_context(out: &PackResult, title: &str) -> TemplateContext {
    let palette = PreviewOptions::default().palette;
    let items = out
        .frames
        .iter()
        .enumerate()
        .map(|(i, fr)| {
            let [r, g, b, _] = palette[i % palette.len()];
            TemplateItem {
                name: file_stem_or_key(&fr.key),
                frame: serde_json::json!({"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h}),
                center: serde_json::json!({
                    "x": fr.frame.x + fr.frame.w / 2.0,
                    "y": fr.frame.y + fr.frame.h / 2.0,
                }),
                line: fr.line,
                clamped: fr.clamped,
                color: format!("#{:02x}{:02x}{:02x}", r, g, b),
            }
        })
        .collect();
    TemplateContext {
        title: title.to_string(),
        size: serde_json::json!({"w": out.size.w, "h": out.size.h}),
        radius: 10.0,
        font_size: 13.0,
        items,
    }
}

/// Image keys are paths; templates show the file stem.
fn file_stem_or_key(key: &str) -> String {
    if key.contains('/') {
        Path::new(key)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(key)
            .to_string()
    } else {
        key.to_string()
    }
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_width: Option<f64>,
    spacing: Option<f64>,
    spacing_x: Option<f64>,
    spacing_y: Option<f64>,
    align: Option<String>,
    align_h: Option<String>,
    align_v: Option<String>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_flow_config(self, mut cfg: FlowConfig) -> anyhow::Result<FlowConfig> {
        if let Some(v) = self.max_width {
            cfg.max_width = Some(v);
        }
        if let Some(v) = self.spacing {
            cfg.spacing = Spacing::uniform(v);
        }
        if let Some(v) = self.spacing_x {
            cfg.spacing.horizontal = v;
        }
        if let Some(v) = self.spacing_y {
            cfg.spacing.vertical = v;
        }
        if let Some(v) = self.align {
            cfg.line_alignment = v.parse()?;
        }
        if let Some(v) = self.align_h {
            cfg.line_alignment.horizontal = v.parse()?;
        }
        if let Some(v) = self.align_v {
            cfg.line_alignment.vertical = v.parse()?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
