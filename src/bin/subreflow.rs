use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use subreflow::{
    DeeplTranslator, Formality, ProgressCallback, ProgressInfo, ReflowOptions, SizeMetric, Stage,
    SubtitleFile,
    configuration::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE},
    subtitle::{find_subtitle_file, translated_path},
};

const CLI_AFTER_HELP: &str = "Examples:\n  subreflow translate movie.srt --from NL --to FR\n  subreflow translate --to EN --max-lines 2 --max-line-length 42 --progress\n  subreflow segment movie.srt --json\n  subreflow validate movie.srt\n  subreflow completions zsh > _subreflow";

#[derive(Debug, Parser)]
#[command(
    name = "subreflow",
    version,
    about = "Translate subtitles sentence by sentence and reflow them onto the original timing",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress indicator where supported.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long, global = true)]
    overwrite: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Translate a subtitle file and reflow it onto the original blocks.
    #[command(
        about = "Translate and reflow a subtitle file",
        after_help = "Examples:\n  subreflow translate movie.srt --to EN\n  subreflow translate movie.srt --to DE --formality more --metric words --out movie.de.srt"
    )]
    Translate {
        /// Input subtitle file. Defaults to the first .srt file in the
        /// current directory.
        input: Option<PathBuf>,
        /// Output file. Defaults to the input with a `.<to>.srt` extension.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Source language code.
        #[arg(short, long, default_value = DEFAULT_SOURCE_LANGUAGE)]
        from: String,
        /// Target language code.
        #[arg(short, long, default_value = DEFAULT_TARGET_LANGUAGE)]
        to: String,
        /// Formality: default | more | less.
        #[arg(long, default_value = "default")]
        formality: String,
        /// Maximum lines per block. Defaults to the most lines in any source block.
        #[arg(long)]
        max_lines: Option<usize>,
        /// Maximum characters per line. Defaults to the longest source line.
        #[arg(long)]
        max_line_length: Option<usize>,
        /// Block size metric: chars | words.
        #[arg(long, default_value = "chars")]
        metric: String,
        /// DeepL authentication key.
        #[arg(long, env = "DEEPL_AUTH_KEY", hide_env_values = true)]
        auth_key: String,
        /// Override the DeepL endpoint.
        #[arg(long, env = "DEEPL_API_URL")]
        api_url: Option<String>,
    },

    /// Print the sentences that would be sent for translation.
    #[command(
        about = "Show reconstructed sentences",
        after_help = "Examples:\n  subreflow segment movie.srt\n  subreflow segment movie.srt --json"
    )]
    Segment {
        /// Input subtitle file.
        input: PathBuf,
        /// Output sentences as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate a subtitle file and print a report.
    #[command(
        about = "Validate subtitle file",
        after_help = "Examples:\n  subreflow validate movie.srt"
    )]
    Validate {
        /// Input subtitle file.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_metric(value: &str) -> Option<SizeMetric> {
    match value.to_ascii_lowercase().as_str() {
        "chars" | "characters" | "char" => Some(SizeMetric::Characters),
        "words" | "word" => Some(SizeMetric::Words),
        _ => None,
    }
}

fn parse_formality(value: &str) -> Option<Formality> {
    match value.to_ascii_lowercase().as_str() {
        "default" => Some(Formality::Default),
        "more" | "formal" => Some(Formality::More),
        "less" | "informal" => Some(Formality::Less),
        _ => None,
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match input {
        Some(path) => Ok(path),
        None => find_subtitle_file(".")?
            .ok_or_else(|| "no input given and no .srt file found in the current directory".into()),
    }
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        match info.stage {
            Stage::Segmentation => self.bar.set_message("segmenting"),
            Stage::Translation => {
                self.bar.set_message("translating");
                self.bar.enable_steady_tick(Duration::from_millis(100));
            }
            Stage::Placement => self.bar.set_message("placing"),
            _ => {}
        }
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.global);

    match cli.command {
        Commands::Translate {
            input,
            out,
            from,
            to,
            formality,
            max_lines,
            max_line_length,
            metric,
            auth_key,
            api_url,
        } => {
            let formality = parse_formality(&formality)
                .ok_or(format!("unsupported --formality: {formality}"))?;
            let metric =
                parse_metric(&metric).ok_or(format!("unsupported --metric: {metric}"))?;

            let input = resolve_input(input)?;
            let out = out.unwrap_or_else(|| translated_path(&input, &to));

            println!("Input file: {}", input.display());
            println!("Output file: {}", out.display());
            println!("From language: {from}");
            println!("To language: {to}");

            ensure_writable_path(&out, cli.global.overwrite)?;

            let file = SubtitleFile::open(&input)?;
            let report = file.validate();
            if !report.is_valid() {
                eprint!("{report}");
                return Err(format!("{} is not usable", input.display()).into());
            }

            let mut options = ReflowOptions::new()
                .with_source_language(&from)
                .with_target_language(&to)
                .with_formality(formality)
                .with_metric(metric);
            if let Some(lines) = max_lines {
                options = options.with_max_lines(lines);
            }
            if let Some(length) = max_line_length {
                options = options.with_max_line_length(length);
            }
            let progress = cli.global.progress.then(|| Arc::new(TerminalProgress::new()));
            if let Some(progress) = &progress {
                options = options.with_progress(progress.clone());
            }

            let translator = match &api_url {
                Some(url) => DeeplTranslator::with_api_url(&auth_key, url)?,
                None => DeeplTranslator::new(&auth_key)?,
            };

            let result = file.reflow(&translator, &options);
            if let Some(progress) = &progress {
                progress.finish();
            }
            let reflow = result?;

            if reflow.summary.exhausted {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    "translation outgrew the source timing; the last block holds the overflow"
                        .yellow()
                );
            }

            reflow.save(&out, true)?;
            println!("{} {}", "saved".green().bold(), out.display());
        }
        Commands::Segment { input, json } => {
            let file = SubtitleFile::open(&input)?;
            let sentences = file.sentences();
            if json {
                let payload: Vec<_> = sentences
                    .iter()
                    .map(|sentence| {
                        json!({
                            "text": sentence.text,
                            "provenance": sentence.provenance,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                for sentence in &sentences {
                    let start = sentence
                        .start()
                        .map(|timestamp| timestamp.as_str())
                        .unwrap_or("-");
                    println!(
                        "{} {} ({} blocks)",
                        start.cyan(),
                        sentence.text,
                        sentence.provenance.len()
                    );
                }
            }
        }
        Commands::Validate { input } => {
            let file = SubtitleFile::open(&input)?;
            let report = file.validate();
            print!("{report}");
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "subreflow", &mut std::io::stdout());
        }
    }
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_formality, parse_metric, resolve_input};
    use subreflow::{Formality, SizeMetric, subtitle::translated_path};

    #[test]
    fn parse_metric_aliases() {
        assert_eq!(parse_metric("chars"), Some(SizeMetric::Characters));
        assert_eq!(parse_metric("Characters"), Some(SizeMetric::Characters));
        assert_eq!(parse_metric("words"), Some(SizeMetric::Words));
        assert!(parse_metric("lines").is_none());
    }

    #[test]
    fn parse_formality_aliases() {
        assert_eq!(parse_formality("default"), Some(Formality::Default));
        assert_eq!(parse_formality("MORE"), Some(Formality::More));
        assert_eq!(parse_formality("informal"), Some(Formality::Less));
        assert!(parse_formality("polite").is_none());
    }

    #[test]
    fn explicit_input_is_kept() {
        let input = resolve_input(Some("episode.srt".into())).unwrap();
        assert_eq!(input, Path::new("episode.srt"));
    }

    #[test]
    fn default_output_path_uses_target_language() {
        let out = translated_path(Path::new("dir/movie.srt"), "FR");
        assert_eq!(out, Path::new("dir/movie.fr.srt"));
    }
}
