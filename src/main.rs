use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Read;
use std::path::PathBuf;

use quest_dialogue::config::{load_config_from_file, Config};
use quest_dialogue::pipeline::run_pipeline;
use quest_dialogue::{classify_line, DialogueStructurer};

#[derive(Parser, Debug)]
#[command(name = "quest-dialogue", version, about = "Structure quest dialogue sections into typed segments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Structure every quest in a JSON export
    Structure {
        /// TOML config; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write one flattened row per segment
        #[arg(long)]
        rows: Option<PathBuf>,
        #[arg(long)]
        dialogue_key: Option<String>,
        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Structure one raw dialogue text (file or stdin) and print the segments
    Segment { file: Option<PathBuf> },
    /// Print the segment type of each line
    Classify {
        #[arg(required = true)]
        lines: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Structure {
            config,
            input,
            output,
            rows,
            dialogue_key,
            compact,
        } => {
            let mut config = match (config, input, output) {
                (Some(path), input, output) => {
                    let mut loaded = load_config_from_file(&path)
                        .with_context(|| format!("loading {}", path.display()))?;
                    if let Some(input) = input {
                        loaded.input_path = input;
                    }
                    if let Some(output) = output {
                        loaded.output_path = output;
                    }
                    loaded
                }
                (None, Some(input), Some(output)) => Config::new(input, output),
                (None, _, _) => bail!("either --config or both --input and --output are required"),
            };
            if rows.is_some() {
                config.rows_output_path = rows;
            }
            if let Some(key) = dialogue_key {
                config.dialogue_key = key;
            }
            if compact {
                config.pretty = false;
            }

            let summary = run_pipeline(&config).context("structuring quests")?;
            info!("Done: {:?}", summary);
        }
        Command::Segment { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading stdin")?;
                    buf
                }
            };
            let segments = DialogueStructurer::new().process(Some(text.as_str()));
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        Command::Classify { lines } => {
            for line in &lines {
                let segment_type = classify_line(line);
                println!("{}\t{}", segment_type, segment_type.prefix());
            }
        }
    }
    Ok(())
}
