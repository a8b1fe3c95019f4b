use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use libzhuyin::payload::{key_suggestions_reply, phrase_suggestions_reply, word_to_zhuyin_reply};
use libzhuyin::{
    build_pipeline, render_columns, run_lines, spawn_server, vertical_layout, DictionaryClient,
    LineOutcome, PhraseMatch, PhrasePipeline, PhraseSuggestion, SeededRng, Service, ZhuyinConfig,
};

#[derive(Parser)]
#[command(name = "libzhuyin")]
#[command(about = "Look up Zhuyin readings and suggest four-character idioms")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at info level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Readings of a word from the dictionary
    Lookup {
        word: String,
        /// Print the JSON response body instead of text
        #[arg(long)]
        json: bool,
    },
    /// Idioms for a tone-free reading key, e.g. ㄨㄛ
    Suggest {
        key: String,
        #[arg(long)]
        json: bool,
    },
    /// Idioms sharing the reading of a single character
    Phrases {
        word: String,
        #[arg(long)]
        json: bool,
    },
    /// Draw a reading as vertical Zhuyin columns
    Vertical { reading: String },
    /// Shuffle the characters of a text with a seeded RNG
    Shuffle {
        text: String,
        /// Numeric or text seed; defaults to the text itself
        #[arg(long)]
        seed: Option<String>,
    },
    /// Serve the lookup API over HTTP
    Serve {
        /// Overrides `bind` from the config
        #[arg(long)]
        bind: Option<String>,
        /// Overrides `workers` from the config
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Interactive mode; each line is looked up as it is entered
    Repl,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ZhuyinConfig> {
    let mut config = match path {
        Some(p) => ZhuyinConfig::load_toml(p)
            .map_err(|e| anyhow::anyhow!("loading config {}: {}", p.display(), e))?,
        None => ZhuyinConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

fn print_matches(matches: &[PhraseMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            let positions: Vec<String> = m.positions.iter().map(|p| p.to_string()).collect();
            format!("{}@{}", m.char, positions.join(","))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_suggestions(suggestions: &[PhraseSuggestion]) {
    for (i, s) in suggestions.iter().enumerate() {
        println!("{}. {}  [{}]", i + 1, s.text, print_matches(&s.matches));
    }
}

fn handle_lookup(config: &ZhuyinConfig, word: &str, json: bool) -> Result<()> {
    let client = DictionaryClient::new(config)?;
    let result = client.lookup(word);
    if json {
        println!("{}", word_to_zhuyin_reply(word, result).body);
        return Ok(());
    }
    match result {
        Ok(reading) => {
            println!("{}", reading.word());
            for (i, r) in reading.readings().iter().enumerate() {
                let marker = if i == 0 { "*" } else { " " };
                println!("{} {}", marker, r);
            }
        }
        Err(e) => println!("{}: {}", e.code(), e.label()),
    }
    Ok(())
}

fn handle_suggest(config: &ZhuyinConfig, key: &str, json: bool) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let result = pipeline.suggest(key);
    if json {
        println!("{}", key_suggestions_reply(key, result).body);
        return Ok(());
    }
    match result {
        Ok(suggestions) => print_suggestions(&suggestions),
        Err(e) => println!("{}: {}", e.code(), e.label()),
    }
    Ok(())
}

fn handle_phrases(config: &ZhuyinConfig, word: &str, json: bool) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let result = pipeline.suggest_for_char(word);
    if json {
        println!("{}", phrase_suggestions_reply(word, result).body);
        return Ok(());
    }
    match result {
        Ok(found) => {
            println!("{} {} (key {})", found.word, found.zhuyin.join(" / "), found.key_no_tone);
            print_suggestions(&found.suggestions);
        }
        Err(e) => println!("{}: {}", e.code(), e.label()),
    }
    Ok(())
}

fn handle_shuffle(text: &str, seed: Option<&str>) {
    let seed = seed.unwrap_or(text);
    let mut rng = match seed.parse::<u32>() {
        Ok(n) => SeededRng::from_u32(n),
        Err(_) => SeededRng::from_str_seed(seed),
    };
    let mut chars: Vec<char> = text.chars().collect();
    rng.shuffle(&mut chars);
    println!("{}", chars.into_iter().collect::<String>());
}

fn handle_serve(mut config: ZhuyinConfig, bind: Option<String>, workers: Option<usize>) -> Result<()> {
    if let Some(b) = bind {
        config.bind = b;
    }
    if let Some(w) = workers {
        config.workers = w;
    }
    let service = Arc::new(Service::new(build_pipeline(&config)?));
    let handle = spawn_server(&config.bind, service, config.workers)?;
    eprintln!("listening on http://{}", handle.addr());
    handle.join();
    Ok(())
}

fn print_outcome(input: &str, outcome: LineOutcome) {
    println!("\nInput: '{}'", input);
    match outcome {
        LineOutcome::Phrases(Ok(found)) => {
            println!("  {} -> {}", found.best_guess.unwrap_or_default(), found.key_no_tone);
            print_suggestions(&found.suggestions);
        }
        LineOutcome::Reading(Ok(reading)) => {
            println!("  {}", reading.readings().join(" / "));
        }
        LineOutcome::Phrases(Err(e)) | LineOutcome::Reading(Err(e)) => {
            println!("  {}", e.label());
        }
    }
}

fn run_repl(pipeline: PhrasePipeline<DictionaryClient>) -> Result<()> {
    println!("libzhuyin interactive mode: enter one character for idioms, or a word for its readings");
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    let lines = stdin.lock().lines().map_while(|line| {
        line.map_err(|e| tracing::warn!(error = %e, "reading stdin failed"))
            .ok()
    });
    run_lines(Arc::new(pipeline), lines, print_outcome);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Some(Commands::Lookup { word, json }) => handle_lookup(&config, &word, json),
        Some(Commands::Suggest { key, json }) => handle_suggest(&config, &key, json),
        Some(Commands::Phrases { word, json }) => handle_phrases(&config, &word, json),
        Some(Commands::Vertical { reading }) => {
            print!("{}", render_columns(&vertical_layout(&reading)));
            Ok(())
        }
        Some(Commands::Shuffle { text, seed }) => {
            handle_shuffle(&text, seed.as_deref());
            Ok(())
        }
        Some(Commands::Serve { bind, workers }) => handle_serve(config, bind, workers),
        Some(Commands::Repl) | None => run_repl(build_pipeline(&config)?),
    }
}
