use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use postgen::collect::{Collector, Given, Prompt};
use postgen::config::Config;
use postgen::post::RawInput;
use postgen::publish::Publisher;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const FIELDS: [(&str, &str); 6] = [
    ("title", "The post's title"),
    ("category", "The post's category"),
    ("image", "The URL or path of the post's image"),
    ("description", "A short description for post listings"),
    ("popularity", "An integer popularity score (1-100)"),
    ("content", "The post's body as HTML"),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut add = SubCommand::with_name("add")
        .about("Adds a post to the index and renders its page. Prompts for the fields when none are given.")
        .arg(
            Arg::with_name("content-file")
                .long("content-file")
                .takes_value(true)
                .value_name("FILE")
                .conflicts_with("content")
                .help("Reads the post's HTML body from FILE (`-` for stdin)"),
        );
    for &(name, help) in FIELDS.iter() {
        add = add.arg(
            Arg::with_name(name)
                .long(name)
                .takes_value(true)
                .empty_values(true)
                .help(help),
        );
    }

    let matches = App::new("postgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .long("project")
                .takes_value(true)
                .value_name("DIR")
                .default_value(".")
                .help("Directory from which to search for postgen.yaml"),
        )
        .subcommand(add)
        .get_matches();

    let config = Config::from_directory(Path::new(matches.value_of("project").unwrap_or(".")))?;
    match matches.subcommand() {
        ("add", Some(add)) => add_post(&config, add),
        _ => Err(anyhow!("Missing subcommand")),
    }
}

fn add_post(config: &Config, matches: &ArgMatches) -> Result<()> {
    let given = FIELDS.iter().any(|(name, _)| matches.is_present(name))
        || matches.is_present("content-file");

    let raw = if given {
        Given(raw_input(matches)?).collect()?
    } else {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        Prompt::new(stdin.lock(), stdout.lock()).collect()?
    };
    let raw = match raw {
        Some(raw) => raw,
        None => {
            eprintln!("Cancelled; nothing was published.");
            return Ok(());
        }
    };

    let publisher = Publisher {
        index_file: &config.index_file,
        output_directory: &config.output_directory,
        output_folder: &config.output_folder,
    };
    let published = publisher.publish(raw)?;
    println!(
        "Post '{}' was added successfully!\nFile created at: {}",
        published.record.title,
        published.path.display()
    );
    Ok(())
}

fn raw_input(matches: &ArgMatches) -> Result<RawInput> {
    let value = |name: &str| matches.value_of(name).unwrap_or_default().to_owned();
    let content = match matches.value_of("content-file") {
        None => value("content"),
        Some("-") => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            content
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Reading content file `{}`: {}", path, e))?,
    };
    Ok(RawInput {
        title: value("title"),
        category: value("category"),
        image: value("image"),
        description: value("description"),
        popularity: value("popularity"),
        content,
    })
}
