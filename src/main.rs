use anyhow::Result;
use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use futures::executor::LocalPool;
use skald::api::Api;
use skald::config::{find_project_file, Config, PROJECT_FILE};
use skald::dispatch::{Dispatcher, MemoryDocument, State};
use skald::history::{History, HistoryIntegrator, MemoryHistory};
use skald::layout::{render_document, DEFAULT_LAYOUT};
use skald::route::{Router, DEFAULT_CATEGORIES};
use skald::source::DirSource;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("skald")
        .version(crate_version!())
        .about("Routes and renders a static-JSON blog")
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .help("Directory to start searching for skald.yaml from (defaults to the working directory)"),
        )
        .subcommand(
            SubCommand::with_name("match")
                .about("Prints the view and parameters a location resolves to")
                .arg(Arg::with_name("location").required(true)),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Navigates through the given locations in order and prints the final page")
                .arg(Arg::with_name("location").required(true).multiple(true)),
        )
        .get_matches();

    match matches.subcommand() {
        ("match", Some(sub)) => match_location(&matches, sub),
        ("render", Some(sub)) => render(&matches, sub),
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}

fn project_dir(matches: &ArgMatches) -> Result<PathBuf> {
    Ok(match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    })
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    Config::from_directory(&project_dir(matches)?)
}

fn match_location(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    // Matching doesn't touch data, so a missing project just means the
    // default category set. A project file that fails to load is an error.
    let router = match find_project_file(&project_dir(matches)?) {
        Some(path) => Router::new(&Config::from_project_file(&path)?.categories)?,
        None => {
            tracing::warn!("no {} found; using the default categories", PROJECT_FILE);
            Router::new(DEFAULT_CATEGORIES)?
        }
    };
    let location = sub.value_of("location").unwrap_or("/");
    let path = skald::route::Location::parse(location).path;
    let m = router.match_path(&path);
    println!("{}", m.view);
    for (name, value) in &m.params {
        println!("  {} = {}", name, value);
    }
    println!("route: {:?}", router.resolve(location));
    Ok(())
}

fn render(matches: &ArgMatches, sub: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let layout = config.read_layout()?;
    let api = Api::new(DirSource::new(&config.data_root)).with_ttl(config.cache_ttl);
    let dispatcher = Rc::new(Dispatcher::new(
        api,
        Router::new(&config.categories)?,
        MemoryDocument::default(),
        config.settings(),
    ));

    let mut locations = sub.values_of("location").into_iter().flatten();
    let first = locations.next().unwrap_or("/");

    let mut pool = LocalPool::new();
    let mut integrator =
        HistoryIntegrator::install(MemoryHistory::new(first), dispatcher.callback(pool.spawner()));
    pool.run_until_stalled();
    for location in locations {
        integrator.navigate(location);
        pool.run_until_stalled();
    }
    pool.run();

    if dispatcher.state() == State::Error {
        tracing::warn!(location = %integrator.history().location(), "rendered the error view");
    }
    let document = dispatcher.document();
    print!(
        "{}",
        render_document(layout.as_deref().unwrap_or(DEFAULT_LAYOUT), &document)?
    );
    Ok(())
}
