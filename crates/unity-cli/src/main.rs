use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use unity_cli::commands;
use unity_cli::config::UnityConfig;

fn values_arg() -> Arg {
    Arg::new("values")
        .help("One value, or several to form an array")
        .required(true)
        .num_args(1..)
        .allow_negative_numbers(true)
        .value_parser(clap::value_parser!(f64))
}

fn unit_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .help(help)
        .required(true)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("UNITY_LOG", "error,unity=info"))
        .init();

    let matches = Command::new("unity")
        .version(clap::crate_version!())
        .about("Unit conversion and dimensional analysis")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .help("Path to a JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("units")
                .short('u')
                .long("units")
                .global(true)
                .help(
                    "Unit table file (.json, .csv or .tsv). Overrides the table \
                     specified in the configuration file.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("replace_builtin")
                .long("replace-builtin")
                .global(true)
                .help("Use only the units from --units instead of adding them to the built-in table")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert values from one unit to another")
                .arg(values_arg())
                .arg(
                    Arg::new("from")
                        .short('f')
                        .long("from")
                        .required(true)
                        .help("Unit of the values, e.g. 'km h-1'")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("to")
                        .short('t')
                        .long("to")
                        .required(true)
                        .help("Target unit, e.g. 'm s-1'")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether two units are dimensionally compatible")
                .arg(unit_arg("a", "First unit expression"))
                .arg(unit_arg("b", "Second unit expression")),
        )
        .subcommand(
            Command::new("invert")
                .about("Negate every exponent of a unit expression")
                .arg(unit_arg("unit", "Unit expression")),
        )
        .subcommand(
            Command::new("parse")
                .about("Show the canonical scale and dimensions of a unit expression")
                .arg(unit_arg("unit", "Unit expression")),
        )
        .subcommand(
            Command::new("format")
                .about("Render values and a unit as Typst math")
                .arg(values_arg())
                .arg(
                    Arg::new("unit")
                        .long("unit")
                        .default_value("")
                        .help("Unit expression; empty for dimensionless values"),
                )
                .arg(
                    Arg::new("number_format")
                        .short('n')
                        .long("number-format")
                        .help("Number format for every element: .Nf, .NE or .Ne")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
        .subcommand(
            Command::new("units")
                .about("List the unit table")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the table as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective configuration as JSON"))
        .get_matches();

    match matches.subcommand() {
        Some((name, sub_m)) => run(name, sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn run(name: &str, matches: &ArgMatches) -> Result<()> {
    let config = UnityConfig::from_arguments(matches)?;
    if let Some(path) = &config.unit_table {
        log::info!("[Unity] Using unit table: {}", path.display());
    }

    let result = match name {
        "convert" => {
            let values: Vec<f64> = matches.get_many::<f64>("values").unwrap().copied().collect();
            let from: &String = matches.get_one("from").unwrap();
            let to: &String = matches.get_one("to").unwrap();
            commands::convert(&config.converter()?, &values, from, to)
        }
        "check" => {
            let a: &String = matches.get_one("a").unwrap();
            let b: &String = matches.get_one("b").unwrap();
            Ok(commands::check(&config.converter()?, a, b))
        }
        "invert" => commands::invert_unit(matches.get_one::<String>("unit").unwrap()),
        "parse" => commands::describe(&config.converter()?, matches.get_one::<String>("unit").unwrap()),
        "format" => {
            let values: Vec<f64> = matches.get_many::<f64>("values").unwrap().copied().collect();
            let unit: &String = matches.get_one("unit").unwrap();
            Ok(commands::format_quantity(&values, unit, config.number_format()?))
        }
        "units" => commands::list_units(&config.unit_table()?, matches.get_flag("json")),
        "config" => Ok(serde_json::to_string_pretty(&config)?),
        _ => unreachable!(),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            log::error!("{} failed: {:#}", name, e);
            std::process::exit(1)
        }
    }
}
