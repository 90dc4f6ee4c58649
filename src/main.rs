#![allow(non_snake_case)]
use RustedParams::Examples::parameter_examples::parameter_examples;
use RustedParams::Utils::config::{ProcessingConfig, load_toml_file};

fn main() {
    // optional TOML file with a [processing] section, e.g. loglevel = "debug"
    let config = match std::env::args().nth(1) {
        Some(path) => match load_toml_file(&path) {
            Ok((config, _)) => config,
            Err(err) => {
                eprintln!("{}", err);
                ProcessingConfig::default()
            }
        },
        None => ProcessingConfig::default(),
    };
    if let Err(err) = config.start_logger(false) {
        eprintln!("logger not started: {}", err);
    }
    let example = 0;
    match example {
        0 => {
            for i in 0..4 {
                parameter_examples(i);
            }
        }
        _ => parameter_examples(example),
    }
}
