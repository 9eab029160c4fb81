//! Shiny Expand CLI
//!
//! Usage:
//!   shiny-expand [OPTIONS] <MANIFEST>
//!
//! Options:
//!   -i, --instance <NAME>        Instance from the manifest to expand
//!       --shader <NAME>          Shader set to expand with no instance properties
//!   -p, --property <NAME=VALUE>  Set or override a property
//!   -s, --setting <NAME=VALUE>   Set or override a global setting
//!   -l, --list                   List shader sets, settings and instances
//!   -v, --verbose                More log output (repeatable)
//!   -h, --help                   Print help

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use shiny_expand::{
    Expander, Manifest, Passthrough, Preprocessor, Properties, PropertyMap, PropertyValue,
};

#[derive(Parser)]
#[command(name = "shiny-expand")]
#[command(about = "Expand @sh directives of shader templates")]
struct Cli {
    /// Manifest describing shader sets, settings and instances (TOML)
    manifest: PathBuf,

    /// Instance from the manifest to expand
    #[arg(short, long, conflicts_with = "shader")]
    instance: Option<String>,

    /// Shader set to expand with no instance properties
    #[arg(long)]
    shader: Option<String>,

    /// Set or override a property (NAME=VALUE, `$name` links into the context)
    #[arg(short, long = "property", value_parser = parse_assignment)]
    properties: Vec<(String, String)>,

    /// Set or override a global setting (NAME=VALUE)
    #[arg(short, long = "setting", value_parser = parse_assignment)]
    settings: Vec<(String, String)>,

    /// List shader sets, settings and instances
    #[arg(short, long)]
    list: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let manifest = match Manifest::from_file(&cli.manifest) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading manifest '{}': {}", cli.manifest.display(), e);
            process::exit(1);
        }
    };

    if cli.list {
        print_listing(&manifest);
        return;
    }

    // Pick the shader set and its starting properties
    let (name, set, mut properties, context) = match (&cli.instance, &cli.shader) {
        (Some(instance), _) => match manifest.instance(instance) {
            Ok((spec, set)) => (
                instance.clone(),
                set.clone(),
                spec.properties.clone(),
                spec.context.clone(),
            ),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        (None, Some(shader)) => match manifest.shaders.get(shader) {
            Some(set) => (shader.clone(), set.clone(), PropertyMap::new(), None),
            None => {
                eprintln!("Error: no shader named \"{}\" in manifest", shader);
                process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Error: pass --instance or --shader (or --list)");
            process::exit(1);
        }
    };

    for (key, value) in &cli.properties {
        properties.set(key.as_str(), PropertyValue::parse(value));
    }

    let mut settings = set.global_settings().clone();
    for (key, value) in &cli.settings {
        settings.set(key.as_str(), value.as_str());
    }
    let set = set.with_settings(Arc::new(settings));

    let mut props = Properties::new(&properties);
    if let Some(context) = &context {
        props = props.with_context(context);
    }

    let expanded = match Expander::new(&name, props, set.global_settings()).expand(set.source()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e.format());
            process::exit(1);
        }
    };

    match Passthrough.preprocess(&expanded, set.base_path(), &[], &name) {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error preprocessing '{}': {}", name, e);
            process::exit(1);
        }
    }
}

fn print_listing(manifest: &Manifest) {
    let mut shaders: Vec<_> = manifest.shaders.values().collect();
    shaders.sort_by(|a, b| a.name().cmp(b.name()));
    println!("SHADERS");
    for set in shaders {
        println!("  {:<24} {}", set.name(), set.stage());
    }

    let mut settings: Vec<_> = manifest.settings.names().collect();
    settings.sort_unstable();
    println!("SETTINGS");
    for name in settings {
        println!("  {}", name);
    }

    let mut instances: Vec<_> = manifest.instances.iter().collect();
    instances.sort_by(|a, b| a.0.cmp(b.0));
    println!("INSTANCES");
    for (name, spec) in instances {
        let mut properties: Vec<_> = spec.properties.names().collect();
        properties.sort_unstable();
        println!("  {:<24} {:<24} {}", name, spec.shader, properties.join(", "));
    }
}
