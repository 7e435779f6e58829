use clap::{Parser, Subcommand};
use prost::Message;
use prost_types::FileDescriptorSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use proto_mysql_compiler::error::GenError;
use proto_mysql_compiler::{build_index, generate, run_plugin, FileSet, GeneratorOptions};

#[derive(Parser)]
#[command(name = "protoc-gen-mysql")]
#[command(about = "Generate MySQL tables and row helpers from protobuf messages", long_about = None)]
struct Cli {
    /// Without a subcommand the binary runs as a protoc plugin:
    /// request on stdin, response on stdout.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate from a descriptor set written by `protoc -o` and print the result
    Inspect {
        /// Serialized `FileDescriptorSet` (use `--include_imports`)
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Proto file names to generate for, as recorded in the set
        #[arg(short, long, required = true)]
        file: Vec<String>,

        /// Plugin parameter, e.g. `helper=python,if_not_exists=true`
        #[arg(short, long, default_value = "")]
        param: String,

        /// Print tables and diagnostics as JSON instead of the generated files
        #[arg(long)]
        json: bool,
    },

    /// Print the symbol table used when generating one file
    Tree {
        /// Serialized `FileDescriptorSet`
        #[arg(short, long)]
        descriptor_set: PathBuf,

        /// Proto file name, as recorded in the set
        #[arg(short, long)]
        file: String,
    },
}

fn init_logging() {
    // stdout carries the plugin response; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_descriptor_set(path: &Path) -> Result<FileSet, GenError> {
    let data = fs::read(path)?;
    let set = FileDescriptorSet::decode(data.as_slice())?;
    Ok(FileSet::from_descriptors(&set.file))
}

fn main() -> Result<(), GenError> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        None => {
            let mut input = Vec::new();
            io::stdin().read_to_end(&mut input)?;
            debug!("read {} byte request", input.len());
            let output = run_plugin(&input)?;
            io::stdout().write_all(&output)?;
            Ok(())
        }

        Some(Commands::Inspect { descriptor_set, file, param, json }) => {
            let files = load_descriptor_set(&descriptor_set)?;
            let options = GeneratorOptions::parse(&param)?;
            let generated = generate(&files, &file, &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&generated)?);
            } else {
                for out in generated.output.iter().flat_map(|o| &o.files) {
                    println!("-- {}\n{}", out.name, out.content);
                }
                for diagnostic in &generated.diagnostics {
                    eprintln!("warning: {}", diagnostic);
                }
            }
            Ok(())
        }

        Some(Commands::Tree { descriptor_set, file }) => {
            let files = load_descriptor_set(&descriptor_set)?;
            let target = files.get(&file).ok_or_else(|| GenError::FileNotFound(file.clone()))?;
            let index = build_index(&files, target);
            print!("{}", index.output.dump_tree());
            for diagnostic in &index.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
            Ok(())
        }
    }
}
