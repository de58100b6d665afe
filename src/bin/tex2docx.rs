//! tex2docx CLI - LaTeX → DOCX converter

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;
#[cfg(feature = "cli")]
use texdocx::{
    constants::DEFAULT_OUTPUT_NAME,
    diagnostics::{check_latex, format_diagnostics},
    latex_to_docx_bytes_with_options, latex_to_docx_with_diagnostics, ConversionWarning,
    DocxOptions, DocxPackage,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tex2docx")]
#[command(version)]
#[command(about = "Convert a LaTeX subset to a Word document with native equations", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (defaults to Thesis_Output.docx for docx output, stdout otherwise)
    #[arg(short, long)]
    output: Option<String>,

    /// What to produce
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Docx)]
    format: OutputFormat,

    /// Check mode - analyze LaTeX for potential issues without converting
    #[arg(long)]
    check: bool,

    /// Use colored output
    #[arg(long, default_value_t = true)]
    color: bool,

    /// Keep blocks starting with unknown commands as plain paragraphs
    #[arg(long)]
    keep_unknown: bool,

    /// Do not strip `%` comments before conversion
    #[arg(long)]
    keep_comments: bool,

    /// Text of the bullet run for itemize entries
    #[arg(long)]
    bullet: Option<String>,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check LaTeX for potential conversion issues
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Convert every .tex file in a directory
    Batch {
        /// Input directory or single file
        input: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        /// Keep blocks starting with unknown commands
        #[arg(long)]
        keep_unknown: bool,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Complete .docx archive
    Docx,
    /// The word/document.xml part
    Xml,
    /// Only the <w:body> element
    Body,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Handle subcommands first
    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd);
    }

    let input = read_input(cli.input_file.as_deref())?;

    if cli.check {
        let result = check_latex(&input);
        println!("{}", format_diagnostics(&result, cli.color));
        if result.has_errors() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut options = DocxOptions {
        drop_unrecognized: !cli.keep_unknown,
        strip_comments: !cli.keep_comments,
        ..DocxOptions::default()
    };
    if let Some(bullet) = cli.bullet {
        options.bullet = bullet;
    }

    let output = latex_to_docx_with_diagnostics(&input, &options);
    let warnings = &output.warnings;

    if !cli.quiet && !warnings.is_empty() {
        print_warnings_to_stderr(warnings, cli.color);
    }

    if cli.strict && !warnings.is_empty() {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            warnings.len()
        );
        std::process::exit(1);
    }

    match cli.format {
        OutputFormat::Docx => {
            let path = cli.output.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
            let mut package = DocxPackage::new();
            package.add_document(&output.content).map_err(io::Error::other)?;
            let bytes = package.finish_to_bytes().map_err(io::Error::other)?;
            fs::write(path, bytes)?;
            report_written(path, warnings.len());
        }
        OutputFormat::Xml | OutputFormat::Body => {
            let text = if cli.format == OutputFormat::Body {
                body_of(&output.content)
            } else {
                output.content.as_str()
            };
            match cli.output {
                Some(path) => {
                    let mut file = fs::File::create(&path)?;
                    writeln!(file, "{}", text)?;
                    report_written(&path, warnings.len());
                }
                None => println!("{}", text),
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> io::Result<()> {
    match cmd {
        Commands::Check { input, no_color } => {
            let content = read_input(input.as_deref())?;
            let result = check_latex(&content);
            println!("{}", format_diagnostics(&result, !no_color));
            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Batch {
            input,
            output_dir,
            keep_unknown,
        } => {
            fs::create_dir_all(&output_dir)?;
            let options = DocxOptions {
                drop_unrecognized: !keep_unknown,
                ..DocxOptions::default()
            };

            let input_path = Path::new(&input);
            let files: Vec<_> = if input_path.is_dir() {
                fs::read_dir(input_path)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("tex"))
                    .collect()
            } else {
                vec![input_path.to_path_buf()]
            };

            let mut success_count = 0;
            let mut error_count = 0;
            for file_path in files {
                let stem = file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let output_path = Path::new(&output_dir).join(format!("{}.docx", stem));

                let converted = fs::read_to_string(&file_path)
                    .map_err(texdocx::ConversionError::from)
                    .and_then(|content| latex_to_docx_bytes_with_options(&content, &options));
                match converted.and_then(|(bytes, _)| {
                    fs::write(&output_path, bytes).map_err(texdocx::ConversionError::from)
                }) {
                    Ok(()) => {
                        eprintln!("✓ {} → {}", file_path.display(), output_path.display());
                        success_count += 1;
                    }
                    Err(e) => {
                        eprintln!("✗ {}: {}", file_path.display(), e);
                        error_count += 1;
                    }
                }
            }

            eprintln!();
            eprintln!(
                "Batch conversion complete: {} succeeded, {} failed",
                success_count, error_count
            );
        }

        Commands::Info => {
            println!("tex2docx - LaTeX → DOCX converter");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Supported input:");
            println!("  - \\chapter, \\section, \\subsection, \\subsubsection");
            println!("  - itemize / enumerate lists");
            println!("  - inline math ($..$, \\(..\\)) and display math (equation, align, \\[..\\])");
            println!("  - figures (image placeholder + caption)");
            println!("  - \\ref / \\eqref as bold text");
            println!();
            println!("Output: {} (or --format xml / body)", DEFAULT_OUTPUT_NAME);
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// The `<w:body>..</w:body>` slice of a document part
#[cfg(feature = "cli")]
fn body_of(document: &str) -> &str {
    match (document.find("<w:body>"), document.rfind("</w:body>")) {
        (Some(start), Some(end)) => &document[start..end + "</w:body>".len()],
        _ => document,
    }
}

#[cfg(feature = "cli")]
fn report_written(path: &str, warning_count: usize) {
    if warning_count == 0 {
        eprintln!("✓ Output written to: {}", path);
    } else {
        eprintln!(
            "⚠ Output written to: {} ({} warning(s))",
            path, warning_count
        );
    }
}

/// Print conversion warnings to stderr with optional color coding
#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[ConversionWarning], use_color: bool) {
    let (yellow, reset) = if use_color {
        ("\x1b[33m", "\x1b[0m")
    } else {
        ("", "")
    };
    eprintln!();
    eprintln!("{}Conversion Warnings ({}):{}", yellow, warnings.len(), reset);
    eprintln!();
    for warning in warnings {
        match warning.line {
            Some(line) => eprintln!(
                "  {}[{}]{} line {}: {}",
                yellow, warning.kind, reset, line, warning.message
            ),
            None => eprintln!("  {}[{}]{} {}", yellow, warning.kind, reset, warning.message),
        }
    }
    eprintln!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texdocx --features cli");
    eprintln!("  tex2docx [OPTIONS] [INPUT_FILE]");
}
