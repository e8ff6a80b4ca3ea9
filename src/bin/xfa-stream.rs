use std::env;
use std::path::Path;
use std::process::ExitCode;

use xfa_stream::{interpret_stacked, parse_tree, repair_xml};

const DEFAULT_OUT_PATH: &str = "stacked_UI.html";

#[derive(Clone, Debug)]
struct Args {
    pdf_path: String,
    out_path: String,
    debug_out: Option<String>,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let Some(cli) = parse_args(args)? else {
        println!("{}", help_text());
        return Ok(());
    };

    let pdf = std::fs::read(&cli.pdf_path)
        .map_err(|e| format!("cannot read '{}': {}", cli.pdf_path, e))?;

    let raw = xfa_stream::extract_xfa(&pdf).map_err(|e| e.to_string())?;
    let repaired = repair_xml(&raw);
    let root = parse_tree(&repaired).map_err(|e| e.to_string())?;

    if let Some(debug_path) = &cli.debug_out {
        let debug_doc = xfa_stream::debug::debug_html(&root);
        write_output(debug_path, &debug_doc)?;
        println!("debug HTML saved as '{}'", debug_path);
    }

    let html = interpret_stacked(&root);
    write_output(&cli.out_path, &html)?;
    println!("stacked UI HTML saved as '{}'", cli.out_path);
    Ok(())
}

fn write_output(path: &str, contents: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    std::fs::write(path, contents).map_err(|e| format!("cannot write '{}': {}", path, e))
}

fn parse_args(args: Vec<String>) -> Result<Option<Args>, String> {
    let mut pdf_path: Option<String> = None;
    let mut out_path = DEFAULT_OUT_PATH.to_string();
    let mut debug_out: Option<String> = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                out_path = iter.next().ok_or("--out requires a path")?;
            }
            "--debug-out" => {
                debug_out = Some(iter.next().ok_or("--debug-out requires a path")?);
            }
            "--help" | "-h" => return Ok(None),
            other if other.starts_with('-') => {
                return Err(format!("unknown flag '{}'", other));
            }
            other => {
                if pdf_path.is_some() {
                    return Err("more than one input file given".to_string());
                }
                pdf_path = Some(other.to_string());
            }
        }
    }

    Ok(Some(Args {
        pdf_path: pdf_path.ok_or("missing input PDF path")?,
        out_path,
        debug_out,
    }))
}

fn help_text() -> &'static str {
    "usage: xfa-stream <input.pdf> [--out <file>] [--debug-out <file>]

  --out <file>        interpreted HTML output (default: stacked_UI.html)
  --debug-out <file>  also write a pretty-printed dump of the extracted XML"
}
