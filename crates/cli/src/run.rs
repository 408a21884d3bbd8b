//! `scorematch run` / `check` / `config validate`: file plumbing around the engine.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use scorematch_recon::export::{
    stats_json, write_completed, write_matched_log, write_unmatched_log, OutputHeaders,
};
use scorematch_recon::load::{check_schema, template_extra_headers};
use scorematch_recon::{ReconConfig, ReconOutput, ReconStats, RawTable, Source};

use crate::exit_codes::EXIT_UNMATCHED;
use crate::util::render_table;
use crate::CliError;

/// Preview cells wider than this are truncated.
const PREVIEW_MAX_COL: usize = 28;

#[derive(Args)]
pub struct InputArgs {
    /// Manual score sheet (identifier, name, department, CA, Exam)
    #[arg(long, short = 'm')]
    manual: PathBuf,

    /// Portal template to fill (identifier, name, department)
    #[arg(long, short = 't')]
    template: PathBuf,

    /// Column mapping and matching options (.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Field delimiter for both inputs: a single ASCII character, or "tab"
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory for the output files (created if missing)
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: PathBuf,

    /// Label that starts every output file name
    #[arg(long, default_value = "scorematch")]
    prefix: String,

    /// Disable the fuzzy name tier
    #[arg(long)]
    no_fuzzy: bool,

    /// Fuzzy acceptance threshold, 0-100 (a score must exceed it)
    #[arg(long)]
    threshold: Option<f64>,

    /// Print the stats JSON to stdout
    #[arg(long)]
    json: bool,

    /// Print the first N completed rows to stdout
    #[arg(long, value_name = "N", conflicts_with = "json")]
    preview: Option<usize>,

    /// Exit with code 7 when any template row is unmatched
    #[arg(long)]
    fail_on_unmatched: bool,

    /// Suppress the summary on stderr
    #[arg(long, short = 'q')]
    quiet: bool,
}

pub(crate) fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
                _ => Err(format!("delimiter must be one ASCII character or \"tab\", got {s:?}")),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    ReconConfig::from_toml(&text)
        .map_err(|e| CliError::config(format!("{}: {e}", path.display())))
}

fn read_table(source: Source, path: &Path, delimiter: u8) -> Result<RawTable, CliError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    RawTable::from_csv_bytes(source, &bytes, delimiter).map_err(|e| {
        let path = path.display().to_string();
        let err = CliError::recon(e);
        CliError { message: format!("{path}: {}", err.message), ..err }
    })
}

fn read_inputs(inputs: &InputArgs) -> Result<(ReconConfig, RawTable, RawTable), CliError> {
    let config = load_config(inputs.config.as_deref())?;
    let manual = read_table(Source::Manual, &inputs.manual, inputs.delimiter)?;
    let template = read_table(Source::Template, &inputs.template, inputs.delimiter)?;
    log::debug!(
        "read {} manual row(s) from {}, {} template row(s) from {}",
        manual.len(),
        inputs.manual.display(),
        template.len(),
        inputs.template.display(),
    );
    Ok((config, manual, template))
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

pub fn cmd_run(inputs: InputArgs, args: RunArgs) -> Result<(), CliError> {
    let (mut config, manual, template) = read_inputs(&inputs)?;

    if args.no_fuzzy {
        config.matching.fuzzy = false;
    }
    if let Some(threshold) = args.threshold {
        config.matching.fuzzy_threshold = threshold;
    }
    config
        .validate()
        .map_err(|e| CliError::usage(e.to_string()).with_hint("--threshold takes a value from 0 to 100"))?;

    let output = scorematch_recon::run(&config, &manual, &template).map_err(CliError::recon)?;

    std::fs::create_dir_all(&args.out_dir)
        .map_err(|e| CliError::io(format!("cannot create {}: {e}", args.out_dir.display())))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let written = write_reports(&output, &config, &args, &stamp)?;

    let json = stats_json(&output.stats)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
    let stats_path = output_path(&args, "Stats", &stamp, "json");
    std::fs::write(&stats_path, format!("{json}\n"))
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", stats_path.display())))?;

    if args.json {
        println!("{json}");
    }

    if let Some(n) = args.preview {
        print!("{}", preview(&output, &config, n));
    }

    if !args.quiet {
        print_summary(&output.stats);
        for path in written.iter().chain(std::iter::once(&stats_path)) {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.fail_on_unmatched && output.stats.unmatched > 0 {
        let err = CliError {
            code: EXIT_UNMATCHED,
            message: format!("{} template row(s) unmatched", output.stats.unmatched),
            hint: None,
        };
        let unmatched_path = output_path(&args, "Unmatched_Log", &stamp, "csv");
        return Err(err.with_hint(format!("see {}", unmatched_path.display())));
    }

    Ok(())
}

fn output_path(args: &RunArgs, kind: &str, stamp: &str, ext: &str) -> PathBuf {
    args.out_dir.join(format!("{}_{kind}_{stamp}.{ext}", args.prefix))
}

fn write_file<F>(path: &Path, render: F) -> Result<(), CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path)
        .map_err(|e| CliError::io(format!("cannot create {}: {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    render(&mut out)
        .and_then(|_| out.flush())
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}

/// Completed table and matched log always; unmatched log only when non-empty.
fn write_reports(
    output: &ReconOutput,
    config: &ReconConfig,
    args: &RunArgs,
    stamp: &str,
) -> Result<Vec<PathBuf>, CliError> {
    let headers = OutputHeaders::from_mapping(&config.columns.template);
    let mut written = Vec::with_capacity(3);

    let completed = output_path(args, "Results_Completed", stamp, "csv");
    write_file(&completed, |w| write_completed(w, output, &headers))?;
    written.push(completed);

    let matched = output_path(args, "Matched_Log", stamp, "csv");
    write_file(&matched, |w| write_matched_log(w, output, &headers))?;
    written.push(matched);

    if !output.unmatched.is_empty() {
        let unmatched = output_path(args, "Unmatched_Log", stamp, "csv");
        write_file(&unmatched, |w| write_unmatched_log(w, output, &headers))?;
        written.push(unmatched);
    }

    Ok(written)
}

fn print_summary(s: &ReconStats) {
    eprintln!(
        "matched {} of {} template rows ({:.1}%): {} by id, {} by name+department, {} by fuzzy name",
        s.matched,
        s.total_template,
        s.match_rate(),
        s.matched_by_tier.exact_id,
        s.matched_by_tier.exact_name_dept,
        s.matched_by_tier.fuzzy_name,
    );
    eprintln!("unmatched: {}", s.unmatched);

    let notes: Vec<String> = s
        .entries()
        .into_iter()
        .filter(|(key, n)| *n > 0 && (key.starts_with("duplicate_") || key.starts_with("blank_") || *key == "fuzzy_ties"))
        .map(|(key, n)| format!("{key}={n}"))
        .collect();
    if !notes.is_empty() {
        eprintln!("data quality: {}", notes.join(", "));
    }
}

fn preview(output: &ReconOutput, config: &ReconConfig, n: usize) -> String {
    let h = OutputHeaders::from_mapping(&config.columns.template);
    let header = [
        h.identifier.as_str(),
        h.name.as_str(),
        h.department.as_str(),
        h.ca.as_str(),
        h.exam.as_str(),
    ];
    let rows: Vec<Vec<String>> = output
        .completed
        .iter()
        .take(n)
        .map(|r| {
            vec![
                r.identifier.clone(),
                r.name.clone(),
                r.department.clone(),
                r.ca.clone(),
                r.exam.clone(),
            ]
        })
        .collect();
    render_table(&header, &rows, PREVIEW_MAX_COL)
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

pub fn cmd_check(inputs: InputArgs) -> Result<(), CliError> {
    let (config, manual, template) = read_inputs(&inputs)?;
    let (m, t) = (&config.columns.manual, &config.columns.template);

    check_schema(&manual, m, &template, t).map_err(CliError::recon)?;

    eprintln!("ok: manual {} row(s), template {} row(s)", manual.len(), template.len());
    for (label, column) in [("name", &m.name), ("department", &m.department)] {
        if manual.column(column).is_none() {
            eprintln!("note: manual sheet has no {label} column {column:?}; only identifier matching applies");
        }
    }
    let extras = template_extra_headers(&template, t);
    if !extras.is_empty() {
        let fate = if config.output.keep_extra_columns { "kept" } else { "dropped" };
        eprintln!("template extra columns ({fate}): {}", extras.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config validate
// ---------------------------------------------------------------------------

pub fn cmd_config_validate(path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&path))?;
    let tier = if config.matching.fuzzy {
        format!("fuzzy name > {}", config.matching.fuzzy_threshold)
    } else {
        "fuzzy off".to_string()
    };
    eprintln!(
        "valid: manual {}/{}/{}, template {}/{}/{}, {tier}",
        config.columns.manual.identifier,
        config.columns.manual.ca,
        config.columns.manual.exam,
        config.columns.template.identifier,
        config.columns.template.name,
        config.columns.template.department,
    );
    Ok(())
}
