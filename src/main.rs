use anyhow::{bail, Context, Result};
use math_canvas::canvas::export::encode_png;
use math_canvas::canvas::script::{load_script, replay};
use math_canvas::canvas::settings_store;
use math_canvas::canvas::{
    CanvasSettings, EditorSession, HttpRecognizer, PlainTextTypesetter, SubmissionEvent,
};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str =
    "usage: math_canvas <script.json> [--settings <file>] [--png <file>] [--save-settings]";

struct Args {
    script: PathBuf,
    settings: Option<PathBuf>,
    png: Option<PathBuf>,
    save_settings: bool,
}

fn parse_args() -> Result<Args> {
    let mut script = None;
    let mut settings = None;
    let mut png = None;
    let mut save_settings = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                settings = Some(PathBuf::from(args.next().context("--settings needs a path")?))
            }
            "--png" => png = Some(PathBuf::from(args.next().context("--png needs a path")?)),
            "--save-settings" => save_settings = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if script.is_none() => script = Some(PathBuf::from(other)),
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }
    let Some(script) = script else {
        bail!("{USAGE}");
    };
    Ok(Args {
        script,
        settings,
        png,
        save_settings,
    })
}

fn load_settings(path: Option<&PathBuf>) -> Result<CanvasSettings> {
    match path {
        Some(path) => Ok(settings_store::load_from_path(path)?.unwrap_or_default()),
        None => settings_store::load(),
    }
}

/// Writes the effective (sanitized) settings back, creating the file when it
/// did not exist.
fn persist_settings(path: Option<&PathBuf>, settings: &CanvasSettings) -> Result<PathBuf> {
    match path {
        Some(path) => {
            settings_store::save_to_path(path, settings)?;
            Ok(path.clone())
        }
        None => settings_store::save(settings),
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = load_settings(args.settings.as_ref())?;
    math_canvas::logging::init(settings.debug_logging, settings.log_file.clone());
    if args.save_settings {
        let path = persist_settings(args.settings.as_ref(), &settings)?;
        tracing::info!(path = %path.display(), "settings saved");
    }

    let recognizer = HttpRecognizer::new(&settings.recognizer_endpoint, settings.request_timeout())?;
    tracing::info!(url = recognizer.url(), "using recognition service");
    let timeout = settings.request_timeout();
    let mut session = EditorSession::new(
        settings,
        Arc::new(recognizer),
        Box::new(PlainTextTypesetter::default()),
    );

    let script = load_script(&args.script)?;
    let finished = replay(&mut session, &script, timeout)?;
    for event in &finished {
        if let SubmissionEvent::Failed { id, error } = event {
            eprintln!("submission {id} failed: {error}");
        }
    }

    for annotation in session.overlay().iter() {
        println!(
            "{} @ ({:.1}, {:.1})",
            annotation.display_text(),
            annotation.anchor.x,
            annotation.anchor.y
        );
    }
    let tool = session.tool();
    println!(
        "tool: {:?} {} width {:.1}",
        tool.mode,
        tool.color.to_hex(),
        tool.width
    );

    let mut names: Vec<_> = session.bindings().as_map().iter().collect();
    names.sort();
    for (name, value) in names {
        println!("{name} = {value}");
    }

    if let (Some(path), Some(surface)) = (args.png, session.surface()) {
        let png = encode_png(surface.width(), surface.height(), surface.read_pixels())?;
        std::fs::write(&path, png).with_context(|| format!("write {}", path.display()))?;
        tracing::info!(path = %path.display(), "surface written");
    }
    Ok(())
}
