use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use prism_contracts::console::{parse_intent, Intent, CONSOLE_HELP_COMMANDS};
use prism_contracts::models::{
    resolve_effective_capabilities, resolve_redirect_chain, validate_redirect, ModelConfig,
    ModelRegistry, RedirectChain, RedirectError, RegistryStore,
};
use prism_contracts::theme::{generate_dark_palette, generate_palette, ColorPalette, ThemeTokens};
use prism_engine::swatch::{write_swatch, MAX_SWATCH_CELL};
use prism_engine::{EditorConfig, ModelEditor};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prism", version, about = "Model capability and theme palette tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a model's effective capabilities through its redirect chain.
    Resolve(ResolveArgs),
    /// Check whether a redirect may be saved.
    ValidateRedirect(ValidateArgs),
    /// List models with their redirects and effective capabilities.
    List(RegistryArgs),
    /// Generate a ten-step palette from a base color.
    Palette(PaletteArgs),
    /// Interactive model editor console.
    Edit(EditArgs),
}

#[derive(Debug, Args)]
struct RegistryArgs {
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Use the built-in models when the registry file does not exist.
    #[arg(long)]
    seed_defaults: bool,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    model: String,
    #[command(flatten)]
    registry: RegistryArgs,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    model: String,
    target: String,
    #[command(flatten)]
    registry: RegistryArgs,
}

#[derive(Debug, Args)]
struct PaletteArgs {
    color: String,
    #[arg(long)]
    dark: bool,
    /// Print CSS custom properties for both ramps under this token name.
    #[arg(long)]
    css: Option<String>,
    #[arg(long)]
    json: bool,
    /// Write a PNG with the light ramp above the dark ramp.
    #[arg(long)]
    swatch: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = 48,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SWATCH_CELL))
    )]
    cell: u32,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[command(flatten)]
    registry: RegistryArgs,
    #[arg(long)]
    events: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("prism_cli=info,prism_engine=info,prism_contracts=info")
        }))
        .init();

    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("prism error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::ValidateRedirect(args) => run_validate(args),
        Command::List(args) => run_list(args),
        Command::Palette(args) => run_palette(args),
        Command::Edit(args) => {
            run_edit(args)?;
            Ok(0)
        }
    }
}

fn load_registry(args: &RegistryArgs) -> Result<ModelRegistry> {
    let config = EditorConfig::resolve(args.registry.clone(), None)?;
    let store = RegistryStore::new(&config.registry_path);
    if !store.exists() && args.seed_defaults {
        tracing::debug!(registry = %store.path().display(), "registry missing; using built-in models");
        return Ok(ModelRegistry::with_defaults());
    }
    store.load()
}

fn run_resolve(args: ResolveArgs) -> Result<i32> {
    let registry = load_registry(&args.registry)?;
    let chain = resolve_redirect_chain(&args.model, &registry);
    let capabilities = resolve_effective_capabilities(&args.model, &registry);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "model": args.model,
                "chain": chain,
                "capabilities": capabilities,
            }))?
        );
        return Ok(0);
    }
    write_chain(&mut io::stdout().lock(), &chain)?;
    println!("thinking: {}", capabilities.thinking_config_type.as_str());
    println!("capabilities: {}", join_labels(&capabilities.labels()));
    Ok(0)
}

fn run_validate(args: ValidateArgs) -> Result<i32> {
    let registry = load_registry(&args.registry)?;
    match validate_redirect(&args.model, &args.target, &registry) {
        Ok(()) => {
            if !args.target.trim().is_empty() && !registry.contains(args.target.trim()) {
                println!("valid (target '{}' is not in the registry)", args.target.trim());
            } else {
                println!("valid");
            }
            Ok(0)
        }
        Err(err) => {
            println!("{}: {err}", err.tag());
            Ok(2)
        }
    }
}

fn run_list(args: RegistryArgs) -> Result<i32> {
    let registry = load_registry(&args)?;
    if registry.is_empty() {
        println!("No models.");
        return Ok(0);
    }
    for model in registry.list() {
        println!("{}", describe_model(model, &registry));
    }
    Ok(0)
}

fn run_palette(args: PaletteArgs) -> Result<i32> {
    let light = generate_palette(&args.color);
    let dark = generate_dark_palette(&args.color);

    if let Some(name) = args.css.as_deref() {
        print!("{}", ThemeTokens::new(name, args.color.as_str()).render_css());
    } else if args.json {
        let palette = if args.dark { &dark } else { &light };
        println!("{}", serde_json::to_string_pretty(palette)?);
    } else {
        write_palette(&mut io::stdout().lock(), if args.dark { &dark } else { &light })?;
    }

    if let Some(path) = args.swatch.as_deref() {
        write_swatch(path, &light, &dark, args.cell)?;
        eprintln!("Swatch written to {}", path.display());
    }
    Ok(0)
}

fn run_edit(args: EditArgs) -> Result<()> {
    let config = EditorConfig::resolve(args.registry.registry.clone(), args.events.clone())?
        .with_seed_defaults(args.registry.seed_defaults);
    let mut editor = ModelEditor::open(&config)
        .with_context(|| format!("failed to open {}", config.registry_path.display()))?;

    println!(
        "Editing {} ({} models). Type /help for commands.",
        config.registry_path.display(),
        editor.registry().len()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let intent = parse_intent(line.trim_end_matches(['\n', '\r']));
        if intent.action == "quit" {
            break;
        }
        if let Err(err) = handle_intent(&mut editor, &intent, &mut io::stdout().lock()) {
            match err.downcast_ref::<RedirectError>() {
                Some(redirect) => println!("Rejected ({}): {redirect}", redirect.tag()),
                None => println!("Error: {err:#}"),
            }
        }
    }

    if editor.is_dirty()? {
        println!("Unsaved changes discarded. Use /save before /quit to keep them.");
    }
    Ok(())
}

fn handle_intent(editor: &mut ModelEditor, intent: &Intent, out: &mut impl Write) -> Result<()> {
    let id = intent.arg("id").unwrap_or_default();
    match intent.action.as_str() {
        "noop" => {}
        "help" => writeln!(out, "Commands: {}", CONSOLE_HELP_COMMANDS.join("  "))?,
        "usage" => writeln!(
            out,
            "Missing or extra arguments for /{}. Type /help.",
            intent.arg("command").unwrap_or_default()
        )?,
        "list" => {
            for model in editor.registry().list() {
                writeln!(out, "{}", describe_model(model, editor.registry()))?;
            }
        }
        "show" => match editor.registry().get(id) {
            Some(model) => writeln!(out, "{}", serde_json::to_string_pretty(model)?)?,
            None => writeln!(out, "No model '{id}'.")?,
        },
        "resolve" => {
            let capabilities = editor.effective_capabilities(id);
            writeln!(
                out,
                "{id} -> {} [{}]",
                editor.redirect_chain(id).resolved,
                join_labels(&capabilities.labels())
            )?;
        }
        "chain" => write_chain(out, &editor.redirect_chain(id))?,
        "set_redirect" => {
            let target = intent.arg("target");
            let report = editor.set_redirect(id, target)?;
            writeln!(
                out,
                "{id} now redirects to {} [{}]",
                target.unwrap_or("-"),
                join_labels(&report.effective.labels())
            )?;
            write_cleared(out, &report.cleared)?;
        }
        "clear_redirect" => {
            let report = editor.set_redirect(id, None)?;
            writeln!(
                out,
                "{id} no longer redirects [{}]",
                join_labels(&report.effective.labels())
            )?;
            write_cleared(out, &report.cleared)?;
        }
        "add" => {
            if editor.registry().contains(id) {
                writeln!(out, "Model '{id}' already exists.")?;
            } else {
                let report = editor.save_model(ModelConfig::new(id))?;
                writeln!(out, "Added {id} [{}]", join_labels(&report.effective.labels()))?;
            }
        }
        "remove" => {
            let dangling = editor.remove_model(id)?;
            writeln!(out, "Removed {id}.")?;
            if !dangling.is_empty() {
                writeln!(out, "Now dangling: {}", dangling.join(", "))?;
            }
        }
        "palette" => write_palette(out, &generate_palette(intent.arg("color").unwrap_or_default()))?,
        "dark_palette" => write_palette(
            out,
            &generate_dark_palette(intent.arg("color").unwrap_or_default()),
        )?,
        "diff" => match editor.pending_diff()? {
            Some(diff) => write!(out, "{diff}")?,
            None => writeln!(out, "No pending changes.")?,
        },
        "save" => {
            let digest = editor.save()?;
            writeln!(out, "Saved ({}).", digest.get(..12).unwrap_or(digest.as_str()))?;
        }
        _ => writeln!(
            out,
            "Unknown command '{}'. Type /help.",
            intent.arg("command").unwrap_or(intent.raw.trim())
        )?,
    }
    Ok(())
}

fn describe_model(model: &ModelConfig, registry: &ModelRegistry) -> String {
    let capabilities = resolve_effective_capabilities(&model.id, registry);
    let redirect = match model.redirect_target() {
        Some(target) if registry.contains(target) => format!(" -> {target}"),
        Some(target) => format!(" -> {target} (missing)"),
        None => String::new(),
    };
    let name = match model.display_name() {
        name if name == model.id => String::new(),
        name => format!(" \"{name}\""),
    };
    format!(
        "{}{}{} [{}]",
        model.id,
        name,
        redirect,
        join_labels(&capabilities.labels())
    )
}

fn write_chain(out: &mut impl Write, chain: &RedirectChain) -> io::Result<()> {
    let mut line = chain.hops.join(" -> ");
    if let Some(blocked) = chain.blocked_target.as_deref() {
        line.push_str(&format!(" -/-> {blocked}"));
    }
    writeln!(out, "{line} ({})", chain.stop.as_str())
}

fn write_palette(out: &mut impl Write, palette: &ColorPalette) -> io::Result<()> {
    for (step, shade) in palette.iter() {
        writeln!(out, "{step:>4}  {shade}")?;
    }
    Ok(())
}

fn write_cleared(out: &mut impl Write, cleared: &[&str]) -> io::Result<()> {
    if cleared.is_empty() {
        return Ok(());
    }
    writeln!(out, "Cleared unsupported settings: {}", cleared.join(", "))
}

fn join_labels(labels: &[&str]) -> String {
    if labels.is_empty() {
        "text".to_string()
    } else {
        labels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use prism_contracts::console::parse_intent;
    use prism_contracts::models::{ModelConfig, ModelRegistry, RedirectError};
    use prism_engine::{EditorConfig, ModelEditor};

    use super::{describe_model, handle_intent, join_labels, Cli, Command};

    fn run_line(editor: &mut ModelEditor, line: &str) -> anyhow::Result<String> {
        let mut out = Vec::new();
        handle_intent(editor, &parse_intent(line), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn seeded_editor(temp: &tempfile::TempDir) -> anyhow::Result<(EditorConfig, ModelEditor)> {
        let config =
            EditorConfig::new(temp.path().join("models.json")).with_seed_defaults(true);
        let editor = ModelEditor::open(&config)?;
        Ok((config, editor))
    }

    #[test]
    fn parses_palette_flags() {
        let cli = Cli::parse_from(["prism", "palette", "#3b82f6", "--dark", "--cell", "16"]);
        match cli.command {
            Command::Palette(args) => {
                assert_eq!(args.color, "#3b82f6");
                assert!(args.dark);
                assert_eq!(args.cell, 16);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_cell() {
        for cell in ["0", "513", "500000000"] {
            let parsed = Cli::try_parse_from(["prism", "palette", "#808080", "--cell", cell]);
            assert!(parsed.is_err(), "--cell {cell} should be rejected");
        }
    }

    #[test]
    fn parses_validate_redirect_with_registry() {
        let cli = Cli::parse_from([
            "prism",
            "validate-redirect",
            "a",
            "b",
            "--registry",
            "/tmp/models.json",
        ]);
        match cli.command {
            Command::ValidateRedirect(args) => {
                assert_eq!(args.model, "a");
                assert_eq!(args.target, "b");
                assert_eq!(
                    args.registry.registry.as_deref(),
                    Some(std::path::Path::new("/tmp/models.json"))
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn describe_model_marks_missing_targets() {
        let registry = ModelRegistry::from_configs(vec![
            ModelConfig::new("alias").redirecting_to("gone"),
            ModelConfig {
                name: Some("House Model".to_string()),
                ..ModelConfig::new("house")
            },
        ]);
        let lines: Vec<String> = registry
            .list()
            .map(|model| describe_model(model, &registry))
            .collect();
        assert_eq!(lines[0], "alias -> gone (missing) [text]");
        assert_eq!(lines[1], "house \"House Model\" [text]");
        assert_eq!(join_labels(&["image_generation"]), "image_generation");
    }

    #[test]
    fn console_add_skips_existing_ids() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let (_, mut editor) = seeded_editor(&temp)?;
        let before = editor.registry().clone();

        let out = run_line(&mut editor, "/add nano-banana")?;
        assert_eq!(out, "Model 'nano-banana' already exists.\n");
        assert_eq!(editor.registry(), &before);

        let out = run_line(&mut editor, "/add house-model")?;
        assert_eq!(out, "Added house-model [text]\n");
        assert!(editor.registry().contains("house-model"));
        Ok(())
    }

    #[test]
    fn console_unredirect_clears_target() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let (_, mut editor) = seeded_editor(&temp)?;

        let out = run_line(&mut editor, "/unredirect nano-banana")?;
        assert!(out.starts_with("nano-banana no longer redirects"));
        assert_eq!(editor.registry().redirect_target("nano-banana"), None);
        Ok(())
    }

    #[test]
    fn console_redirect_cycle_is_rejected() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let (_, mut editor) = seeded_editor(&temp)?;

        let mut out = Vec::new();
        let err = handle_intent(
            &mut editor,
            &parse_intent("/redirect gemini-2.5-flash-image nano-banana"),
            &mut out,
        )
        .err();
        let tag = err
            .as_ref()
            .and_then(|err| err.downcast_ref::<RedirectError>())
            .map(RedirectError::tag);
        assert_eq!(tag, Some("cycle"));
        assert!(out.is_empty());
        assert_eq!(
            editor.registry().redirect_target("gemini-2.5-flash-image"),
            None
        );

        let out = run_line(&mut editor, "/redirect nano-banana gemini-3-pro-image-preview")?;
        assert!(out.starts_with("nano-banana now redirects to gemini-3-pro-image-preview"));
        Ok(())
    }

    #[test]
    fn console_save_persists_and_clears_diff() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let (config, mut editor) = seeded_editor(&temp)?;

        let out = run_line(&mut editor, "/save")?;
        assert!(out.starts_with("Saved ("));
        assert!(config.registry_path.is_file());
        assert!(!editor.is_dirty()?);
        assert_eq!(run_line(&mut editor, "/diff")?, "No pending changes.\n");

        let out = run_line(&mut editor, "/frobnicate")?;
        assert!(out.starts_with("Unknown command"));
        Ok(())
    }
}
