use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use rbgen_core::config::{self, CONFIG_FILE_NAME, GenerationOptions, RbgenConfig};
use rbgen_core::host::{ConfirmPolicy, Confirmation, Host, LocalHost, MemoryHost};
use rbgen_core::model::{ElementId, ElementKind, Model, Relationship};
use rbgen_core::{CodeGenerator, Outcome, parse, transform};
use rbgen_ruby::{RubyGenerator, render_element};

#[derive(Parser)]
#[command(name = "rbgen", about = "Generate Ruby classes from a UML model", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Ruby sources from a model snapshot
    Generate {
        /// Path to the model snapshot (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory the root package folder is created in
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Qualified name of the element to generate from, e.g. `Shop.Billing`
        #[arg(long)]
        root: Option<String>,

        /// Overwrite existing package folders without asking
        #[arg(long, conflicts_with = "no_overwrite")]
        force: bool,

        /// Cancel instead of overwriting an existing package folder
        #[arg(long)]
        no_overwrite: bool,

        /// Print the files that would be written instead of writing them
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// Validate a model snapshot
    Validate {
        /// Path to the model snapshot
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the parsed model
    Inspect {
        /// Path to the model snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,

        /// Print the Ruby source of one element instead of the summary
        #[arg(long, value_name = "QUALIFIED_NAME")]
        render: Option<String>,

        /// Generation root the rendered element is placed under (defaults to
        /// the configured root, then the snapshot root)
        #[arg(long, value_name = "QUALIFIED_NAME", requires = "render")]
        root: Option<String>,
    },

    /// Initialize a new rbgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Command-line overrides for the configured generation options.
#[derive(Args, Debug, Default, Clone)]
struct OptionFlags {
    /// Indent with tabs
    #[arg(long)]
    tab: bool,

    /// Spaces per indentation level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Skip the `initialize` method
    #[arg(long)]
    no_initialize: bool,

    /// Use attr_reader/attr_accessor instead of getter and setter methods
    #[arg(long)]
    accessors: bool,

    /// Skip the placeholder `to_s` method
    #[arg(long)]
    no_to_s: bool,

    /// Leave model documentation out of the output
    #[arg(long)]
    no_doc: bool,
}

impl OptionFlags {
    fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if self.tab {
            options.use_tab = true;
        }
        if let Some(indent) = self.indent {
            options.use_tab = false;
            options.indent_spaces = indent;
        }
        if self.no_initialize {
            options.initialize_method = false;
        }
        if self.accessors {
            options.use_attribute_accessor = true;
        }
        if self.no_to_s {
            options.to_string_method = false;
        }
        if self.no_doc {
            options.documentation = false;
        }
        options
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            root,
            force,
            no_overwrite,
            dry_run,
            flags,
        } => {
            let policy = if force {
                ConfirmPolicy::AlwaysAccept
            } else if no_overwrite {
                ConfirmPolicy::AlwaysDecline
            } else {
                ConfirmPolicy::Prompt
            };
            cmd_generate(input, output, root, policy, dry_run, &flags)
        }

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect {
            input,
            format,
            render,
            root,
        } => cmd_inspect(input, format, render, root),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "rbgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<RbgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_model(path: &Path) -> Result<Model> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };

    let model = transform::build_model(&parsed)?;
    Ok(model)
}

fn resolve_root(model: &Model, root: Option<&str>) -> Result<ElementId> {
    match root {
        None => Ok(model.root()),
        Some(name) => model
            .find_by_qualified_name(name)
            .with_context(|| format!("no element named `{name}` in the model")),
    }
}

fn cmd_generate(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    root: Option<String>,
    policy: ConfirmPolicy,
    dry_run: bool,
    flags: &OptionFlags,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&cfg.output));
    let model = load_model(&input)?;
    let root = resolve_root(&model, root.as_deref().or(cfg.root.as_deref()))?;
    let options = flags.apply(cfg.options.clone());
    debug!("generation options: {options:?}");

    eprintln!(
        "Generating {} → {}",
        model.qualified_name(root),
        output_dir.display()
    );

    if dry_run {
        let mut host = MemoryHost::new(&output_dir, Confirmation::Accepted);
        let outcome = run_generator(&model, root, &output_dir, &options, &mut host)?;
        for path in &outcome.report().files {
            if let Some(content) = host.file(path) {
                println!("==> {} <==\n{content}\n", path.display());
            }
        }
        eprintln!("Dry run: {} file(s) not written.", outcome.report().files.len());
        return Ok(());
    }

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let mut host = LocalHost::new(policy);
    let outcome = run_generator(&model, root, &output_dir, &options, &mut host)?;
    match outcome {
        Outcome::Completed(report) => {
            for path in &report.files {
                eprintln!("  wrote {}", path.display());
            }
            eprintln!(
                "Generated {} files in {}",
                report.files.len(),
                output_dir.display()
            );
        }
        Outcome::Cancelled(report) => {
            let declined = report
                .declined
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            eprintln!("Generation cancelled: {declined} was left untouched.");
            if !report.files.is_empty() {
                eprintln!("  {} file(s) were written before cancelling.", report.files.len());
            }
        }
    }
    Ok(())
}

fn run_generator(
    model: &Model,
    root: ElementId,
    output_dir: &Path,
    options: &GenerationOptions,
    host: &mut dyn Host,
) -> Result<Outcome> {
    RubyGenerator
        .generate(model, root, output_dir, options, host)
        .map_err(|e| anyhow::anyhow!(e))
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let model = load_model(&input)?;
    let summary = count_elements(&model);

    eprintln!("Valid model: {}", model.element(model.root()).name);
    eprintln!("  Packages: {}", summary.packages);
    eprintln!("  Classes: {}", summary.classes);
    eprintln!("  Interfaces: {}", summary.interfaces);
    if summary.other > 0 {
        eprintln!("  Unsupported (skipped): {}", summary.other);
    }
    eprintln!("  Relationships: {}", model.relationships().len());

    eprintln!("Validation successful.");
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ElementCounts {
    packages: usize,
    classes: usize,
    interfaces: usize,
    other: usize,
}

fn count_elements(model: &Model) -> ElementCounts {
    let mut counts = ElementCounts::default();
    for element in model.elements() {
        match element.kind {
            ElementKind::Package(_) => counts.packages += 1,
            ElementKind::Class(_) => counts.classes += 1,
            ElementKind::Interface(_) => counts.interfaces += 1,
            ElementKind::Other(_) => counts.other += 1,
        }
    }
    counts
}

fn cmd_inspect(
    input: PathBuf,
    format: InspectFormat,
    render: Option<String>,
    root: Option<String>,
) -> Result<()> {
    let model = load_model(&input)?;

    if let Some(name) = render {
        let cfg = try_load_config()?.unwrap_or_default();
        let root = root.as_deref().or(cfg.root.as_deref());
        println!("{}", render_source(&model, root, &name, &cfg.options)?);
        return Ok(());
    }

    let summary = build_inspect_summary(&model);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Ruby source of one element, laid out as `generate` would write it from
/// `root`.
fn render_source(
    model: &Model,
    root: Option<&str>,
    name: &str,
    options: &GenerationOptions,
) -> Result<String> {
    let root = resolve_root(model, root)?;
    let id = resolve_root(model, Some(name))?;
    if !is_within(model, id, root) {
        anyhow::bail!(
            "`{name}` is not inside the generation root `{}`",
            model.qualified_name(root)
        );
    }
    let file = render_element(model, root, id, options)
        .with_context(|| format!("`{name}` is not a class or interface"))?;
    Ok(file.content)
}

fn is_within(model: &Model, id: ElementId, root: ElementId) -> bool {
    let mut current = Some(id);
    while let Some(element) = current {
        if element == root {
            return true;
        }
        current = model.element(element).parent;
    }
    false
}

fn build_inspect_summary(model: &Model) -> serde_json::Value {
    let elements: Vec<serde_json::Value> = model
        .elements()
        .filter(|e| e.id != model.root())
        .map(|e| {
            let kind = if e.is_annotation() {
                "annotation"
            } else {
                e.kind.label()
            };
            let mut entry = serde_json::json!({
                "name": model.qualified_name(e.id),
                "kind": kind,
            });
            if let Some(classifier) = e.classifier() {
                entry["attributes"] = serde_json::json!(classifier.attributes.len());
                entry["operations"] = serde_json::json!(classifier.operations.len());
            }
            entry
        })
        .collect();

    let relationships: Vec<serde_json::Value> = model
        .relationships()
        .iter()
        .map(|r| {
            let (from, to, name) = match r {
                Relationship::Generalization { source, target }
                | Relationship::InterfaceRealization { source, target } => {
                    (*source, *target, None)
                }
                Relationship::Association(a) => {
                    (a.end1.reference, a.end2.reference, Some(a.name.as_str()))
                }
            };
            let mut entry = serde_json::json!({
                "kind": r.kind(),
                "from": model.qualified_name(from),
                "to": model.qualified_name(to),
            });
            if let Some(name) = name.filter(|n| !n.is_empty()) {
                entry["name"] = serde_json::json!(name);
            }
            entry
        })
        .collect();

    serde_json::json!({
        "model": model.element(model.root()).name,
        "elements": elements,
        "relationships": relationships,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHOOL: &str = include_str!("../../rbgen-core/tests/fixtures/school.yaml");

    fn school() -> Model {
        transform::build_model(&parse::from_yaml(SCHOOL).unwrap()).unwrap()
    }

    #[test]
    fn test_flags_override_options() {
        let flags = OptionFlags {
            indent: Some(4),
            no_initialize: true,
            accessors: true,
            no_doc: true,
            ..OptionFlags::default()
        };
        let options = flags.apply(GenerationOptions::default());
        assert_eq!(options.indent_unit(), "    ");
        assert!(!options.initialize_method);
        assert!(options.use_attribute_accessor);
        assert!(options.to_string_method);
        assert!(!options.documentation);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let configured = GenerationOptions {
            use_tab: true,
            to_string_method: false,
            ..GenerationOptions::default()
        };
        assert_eq!(OptionFlags::default().apply(configured.clone()), configured);
    }

    #[test]
    fn test_resolve_root() {
        let model = school();
        assert_eq!(resolve_root(&model, None).unwrap(), model.root());
        let academics = resolve_root(&model, Some("School.Academics")).unwrap();
        assert_eq!(model.element(academics).name, "Academics");
        assert!(resolve_root(&model, Some("School.Missing")).is_err());
    }

    #[test]
    fn test_count_elements() {
        let counts = count_elements(&school());
        assert_eq!(
            counts,
            ElementCounts {
                packages: 2,
                classes: 4,
                interfaces: 1,
                other: 1,
            }
        );
    }

    #[test]
    fn test_inspect_summary() {
        let model = school();
        let summary = build_inspect_summary(&model);
        assert_eq!(summary["model"], "School");
        assert_eq!(summary["relationships"].as_array().unwrap().len(), 3);

        let elements = summary["elements"].as_array().unwrap();
        let transcript = elements
            .iter()
            .find(|e| e["name"] == "School.Transcript")
            .unwrap();
        assert_eq!(transcript["kind"], "annotation");

        let student = elements
            .iter()
            .find(|e| e["name"] == "School.Academics.Student")
            .unwrap();
        assert_eq!(student["attributes"], 7);
        assert_eq!(student["operations"], 3);
    }

    #[test]
    fn test_inspect_summary_names_associations() {
        let model = transform::build_model(
            &parse::from_yaml(
                r#"
name: Shop
ownedElements:
  - { kind: class, name: Cart }
  - { kind: class, name: Item }
relationships:
  - kind: association
    name: holds
    end1: { reference: Cart, navigable: false }
    end2: { reference: Item, navigable: true }
  - { kind: generalization, source: Cart, target: Item }
"#,
            )
            .unwrap(),
        )
        .unwrap();
        let summary = build_inspect_summary(&model);
        let relationships = summary["relationships"].as_array().unwrap();
        assert_eq!(relationships[0]["name"], "holds");
        assert_eq!(relationships[0]["from"], "Shop.Cart");
        assert!(relationships[1].get("name").is_none());
    }

    #[test]
    fn test_render_source_uses_root() {
        let model = school();
        let options = GenerationOptions::default();

        let from_snapshot_root =
            render_source(&model, None, "School.Academics.Student", &options).unwrap();
        assert!(from_snapshot_root.contains("module Academics\n"));
        assert!(from_snapshot_root.contains("require_relative '../person.rb'"));

        let from_package = render_source(
            &model,
            Some("School.Academics"),
            "School.Academics.Student",
            &options,
        )
        .unwrap();
        assert!(!from_package.contains("module Academics"));
        assert!(from_package.contains("\nclass Student < Person\n"));

        assert!(render_source(&model, Some("School.Academics"), "School.Person", &options).is_err());
        assert!(render_source(&model, None, "School.Registrar", &options).is_err());
    }

    #[test]
    fn test_dry_run_host_collects_files() {
        let model = school();
        let mut host = MemoryHost::new("out", Confirmation::Accepted);
        let outcome = run_generator(
            &model,
            model.root(),
            Path::new("out"),
            &GenerationOptions::default(),
            &mut host,
        )
        .unwrap();
        assert_eq!(outcome.report().files.len(), 5);
        assert!(host.file("out/School/Academics/student.rb").is_some());
    }
}
