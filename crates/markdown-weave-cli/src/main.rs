use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use markdown_weave_config::Config;
use markdown_weave_engine::generate::outline;
use markdown_weave_engine::{
    Document, Metadata, ParseContext, ParseOptions, Parser as DocumentParser, diff, to_markdown,
    to_plain_text,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "markdown-weave", version, about = "Parse and diff extended Markdown")]
struct Cli {
    /// Config file to use instead of ~/.config/markdown-weave/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document and print it
    Parse(ParseArgs),

    /// Show the structural difference between two documents
    Diff(DiffArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Markdown source file
    file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Page metadata as KEY=VALUE. Repeatable.
    #[arg(short, long = "meta", value_parser = parse_meta)]
    meta: Vec<(String, String)>,
}

#[derive(clap::Args)]
struct DiffArgs {
    /// The earlier version
    old: PathBuf,

    /// The later version
    new: PathBuf,

    /// Only print what changed, even if the config keeps unchanged content
    #[arg(long)]
    changes_only: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented element outline
    Tree,
    /// Regenerated Markdown
    Markdown,
    /// Plain text
    Text,
    /// The document as JSON
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let emoji = config.emoji_table()?;
    let options = ParseOptions {
        allow_script_tags: config.allow_script_tags,
    };

    let output = match cli.command {
        Command::Parse(args) => {
            let mut metadata = Metadata::default();
            for (key, value) in &args.meta {
                metadata.insert(key, value.as_str(), false);
            }
            let doc = parse_file(&args.file, options, &emoji, metadata)?;
            render(&doc, args.format)?
        }
        Command::Diff(args) => {
            let old = parse_file(&args.old, options.clone(), &emoji, Metadata::default())?;
            let new = parse_file(&args.new, options, &emoji, Metadata::default())?;
            let keep_unchanged = config.keep_unchanged && !args.changes_only;
            let changes = diff(&old, &new, keep_unchanged).with_context(|| {
                format!(
                    "Failed to diff '{}' against '{}'",
                    args.old.display(),
                    args.new.display()
                )
            })?;
            render(&changes, args.format)?
        }
    };
    print!("{output}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            let Some(config) = Config::load_from_path(path)? else {
                bail!("Config file '{}' does not exist", path.display());
            };
            Some(config)
        }
        None => Config::load()?,
    };
    if loaded.is_none() {
        log::debug!("no config file at {}", Config::config_path().display());
    }
    Ok(loaded.unwrap_or_default())
}

fn parse_file(
    path: &Path,
    options: ParseOptions,
    emoji: &BTreeMap<String, String>,
    metadata: Metadata,
) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let mut ctx = ParseContext::new(options);
    if !emoji.is_empty() {
        ctx = ctx.with_emoji(emoji);
    }
    let doc = DocumentParser::new(&ctx)
        .with_metadata(metadata)
        .parse(&text)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    log::info!("parsed {} into {} root element(s)", path.display(), doc.elements.len());
    Ok(doc)
}

fn render(doc: &Document, format: Format) -> Result<String> {
    Ok(match format {
        Format::Tree => outline(doc),
        Format::Markdown => to_markdown(doc),
        Format::Text => {
            let mut text = to_plain_text(doc);
            if !text.is_empty() {
                text.push('\n');
            }
            text
        }
        Format::Json => {
            let mut json = serde_json::to_string_pretty(doc)?;
            json.push('\n');
            json
        }
    })
}

fn parse_meta(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use markdown_weave_engine::parse_document;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn meta_pairs() {
        assert_eq!(
            parse_meta("AllowScriptTags = yes"),
            Ok(("AllowScriptTags".to_string(), "yes".to_string()))
        );
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn renders_each_format() {
        let doc = parse_document("# Hi\n\nSome *text*.").unwrap();
        assert_eq!(render(&doc, Format::Markdown).unwrap(), "# Hi\n\nSome *text*.\n");
        assert_eq!(render(&doc, Format::Text).unwrap(), "Hi\n\nSome text.\n");
        assert!(render(&doc, Format::Tree).unwrap().starts_with("Header 1\n"));
        let json: serde_json::Value = serde_json::from_str(&render(&doc, Format::Json).unwrap()).unwrap();
        assert!(json.get("elements").is_some_and(serde_json::Value::is_array));
    }

    #[test]
    fn parse_file_reports_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.md");
        let err = parse_file(&missing, ParseOptions::default(), &BTreeMap::new(), Metadata::default())
            .unwrap_err();
        assert!(err.to_string().contains("missing.md"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_config(Some(&temp_dir.path().join("none.toml"))).is_err());
    }

    #[test]
    fn emoji_from_config_reaches_the_parser() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("doc.md");
        std::fs::write(&file, "hi :smile:").unwrap();
        let emoji = BTreeMap::from([(":smile:".to_string(), "1F604".to_string())]);
        let doc = parse_file(&file, ParseOptions::default(), &emoji, Metadata::default()).unwrap();
        assert!(outline(&doc).contains("EmojiRef :smile: -> 1F604"));
    }
}
