//! wikitrans command-line interface
//!
//! Subcommands mirror the three things the tool can do: convert an article
//! to Markdown, translate it through DeepL, and list the languages DeepL
//! supports. Argument parsing, credential handling and exit-code mapping
//! live here; everything interesting is in the library.

use std::io::Write;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use log::debug;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use wikitrans::article::ArticleParser;
use wikitrans::deepl::DeeplClient;
use wikitrans::source::ArticleSource;

#[derive(Parser)]
#[command(name = "wikitrans", version)]
#[command(about = "Converts a Wikipedia article to Markdown and translates it using the DeepL.com API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a Wikipedia article
    Translate {
        /// Target language for translation
        target_lang: String,
        /// Full URL to the article or '-' for stdin
        article: ArticleSource,
        /// Source language, leave empty for autodetect
        #[arg(short, long, default_value = "")]
        source_lang: String,
        /// DeepL API authentication key
        #[arg(short = 'k', long, env = "WIKITRANS_DEEPL_AUTH_KEY")]
        auth_key: String,
    },
    /// Convert Wikipedia article HTML to Markdown
    Markdown {
        /// Full URL to the article or '-' for stdin
        #[arg(default_value = "-")]
        article: ArticleSource,
    },
    /// Retrieve the list of languages supported by DeepL
    ListLanguages {
        /// Which kind of languages to return (source or target)
        #[arg(short = 't', long = "type", default_value = "source")]
        kind: String,
        /// DeepL API authentication key
        #[arg(short = 'k', long, env = "WIKITRANS_DEEPL_AUTH_KEY")]
        auth_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Translate {
            target_lang,
            article,
            source_lang,
            auth_key,
        } => translate(article, &target_lang, &source_lang, auth_key).await?,
        Command::Markdown { article } => markdown(article).await?,
        Command::ListLanguages { kind, auth_key } => {
            list_languages(&DeeplClient::new(auth_key), &kind).await?
        }
    };

    print!("{}", output);
    std::io::stdout().flush()?;
    Ok(())
}

/// html5ever logs every tree-builder step at debug level; keep that out of
/// the way even when verbose logging is enabled
fn init_logging() {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_ignore_str("html5ever")
        .build();
    let _ = TermLogger::init(
        LevelFilter::Warn,
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Fetch an article, convert it to Markdown and translate the result
async fn translate(
    article: ArticleSource,
    target_lang: &str,
    source_lang: &str,
    auth_key: String,
) -> Result<String> {
    let markdown = markdown(article).await?;
    debug!("converted article to {} characters of markdown", markdown.len());

    let deepl = DeeplClient::new(auth_key);
    deepl
        .translate_to_string(&markdown, target_lang, source_lang)
        .await
}

/// Fetch an article and convert it to Markdown
async fn markdown(article: ArticleSource) -> Result<String> {
    let (html, content_type) = article.fetch().await?;
    debug!("retrieved {} bytes of article HTML", html.len());

    let parser = ArticleParser::new();
    let output = parser.parse_with_content_type(html.as_slice(), content_type.as_deref())?;
    Ok(output)
}

/// Format the supported-language listing, sorted by language code
async fn list_languages(client: &DeeplClient, kind: &str) -> Result<String> {
    if kind != "source" && kind != "target" {
        bail!("invalid language type '{}', expected 'source' or 'target'", kind);
    }

    let languages = client.supported_languages(kind == "target").await?;

    let mut codes: Vec<&String> = languages.keys().collect();
    codes.sort();

    let mut output = String::new();
    for code in codes {
        let lang = &languages[code];
        output.push_str(&format!(
            "{} - {} (formality_support: {})\n",
            code, lang.name, lang.supports_formality
        ));
    }

    Ok(output)
}
