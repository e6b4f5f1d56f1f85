//! mkpdf - Write a one-page PDF, optionally encrypted
//!
//! A command line tool that produces a minimal document containing a
//! single line of text, for checking viewers against the writer's
//! xref and Standard Security Handler output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use pdfscribe_core::api::{DocumentBuilder, EncryptionBuilder};
use pdfscribe_core::model::{Dictionary, PdfObject, PdfStream};
use pdfscribe_core::security::{EncryptMode, Permissions};
use pdfscribe_core::{PdfDocument, PdfVersion};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Security handler revision.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Mode {
    /// RC4, 40-bit key
    #[default]
    R2,
    /// RC4, up to 128-bit key
    R3,
    /// AES-128
    R4,
}

impl From<Mode> for EncryptMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::R2 => Self::R2,
            Mode::R3 => Self::R3,
            Mode::R4 => Self::R4,
        }
    }
}

/// Write a one-page PDF, optionally encrypted with the Standard Security
/// Handler.
#[derive(Parser, Debug)]
#[command(name = "mkpdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the file to write, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Text placed on the page
    #[arg(short = 't', long, default_value = "Hello, world")]
    text: String,

    /// Document title stored in the Info dictionary
    #[arg(long)]
    title: Option<String>,

    /// Header version (1.2 - 1.7); encryption may raise it
    #[arg(long = "pdf-version", default_value = "1.4")]
    pdf_version: String,

    /// Password needed to open the document; enables encryption
    #[arg(short = 'u', long = "user-password")]
    user_password: Option<String>,

    /// Owner password; enables encryption
    #[arg(short = 'O', long = "owner-password")]
    owner_password: Option<String>,

    /// Security handler revision
    #[arg(short = 'm', long, value_enum, default_value = "r2")]
    mode: Mode,

    /// Key length in bytes (R3 only accepts 5 - 16)
    #[arg(short = 'k', long = "key-length")]
    key_length: Option<usize>,

    /// Comma-separated permissions to grant, e.g. "print,copy".
    /// Names: print, edit, copy, annotate, fill-form, accessibility,
    /// assemble, print-high, all, none
    #[arg(short = 'p', long, default_value = "all")]
    permit: String,

    /// Append an incremental update that adds a second Info revision
    #[arg(long = "with-update", action = ArgAction::SetTrue)]
    with_update: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn parse_permissions(list: &str) -> Result<Permissions> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .try_fold(Permissions::NONE, |acc, name| {
            Permissions::from_name(name)
                .map(|p| acc | p)
                .with_context(|| format!("unknown permission: {name}"))
        })
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_document(args: &Args) -> Result<PdfDocument> {
    let version: PdfVersion = args.pdf_version.parse()?;
    let mut builder = DocumentBuilder::new().version(version);

    if args.user_password.is_some() || args.owner_password.is_some() {
        let mut encryption = EncryptionBuilder::new()
            .mode(args.mode.into())
            .permissions(parse_permissions(&args.permit)?);
        if let Some(password) = &args.user_password {
            encryption = encryption.user_password(password);
        }
        if let Some(password) = &args.owner_password {
            encryption = encryption.owner_password(password);
        }
        if let Some(key_length) = args.key_length {
            encryption = encryption.key_length(key_length);
        }
        builder = builder.encryption(encryption);
    } else if args.key_length.is_some() {
        bail!("--key-length requires a user or owner password");
    }

    let mut doc = builder.build()?;

    let mut font = Dictionary::with_type("Font");
    font.set("Subtype", PdfObject::name("Type1"));
    font.set("BaseFont", PdfObject::name("Helvetica"));
    let font = doc.add(font)?;

    let content = format!(
        "BT /F1 24 Tf 72 720 Td ({}) Tj ET",
        escape_text(&args.text)
    );
    let content = doc.add(PdfStream::from_data(content.into_bytes()))?;

    let pages = doc.add(Dictionary::with_type("Pages"))?;

    let mut font_map = Dictionary::new();
    font_map.set("F1", font);
    let mut resources = Dictionary::new();
    resources.set("Font", font_map);

    let mut page = Dictionary::with_type("Page");
    page.set("Parent", pages);
    let media_box: Vec<PdfObject> = [0, 0, 612, 792].into_iter().map(PdfObject::Int).collect();
    page.set("MediaBox", media_box);
    page.set("Resources", resources);
    page.set("Contents", content);
    let page = doc.add(page)?;

    let pages_dict = doc.dict_mut(pages)?;
    pages_dict.set("Kids", vec![PdfObject::from(page)]);
    pages_dict.set("Count", 1);

    let mut catalog = Dictionary::with_type("Catalog");
    catalog.set("Pages", pages);
    let catalog = doc.add(catalog)?;
    doc.set_root(catalog);

    let mut info = Dictionary::new();
    if let Some(title) = &args.title {
        info.set("Title", PdfObject::string(title));
    }
    info.set("Producer", PdfObject::string("mkpdf"));
    let info = doc.add(info)?;
    doc.set_info(info);

    Ok(doc)
}

fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut doc = build_document(&args)?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let path = PathBuf::from(&args.outfile);
        let file = File::create(&path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        Box::new(BufWriter::new(file))
    };

    let written = doc.save(&mut output)?;
    info!(bytes = written, version = %doc.version(), "wrote document");

    if args.with_update {
        doc.begin_update()?;
        let mut info = Dictionary::new();
        if let Some(title) = &args.title {
            info.set("Title", PdfObject::string(title));
        }
        info.set("Producer", PdfObject::string("mkpdf (updated)"));
        let info = doc.add(info)?;
        doc.set_info(info);
        let appended = doc.save_update(&mut output)?;
        info!(bytes = appended, "appended update");
    }

    output.flush()?;
    Ok(())
}
