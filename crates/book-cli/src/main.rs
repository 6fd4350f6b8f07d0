mod logger;

use anyhow::{Context, Result, bail};
use book_export::{
    ExportOptions, Exporter, FontSet, FontSource, PdfBackend, ResvgRasterizer, SyntectLexer,
    UnavailableTypesetter,
};
use book_layout::{
    ChapterUpdate, ContentUnit, EXPORT_FILE_NAME, ManuscriptStore, PageEntry, PaginationOptions,
    PreviewMode, PreviewState, Speaker, export_json, paginate,
};
use clap::{Parser, Subcommand, ValueEnum};
use logger::StderrLogger;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bookc", about = "Compose, preview and export a dialogue book", version)]
struct Cli {
    /// Manuscript store file
    #[arg(long, global = true, default_value = "manuscript.json")]
    store: PathBuf,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Paginate the manuscript and print the visible pages
    Preview {
        #[arg(long, default_value = "spread", value_enum)]
        mode: ModeArg,

        /// 1-based page to start from
        #[arg(long, default_value = "1")]
        page: usize,

        /// Zoom in percent (50-150)
        #[arg(long, default_value = "100")]
        zoom: u16,

        /// Pagination options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Units per page, overrides the options file
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Render the manuscript to a PDF
    Export {
        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Export options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory with CrimsonPro and FiraCode TTF files to embed
        #[arg(long)]
        fonts: Option<PathBuf>,

        /// Running header on even pages
        #[arg(long)]
        even_header: Option<String>,

        /// Running header on odd pages
        #[arg(long)]
        odd_header: Option<String>,
    },

    /// Replace the manuscript with a JSON chapter file
    Import {
        input: PathBuf,
    },

    /// Write the manuscript to a JSON chapter file
    Backup {
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Append a new chapter
    AddChapter {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subtitle: Option<String>,
    },

    /// Append an entry to a chapter
    AddEntry {
        /// Chapter id
        #[arg(short, long)]
        chapter: u32,

        #[arg(short, long, default_value = "text", value_enum)]
        kind: KindArg,

        /// Speaker for text entries
        #[arg(short, long, default_value = "you", value_enum)]
        speaker: SpeakerArg,

        /// Insert at this 0-based position instead of appending
        #[arg(long)]
        at: Option<usize>,

        text: String,
    },

    /// Remove an entry from a chapter
    RemoveEntry {
        /// Chapter id
        #[arg(short, long)]
        chapter: u32,

        /// 0-based entry position
        index: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Spread,
    Single,
    Continuous,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Text,
    Code,
    Math,
}

#[derive(Clone, Copy, ValueEnum)]
enum SpeakerArg {
    You,
    Alan,
}

impl From<ModeArg> for PreviewMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Spread => Self::Spread,
            ModeArg::Single => Self::Single,
            ModeArg::Continuous => Self::Continuous,
        }
    }
}

impl From<SpeakerArg> for Speaker {
    fn from(arg: SpeakerArg) -> Self {
        match arg {
            SpeakerArg::You => Self::You,
            SpeakerArg::Alan => Self::Alan,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet))
        .init()
        .context("Failed to install logger")?;

    let store = ManuscriptStore::new(&cli.store);

    match cli.command {
        Commands::Preview {
            mode,
            page,
            zoom,
            config,
            capacity,
        } => {
            let mut options = match config {
                Some(path) => PaginationOptions::load(&path).await?,
                None => PaginationOptions::default(),
            };
            if let Some(capacity) = capacity {
                options.page_capacity = capacity;
            }
            options.validate()?;

            let manuscript = store.load().await;
            let pages = paginate(&manuscript, &options);

            let mut state = PreviewState::new(mode.into());
            state.set_zoom(zoom);
            state.current_page = page.saturating_sub(1).min(pages.len().saturating_sub(1));

            println!(
                "{} pages, showing from page {} at {}%",
                pages.len(),
                state.current_page + 1,
                state.zoom_percent()
            );
            for page in state.visible_pages(&pages) {
                print_page(page);
            }
        }

        Commands::Export {
            output_dir,
            config,
            fonts,
            even_header,
            odd_header,
        } => {
            let mut options = match config {
                Some(path) => ExportOptions::load(&path).await?,
                None => ExportOptions::default(),
            };
            if let Some(header) = even_header {
                options.even_header = header;
            }
            if let Some(header) = odd_header {
                options.odd_header = header;
            }

            let fonts = match fonts {
                Some(dir) => FontSource::Files(Arc::new(FontSet::load(&dir).await?)),
                None => FontSource::default(),
            };
            let manuscript = store.load().await;
            let title = manuscript
                .chapters
                .first()
                .map(|chapter| chapter.title.clone())
                .unwrap_or_default();

            let exporter = Exporter::new(
                UnavailableTypesetter,
                ResvgRasterizer,
                SyntectLexer::csharp(),
                PdfBackend::new(fonts).with_title(title),
                options,
            );
            let path = exporter.generate_pdf(&manuscript, &output_dir).await?;
            println!("Exported → {}", path.display());
        }

        Commands::Import { input } => {
            let manuscript = store.import_json(&input).await?;
            println!(
                "Imported {} chapters from {}",
                manuscript.chapters.len(),
                input.display()
            );
        }

        Commands::Backup { output } => {
            let manuscript = store.load().await;
            export_json(&manuscript, &output).await?;
            println!("Backed up → {}", output.display());
        }

        Commands::AddChapter { title, subtitle } => {
            let mut manuscript = store.load().await;
            let id = manuscript.add_chapter();
            if title.is_some() || subtitle.is_some() {
                manuscript.update_chapter(id, ChapterUpdate { title, subtitle })?;
            }
            save(&store, &manuscript).await?;
            println!("Added chapter {}", id);
        }

        Commands::AddEntry {
            chapter,
            kind,
            speaker,
            at,
            text,
        } => {
            let unit = match kind {
                KindArg::Text => ContentUnit::dialogue(speaker.into(), text),
                KindArg::Code => ContentUnit::code(text),
                KindArg::Math => ContentUnit::math(text),
            };
            let mut manuscript = store.load().await;
            match at {
                Some(index) => manuscript.insert_unit(chapter, index, unit)?,
                None => manuscript.add_unit(chapter, unit)?,
            }
            save(&store, &manuscript).await?;
            println!("Added entry to chapter {}", chapter);
        }

        Commands::RemoveEntry { chapter, index } => {
            let mut manuscript = store.load().await;
            let removed = manuscript.remove_unit(chapter, index)?;
            save(&store, &manuscript).await?;
            println!("Removed {:?} entry from chapter {}", removed.kind(), chapter);
        }
    }

    Ok(())
}

async fn save(store: &ManuscriptStore, manuscript: &book_layout::Manuscript) -> Result<()> {
    if !store.save(manuscript).await {
        bail!("Failed to save manuscript to {}", store.path().display());
    }
    Ok(())
}

fn print_page(page: &book_layout::Page) {
    println!();
    println!("── page {} · {}", page.page_number, page.running_header);
    for entry in &page.content {
        match entry {
            PageEntry::ChapterTitle { title, subtitle } => {
                println!("   # {}", title);
                println!("     {}", subtitle);
            }
            PageEntry::Unit(numbered) => {
                let label = numbered
                    .label
                    .map(|label| format!("[{}] ", label))
                    .unwrap_or_default();
                match &numbered.unit {
                    ContentUnit::Dialogue { speaker, text } => {
                        let indent = if speaker.is_indented() { "      " } else { "   " };
                        println!("{}{}: {}", indent, speaker, text);
                    }
                    ContentUnit::Code { text } => {
                        println!("   λ {}", label);
                        for line in text.lines() {
                            println!("     {}", line);
                        }
                    }
                    ContentUnit::Math { text } => println!("   ∑ {}{}", label, text),
                }
            }
        }
    }
}
