//! Inspect command - shows how a PDF is split into chunks

use std::path::PathBuf;

use clap::Args;

use crate::domain::knowledge_base::Document;
use crate::domain::rag::ChunkPreviewFormatter;
use crate::infrastructure::ingestion::DocumentPreparer;

/// Arguments for the inspect command
#[derive(Args, Clone)]
pub struct InspectArgs {
    /// PDF to split (defaults to the configured ingestion path)
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Characters of each chunk to print
    #[arg(long, default_value_t = 80)]
    pub preview_chars: usize,
}

/// Extract and chunk the PDF, printing one line per chunk
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    let (config, problems) = super::load_config();
    for problem in problems {
        eprintln!("warning: {}", problem);
    }

    let path = args
        .pdf
        .unwrap_or_else(|| PathBuf::from(&config.ingestion.pdf_path));

    let preparer = DocumentPreparer::pdf(config.ingestion.chunking())
        .with_clean_text(config.ingestion.clean_text);
    let prepared = preparer.prepare_file(&path).await?;

    let formatter = ChunkPreviewFormatter::new(args.preview_chars, "…", "\n");
    for document in &prepared.documents {
        println!("{}", chunk_line(document, &formatter));
    }

    println!(
        "{}: {} pages, {} chunks",
        prepared.source,
        prepared.pages,
        prepared.documents.len()
    );

    Ok(())
}

fn chunk_line(document: &Document, formatter: &ChunkPreviewFormatter) -> String {
    let field = |key: &str| {
        document
            .metadata
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".to_string())
    };
    let preview = formatter.preview(&document.content).replace('\n', " ");

    format!(
        "page {:>3}  chunk {:>4}  {:>5} chars  {}",
        field("page_number"),
        field("chunk_index"),
        document.content.chars().count(),
        preview
    )
}
