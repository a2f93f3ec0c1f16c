//! Writes a small, self-consistent artifact set into a directory.

use std::path::Path;

use shelfwise_core::config::ArtifactPaths;
use shelfwise_core::types::BookRecord;
use shelfwise_embed::HashingEmbedder;
use shelfwise_text::TermMatrixArtifact;
use shelfwise_vector::write_embedding_matrix;

pub const DIM: usize = 128;

pub fn corpus() -> Vec<BookRecord> {
    [
        ("b1", "The Hobbit", "J.R.R. Tolkien", "a hobbit and a band of dwarves journey to reclaim treasure from a dragon", Some(1937)),
        ("b2", "The Lord of the Rings", "J.R.R. Tolkien", "a fellowship sets out to destroy the one ring", Some(1954)),
        ("b3", "Dune", "Frank Herbert", "desert planet spice politics and an interstellar empire", Some(1965)),
        ("b4", "The Left Hand of Darkness", "Ursula K. Le Guin", "an envoy visits an icy planet whose people have no fixed gender", Some(1969)),
        ("b5", "Neuromancer", "William Gibson", "a washed up hacker is hired for one last job in cyberspace", Some(1984)),
        ("b6", "The Martian", "Andy Weir", "an astronaut stranded on mars improvises to survive", Some(2011)),
        ("b7", "Hyperion", "Dan Simmons", "pilgrims share their stories on a space adventure to the time tombs", Some(1989)),
    ]
    .into_iter()
    .map(|(id, title, authors, description, year)| BookRecord {
        id: id.to_string(),
        title: title.to_string(),
        authors: authors.to_string(),
        description: description.to_string(),
        publication_year: year,
        language: Some("en".to_string()),
    })
    .collect()
}

fn book_text(b: &BookRecord) -> String { format!("{} {}", b.title, b.description) }

/// Write metadata, embeddings and term matrix with default file names.
pub fn write_artifacts(dir: &Path) -> ArtifactPaths {
    std::fs::create_dir_all(dir).unwrap();
    let paths = ArtifactPaths::in_dir(dir);
    let books = corpus();
    std::fs::write(&paths.metadata, serde_json::to_string_pretty(&books).unwrap()).unwrap();

    let embedder = HashingEmbedder::new(DIM, 0);
    let ids: Vec<String> = books.iter().map(|b| b.id.clone()).collect();
    let vectors: Vec<Vec<f32>> = books.iter().map(|b| embedder.embed_text(&book_text(b))).collect();
    write_embedding_matrix(&paths.embeddings, DIM, &ids, &vectors).unwrap();

    let texts: Vec<String> = books.iter().map(book_text).collect();
    std::fs::write(&paths.term_matrix, serde_json::to_string(&TermMatrixArtifact::fit(&texts)).unwrap()).unwrap();
    paths
}
