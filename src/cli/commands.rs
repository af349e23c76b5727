use crate::application::get::DEFAULT_PEEK;
use crate::application::query::DEFAULT_N_RESULTS;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docvault", about = "Embedded document store with vector similarity search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scripted example against a fresh in-memory store
    Demo,
    /// Create a collection
    Create {
        name: String,
        /// Collection metadata as a JSON object, e.g. {"hnsw:space": "cosine"}
        #[arg(long)]
        metadata: Option<String>,
    },
    /// List collections
    Collections,
    /// Delete a collection and all of its documents
    Drop { name: String },
    /// Add documents; fails if any id already exists
    Add {
        collection: String,
        /// JSON with ids, documents, metadatas, embeddings
        json: String,
    },
    /// Add documents, replacing existing ids
    Upsert {
        collection: String,
        /// JSON with ids, documents, metadatas, embeddings
        json: String,
    },
    /// Update fields of existing documents
    Update {
        collection: String,
        /// JSON with ids, documents, metadatas, embeddings
        json: String,
    },
    /// Similarity query
    Query {
        collection: String,
        /// One or more query texts
        #[arg(required = true)]
        texts: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_N_RESULTS)]
        n_results: usize,
        /// Metadata filter as JSON, e.g. {"source": "notion"}
        #[arg(long = "where")]
        where_filter: Option<String>,
        /// Document filter as JSON, e.g. {"$contains": "listening"}
        #[arg(long)]
        where_document: Option<String>,
        /// Comma separated fields: documents, metadatas, distances, embeddings
        #[arg(long, value_delimiter = ',')]
        include: Option<Vec<String>>,
    },
    /// Fetch documents by id or filter
    Get {
        collection: String,
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
        #[arg(long = "where")]
        where_filter: Option<String>,
        #[arg(long)]
        where_document: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        #[arg(long, value_delimiter = ',')]
        include: Option<Vec<String>>,
    },
    /// Number of documents in a collection
    Count { collection: String },
    /// First documents of a collection
    Peek {
        collection: String,
        #[arg(long, default_value_t = DEFAULT_PEEK)]
        limit: usize,
    },
    /// Delete documents by id or filter
    Delete {
        collection: String,
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
        #[arg(long = "where")]
        where_filter: Option<String>,
        #[arg(long)]
        where_document: Option<String>,
    },
}
