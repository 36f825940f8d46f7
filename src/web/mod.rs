//! Web server for browser-based guide design.
//!
//! Users paste a plain sequence or FASTA text (or upload a file), see live
//! validation feedback, pick a CRISPR system and get scored guides back.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! crispr-guide serve
//!
//! # Production settings, custom port, open a browser
//! crispr-guide serve --env production --port 3000 --open
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page
//! - `GET /systems` - Available CRISPR systems
//! - `POST /analyze` - Find and score guides (`{sequence, system, off_targets}`)
//! - `POST /api/parse` - Validate input text and summarize its sequences
//! - `POST /api/upload` - Same as `/api/parse` for an uploaded file (multipart `file`)
//! - `GET /download` - Last analysis result as `crispr_analysis_results.json`

pub mod server;
