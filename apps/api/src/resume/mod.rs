// Résumé classification: upload → extract → normalize → predict.
// Extraction and prediction are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod handlers;
pub mod pipeline;
