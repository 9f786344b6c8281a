// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file formats that don't belong to the data
// pipeline itself:
//
//   tokenizer_store.rs — Resolves the terminator token from a
//                        Hugging Face model directory
//                        (tokenizer_config.json + tokenizer.json)
//
//   config_store.rs    — Saves / loads the RunConfig as JSON so
//                        every stage of a run shares one config
//
//   run_report.rs      — Appends a CSV row per formatting run
//
//   dataset_info.rs    — Registers the output file in a
//                        LLaMA-Factory dataset_info.json

/// Terminator resolution from tokenizer files
pub mod tokenizer_store;

/// RunConfig persistence
pub mod config_store;

/// Per-run CSV report
pub mod run_report;

/// LLaMA-Factory dataset_info.json registration
pub mod dataset_info;
