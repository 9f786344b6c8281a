// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No formatting logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and the run configuration

// Explicit configuration shared by every stage of a run
pub mod run_config;

// Load → format → write one dataset
pub mod format_use_case;

// Describe a dataset without writing anything
pub mod inspect_use_case;
