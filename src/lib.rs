// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive assistant.
//
// Module responsibilities:
// - `config`: endpoint, model and timeout, with defaults, config file and
//   environment overrides.
// - `prompt`: the instructional prompt template.
// - `api`: blocking client for the Ollama chat endpoint; returns the reply
//   as a lazy stream of NDJSON lines.
// - `render`: prints reply fragments as they arrive.
// - `input`: reads operator answers from a terminal or any reader.
// - `ui`: the text menus that tie everything together.
pub mod api;
pub mod config;
pub mod input;
pub mod prompt;
pub mod render;
pub mod ui;
