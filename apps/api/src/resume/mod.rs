// Resume service: tailoring through the text generator, upload extraction, and
// the HTTP handlers that expose Normalize → Layout → Render.
// All generative calls go through llm_client::TextGenerator.

pub mod customizer;
pub mod extract;
pub mod handlers;
pub mod prompts;
