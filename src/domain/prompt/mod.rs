//! Prompt assembly for grounded question answering

mod assembler;
mod instructions;

pub use assembler::{format_context, PromptAssembler};
pub use instructions::{CITATION_RULES, PAGE_NUMBER_HINT, SYSTEM_INSTRUCTIONS};
