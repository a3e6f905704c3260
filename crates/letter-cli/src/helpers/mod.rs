pub mod input;
pub mod parsing;

pub use input::{compose_draft, prompt_paragraph_password, read_draft_file};
pub use parsing::{build_link, extract_token, parse_password_assignments};
