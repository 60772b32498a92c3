//! Live adapters that call the real provider APIs.

pub mod gemini;
pub mod octoai;
