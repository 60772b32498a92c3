//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// AI assistant CLI - Gemini chat and image captioning, `OctoAI` image generation.
#[derive(Parser, Debug)]
#[command(name = "guru", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// The assistant's features.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with the assistant. Without a message, reads one message per line from stdin.
    Chat(ChatArgs),
    /// Describe an image.
    Caption(CaptionArgs),
    /// Generate an image from a text prompt.
    Generate(GenerateArgs),
}

/// Arguments of `guru chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send. Omit for an interactive conversation.
    pub message: Option<String>,

    /// JSON file holding the conversation; created or updated after each turn.
    #[arg(short, long)]
    pub session: Option<PathBuf>,

    /// Chat model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments of `guru caption`.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// JPEG or PNG image to describe.
    pub image: Option<PathBuf>,

    /// Instruction sent along with the image.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Vision model name or short alias.
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments of `guru generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Generation engine.
    #[arg(short, long)]
    pub engine: Option<String>,

    /// Aspect ratio (e.g., 1:1, 16:9, 9:16).
    #[arg(short, long, default_value = "1:1")]
    pub aspect_ratio: String,

    /// Things the image should not contain.
    #[arg(long)]
    pub negative_prompt: Option<String>,

    /// Denoising steps.
    #[arg(long, default_value = "30")]
    pub steps: u32,

    /// Guidance scale.
    #[arg(long, default_value = "7.5")]
    pub cfg_scale: f32,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of images to generate.
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,

    /// Output format: jpeg, png, webp.
    #[arg(short, long)]
    pub format: Option<String>,

    /// Directory to save images into.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

impl GenerateArgs {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is missing or blank, or if the file
    /// cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        let text = if let Some(ref text) = self.prompt {
            text.clone()
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)?
        } else {
            String::new()
        };

        let text = text.trim();
        if text.is_empty() {
            Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "Please enter a prompt."))
        } else {
            Ok(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["guru", "generate"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Generate(args) => args,
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn positional_prompt() {
        let args = generate_args(&["a cat"]);
        assert_eq!(args.prompt.as_deref(), Some("a cat"));
        assert!(args.prompt_file.is_none());
        assert_eq!(args.resolve_prompt().unwrap(), "a cat");
    }

    #[test]
    fn prompt_file_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "prompt from file\n").unwrap();

        let args = generate_args(&["-p", path.to_str().unwrap()]);
        assert!(args.prompt.is_none());
        assert_eq!(args.resolve_prompt().unwrap(), "prompt from file");
    }

    #[test]
    fn generate_defaults() {
        let args = generate_args(&["a cat"]);
        assert_eq!(args.aspect_ratio, "1:1");
        assert_eq!(args.steps, 30);
        assert!((args.cfg_scale - 7.5).abs() < f32::EPSILON);
        assert_eq!(args.count, 1);
        assert!(args.engine.is_none());
        assert!(args.format.is_none());
        assert!(args.output_dir.is_none());
        assert!(args.seed.is_none());
    }

    #[test]
    fn generate_all_options() {
        let args = generate_args(&[
            "-e",
            "ssd",
            "-a",
            "16:9",
            "--negative-prompt",
            "blur",
            "--steps",
            "40",
            "--cfg-scale",
            "9",
            "--seed",
            "7",
            "-n",
            "2",
            "-f",
            "png",
            "-o",
            "out",
            "a landscape",
        ]);
        assert_eq!(args.engine.as_deref(), Some("ssd"));
        assert_eq!(args.aspect_ratio, "16:9");
        assert_eq!(args.negative_prompt.as_deref(), Some("blur"));
        assert_eq!(args.steps, 40);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.count, 2);
        assert_eq!(args.format.as_deref(), Some("png"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.prompt.as_deref(), Some("a landscape"));
    }

    #[test]
    fn missing_or_blank_prompt_errors() {
        assert!(generate_args(&[]).resolve_prompt().is_err());
        assert!(generate_args(&["   "]).resolve_prompt().is_err());
    }

    #[test]
    fn chat_with_session_and_global_verbose() {
        let cli = Cli::parse_from(["guru", "chat", "-s", "s.json", "hello", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Chat(args) => {
                assert_eq!(args.message.as_deref(), Some("hello"));
                assert_eq!(args.session, Some(PathBuf::from("s.json")));
                assert!(args.model.is_none());
            }
            other => panic!("expected chat, got {other:?}"),
        }
    }

    #[test]
    fn caption_image_is_optional_at_parse_time() {
        let cli = Cli::parse_from(["guru", "caption"]);
        match cli.command {
            Command::Caption(args) => assert!(args.image.is_none()),
            other => panic!("expected caption, got {other:?}"),
        }
    }
}
