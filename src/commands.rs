//! Subcommand handlers.

use std::io::{BufRead, IsTerminal, Write};

use crate::cli::{CaptionArgs, ChatArgs, GenerateArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::GuruError;
use crate::model::{resolve_for, Provider};
use crate::output::{prompt_base_name, resolve_unique_name, save_image};
use crate::params::{
    aspect_ratio_to_sdxl_dimensions, caption_mime_type, format_extension, validate_cfg_scale,
    validate_count, validate_format, validate_steps,
};
use crate::ports::{CaptionRequest, ChatModel, ImageRequest};
use crate::session::ChatSession;

/// Run `guru chat`: one turn when a message is given, otherwise a stdin loop.
///
/// # Errors
///
/// Returns an error if the model is not a chat model, the session file is
/// unusable, or (for a single turn) the chat model fails.
pub async fn chat(
    ctx: &ServiceContext<'_>,
    config: &Config,
    args: &ChatArgs,
) -> Result<(), GuruError> {
    let model_name = args.model.as_deref().unwrap_or(&config.defaults.chat_model);
    let model = resolve_for(model_name, Provider::Gemini, "chat")
        .map_err(GuruError::InvalidArgument)?;
    tracing::debug!(%model, "chat model");

    let mut session = match args.session {
        Some(ref path) => ChatSession::load(path)?,
        None => ChatSession::new(),
    };
    tracing::debug!(messages = session.messages().len(), "session loaded");
    let chat = ctx.chat_model()?;

    if let Some(ref message) = args.message {
        let message = message.trim();
        if message.is_empty() {
            return Err(GuruError::Input("Please enter a message.".to_string()));
        }
        let reply = session.send(chat.as_ref(), &model, message).await?;
        println!("{reply}");
        if let Some(ref path) = args.session {
            session.save(path)?;
        }
        return Ok(());
    }

    interactive(chat.as_ref(), &model, &mut session, args).await
}

async fn interactive(
    chat: &dyn ChatModel,
    model: &str,
    session: &mut ChatSession,
    args: &ChatArgs,
) -> Result<(), GuruError> {
    let stdin = std::io::stdin();
    let show_prompt = stdin.is_terminal();

    print!("{}", session.render());

    let mut lines = stdin.lock().lines();
    loop {
        if show_prompt {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else { break };
        let line = line?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/exit" || message == "/quit" {
            break;
        }

        match session.send(chat, model, message).await {
            Ok(reply) => {
                println!("assistant: {reply}");
                if let Some(ref path) = args.session {
                    session.save(path)?;
                }
            }
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    Ok(())
}

/// Run `guru caption`.
///
/// # Errors
///
/// Returns an error if no readable JPEG/PNG image was given or the
/// captioning service fails.
pub async fn caption(
    ctx: &ServiceContext<'_>,
    config: &Config,
    args: &CaptionArgs,
) -> Result<(), GuruError> {
    let model_name = args.model.as_deref().unwrap_or(&config.defaults.caption_model);
    let model = resolve_for(model_name, Provider::Gemini, "image captioning")
        .map_err(GuruError::InvalidArgument)?;

    let Some(ref path) = args.image else {
        return Err(GuruError::Input("Please upload an image.".to_string()));
    };
    if !path.is_file() {
        return Err(GuruError::Input(format!("Please upload an image. No file at {}", path.display())));
    }

    let image = std::fs::read(path)?;
    let mime_type = caption_mime_type(&image).map_err(GuruError::InvalidArgument)?;
    tracing::debug!(%model, mime_type, bytes = image.len(), "captioning image");

    let request = CaptionRequest {
        model,
        image,
        mime_type: mime_type.to_string(),
        prompt: args.prompt.clone(),
    };
    let reply = ctx.image_captioner()?.caption(&request).await?;
    println!("{}", reply.text.trim_end());
    Ok(())
}

/// Run `guru generate`.
///
/// # Errors
///
/// Returns an error for invalid parameters, a failed request, or when no
/// image survives the provider's safety filter.
pub async fn generate(
    ctx: &ServiceContext<'_>,
    config: &Config,
    args: &GenerateArgs,
) -> Result<(), GuruError> {
    let prompt = args.resolve_prompt().map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidInput => GuruError::Input(e.to_string()),
        _ => GuruError::Io(e),
    })?;

    let engine_name = args.engine.as_deref().unwrap_or(&config.defaults.engine);
    let engine = resolve_for(engine_name, Provider::OctoAi, "image generation")
        .map_err(GuruError::InvalidArgument)?;
    let format = args.format.as_deref().unwrap_or(&config.defaults.format);

    // Validate parameters
    let (width, height) =
        aspect_ratio_to_sdxl_dimensions(&args.aspect_ratio).map_err(GuruError::InvalidArgument)?;
    validate_steps(args.steps).map_err(GuruError::InvalidArgument)?;
    validate_cfg_scale(args.cfg_scale).map_err(GuruError::InvalidArgument)?;
    validate_count(args.count).map_err(GuruError::InvalidArgument)?;
    validate_format(format).map_err(GuruError::InvalidArgument)?;

    let output_dir = args.output_dir.as_deref().unwrap_or(&config.defaults.output_dir);
    std::fs::create_dir_all(output_dir)?;

    let request = ImageRequest {
        engine,
        prompt: prompt.clone(),
        negative_prompt: args.negative_prompt.clone(),
        width,
        height,
        steps: args.steps,
        cfg_scale: args.cfg_scale,
        count: args.count,
        seed: args.seed,
    };
    tracing::debug!(engine = %request.engine, width, height, "generating");

    let response = ctx.image_generator()?.generate(&request).await?;

    let base = prompt_base_name(&prompt);
    let extension = format_extension(format);
    let mut saved = 0usize;
    for (i, image) in response.images.iter().enumerate() {
        if image.removed_for_safety || image.data.is_empty() {
            tracing::warn!(index = i, "image withheld by the provider's safety filter");
            continue;
        }
        // Resolved per image so that each save bumps the next suffix.
        let file_name = resolve_unique_name(output_dir, &base, extension);
        let output_path = output_dir.join(file_name);
        save_image(&image.data, &image.mime_type, format, &output_path)?;
        eprintln!("Saved: {}", output_path.display());
        saved += 1;
    }

    if saved == 0 {
        return Err(GuruError::GenerationRejected);
    }
    Ok(())
}
