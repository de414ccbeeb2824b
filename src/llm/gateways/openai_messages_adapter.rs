//! Adapter for converting LLM messages to OpenAI chat-completions format.

use crate::error::Result;
use crate::llm::models::{LlmMessage, MessageRole};
use base64::Engine;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Determine image type from file extension.
fn get_image_type(file_path: &str) -> &'static str {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "jpeg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        _ => "jpeg",
    }
}

/// Read and encode an image file as a base64 data URL.
fn encode_image_as_base64(file_path: &str) -> Result<String> {
    let bytes = std::fs::read(file_path)?;
    let base64_data = base64::engine::general_purpose::STANDARD.encode(&bytes);
    let image_type = get_image_type(file_path);
    Ok(format!("data:image/{};base64,{}", image_type, base64_data))
}

/// Turn an image reference into something the API can fetch.
///
/// Remote and `data:` URLs pass through untouched. A reference naming an
/// existing local file is inlined as a data URL. Anything else is forwarded
/// as-is and left for the provider to reject.
pub fn resolve_image_url(reference: &str) -> Result<String> {
    let lower = reference.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
    {
        return Ok(reference.to_string());
    }

    if !reference.is_empty() && Path::new(reference).is_file() {
        debug!(path = reference, "Inlining local image as data URL");
        return encode_image_as_base64(reference);
    }

    Ok(reference.to_string())
}

fn role_name(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
    }
}

/// Adapt LLM messages to OpenAI format.
pub fn adapt_messages_to_openai(messages: &[LlmMessage]) -> Result<Vec<Value>> {
    let mut result = Vec::with_capacity(messages.len());

    for msg in messages {
        let text = msg.content.as_deref().unwrap_or("");

        let openai_msg = match msg.images.as_deref() {
            Some(images) if !images.is_empty() && msg.role == MessageRole::User => {
                let mut content_parts = Vec::with_capacity(images.len() + 1);

                if !text.is_empty() {
                    content_parts.push(serde_json::json!({
                        "type": "text",
                        "text": text
                    }));
                }

                for image in images {
                    content_parts.push(serde_json::json!({
                        "type": "image_url",
                        "image_url": {
                            "url": resolve_image_url(image)?
                        }
                    }));
                }

                serde_json::json!({
                    "role": "user",
                    "content": content_parts
                })
            }
            _ => serde_json::json!({
                "role": role_name(msg.role),
                "content": text
            }),
        };

        result.push(openai_msg);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_get_image_type() {
        assert_eq!(get_image_type("photo.JPG"), "jpeg");
        assert_eq!(get_image_type("chart.png"), "png");
        assert_eq!(get_image_type("anim.gif"), "gif");
        assert_eq!(get_image_type("pic.webp"), "webp");
        assert_eq!(get_image_type("no_extension"), "jpeg");
    }

    #[test]
    fn test_resolve_remote_url_unchanged() {
        let url = "https://example.com/chart.png";
        assert_eq!(resolve_image_url(url).unwrap(), url);
    }

    #[test]
    fn test_resolve_data_url_unchanged() {
        let url = "data:image/png;base64,AAAA";
        assert_eq!(resolve_image_url(url).unwrap(), url);
    }

    #[test]
    fn test_resolve_unknown_reference_forwarded() {
        let reference = "not a url at all";
        assert_eq!(resolve_image_url(reference).unwrap(), reference);
        assert_eq!(resolve_image_url("").unwrap(), "");
    }

    #[test]
    fn test_resolve_local_file_inlined() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"abc").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let url = resolve_image_url(&path).unwrap();

        assert_eq!(url, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_adapt_text_messages() {
        let messages = vec![
            LlmMessage::system("You are helpful"),
            LlmMessage::user("Hi"),
        ];

        let adapted = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(
            adapted,
            vec![
                serde_json::json!({"role": "system", "content": "You are helpful"}),
                serde_json::json!({"role": "user", "content": "Hi"}),
            ]
        );
    }

    #[test]
    fn test_adapt_user_message_with_image() {
        let messages = vec![LlmMessage::user("Analyze this image.")
            .with_images(vec!["https://example.com/chart.png".to_string()])];

        let adapted = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(
            adapted[0],
            serde_json::json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "Analyze this image."},
                    {"type": "image_url", "image_url": {"url": "https://example.com/chart.png"}}
                ]
            })
        );
    }

    #[test]
    fn test_adapt_user_message_with_empty_image_list() {
        let messages = vec![LlmMessage::user("Just text").with_images(vec![])];

        let adapted = adapt_messages_to_openai(&messages).unwrap();

        assert_eq!(adapted[0]["content"], "Just text");
    }
}
