//! Cassette loading.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    tracing::debug!(
        name = %cassette.name,
        interactions = cassette.interactions.len(),
        "loaded cassette"
    );
    Ok(CassetteReplayer::new(&cassette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_handwritten_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.cassette.yaml");
        std::fs::write(
            &path,
            r#"name: chat-test
recorded_at: "2026-01-01T00:00:00Z"
commit: abc
interactions:
  - seq: 0
    port: chat_model
    method: send
    input: {}
    output:
      Ok:
        text: Hello!
"#,
        )
        .unwrap();

        let mut replayer = load_cassette(&path).unwrap();
        let interaction = replayer.next_interaction("chat_model", "send").unwrap();
        assert_eq!(interaction.seq, 0);
        assert_eq!(interaction.output["Ok"]["text"], "Hello!");
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }

    #[test]
    fn load_malformed_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cassette.yaml");
        std::fs::write(&path, "interactions: [unterminated").unwrap();
        assert!(load_cassette(&path).is_err());
    }
}
