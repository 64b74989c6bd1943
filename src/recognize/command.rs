//! `CommandRecognizer` — OCR through a local program.
//!
//! The image is written to the program's stdin as PNG and its stdout is the
//! recognised text, e.g. `tesseract stdin stdout -l jpn_vert`.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::clipboard::CapturedImage;
use crate::config::RecognizerConfig;

use super::{RecognitionEngine, RecognitionError};

/// Runs an external OCR program once per image.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self, RecognitionError> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(RecognitionError::Config("command must not be empty".into()));
        }
        Ok(Self { program, args })
    }

    pub fn from_config(config: &RecognizerConfig) -> Result<Self, RecognitionError> {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Feed `input` to the program and collect its trimmed stdout.
    async fn run(&self, input: &[u8]) -> Result<String, RecognitionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecognitionError::Engine(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(|e| RecognitionError::Engine(format!("writing stdin: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RecognitionError::Engine(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(RecognitionError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl RecognitionEngine for CommandRecognizer {
    async fn recognize(&self, image: &CapturedImage) -> Result<String, RecognitionError> {
        let png = image
            .to_png()
            .map_err(|e| RecognitionError::Encode(e.to_string()))?;
        self.run(&png).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_is_rejected() {
        assert!(matches!(
            CommandRecognizer::new("", vec![]),
            Err(RecognitionError::Config(_))
        ));
    }

    #[test]
    fn from_config_copies_program_and_args() {
        let r = CommandRecognizer::from_config(&RecognizerConfig::default()).unwrap();
        assert_eq!(r.program, "tesseract");
        assert_eq!(r.args[0], "stdin");
    }

    #[tokio::test]
    async fn missing_program_is_an_engine_error() {
        let r = CommandRecognizer::new("definitely-not-an-ocr-binary-4711", vec![]).unwrap();
        let img = CapturedImage::solid(2, 2, [0, 0, 0, 255]);
        assert!(matches!(
            r.recognize(&img).await,
            Err(RecognitionError::Engine(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_returned_trimmed() {
        let r = CommandRecognizer::new(
            "sh",
            vec!["-c".into(), "cat >/dev/null; echo '  テスト  '".into()],
        )
        .unwrap();
        assert_eq!(r.run(b"png").await.unwrap(), "テスト");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_an_engine_error() {
        let r = CommandRecognizer::new(
            "sh",
            vec!["-c".into(), "cat >/dev/null; echo boom >&2; exit 3".into()],
        )
        .unwrap();
        let err = r.run(b"png").await.unwrap_err();
        assert!(err.to_string().contains("boom"), "unexpected: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn blank_output_is_empty_response() {
        let r = CommandRecognizer::new("sh", vec!["-c".into(), "cat >/dev/null".into()]).unwrap();
        assert!(matches!(r.run(b"png").await, Err(RecognitionError::EmptyResponse)));
    }
}
