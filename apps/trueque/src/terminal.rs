use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Line-oriented console. Generic over the streams so views can be driven
/// from a script in tests.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub async fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.output.write_all(text.as_ref().as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` once input is closed.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.write_all(b": ").await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Terminal::ask`], keeping `current` when the answer is blank.
    pub async fn ask_or(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let prompt = if current.is_empty() {
            label.to_string()
        } else {
            format!("{label} [{current}]")
        };
        Ok(self.ask(&prompt).await?.map(|answer| {
            if answer.is_empty() {
                current.to_string()
            } else {
                answer
            }
        }))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_trimmed_lines_until_eof() {
        let mut term = Terminal::new(&b"  hola \n"[..], Vec::new());
        assert_eq!(term.ask("Name").await.unwrap().as_deref(), Some("hola"));
        assert_eq!(term.ask("Again").await.unwrap(), None);

        let out = String::from_utf8(term.into_output()).unwrap();
        assert_eq!(out, "Name: Again: ");
    }

    #[tokio::test]
    async fn blank_answer_keeps_current_value() {
        let mut term = Terminal::new(&b"\nnuevo\n"[..], Vec::new());
        assert_eq!(
            term.ask_or("Title", "viejo").await.unwrap().as_deref(),
            Some("viejo")
        );
        assert_eq!(
            term.ask_or("Title", "viejo").await.unwrap().as_deref(),
            Some("nuevo")
        );
    }
}
