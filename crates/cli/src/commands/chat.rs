//! Chat command handler.
//!
//! Interactive console session. Each run is one conversation session.

use crate::app::FiscalApp;
use clap::Args;
use fiscal_assistant::selector::GREETING_MESSAGE;
use fiscal_core::{config::AppConfig, AppResult};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const QUIT_WORDS: [&str; 4] = ["au revoir", "merci", "quit", "q"];
const RESET_WORDS: [&str; 2] = ["vider cache", "reset"];

const GOODBYE: &str = "Merci pour votre confiance. À bientôt !";
const EOF_GOODBYE: &str = "Merci d'avoir utilisé l'Assistant Fiscal Premium. Au revoir !";

/// Start an interactive console session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Let the agent handle questions the pipeline would refuse
    #[arg(long)]
    pub no_strict: bool,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let app = FiscalApp::build(config).await?;
        let session = uuid::Uuid::new_v4().to_string();
        tracing::debug!("Console session {}", session);

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        run_console(&app, stdin, &mut stdout, &session, !self.no_strict).await
    }
}

fn banner(out: &mut impl Write) -> AppResult<()> {
    let rule = "=".repeat(50);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "{:^50}", "ASSISTANT FISCAL PREMIUM - SÉNÉGAL")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", GREETING_MESSAGE)?;
    Ok(())
}

/// Read questions line by line until a quit word or end of input.
async fn run_console<R, W>(
    app: &FiscalApp,
    input: R,
    out: &mut W,
    session: &str,
    strict: bool,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    banner(out)?;
    let mut lines = input.lines();

    loop {
        write!(out, "\nVotre question fiscale : ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out, "\n\n{}", EOF_GOODBYE)?;
            return Ok(());
        };

        let question = line.trim();
        let lowered = question.to_lowercase();

        if question.is_empty() {
            continue;
        }

        if QUIT_WORDS.contains(&lowered.as_str()) {
            writeln!(out, "\n{}", GOODBYE)?;
            return Ok(());
        }

        if app.pipeline().is_greeting(question) {
            writeln!(out, "\n{}", GREETING_MESSAGE)?;
            continue;
        }

        if RESET_WORDS.contains(&lowered.as_str()) {
            app.reset(Some(session)).await;
            writeln!(out, "🗑️ Cache vidé avec succès !")?;
            continue;
        }

        writeln!(out, "\n🔍 Consultation de la base fiscale...")?;
        match app.respond(question, strict, Some(session)).await {
            Ok(answer) => writeln!(out, "\n📌 Réponse : {}", answer.text)?,
            Err(e) => {
                tracing::error!("Failed to answer: {}", e);
                writeln!(out, "\n⚠️ Une erreur est survenue lors du traitement de votre question.")?;
                writeln!(
                    out,
                    "Veuillez reformuler votre question ou contacter le support technique."
                )?;
                app.reset(None).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{app_with, BrokenAgent, EchoAgent};
    use std::sync::Arc;

    async fn transcript(app: &FiscalApp, input: &str) -> String {
        let mut out = Vec::new();
        run_console(app, input.as_bytes(), &mut out, "test", true)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_quit_word_ends_session() {
        let app = app_with(Some(Arc::new(EchoAgent)));
        let out = transcript(&app, "Merci\nComment payer la patente ?\n").await;

        assert!(out.contains("ASSISTANT FISCAL PREMIUM"));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
        assert!(!out.contains("agent["));
    }

    #[tokio::test]
    async fn test_questions_share_the_session() {
        let app = app_with(Some(Arc::new(EchoAgent)));
        let out = transcript(&app, "Comment payer la patente ?\nEt la TVA ?\nq\n").await;

        assert!(out.contains("📌 Réponse : agent[0]: Comment payer la patente ?"));
        assert!(out.contains("📌 Réponse : agent[2]: Et la TVA ?"));
    }

    #[tokio::test]
    async fn test_greeting_reset_and_eof() {
        let app = app_with(Some(Arc::new(EchoAgent)));
        let out = transcript(
            &app,
            "bonjour\nComment payer la patente ?\nreset\nEt la TVA ?\n",
        )
        .await;

        assert_eq!(out.matches(GREETING_MESSAGE).count(), 2);
        assert!(out.contains("🗑️ Cache vidé avec succès !"));
        // history was dropped by the reset
        assert!(out.contains("agent[0]: Et la TVA ?"));
        assert!(out.ends_with(&format!("{}\n", EOF_GOODBYE)));
    }

    #[tokio::test]
    async fn test_errors_do_not_end_session() {
        let app = app_with(Some(Arc::new(BrokenAgent)));
        let out = transcript(&app, "Comment payer la patente ?\nquit\n").await;

        assert!(out.contains("⚠️ Une erreur est survenue"));
        assert!(!out.contains("401"));
        assert!(out.ends_with(&format!("{}\n", GOODBYE)));
    }
}
