//! Interactive session: plain lines are searches, `:` lines act on the
//! current results.
//!
//! Searches run as background tasks so the prompt stays responsive; typing a
//! new query while one is in flight supersedes it, and only the newest
//! search's results are ever rendered. All output goes through an unbounded
//! channel so background completions and command replies interleave cleanly.

use std::sync::Arc;
use std::time::Duration;

use reco_client::{
    CitationStyle, Clipboard, CopyAcknowledgment, QueryOutcome, RecommendationService,
    ResultFilter, SearchSession, ShareLauncher, SortMode,
};
use tokio::sync::mpsc;

use crate::commands::{citation_at, share};
use crate::render::{ViewText, render_tokens};

pub const HELP: &str = "\
Type a topic to search. Commands:
  :sort [relevance|year]        toggle or set citation order
  :show both|citations|supervisors
  :more                         reveal the next page of citations
  :cutoff                       toggle the relevance cutoff
  :apa N / :ieee N              print citation N
  :copy-apa N / :copy-ieee N    copy citation N to the clipboard
  :share N                      open a WhatsApp share link for citation N
  :tokens                       show the processed query tokens
  :help
  :quit
";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Query(String),
    /// `None` toggles between the two orders.
    Sort(Option<SortMode>),
    Show(ResultFilter),
    More,
    Cutoff,
    Format(usize, CitationStyle),
    Copy(usize, CitationStyle),
    Share(usize),
    Tokens,
    Help,
    Quit,
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse an input line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns a human-readable message for an unknown or malformed command.
pub fn parse_line(line: &str) -> Result<Option<Directive>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Some(Directive::Query(line.to_owned())));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();
    let position = || -> Result<usize, String> {
        arg.ok_or_else(|| format!(":{name} needs a result number"))?
            .parse::<usize>()
            .map_err(|_| format!(":{name} needs a result number"))
    };

    let directive = match name.as_str() {
        "sort" => Directive::Sort(arg.map(str::parse).transpose()?),
        "show" => Directive::Show(
            arg.ok_or_else(|| ":show needs both, citations or supervisors".to_owned())?
                .parse()?,
        ),
        "more" => Directive::More,
        "cutoff" => Directive::Cutoff,
        "apa" => Directive::Format(position()?, CitationStyle::Apa),
        "ieee" => Directive::Format(position()?, CitationStyle::Ieee),
        "copy-apa" => Directive::Copy(position()?, CitationStyle::Apa),
        "copy-ieee" => Directive::Copy(position()?, CitationStyle::Ieee),
        "share" => Directive::Share(position()?),
        "tokens" => Directive::Tokens,
        "help" | "h" | "?" => Directive::Help,
        "quit" | "q" | "exit" => Directive::Quit,
        other => return Err(format!("unknown command :{other} (try :help)")),
    };
    Ok(Some(directive))
}

/// Interactive driver around one [`SearchSession`].
pub struct Console<S, C, L> {
    session: Arc<SearchSession<S>>,
    clipboard: C,
    launcher: L,
    ack: CopyAcknowledgment,
    emphasis: String,
    output: mpsc::UnboundedSender<String>,
}

impl<S, C, L> Console<S, C, L>
where
    S: RecommendationService + 'static,
    C: Clipboard,
    L: ShareLauncher,
{
    /// Build a console; rendered output is sent to the returned receiver.
    pub fn new(
        session: Arc<SearchSession<S>>,
        clipboard: C,
        launcher: L,
        emphasis: &str,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (output, rx) = mpsc::unbounded_channel();
        let ack = CopyAcknowledgment::new(Duration::from_millis(session.config().copy_ack_ms));
        let console = Self {
            session,
            clipboard,
            launcher,
            ack,
            emphasis: emphasis.to_owned(),
            output,
        };
        (console, rx)
    }

    pub fn acknowledgment(&self) -> &CopyAcknowledgment {
        &self.ack
    }

    /// Parse and run one input line.
    pub async fn handle_line(&self, line: &str) -> Flow {
        match parse_line(line) {
            Ok(Some(directive)) => self.handle(directive).await,
            Ok(None) => Flow::Continue,
            Err(message) => {
                self.emit(message);
                Flow::Continue
            }
        }
    }

    pub async fn handle(&self, directive: Directive) -> Flow {
        match directive {
            Directive::Query(query) => self.spawn_search(query),
            Directive::Sort(mode) => {
                let mode = mode.unwrap_or(match self.session.view().sort_mode {
                    SortMode::Relevance => SortMode::YearDesc,
                    SortMode::YearDesc => SortMode::Relevance,
                });
                self.session.set_sort_mode(mode);
                self.emit_view();
            }
            Directive::Show(filter) => {
                self.session.set_filter(filter);
                self.emit_view();
            }
            Directive::More => {
                if self.session.load_more() {
                    self.emit_view();
                } else {
                    self.emit("All citations are already shown.".to_owned());
                }
            }
            Directive::Cutoff => {
                let enabled = !self.session.view().auto_cutoff;
                self.session.set_auto_cutoff(enabled);
                self.emit_view();
            }
            Directive::Format(position, style) => match citation_at(&*self.session, position) {
                Ok(item) => self.emit(style.format(&item)),
                Err(err) => self.emit(err.to_string()),
            },
            Directive::Copy(position, style) => self.copy(position, style).await,
            Directive::Share(position) => {
                match share(&*self.session, position, Some(&self.launcher)) {
                    Ok(url) => self.emit(format!("Opened {url}")),
                    Err(err) => self.emit(format!("Share failed: {err}")),
                }
            }
            Directive::Tokens => self.emit(render_tokens(&self.session.view())),
            Directive::Help => self.emit(HELP.to_owned()),
            Directive::Quit => {
                self.session.cancel_in_flight();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    async fn copy(&self, position: usize, style: CitationStyle) {
        let item = match citation_at(&*self.session, position) {
            Ok(item) => item,
            Err(err) => return self.emit(err.to_string()),
        };
        match self
            .ack
            .copy_citation(&self.clipboard, &item, style)
            .await
        {
            Ok(_) => self.emit(format!(
                "Copied {} citation for #{position}.",
                style.name()
            )),
            Err(err) => self.emit(format!("Copy failed: {err}")),
        }
    }

    fn spawn_search(&self, query: String) {
        // The ticket is taken here, not in the task, so searches supersede
        // each other in input order.
        let Some(ticket) = self.session.begin_query(&query) else {
            return;
        };
        self.emit("Searching...".to_owned());
        let session = Arc::clone(&self.session);
        let output = self.output.clone();
        let emphasis = self.emphasis.clone();
        tokio::spawn(async move {
            match session.complete(ticket).await {
                Ok(QueryOutcome::Superseded) => {}
                Ok(QueryOutcome::Completed(_) | QueryOutcome::Ignored) | Err(_) => {
                    let rendered = ViewText::new(&session.view(), &emphasis).to_string();
                    let _ = output.send(rendered);
                }
            }
        });
    }

    fn emit_view(&self) {
        let view = self.session.view();
        let copied = self.ack.current();
        let text = ViewText::new(&view, &self.emphasis)
            .with_copied(copied.as_ref())
            .to_string();
        self.emit(text);
    }

    fn emit(&self, text: String) {
        let _ = self.output.send(text);
    }
}
