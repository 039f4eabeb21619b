//! html5ever tokenizer adapter
//!
//! Runs html5ever's tokenizer (not its tree builder) and translates each
//! token into a [`TokenEvent`]. Tokenizer parse errors are diagnostics
//! unless the options ask for strict parsing.

use std::cell::RefCell;

use arbor_dom::{HtmlCatalog, HtmlElementKind};
use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::{ParseOptions, TokenEvent};

#[derive(Default)]
struct EventSink {
    events: RefCell<Vec<TokenEvent>>,
    diagnostics: RefCell<Vec<String>>,
    strict: bool,
}

impl EventSink {
    fn push_text(&self, data: &str) {
        let mut events = self.events.borrow_mut();
        if let Some(TokenEvent::Text(last)) = events.last_mut() {
            last.push_str(data);
        } else {
            events.push(TokenEvent::Text(data.to_string()));
        }
    }
}

/// Tokenizer state the content of `name` needs
fn content_state(name: &str) -> TokenSinkResult<()> {
    match name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "plaintext" => TokenSinkResult::Plaintext,
        "xmp" | "iframe" | "noembed" | "noframes" => TokenSinkResult::RawData(RawKind::Rawtext),
        _ => match HtmlCatalog::kind(name) {
            Some(HtmlElementKind::RawText) => TokenSinkResult::RawData(RawKind::Rawtext),
            Some(HtmlElementKind::EscapableRawText) => TokenSinkResult::RawData(RawKind::Rcdata),
            _ => TokenSinkResult::Continue,
        },
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let mut events = self.events.borrow_mut();
                        events.push(TokenEvent::OpenTag { name: name.clone() });
                        events.extend(tag.attrs.into_iter().map(|attr| TokenEvent::Attribute {
                            name: attr.name.local.to_string(),
                            value: attr.value.to_string(),
                            quote: None,
                        }));
                        if tag.self_closing || HtmlCatalog::is_void(&name) {
                            events.push(TokenEvent::CloseTag { name, implied: true });
                        } else {
                            return content_state(&name);
                        }
                    }
                    TagKind::EndTag => {
                        self.events
                            .borrow_mut()
                            .push(TokenEvent::CloseTag { name, implied: false });
                    }
                }
            }
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::CommentToken(text) => {
                self.events.borrow_mut().push(TokenEvent::Comment(text.to_string()));
            }
            Token::DoctypeToken(doctype) => {
                let field = |value: Option<StrTendril>| value.map(|v| v.to_string()).unwrap_or_default();
                self.events.borrow_mut().push(TokenEvent::Doctype {
                    name: field(doctype.name),
                    public_id: field(doctype.public_id),
                    system_id: field(doctype.system_id),
                });
            }
            Token::ParseError(message) => {
                if self.strict {
                    self.events.borrow_mut().push(TokenEvent::Error(message.into_owned()));
                } else {
                    self.diagnostics.borrow_mut().push(message.into_owned());
                }
            }
            // U+0000 in data is dropped, like the HTML tree builder does
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenizes a whole document into [`TokenEvent`]s
pub struct HtmlTokenizer {
    exact_errors: bool,
    strict: bool,
}

impl HtmlTokenizer {
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            exact_errors: options.exact_errors,
            strict: options.strict,
        }
    }

    /// Events in source order, plus the tokenizer's recoverable errors
    pub fn tokenize(&self, html: &str) -> (Vec<TokenEvent>, Vec<String>) {
        let sink = EventSink { strict: self.strict, ..Default::default() };
        let opts = TokenizerOpts {
            exact_errors: self.exact_errors,
            ..Default::default()
        };
        let tokenizer = Tokenizer::new(sink, opts);

        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));
        // The sink never suspends for scripts; resume if the tokenizer does
        while let TokenizerResult::Script(()) = tokenizer.feed(&input) {
            tracing::trace!("Tokenizer paused at a script boundary; resuming");
        }
        tokenizer.end();

        let sink = tokenizer.sink;
        (sink.events.into_inner(), sink.diagnostics.into_inner())
    }
}
