use crate::directive::Directive;

/// What the skill says and sends back for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub directives: Vec<Directive>,
    pub should_end_session: bool,
}

impl Response {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    /// A response that says nothing, sends nothing and keeps the session open.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_silent(&self) -> bool {
        self.speech.is_none() && self.reprompt.is_none() && self.directives.is_empty()
    }

    pub fn speech_text(&self) -> &str {
        self.speech.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct ResponseBuilder {
    inner: Response,
}

impl ResponseBuilder {
    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.inner.speech = Some(text.into());
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.inner.reprompt = Some(text.into());
        self
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.inner.directives.push(directive);
        self
    }

    pub fn end_session(mut self) -> Self {
        self.inner.should_end_session = true;
        self
    }

    pub fn build(self) -> Response {
        self.inner
    }
}
