//! Lexical analysis (tokenization) for shell command lines.

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// A closing quote (single or double) was not found.
    UnclosedQuote,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeError::UnclosedQuote => write!(f, "No closing quotation"),
        }
    }
}

impl std::error::Error for TokenizeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingSingleQuote,
    ReadingDoubleQuote,
}

struct LexingFSM {
    input: Vec<char>,
    pos: usize,
    state: LexingState,
    buffer: String,
    // A quoted empty string still opens a word, so the buffer alone can't
    // tell us whether a token is pending.
    word_open: bool,
}

impl LexingFSM {
    fn new(line: &str) -> Self {
        LexingFSM {
            input: line.chars().collect(),
            pos: 0,
            state: LexingState::Start,
            buffer: String::new(),
            word_open: false,
        }
    }

    /// Splits the input into shell words.
    ///
    /// Whitespace separates words; matching single or double quotes group
    /// their contents into the surrounding word and are stripped. Operators
    /// are not special here: `>` and `|` come out as ordinary words and are
    /// only recognized downstream when they stand alone.
    fn make_tokens(&mut self) -> Result<Vec<String>, TokenizeError> {
        let mut out = Vec::new();

        while let Some(ch) = self.read_char() {
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingSingleQuote => self.handle_quote(ch, '\''),
                LexingState::ReadingDoubleQuote => self.handle_quote(ch, '"'),
            }
        }

        match self.state {
            LexingState::ReadingSingleQuote | LexingState::ReadingDoubleQuote => {
                return Err(TokenizeError::UnclosedQuote);
            }
            _ => {}
        }

        if self.word_open {
            self.finish_word(&mut out);
        }

        Ok(out)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {}
            '\'' => {
                self.word_open = true;
                self.state = LexingState::ReadingSingleQuote;
            }
            '"' => {
                self.word_open = true;
                self.state = LexingState::ReadingDoubleQuote;
            }
            c => {
                self.buffer.push(c);
                self.word_open = true;
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) {
        match ch {
            c if c.is_whitespace() => {
                self.finish_word(out);
                self.state = LexingState::Start;
            }
            '\'' => self.state = LexingState::ReadingSingleQuote,
            '"' => self.state = LexingState::ReadingDoubleQuote,
            c => self.buffer.push(c),
        }
    }

    fn handle_quote(&mut self, ch: char, closing: char) {
        if ch == closing {
            self.state = LexingState::ReadingWord;
        } else {
            self.buffer.push(ch);
        }
    }

    fn finish_word(&mut self, out: &mut Vec<String>) {
        out.push(std::mem::take(&mut self.buffer));
        self.word_open = false;
    }
}

/// Split a command line into shell words.
///
/// Returns an empty vector for blank input and [`TokenizeError`] when a
/// quote is left unterminated.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut lexer = LexingFSM::new(line);
    lexer.make_tokens()
}
