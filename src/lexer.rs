use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Colon,    // :
    Dot,      // .
    Lt,       // <
    Gt,       // >
    LtGt,     // <>
    Dash,     // -

    Eof,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated string starting with {0}")]
    UnterminatedString(char),
    #[error("Unterminated ''' block string")]
    UnterminatedBlockString,
}

/// Tokenizer for a single line of schema text. The parser feeds one line at
/// a time, extended over several lines only while a `'''` block string is open.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

fn is_symbol(c: char) -> bool {
    matches!(
        c,
        '{' | '}' | '(' | ')' | '[' | ']' | ',' | ':' | '.' | '<' | '>' | '"' | '\'' | '`'
    )
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Skip whitespace. Returns false once a `//` comment has swallowed the rest of the input.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() == Some(&'/') {
                        self.chars.by_ref().for_each(drop);
                        return false;
                    }
                    return true;
                }
                _ => return true,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || is_symbol(c) {
                break;
            }
            s.push(c);
            self.chars.next();
        }
        s
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.chars.next() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString(quote)),
            }
        }
    }

    fn at_block_quote(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next() == Some('\'') && ahead.next() == Some('\'')
    }

    /// Body of a `'''` string after its first quote, trimmed of surrounding whitespace.
    fn read_block_string(&mut self) -> Result<String, LexError> {
        self.chars.next();
        self.chars.next();
        let mut s = String::new();
        for c in self.chars.by_ref() {
            s.push(c);
            if s.ends_with("'''") {
                s.truncate(s.len() - 3);
                return Ok(s.trim().to_string());
            }
        }
        Err(LexError::UnterminatedBlockString)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if !self.skip_whitespace_and_comments() {
            return Ok(Token::Eof);
        }

        let c = match self.chars.next() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let tok = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '>' => Token::Gt,
            '<' => {
                if self.chars.peek() == Some(&'>') {
                    self.chars.next();
                    Token::LtGt
                } else {
                    Token::Lt
                }
            }
            '-' => Token::Dash,
            '\'' if self.at_block_quote() => Token::Str(self.read_block_string()?),
            '"' | '\'' | '`' => Token::Str(self.read_string(c)?),
            c => Token::Ident(self.read_ident(c)),
        };

        Ok(tok)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok == Token::Eof {
                tokens.push(tok);
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}
