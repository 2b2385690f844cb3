//! Schema text parser.
//!
//! Input is processed one line at a time (a `'''` block string extends the
//! line until it closes). Each line is tokenized, split into
//! statements at `{` and `}`, and every statement is parsed on its own by a
//! small recursive-descent parser. Statements that do not parse are skipped;
//! the model is always produced, and the skipped statements are reported as
//! [`Diagnostic`]s for callers that want them.

use crate::ast::*;
use crate::lexer::{LexError, Lexer, Token};
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Column {0} declared outside of any table")]
    ColumnOutsideTable(String),
    #[error("Table {0} declared more than once, keeping the last declaration")]
    DuplicateTable(String),
}

/// A statement the parser skipped or repaired, with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub error: ParseError,
}

/// Parse schema text, silently skipping anything unrecognized.
pub fn parse(input: &str) -> Schema {
    parse_with_diagnostics(input).0
}

/// Parse schema text and report every skipped statement.
pub fn parse_with_diagnostics(input: &str) -> (Schema, Vec<Diagnostic>) {
    let mut builder = SchemaBuilder::default();
    let mut lines = input.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        builder.line = idx + 1;
        let tokens = match tokenize_line(line, &mut lines) {
            Ok(tokens) => tokens,
            Err(e) => {
                builder.report(e.into());
                continue;
            }
        };

        for (stmt_tokens, end) in split_statements(&tokens) {
            builder.statements(stmt_tokens, *end == Token::LBrace);
            match end {
                Token::LBrace => builder.depth += 1,
                Token::RBrace => builder.depth = builder.depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    let SchemaBuilder {
        schema,
        diagnostics,
        ..
    } = builder;
    debug!(
        tables = schema.tables.len(),
        relationships = schema.relationships.len(),
        skipped = diagnostics.len(),
        "parsed schema"
    );
    (schema, diagnostics)
}

/// Parse state threaded through the line loop.
#[derive(Default)]
struct SchemaBuilder {
    schema: Schema,
    diagnostics: Vec<Diagnostic>,
    /// Index into `schema.tables` of the table receiving column statements.
    current: Option<usize>,
    /// Unclosed `{` count. Only tracks nesting; `}` does not reset `current`.
    depth: usize,
    line: usize,
}

impl SchemaBuilder {
    fn report(&mut self, error: ParseError) {
        debug!(line = self.line, %error, "skipping statement");
        self.diagnostics.push(Diagnostic {
            line: self.line,
            error,
        });
    }

    /// Parse one brace-delimited slice. Several columns may share a slice:
    /// `Table posts { id int [pk] user_id int [ref: > users.id] }`.
    fn statements(&mut self, tokens: &[Token], opens_block: bool) {
        let mut parser = StatementParser::new(tokens);
        let in_block = self.depth > 0;

        while !parser.at_end() {
            let statement = match parser.parse_statement(opens_block, in_block) {
                Ok(statement) => statement,
                Err(e) => {
                    self.report(e);
                    return;
                }
            };
            let is_column = matches!(statement, Statement::Column { .. });
            self.apply(statement);

            if !is_column || parser.at_end() {
                return;
            }
            if !(parser.follows(&Token::RBracket) || parser.at_column_start()) {
                self.report(ParseError::Unexpected(parser.peek().clone(), "end of column"));
                return;
            }
        }
    }

    fn apply(&mut self, statement: Statement) {
        match statement {
            Statement::Table { name, header_color } => {
                if self.schema.tables.iter().any(|t| t.name == name) {
                    self.schema.tables.retain(|t| t.name != name);
                    self.report(ParseError::DuplicateTable(name.clone()));
                }
                let mut table = Table::new(name);
                if let Some(color) = header_color {
                    table.header_color = color;
                }
                self.schema.tables.push(table);
                self.current = Some(self.schema.tables.len() - 1);
            }
            Statement::Column {
                column,
                refs,
                issues,
            } => {
                let Some(table_idx) = self.current else {
                    self.report(ParseError::ColumnOutsideTable(column.name));
                    return;
                };
                for issue in issues {
                    self.report(issue);
                }
                let table = &mut self.schema.tables[table_idx];
                for (cardinality, to) in refs {
                    self.schema.relationships.push(Relationship {
                        from: ColumnRef::new(&table.name, &column.name),
                        to,
                        cardinality,
                    });
                }
                match table.columns.iter_mut().find(|c| c.name == column.name) {
                    Some(existing) => *existing = column,
                    None => table.columns.push(column),
                }
            }
            Statement::Ref(rel) => self.schema.relationships.push(rel),
            Statement::OtherBlock => self.current = None,
            Statement::Ignored => {}
        }
    }
}

/// Tokenize a line. While a `'''` block string is open, the following lines
/// are pulled in so the string lexes as one token.
fn tokenize_line<'a>(
    line: &'a str,
    rest: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vec<Token>, LexError> {
    let mut text = Cow::Borrowed(line);
    loop {
        let result = Lexer::new(&text).tokenize();
        match result {
            Err(LexError::UnterminatedBlockString) => {
                let Some((_, next)) = rest.next() else {
                    return Err(LexError::UnterminatedBlockString);
                };
                let text = text.to_mut();
                text.push('\n');
                text.push_str(next);
            }
            result => return result,
        }
    }
}

/// Split one line's tokens at braces, pairing each statement with the
/// token that ended it.
fn split_statements(tokens: &[Token]) -> Vec<(&[Token], &Token)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if matches!(tok, Token::LBrace | Token::RBrace | Token::Eof) {
            out.push((&tokens[start..i], tok));
            start = i + 1;
        }
    }
    out
}

#[derive(Debug, PartialEq)]
enum Statement {
    Table {
        name: String,
        header_color: Option<String>,
    },
    Column {
        column: Column,
        refs: Vec<(Cardinality, ColumnRef)>,
        issues: Vec<ParseError>,
    },
    Ref(Relationship),
    /// Header of a block whose members are not columns (`Enum`, `TableGroup`, `Project`).
    OtherBlock,
    Ignored,
}

struct StatementParser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> StatementParser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Whether the last consumed token was `tok`.
    fn follows(&self, tok: &Token) -> bool {
        self.pos > 0 && self.tokens.get(self.pos - 1) == Some(tok)
    }

    /// Identifier or quoted name.
    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) | Token::Str(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "name")),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(ParseError::Unexpected(tok, what))
        }
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        keyword_at(self.peek(), keyword)
    }

    /// Whether another `<name> <type>` column starts at the cursor.
    fn at_column_start(&self) -> bool {
        is_name(self.peek()) && is_name(self.peek_at(1))
    }

    /// `in_block` is set when the statement sits inside an unclosed `{`.
    /// There a `table` header must open its own block, so a column named
    /// `table` stays a column.
    fn parse_statement(
        &mut self,
        opens_block: bool,
        in_block: bool,
    ) -> Result<Statement, ParseError> {
        if self.check_keyword("table")
            && is_name(self.peek_at(1))
            && (opens_block || !in_block)
        {
            self.advance();
            return self.parse_table();
        }
        if self.check_keyword("ref") {
            if *self.peek_at(1) == Token::Colon
                || (is_name(self.peek_at(1)) && *self.peek_at(2) == Token::Colon)
            {
                self.advance();
                return self.parse_ref();
            }
            // Long form `Ref name {` opens a block of bare endpoints, which is not supported.
            if opens_block {
                return Ok(Statement::OtherBlock);
            }
        }
        if opens_block
            && ["enum", "tablegroup", "project"]
                .iter()
                .any(|k| self.check_keyword(k))
        {
            return Ok(Statement::OtherBlock);
        }
        if (self.check_keyword("note") && *self.peek_at(1) == Token::Colon)
            || (self.check_keyword("note") && opens_block)
            || (self.check_keyword("indexes") && self.tokens.len() == 1)
        {
            return Ok(Statement::Ignored);
        }

        self.parse_column()
    }

    /// After the `Table` keyword: `<name> [as <alias>] [[settings]]`.
    fn parse_table(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_qualified_name()?.join(".");

        if self.check_keyword("as") {
            self.advance();
            self.expect_name()?;
        }

        let mut header_color = None;
        if *self.peek() == Token::LBracket {
            for item in self.parse_settings()? {
                if item.len() >= 3 && keyword_at(&item[0], "headercolor") && item[1] == Token::Colon
                {
                    header_color = Some(join_tokens(&item[2..]));
                }
            }
        }

        Ok(Statement::Table { name, header_color })
    }

    /// After the `Ref` keyword: `[name]: <endpoint> <symbol> <endpoint> [[settings]]`.
    fn parse_ref(&mut self) -> Result<Statement, ParseError> {
        if *self.peek() != Token::Colon {
            self.expect_name()?;
        }
        self.expect(Token::Colon, "':' after Ref")?;

        let from_parts = self.parse_qualified_name()?;
        let has_symbol = matches!(
            self.peek(),
            Token::Gt | Token::Lt | Token::LtGt | Token::Dash
        );
        let dashed = if has_symbol {
            None
        } else {
            split_dashed_endpoints(&from_parts)
        };
        if let Some((from, to)) = dashed {
            return Ok(Statement::Ref(Relationship {
                from,
                to,
                cardinality: Cardinality::OneToOne,
            }));
        }

        let from = self.endpoint_from_parts(from_parts)?;
        let cardinality = self.parse_cardinality();
        let to = self.parse_endpoint()?;

        Ok(Statement::Ref(Relationship {
            from,
            to,
            cardinality,
        }))
    }

    /// `<name> <type> [[attributes]]`. Stops after the attribute list; the
    /// caller decides what to do with any remaining tokens.
    fn parse_column(&mut self) -> Result<Statement, ParseError> {
        let name = self.expect_name()?;
        let typ = self.parse_type()?;

        let mut column = Column {
            name,
            typ,
            is_primary: false,
            note: None,
        };
        let mut refs = Vec::new();
        let mut issues = Vec::new();

        if *self.peek() == Token::LBracket {
            for item in self.parse_settings()? {
                let mut attr = StatementParser::new(&item);
                if attr.check_keyword("pk")
                    || (attr.check_keyword("primary") && keyword_at(attr.peek_at(1), "key"))
                {
                    column.is_primary = true;
                } else if attr.check_keyword("ref") && *attr.peek_at(1) == Token::Colon {
                    attr.pos += 2;
                    let cardinality = attr.parse_cardinality();
                    match attr.parse_endpoint() {
                        Ok(target) => refs.push((cardinality, target)),
                        Err(e) => issues.push(e),
                    }
                } else if attr.check_keyword("note") && *attr.peek_at(1) == Token::Colon {
                    if let Token::Str(s) = attr.peek_at(2) {
                        column.note = Some(s.clone());
                    }
                }
            }
        }

        Ok(Statement::Column {
            column,
            refs,
            issues,
        })
    }

    /// Column type: a name with optional dotted qualifier, parenthesised arguments and `[]` suffix.
    fn parse_type(&mut self) -> Result<String, ParseError> {
        let mut typ = self.parse_qualified_name()?.join(".");

        if *self.peek() == Token::LParen {
            let start = self.pos;
            while !self.at_end() && *self.peek() != Token::RParen {
                self.advance();
            }
            self.expect(Token::RParen, "')' closing type arguments")?;
            typ.push_str(&join_tokens(&self.tokens[start..self.pos]));
        }

        if *self.peek() == Token::LBracket && *self.peek_at(1) == Token::RBracket {
            self.pos += 2;
            typ.push_str("[]");
        }

        Ok(typ)
    }

    /// `a.b.c` style name, returned as its parts.
    fn parse_qualified_name(&mut self) -> Result<Vec<String>, ParseError> {
        let mut parts = vec![self.expect_name()?];
        while *self.peek() == Token::Dot {
            self.advance();
            parts.push(self.expect_name()?);
        }
        Ok(parts)
    }

    /// `[schema.]table.column`; the last part is the column.
    fn parse_endpoint(&mut self) -> Result<ColumnRef, ParseError> {
        let parts = self.parse_qualified_name()?;
        self.endpoint_from_parts(parts)
    }

    fn endpoint_from_parts(&self, mut parts: Vec<String>) -> Result<ColumnRef, ParseError> {
        if parts.len() < 2 {
            return Err(ParseError::Unexpected(
                self.peek().clone(),
                "'.' between table and column",
            ));
        }
        let column = parts.pop().unwrap_or_default();
        Ok(ColumnRef::new(parts.join("."), column))
    }

    /// Optional relationship symbol; consumes it when present.
    fn parse_cardinality(&mut self) -> Cardinality {
        let symbol = match self.peek() {
            Token::Gt => Some(">"),
            Token::Lt => Some("<"),
            Token::LtGt => Some("<>"),
            Token::Dash => Some("-"),
            _ => None,
        };
        if symbol.is_some() {
            self.advance();
        }
        Cardinality::from_symbol(symbol)
    }

    /// `[item, item, ...]` where commas inside parentheses do not split items.
    fn parse_settings(&mut self) -> Result<Vec<Vec<Token>>, ParseError> {
        self.expect(Token::LBracket, "'['")?;

        let mut items = Vec::new();
        let mut item = Vec::new();
        let mut depth = 0usize;

        loop {
            if self.at_end() {
                return Err(ParseError::Unexpected(Token::Eof, "']' closing settings"));
            }
            let tok = self.advance().clone();
            match tok {
                Token::RBracket if depth == 0 => break,
                Token::Comma if depth == 0 => {
                    items.push(std::mem::take(&mut item));
                    continue;
                }
                Token::LParen => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            item.push(tok);
        }
        if !item.is_empty() {
            items.push(item);
        }

        Ok(items)
    }
}

/// `a.b-c.d` lexes as one dotted name because `-` may appear inside names.
/// Split it at the first inner part holding a dash with text on both sides.
fn split_dashed_endpoints(parts: &[String]) -> Option<(ColumnRef, ColumnRef)> {
    (1..parts.len().saturating_sub(1)).find_map(|i| {
        let (left, right) = parts[i].split_once('-')?;
        if left.is_empty() || right.is_empty() {
            return None;
        }
        let from = ColumnRef::new(parts[..i].join("."), left);
        let mut to = vec![right.to_string()];
        to.extend_from_slice(&parts[i + 1..]);
        let column = to.pop()?;
        Some((from, ColumnRef::new(to.join("."), column)))
    })
}

fn is_name(tok: &Token) -> bool {
    matches!(tok, Token::Ident(_) | Token::Str(_))
}

fn keyword_at(tok: &Token, keyword: &str) -> bool {
    matches!(tok, Token::Ident(s) if s.eq_ignore_ascii_case(keyword))
}

/// Re-assemble tokens into source-like text.
fn join_tokens(tokens: &[Token]) -> String {
    let mut s = String::new();
    for tok in tokens {
        match tok {
            Token::Ident(v) | Token::Str(v) => s.push_str(v),
            Token::LParen => s.push('('),
            Token::RParen => s.push(')'),
            Token::Comma => s.push(','),
            Token::Dot => s.push('.'),
            Token::Colon => s.push(':'),
            Token::Dash => s.push('-'),
            _ => {}
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tables_and_columns() {
        let input = r#"
            Table users {
                id int [pk, increment]
                name varchar(255) [not null]
                email varchar [unique, note: "login address"]
            }
        "#;
        let schema = parse(input);
        assert_eq!(schema.tables.len(), 1);
        let users = &schema.tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.header_color, DEFAULT_HEADER_COLOR);
        let names: Vec<&str> = users.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
        assert!(users.columns[0].is_primary);
        assert!(!users.columns[1].is_primary);
        assert_eq!(users.columns[1].typ, "varchar(255)");
        assert_eq!(users.columns[2].note.as_deref(), Some("login address"));
    }

    #[test]
    fn test_parse_single_line_example() {
        let input =
            "Table users { id int [pk] } Table posts { id int [pk] user_id int [ref: > users.id] }";
        let schema = parse(input);
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.tables[1].columns.len(), 2);
        assert_eq!(schema.relationships.len(), 1);
        let rel = &schema.relationships[0];
        assert_eq!(rel.from, ColumnRef::new("posts", "user_id"));
        assert_eq!(rel.to, ColumnRef::new("users", "id"));
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
    }

    #[test]
    fn test_parse_header_color() {
        let schema = parse("Table orders [headercolor: #E67E22, note: 'x'] {\n}");
        assert_eq!(schema.tables[0].header_color, "#E67E22");
    }

    #[test]
    fn test_parse_explicit_refs() {
        let input = r#"
            Ref: posts.user_id > users.id
            Ref fk_tags: tags.id <> posts.id
            Ref: a.b < c.d
            Ref: e.f - g.h
            Ref: i.j k.l
        "#;
        let schema = parse(input);
        let cards: Vec<Cardinality> = schema.relationships.iter().map(|r| r.cardinality).collect();
        assert_eq!(
            cards,
            vec![
                Cardinality::OneToMany,
                Cardinality::ManyToMany,
                Cardinality::ManyToOne,
                Cardinality::OneToOne,
                Cardinality::OneToOne,
            ]
        );
        assert_eq!(schema.relationships[1].from, ColumnRef::new("tags", "id"));
    }

    #[test]
    fn test_parse_schema_qualified_names() {
        let input = r#"
            Table public.users { id int [pk] }
            Ref: public.posts.user_id > public.users.id
        "#;
        let schema = parse(input);
        assert_eq!(schema.tables[0].name, "public.users");
        assert_eq!(schema.relationships[0].to, ColumnRef::new("public.users", "id"));
    }

    #[test]
    fn test_column_outside_table_is_ignored() {
        let (schema, diagnostics) = parse_with_diagnostics("id int [pk]\nTable t {\n}");
        assert_eq!(schema.tables.len(), 1);
        assert!(schema.tables[0].columns.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                line: 1,
                error: ParseError::ColumnOutsideTable("id".into()),
            }]
        );
    }

    #[test]
    fn test_unparsable_lines_are_skipped() {
        let input = r#"
            Table users {
                id int [pk]
                ???
                note: 'unterminated
                name text
            }
        "#;
        let (schema, diagnostics) = parse_with_diagnostics(input);
        assert_eq!(schema.tables[0].columns.len(), 2);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].line, 5);
    }

    #[test]
    fn test_duplicate_table_last_wins() {
        let input = r#"
            Table users { id int }
            Table posts { id int }
            Table users { uuid text }
        "#;
        let (schema, diagnostics) = parse_with_diagnostics(input);
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["posts", "users"]);
        assert_eq!(schema.tables[1].columns[0].name, "uuid");
        assert!(matches!(diagnostics[0].error, ParseError::DuplicateTable(_)));
    }

    #[test]
    fn test_duplicate_column_replaced_in_place() {
        let schema = parse("Table t {\n a int\n b int\n a text [pk]\n}");
        let cols = &schema.tables[0].columns;
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].typ, "text");
        assert!(cols[0].is_primary);
    }

    #[test]
    fn test_multiple_refs_on_one_column() {
        let schema = parse("Table t {\n x int [ref: > a.id, ref: < b.id]\n}");
        assert_eq!(schema.relationships.len(), 2);
        assert_eq!(schema.relationships[1].cardinality, Cardinality::ManyToOne);
        assert_eq!(schema.relationships[1].from, ColumnRef::new("t", "x"));
    }

    #[test]
    fn test_ref_without_symbol_is_one_to_one() {
        let schema = parse("Table t {\n x int [ref: a.id]\n}");
        assert_eq!(schema.relationships[0].cardinality, Cardinality::OneToOne);
    }

    #[test]
    fn test_malformed_ref_keeps_column() {
        let (schema, diagnostics) = parse_with_diagnostics("Table t {\n x int [ref: > a]\n}");
        assert_eq!(schema.tables[0].columns.len(), 1);
        assert!(schema.relationships.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_enum_block_closes_table() {
        let input = r#"
            Table users {
                id int [pk]
            }
            Enum status {
                active
                archived note
            }
        "#;
        let schema = parse(input);
        assert_eq!(schema.tables[0].columns.len(), 1);
    }

    #[test]
    fn test_one_line_columns_without_attributes() {
        let (schema, diagnostics) = parse_with_diagnostics("Table posts { id int user_id int }");
        let names: Vec<&str> = schema.tables[0]
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "user_id"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_one_line_mixed_columns() {
        let schema = parse(
            "Table posts { id int [pk] title varchar(80) user_id int [ref: > users.id] }",
        );
        assert_eq!(schema.tables[0].columns.len(), 3);
        assert_eq!(schema.tables[0].columns[1].typ, "varchar(80)");
        assert_eq!(schema.relationships.len(), 1);
    }

    #[test]
    fn test_trailing_tokens_are_reported() {
        let (schema, diagnostics) = parse_with_diagnostics("Table t {\n id int pk\n}");
        assert_eq!(schema.tables[0].columns.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert!(matches!(diagnostics[0].error, ParseError::Unexpected(..)));
    }

    #[test]
    fn test_block_note_is_ignored() {
        let input =
            "Table users {\n id int\n Note: '''\n This is the users table\n '''\n name text\n}";
        let (schema, diagnostics) = parse_with_diagnostics(input);
        let names: Vec<&str> = schema.tables[0]
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_block_string_column_note() {
        let schema = parse("Table t {\n id int [note: '''\n  primary id\n ''']\n other int\n}");
        let cols = &schema.tables[0].columns;
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].note.as_deref(), Some("primary id"));
    }

    #[test]
    fn test_unclosed_block_string_reports_start_line() {
        let (schema, diagnostics) =
            parse_with_diagnostics("Table t {\n id int\n Note: '''\n never closed\n");
        assert_eq!(schema.tables[0].columns.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
    }

    #[test]
    fn test_column_named_table() {
        let schema = parse("Table t {\n table varchar\n Table int [pk]\n}\nTable u { id int }");
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["t", "u"]);
        assert_eq!(schema.tables[0].columns.len(), 2);
        assert_eq!(schema.tables[0].columns[0].name, "table");
        assert!(schema.tables[0].columns[1].is_primary);
    }

    #[test]
    fn test_table_header_recovers_missing_brace() {
        let schema = parse("Table a {\n id int\nTable b {\n id int\n}");
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_dash_ref_without_spaces() {
        let schema = parse("Ref: a.b-c.d\nRef: s.a.x-s.c.y");
        assert_eq!(schema.relationships.len(), 2);
        assert_eq!(schema.relationships[0].from, ColumnRef::new("a", "b"));
        assert_eq!(schema.relationships[0].to, ColumnRef::new("c", "d"));
        assert_eq!(schema.relationships[0].cardinality, Cardinality::OneToOne);
        assert_eq!(schema.relationships[1].from, ColumnRef::new("s.a", "x"));
        assert_eq!(schema.relationships[1].to, ColumnRef::new("s.c", "y"));
    }

    #[test]
    fn test_dashed_column_names_survive() {
        let schema = parse("Table a {\n created-at int\n}\nRef: a.created-at > b.id");
        assert_eq!(schema.tables[0].columns[0].name, "created-at");
        assert_eq!(schema.relationships[0].from, ColumnRef::new("a", "created-at"));
        assert_eq!(schema.relationships[0].cardinality, Cardinality::OneToMany);
    }

    #[test]
    fn test_note_column_is_not_a_setting() {
        let schema = parse("Table t {\n note text\n Note: 'table note'\n}");
        assert_eq!(schema.tables[0].columns.len(), 1);
        assert_eq!(schema.tables[0].columns[0].name, "note");
    }

    #[test]
    fn test_array_and_default_values() {
        let schema = parse("Table t {\n tags text[] [default: `now()`, pk]\n}");
        let col = &schema.tables[0].columns[0];
        assert_eq!(col.typ, "text[]");
        assert!(col.is_primary);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = "Table a { id int [pk] }\nRef: a.id > b.id";
        assert_eq!(parse(input), parse(input));
    }
}
