/// Statement class of raw SQL text, decided from its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Classifies `sql` without parsing it. Leading whitespace, comments and
    /// opening parentheses are skipped.
    pub fn preview(sql: &str) -> Self {
        let keyword = leading_keyword(sql);
        if keyword.eq_ignore_ascii_case("select") || keyword.eq_ignore_ascii_case("with") {
            Self::Select
        } else if keyword.eq_ignore_ascii_case("insert") {
            Self::Insert
        } else if keyword.eq_ignore_ascii_case("replace") {
            Self::Replace
        } else if keyword.eq_ignore_ascii_case("update") {
            Self::Update
        } else if keyword.eq_ignore_ascii_case("delete") {
            Self::Delete
        } else {
            Self::Other
        }
    }

    /// Lower-case keyword used as the operation name in query log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other => "other",
        }
    }

    /// Whether statements of this kind can need a dialect rewrite.
    pub fn is_rewrite_candidate(self) -> bool {
        !matches!(self, Self::Other)
    }
}

fn leading_keyword(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        let trimmed = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == '(');
        if let Some(comment) = trimmed.strip_prefix("/*") {
            rest = comment.find("*/").map_or("", |end| &comment[end + 2..]);
        } else if let Some(comment) = trimmed
            .strip_prefix("--")
            .or_else(|| trimmed.strip_prefix('#'))
        {
            rest = comment.find('\n').map_or("", |end| &comment[end + 1..]);
        } else {
            rest = trimmed;
            break;
        }
    }
    let end = rest
        .find(|ch: char| !ch.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}
